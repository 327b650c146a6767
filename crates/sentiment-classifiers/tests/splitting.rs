//! Integration tests for the train/test splitter.

use std::collections::HashSet;

use sentiment_classifiers::data_handling::{train_test_split, FeatureSet};

fn hundred_rows() -> FeatureSet {
    FeatureSet::new(
        (0..100).map(|i| format!("review number {}", i)).collect(),
        (0..100).map(|i| (i % 3 != 0) as u8).collect(),
    )
    .unwrap()
}

#[test]
fn same_seed_gives_identical_75_25_partitions() {
    let data = hundred_rows();
    let first = train_test_split(&data, 0.25, 42).unwrap();
    let second = train_test_split(&data, 0.25, 42).unwrap();

    assert_eq!(first.x_train.len(), 75);
    assert_eq!(first.x_test.len(), 25);
    assert_eq!(first, second);
}

#[test]
fn partitions_are_disjoint_and_complete() {
    let data = hundred_rows();
    let split = train_test_split(&data, 0.25, 42).unwrap();

    let train: HashSet<usize> = split.train_indices.iter().copied().collect();
    let test: HashSet<usize> = split.test_indices.iter().copied().collect();
    assert_eq!(train.len() + test.len(), data.len());
    assert!(train.is_disjoint(&test));
    let union: HashSet<usize> = train.union(&test).copied().collect();
    assert_eq!(union, (0..100).collect());

    // rows travel with their labels
    for (pos, &row) in split.test_indices.iter().enumerate() {
        assert_eq!(split.x_test[pos], data.x[row]);
        assert_eq!(split.y_test[pos], data.y[row]);
    }
}

#[test]
fn different_seed_changes_membership() {
    let data = hundred_rows();
    let a = train_test_split(&data, 0.25, 42).unwrap();
    let b = train_test_split(&data, 0.25, 7).unwrap();
    let a_test: HashSet<usize> = a.test_indices.into_iter().collect();
    let b_test: HashSet<usize> = b.test_indices.into_iter().collect();
    assert_ne!(a_test, b_test);
}
