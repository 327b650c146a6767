//! Integration tests for loading review tables and projecting features.

use std::io::Write;

use sentiment_classifiers::data_handling::input_output;
use sentiment_classifiers::io::{load_reviews, LoaderConfig};
use sentiment_classifiers::ErrorKind;

fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Header normalization and label derivation
// ---------------------------------------------------------------------------

#[test]
fn five_rows_one_empty_review_leaves_four_labelled_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "reviews.csv",
        " Reviewer Name ,Review text,Ratings\n\
         ann,Superb shuttles,5\n\
         bob,Feathers fall apart,2\n\
         cat,Just okay,3\n\
         dan,,1\n\
         eve,Good value,4\n",
    );

    let table = load_reviews(&path, &LoaderConfig::default()).unwrap();
    assert_eq!(table.columns(), &["Reviewer_Name", "Review_text", "Ratings"]);
    assert_eq!(table.nrows(), 4);

    let data = input_output(&table, "Review_text", "Ratings").unwrap();
    assert_eq!(
        data.x,
        vec!["Superb shuttles", "Feathers fall apart", "Just okay", "Good value"]
    );
    assert_eq!(data.y, vec![1, 0, 0, 1]);
}

#[test]
fn loaded_tables_have_no_missing_cells_or_spaced_headers() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "reviews.csv",
        "Review text , Up Votes ,Ratings\n\
         fine,NA,5\n\
         fine,3,5\n\
         meh,null,1\n\
         great,0,4\n\
         odd,1,3.5\n\
         nope,2,bad\n\
         bad,7,\n",
    );

    let table = load_reviews(&path, &LoaderConfig::default()).unwrap();
    for name in table.columns() {
        assert_eq!(name.trim(), name);
        assert!(!name.contains(' '), "column '{}' has a space", name);
    }
    for row in table.rows() {
        assert!(row.iter().all(|cell| !cell.is_empty() && cell != "NA" && cell != "null"));
    }
    let labels = table.column("Ratings").unwrap();
    assert_eq!(labels, vec!["1", "1"]);
}

#[test]
fn label_column_can_be_appended() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "reviews.csv", "text,stars\nnice,4\nawful,1\n");
    let config = LoaderConfig {
        rating_column: "stars".to_string(),
        label_column: "sentiment".to_string(),
        ..LoaderConfig::default()
    };

    let table = load_reviews(&path, &config).unwrap();
    assert_eq!(table.columns(), &["text", "stars", "sentiment"]);
    assert_eq!(table.column("stars").unwrap(), vec!["4", "1"]);
    assert_eq!(input_output(&table, "text", "sentiment").unwrap().y, vec![1, 0]);
}

#[test]
fn custom_delimiter() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "reviews.tsv", "Review text\tRatings\ngood grip\t5\n");
    let config = LoaderConfig {
        delimiter: '\t',
        ..LoaderConfig::default()
    };
    let table = load_reviews(&path, &config).unwrap();
    assert_eq!(table.nrows(), 1);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn missing_file_is_an_io_error() {
    let err = load_reviews("/nonexistent/path/reviews.csv", &LoaderConfig::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn ragged_rows_are_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "reviews.csv", "Review text,Ratings\ngood,5,extra\n");
    let err = load_reviews(&path, &LoaderConfig::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn missing_rating_column_is_a_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "reviews.csv", "Review text,Stars\ngood,5\n");
    let err = load_reviews(&path, &LoaderConfig::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn missing_input_column_is_a_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "reviews.csv", "Summary,Ratings\ngood,5\n");
    let table = load_reviews(&path, &LoaderConfig::default()).unwrap();
    let err = input_output(&table, "Review_text", "Ratings").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
}
