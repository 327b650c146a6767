use std::path::PathBuf;

use sentiment_cli::build_cli;
use sentiment_cli::train::{
    config_from_arguments, format_scores, load_workflow_config, run_clear_cache, run_train,
};
use sentiment_cli::util::data_file_delimiter;
use sentiment_classifiers::stats::ScorePair;
use sentiment_classifiers::workflow::WorkflowConfig;

fn train_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["sentiment", "train"];
    argv.extend_from_slice(args);
    let matches = build_cli().try_get_matches_from(argv).unwrap();
    matches.subcommand_matches("train").unwrap().clone()
}

fn write_reviews(dir: &tempfile::TempDir, name: &str, n: usize) -> PathBuf {
    let mut csv = String::from("Reviewer Name,Review text,Ratings\n");
    for i in 0..n {
        if i % 2 == 0 {
            csv.push_str(&format!("u{},great shuttles love them {},5\n", i, i));
        } else {
            csv.push_str(&format!("u{},broken feathers poor quality {},1\n", i, i));
        }
    }
    let path = dir.path().join(name);
    std::fs::write(&path, csv).unwrap();
    path
}

// ---------------------------------------------------------------------------
// util
// ---------------------------------------------------------------------------

#[test]
fn data_file_delimiter_follows_extension() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("a.csv");
    let tsv = dir.path().join("b.TSV");
    std::fs::write(&csv, "x\n").unwrap();
    std::fs::write(&tsv, "x\n").unwrap();
    assert_eq!(data_file_delimiter(&csv).unwrap(), ',');
    assert_eq!(data_file_delimiter(&tsv).unwrap(), '\t');
}

#[test]
fn data_file_delimiter_rejects_wrong_extension_or_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let txt = dir.path().join("a.txt");
    std::fs::write(&txt, "x\n").unwrap();
    let err = data_file_delimiter(&txt).unwrap_err();
    assert!(err.to_string().contains("extension"));

    let missing = dir.path().join("missing.csv");
    let err = data_file_delimiter(&missing).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn load_config_fills_missing_fields_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"data_path": "reviews.csv", "cv": 5, "hyperparameters": {"classifier__alpha": [0.1, 1.0]}}"#,
    )
    .unwrap();

    let config = load_workflow_config(&path).unwrap();
    assert_eq!(config.data_path, PathBuf::from("reviews.csv"));
    assert_eq!(config.cv, 5);
    assert_eq!(config.random_state, 42);
    assert_eq!(config.hyperparameters.n_candidates(), 2);
}

#[test]
fn load_config_reports_unreadable_and_invalid_files() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_workflow_config(dir.path().join("nope.json")).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to read config"));

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();
    let err = load_workflow_config(&bad).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config"));
}

#[test]
fn flags_override_the_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_reviews(&dir, "reviews.tsv", 4);
    let config_path = dir.path().join("config.json");
    std::fs::write(&config_path, r#"{"test_size": 0.5, "cv": 3}"#).unwrap();

    let matches = train_matches(&[
        config_path.to_str().unwrap(),
        "--data",
        data.to_str().unwrap(),
        "--no-cache",
        "--seed",
        "7",
        "--cv",
        "2",
    ]);
    let config = config_from_arguments(&matches).unwrap();
    assert_eq!(config.data_path, data);
    assert_eq!(config.loader.delimiter, '\t');
    assert_eq!(config.cache_dir, None);
    assert_eq!(config.random_state, 7);
    assert_eq!(config.cv, 2);
    assert!((config.test_size - 0.5).abs() < 1e-12);
}

#[test]
fn tsv_data_path_from_config_file_reads_tabs() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_reviews(&dir, "reviews.tsv", 4);
    let config_path = dir.path().join("config.json");
    std::fs::write(
        &config_path,
        serde_json::json!({ "data_path": data }).to_string(),
    )
    .unwrap();

    let matches = train_matches(&[config_path.to_str().unwrap()]);
    let config = config_from_arguments(&matches).unwrap();
    assert_eq!(config.data_path, data);
    assert_eq!(config.loader.delimiter, '\t');
}

#[test]
fn explicit_delimiter_survives_data_override() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_reviews(&dir, "reviews.csv", 4);
    let config_path = dir.path().join("config.json");
    std::fs::write(&config_path, r#"{"loader": {"delimiter": ";"}}"#).unwrap();

    let matches = train_matches(&[
        config_path.to_str().unwrap(),
        "--data",
        data.to_str().unwrap(),
    ]);
    let config = config_from_arguments(&matches).unwrap();
    assert_eq!(config.loader.delimiter, ';');
}

#[test]
fn no_cache_conflicts_with_cache_dir() {
    let argv = ["sentiment", "train", "--no-cache", "--cache-dir", "x"];
    assert!(build_cli().try_get_matches_from(argv).is_err());
}

#[test]
fn defaults_without_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_reviews(&dir, "reviews.csv", 4);
    let matches = train_matches(&["--data", data.to_str().unwrap()]);
    let config = config_from_arguments(&matches).unwrap();
    let defaults = WorkflowConfig::default();
    assert_eq!(config.cache_dir, defaults.cache_dir);
    assert_eq!(config.hyperparameters, defaults.hyperparameters);
    assert_eq!(config.loader.delimiter, ',');
}

// ---------------------------------------------------------------------------
// train / clear-cache
// ---------------------------------------------------------------------------

#[test]
fn train_prints_scores_and_writes_trace() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_reviews(&dir, "reviews.csv", 40);
    let cache_dir = dir.path().join("cache");
    let trace = dir.path().join("trace.json");

    let matches = train_matches(&[
        "--data",
        data.to_str().unwrap(),
        "--cache-dir",
        cache_dir.to_str().unwrap(),
        "--trace-output",
        trace.to_str().unwrap(),
    ]);
    let report = run_train(&matches).unwrap();

    let printed = format_scores(&report.scores);
    let lines: Vec<&str> = printed.lines().collect();
    assert!(lines[0].starts_with("Train Score: "));
    assert!(lines[1].starts_with("Test Score: "));

    let written: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&trace).unwrap()).unwrap();
    assert_eq!(written["report"]["n_rows"], 40);
    assert_eq!(written["report"]["search"]["n_splits"], 4);
    assert_eq!(written["config"]["cv"], 4);

    assert_eq!(run_clear_cache(&cache_dir).unwrap(), 5);
    assert_eq!(run_clear_cache(&cache_dir).unwrap(), 0);
}

#[test]
fn scores_print_as_floats() {
    let scores = ScorePair {
        train: 1.0,
        test: 0.0,
    };
    assert_eq!(format_scores(&scores), "Train Score: 1.0\nTest Score: 0.0");
    let scores = ScorePair {
        train: 0.8,
        test: 0.75,
    };
    assert_eq!(format_scores(&scores), "Train Score: 0.8\nTest Score: 0.75");
}
