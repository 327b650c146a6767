//! `sentiment train`: config loading, flag overrides and result output.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::Serialize;

use sentiment_classifiers::cache::VectorizerCache;
use sentiment_classifiers::io::LoaderConfig;
use sentiment_classifiers::stats::ScorePair;
use sentiment_classifiers::workflow::{run_workflow, WorkflowConfig, WorkflowReport};

use crate::util::{data_file_delimiter, write_bytes_to_file};

/// Load a workflow configuration from a JSON file. Missing fields keep
/// their defaults.
pub fn load_workflow_config<P: AsRef<Path>>(path: P) -> Result<WorkflowConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: WorkflowConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

/// Build the run configuration from the optional config file and the
/// `train` subcommand flags. Flags win over the file.
pub fn config_from_arguments(matches: &ArgMatches) -> Result<WorkflowConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(config_path) => {
            log::info!("Using config: {:?}", config_path);
            load_workflow_config(config_path)?
        }
        None => {
            log::info!("No config provided; using defaults.");
            WorkflowConfig::default()
        }
    };

    if let Some(data) = matches.get_one::<String>("data") {
        config.data_path = PathBuf::from(data);
    }
    // a `.tsv` table only overrides the default comma, never an explicit delimiter
    let implied = data_file_delimiter(&config.data_path)?;
    if config.loader.delimiter == LoaderConfig::default().delimiter {
        config.loader.delimiter = implied;
    }

    if matches.get_flag("no_cache") {
        config.cache_dir = None;
    } else if let Some(cache_dir) = matches.get_one::<PathBuf>("cache_dir") {
        config.cache_dir = Some(cache_dir.clone());
    }

    if let Some(&test_size) = matches.get_one::<f64>("test_size") {
        config.test_size = test_size;
    }
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config.random_state = seed;
    }
    if let Some(&cv) = matches.get_one::<usize>("cv") {
        config.cv = cv;
    }

    Ok(config)
}

#[derive(Serialize)]
struct TraceOutput<'a> {
    config: &'a WorkflowConfig,
    report: &'a WorkflowReport,
}

/// Write the run configuration and report as pretty JSON.
pub fn write_trace<P: AsRef<Path>>(
    path: P,
    config: &WorkflowConfig,
    report: &WorkflowReport,
) -> Result<()> {
    let json = serde_json::to_vec_pretty(&TraceOutput { config, report })
        .context("Failed to serialize search trace")?;
    write_bytes_to_file(&path, &json)
        .with_context(|| format!("Failed to write trace: {}", path.as_ref().display()))?;
    log::info!("Wrote search trace to {}", path.as_ref().display());
    Ok(())
}

/// The two lines the job prints on success. Scores always keep a decimal
/// point, so 1.0 prints as `1.0`.
pub fn format_scores(scores: &ScorePair) -> String {
    format!("Train Score: {:?}\nTest Score: {:?}", scores.train, scores.test)
}

/// Run `train` end to end.
pub fn run_train(matches: &ArgMatches) -> Result<WorkflowReport> {
    let config = config_from_arguments(matches)?;
    let report = run_workflow(&config)
        .with_context(|| format!("Training failed on {}", config.data_path.display()))?;

    if let Some(trace_path) = matches.get_one::<PathBuf>("trace_output") {
        write_trace(trace_path, &config, &report)?;
    }
    Ok(report)
}

/// Run `clear-cache`; returns the number of entries removed.
pub fn run_clear_cache(cache_dir: &Path) -> Result<usize> {
    let cache = VectorizerCache::open(cache_dir)
        .with_context(|| format!("Failed to open cache: {}", cache_dir.display()))?;
    let removed = cache
        .clear()
        .with_context(|| format!("Failed to clear cache: {}", cache_dir.display()))?;
    Ok(removed)
}
