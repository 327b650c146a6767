use anyhow::Result;
use log::LevelFilter;
use std::path::PathBuf;

use sentiment_cli::build_cli;
use sentiment_cli::train::{format_scores, run_clear_cache, run_train};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("SENTIMENT_LOG", "error,sentiment=info"))
        .init();

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("train", train_matches)) => match run_train(train_matches) {
            Ok(report) => {
                println!("{}", format_scores(&report.scores));
                Ok(())
            }
            Err(e) => {
                log::error!("Training failed: {:#}", e);
                std::process::exit(1)
            }
        },
        Some(("clear-cache", clear_matches)) => {
            let cache_dir = clear_matches
                .get_one::<PathBuf>("cache_dir")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(".cache"));
            let removed = run_clear_cache(&cache_dir)?;
            eprintln!("Removed {} cache entries from {}", removed, cache_dir.display());
            Ok(())
        }
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}
