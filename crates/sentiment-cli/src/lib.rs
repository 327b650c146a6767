//! Command line plumbing for the `sentiment` binary: argument parsing, JSON
//! config loading with flag overrides, and result output.
pub mod train;
pub mod util;

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, ValueHint};

/// The `sentiment` command tree.
pub fn build_cli() -> Command {
    Command::new("sentiment")
        .version(clap::crate_version!())
        .author("Justin Sing <justincsing@gmail.com>")
        .about("Review sentiment training job: bag-of-words + naive Bayes with cross-validated grid search")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("train")
                .about("Load reviews, grid-search the text pipeline and report train/test F1")
                .arg(
                    Arg::new("config")
                        .help("Path to a JSON workflow configuration file")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("data")
                        .short('d')
                        .long("data")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help(
                            "Path to the review table (*.csv or *.tsv). Overrides the data \
                             file specified in the configuration file.",
                        )
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("cache_dir")
                        .long("cache-dir")
                        .help("Directory for the vectorization cache.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("no_cache")
                        .long("no-cache")
                        .help("Disable the vectorization cache.")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("cache_dir"),
                )
                .arg(
                    Arg::new("trace_output")
                        .short('o')
                        .long("trace-output")
                        .help("Write the grid search trace and scores to this JSON file.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("test_size")
                        .long("test-size")
                        .help("Fraction of rows held out for testing.")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Random seed for the train/test shuffle.")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("cv")
                        .long("cv")
                        .help("Number of stratified cross-validation folds.")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("clear-cache")
                .about("Delete every entry of the vectorization cache")
                .arg(
                    Arg::new("cache_dir")
                        .long("cache-dir")
                        .help("Cache directory to clear.")
                        .default_value(".cache")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::DirPath),
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Written by {author-with-newline}Version {version}\n\n\
             {all-args}{after-help}",
        )
}
