//! Command-line driver: load a directory of files as a corpus, find
//! similarity clusters, run every dispatchable delta codec over each
//! cluster, and print a per-codec statistics table.

mod corpus;
mod error;
mod report;

use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use resemblance_core::{run_delta_trials, scan_similar_records, FeatureGenerator, FeatureIndexConfig};
use tracing::info;

use crate::error::CliError;

/// Resemblance-detection and delta-codec testbed.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory of files to load as the corpus.
    corpus_dir: PathBuf,

    /// Number of raw features sampled per record (N).
    #[arg(long, default_value_t = FeatureIndexConfig::default().feature_count)]
    feature_count: usize,

    /// Number of super-features per record (M); must divide `feature_count`.
    #[arg(long, default_value_t = FeatureIndexConfig::default().super_feature_count)]
    super_feature_count: usize,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = FeatureIndexConfig {
        feature_count: args.feature_count,
        super_feature_count: args.super_feature_count,
        ..FeatureIndexConfig::default()
    };

    let corpus = corpus::load_corpus(&args.corpus_dir)?;
    info!(records = corpus.len(), "corpus loaded");

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} scanning for similar records... {elapsed}")
            .unwrap(),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));

    let generator = FeatureGenerator::new(config)?;
    let clusters = scan_similar_records(&corpus, generator);
    spinner.finish_with_message(format!("found {} similarity clusters", clusters.len()));

    let delta_spinner = ProgressBar::new_spinner();
    delta_spinner.set_message(format!("delta-compressing {} clusters...", clusters.len()));
    delta_spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    delta_spinner.enable_steady_tick(std::time::Duration::from_millis(120));
    let stats = run_delta_trials(&corpus, &clusters);
    delta_spinner.finish_and_clear();

    let table = report::render(&stats);
    println!("{table}");

    Ok(())
}
