//! `score` command: score an error series against a saved baseline

use std::path::PathBuf;

use anomaly_prob::{BaselineStore, JsonFileBaseline, ScoringSession};
use anyhow::{anyhow, Context};
use clap::Args;

use crate::config::CliConfig;
use crate::input::read_series;
use crate::output::{print_series, OutputFormat};

/// Arguments for `score`
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Baseline record written by `fit --output`
    #[arg(short, long)]
    pub params: PathBuf,

    /// Error series to score (one value or `index,value` per line)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Decision threshold in (0, 1); overrides the configured value
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Only print flagged points
    #[arg(long)]
    pub flagged_only: bool,
}

/// Execute the score command
pub fn execute(args: ScoreArgs, config: &CliConfig) -> anyhow::Result<()> {
    let params = JsonFileBaseline::new(&args.params)
        .load_parameters()
        .with_context(|| format!("loading baseline record from {}", args.params.display()))?
        .ok_or_else(|| anyhow!("no baseline record at {}", args.params.display()))?;

    let mut scoring = config.scoring.clone();
    if let Some(threshold) = args.threshold {
        scoring.threshold = threshold;
    }

    let points = read_series(&args.input)
        .with_context(|| format!("reading error series from {}", args.input.display()))?;

    let session = ScoringSession::from_parameters(params, scoring)?;
    let series = session
        .score_indexed(&points)
        .with_context(|| format!("scoring {}", args.input.display()))?;

    print_series(&series, args.format, args.flagged_only)
}
