//! `fit` command: learn baseline parameters from known-normal errors

use std::path::PathBuf;

use anomaly_prob::{BaselineEstimator, BaselineStore, JsonFileBaseline};
use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::config::CliConfig;
use crate::input::read_values;
use crate::output::{print_parameters, print_success};

/// Arguments for `fit`
#[derive(Args, Debug)]
pub struct FitArgs {
    /// Baseline error file (one value or `index,value` per line)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Write the fitted baseline record (JSON) to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the fit command
pub fn execute(args: FitArgs, config: &CliConfig) -> anyhow::Result<()> {
    let values = read_values(&args.input)
        .with_context(|| format!("reading baseline errors from {}", args.input.display()))?;

    let params = BaselineEstimator::from_config(&config.scoring)
        .fit(&values)
        .context("fitting baseline")?;
    info!(samples = values.len(), "baseline fitted from {}", args.input.display());

    print_parameters(&params);

    if let Some(path) = &args.output {
        let store = JsonFileBaseline::new(path);
        store
            .save_parameters(&params)
            .with_context(|| format!("writing baseline record to {}", store.path().display()))?;
        print_success(&format!("Baseline record written to {}", store.path().display()));
    }

    Ok(())
}
