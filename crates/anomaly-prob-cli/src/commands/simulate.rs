//! `simulate` command: the synthetic Gamma baseline with an injected run

use std::path::PathBuf;

use anomaly_prob::ScoringSession;
use anyhow::{anyhow, Context};
use clap::Args;

use crate::config::CliConfig;
use crate::input::write_values;
use crate::output::{print_info, print_parameters, print_success, print_warning};

/// Arguments for `simulate`
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// RNG seed; overrides the configured value
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Test index to print a sample check for
    #[arg(long, default_value_t = 110)]
    pub inspect: u64,

    /// Write the generated baseline errors to this file
    #[arg(long)]
    pub train_out: Option<PathBuf>,

    /// Write the generated test errors to this file
    #[arg(long)]
    pub test_out: Option<PathBuf>,
}

/// Execute the simulate command
pub fn execute(args: SimulateArgs, config: &CliConfig) -> anyhow::Result<()> {
    let mut simulation = config.simulation.clone();
    if let Some(seed) = args.seed {
        simulation.seed = seed;
    }

    let data = simulation.run().context("generating simulated errors")?;
    print_info(&format!(
        "Simulated {} baseline and {} test errors (seed {}, injected run {}..{})",
        data.train.len(),
        data.test.len(),
        simulation.seed,
        data.anomaly_range.start,
        data.anomaly_range.end,
    ));

    if let Some(path) = &args.train_out {
        write_values(path, &data.train)?;
    }
    if let Some(path) = &args.test_out {
        write_values(path, &data.test)?;
    }

    let session = ScoringSession::calibrate(&data.train, config.scoring.clone())
        .context("fitting simulated baseline")?;
    print_parameters(&session.snapshot().params);

    let series = session.score_series(&data.test)?;
    let inside = series
        .flagged()
        .filter(|p| data.is_injected(p.index as usize))
        .count();
    let summary = format!(
        "{} of {} test points flagged at threshold {} ({} inside the injected run)",
        series.flagged_count(),
        series.len(),
        series.threshold,
        inside
    );
    if series.flagged_count() > 0 {
        print_warning(&summary);
    } else {
        print_success(&summary);
    }

    let point = series.get(args.inspect).ok_or_else(|| {
        anyhow!(
            "inspect index {} is outside the test series (0..{})",
            args.inspect,
            series.len()
        )
    })?;
    println!("Sample check at index {}:", point.index);
    println!("  {:<13} {:.6}", "raw error:", point.raw_error);
    println!("  {:<13} {:.6}", "transformed:", point.transformed);
    println!("  {:<13} {:.6}", "probability:", point.score);
    println!("  {:<13} {}", "flag:", point.flag);

    Ok(())
}
