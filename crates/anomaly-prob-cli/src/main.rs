//! anomaly-prob CLI - turn reconstruction errors into anomaly probabilities
//!
//! - `fit` learns baseline parameters from a file of known-normal errors
//! - `score` scores an error series against a saved baseline
//! - `simulate` runs the synthetic Gamma scenario end to end

use std::io::IsTerminal;

use anomaly_prob::ScoringError;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod input;
mod output;

use commands::{fit, score, simulate};
use config::CliConfig;

/// anomaly-prob CLI application
#[derive(Parser)]
#[command(name = "anomaly-prob")]
#[command(about = "Fit baselines and score reconstruction errors as anomaly probabilities", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ANOMALY_PROB_CONFIG", global = true)]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Fit baseline parameters from known-normal errors
    Fit(fit::FitArgs),

    /// Score an error series against a saved baseline
    Score(score::ScoreArgs),

    /// Run the synthetic Gamma scenario with an injected anomaly run
    #[command(alias = "sim")]
    Simulate(simulate::SimulateArgs),

    /// Show the effective configuration
    Config,
}

fn init_tracing(config: &CliConfig, verbose: bool) {
    let level = if verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    init_tracing(&config, cli.verbose);

    match cli.command {
        Commands::Fit(args) => fit::execute(args, &config),
        Commands::Score(args) => score::execute(args, &config),
        Commands::Simulate(args) => simulate::execute(args, &config),
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn main() {
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        output::print_error(&format!("{:#}", e));
        if e
            .downcast_ref::<ScoringError>()
            .is_some_and(ScoringError::is_baseline_error)
        {
            output::print_hint(
                "the baseline cannot be used for scoring; refit it from a larger or more varied sample",
            );
        }
        std::process::exit(1);
    }
}
