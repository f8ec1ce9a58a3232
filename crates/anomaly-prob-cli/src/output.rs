//! Output formatting utilities

use anomaly_prob::{BaselineParameters, ScoredPoint, ScoredSeries};
use colored::*;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format for scored series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Comma-separated values with a header row
    Csv,
}

impl OutputFormat {
    /// Whether stdout carries machine-readable data only.
    pub fn is_machine(self) -> bool {
        !matches!(self, OutputFormat::Table)
    }
}

#[derive(Tabled)]
struct PointRow {
    index: u64,
    raw_error: String,
    transformed: String,
    score: String,
    flag: String,
}

impl From<&ScoredPoint> for PointRow {
    fn from(p: &ScoredPoint) -> Self {
        Self {
            index: p.index,
            raw_error: format!("{:.6}", p.raw_error),
            transformed: format!("{:.6}", p.transformed),
            score: format!("{:.6}", p.score),
            flag: p.flag.to_string(),
        }
    }
}

#[derive(Serialize)]
struct SeriesOutput<'a> {
    generation: u64,
    calibrated_at: String,
    threshold: f64,
    total: usize,
    flagged: usize,
    points: Vec<&'a ScoredPoint>,
}

/// Render the points of a scored series.
pub fn render_series(
    series: &ScoredSeries,
    format: OutputFormat,
    flagged_only: bool,
) -> anyhow::Result<String> {
    let points: Vec<&ScoredPoint> = if flagged_only {
        series.flagged().collect()
    } else {
        series.points.iter().collect()
    };

    let rendered = match format {
        OutputFormat::Table => {
            if points.is_empty() {
                "No points".to_string()
            } else {
                Table::new(points.iter().map(|p| PointRow::from(*p))).to_string()
            }
        }
        OutputFormat::Json => serde_json::to_string_pretty(&SeriesOutput {
            generation: series.generation,
            calibrated_at: series.calibrated_at.to_rfc3339(),
            threshold: series.threshold.value(),
            total: series.len(),
            flagged: series.flagged_count(),
            points,
        })?,
        OutputFormat::Csv => {
            let mut out = String::from("index,raw_error,transformed,score,flag\n");
            for p in points {
                out.push_str(&format!(
                    "{},{},{},{},{}\n",
                    p.index, p.raw_error, p.transformed, p.score, p.flag
                ));
            }
            out
        }
    };
    Ok(rendered)
}

/// Print a scored series followed by its flagged summary.
///
/// Machine formats keep stdout clean; the summary goes to stderr.
pub fn print_series(
    series: &ScoredSeries,
    format: OutputFormat,
    flagged_only: bool,
) -> anyhow::Result<()> {
    let rendered = render_series(series, format, flagged_only)?;
    print!("{}", rendered);
    if !rendered.ends_with('\n') {
        println!();
    }

    let summary = format!(
        "{} of {} points flagged at threshold {}",
        series.flagged_count(),
        series.len(),
        series.threshold
    );
    if format.is_machine() {
        eprintln!("{}", summary);
    } else if series.flagged_count() > 0 {
        print_warning(&summary);
    } else {
        print_success(&summary);
    }
    Ok(())
}

/// Print fitted baseline parameters.
pub fn print_parameters(params: &BaselineParameters) {
    println!("{:<10} {:.6}", "mu:", params.mu());
    println!("{:<10} {:.6}", "sigma:", params.sigma());
    println!("{:<10} {:e}", "epsilon:", params.epsilon());
    println!("{:<10} {}", "samples:", params.sample_count());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a hint following an error
pub fn print_hint(message: &str) {
    eprintln!("{} {}", "hint:".cyan(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}
