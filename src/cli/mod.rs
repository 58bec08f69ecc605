//! Command-line parsing for the dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the data and rendering code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cvd", version, about = "US COVID-19 statistics dashboard (COVID Tracking Project)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI dashboard.
    ///
    /// Date range and metric selection can be seeded from the flags below and
    /// changed interactively afterwards.
    Tui(ViewArgs),
    /// Print a date-filtered table of one or more metrics.
    Show(ViewArgs),
    /// List the available metrics (display label and upstream field name).
    Metrics,
    /// Export date-filtered metrics to CSV.
    Export(ExportArgs),
}

/// Options shared by every view of the data.
#[derive(Debug, Parser, Clone)]
pub struct ViewArgs {
    /// Metric to display, by label or upstream field name. Repeatable;
    /// defaults to the first catalog entry.
    #[arg(short = 'm', long = "metric", value_name = "METRIC")]
    pub metrics: Vec<String>,

    /// Start date (YYYY-MM-DD). Defaults to 2020-03-01.
    #[arg(long, value_name = "DATE")]
    pub start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD, inclusive). Defaults to the latest reported day.
    #[arg(long, value_name = "DATE")]
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Output CSV path.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub out: PathBuf,
}
