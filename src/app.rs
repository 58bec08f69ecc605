//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - fetches the daily series (through the cache)
//! - resolves the requested metrics and date range
//! - dispatches to the TUI or prints/exports the filtered view

use clap::Parser;

use crate::cli::{Command, ExportArgs, ViewArgs};
use crate::data::{SeriesCache, TrackingClient};
use crate::domain::{DailySeries, DateRange, Metric, catalog};
use crate::error::AppError;

pub mod pipeline;

use pipeline::ViewConfig;

/// Entry point for the `cvd` binary.
pub fn run() -> Result<(), AppError> {
    // We want a bare `cvd` (and `cvd --start ...`) to behave like `cvd tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => crate::tui::run(args),
        Command::Show(args) => handle_show(args),
        Command::Metrics => {
            print!("{}", crate::report::format_catalog());
            Ok(())
        }
        Command::Export(args) => handle_export(args),
    }
}

fn handle_show(args: ViewArgs) -> Result<(), AppError> {
    let cache = SeriesCache::new(TrackingClient::from_env()?);
    let series = cache.get()?;
    let config = resolve_view(&args, &series)?;
    let view = pipeline::build_view(&series, &config);
    print!("{}", crate::report::format_view(&view));
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let cache = SeriesCache::new(TrackingClient::from_env()?);
    let series = cache.get()?;
    let config = resolve_view(&args.view, &series)?;
    let view = pipeline::build_view(&series, &config);
    let rows = crate::io::export::write_view_csv(&args.out, &view)?;
    println!("Wrote {rows} rows to {}", args.out.display());
    Ok(())
}

/// Turn CLI flags into a concrete view configuration, filling defaults from
/// the fetched series (end date = latest reported day).
pub fn resolve_view(args: &ViewArgs, series: &DailySeries) -> Result<ViewConfig, AppError> {
    let metrics = if args.metrics.is_empty() {
        vec![Metric::ALL[0]]
    } else {
        args.metrics
            .iter()
            .map(|raw| catalog::resolve(raw))
            .collect::<Result<Vec<_>, _>>()?
    };

    let defaults = pipeline::default_range(series);
    let range = DateRange::new(
        args.start.unwrap_or(defaults.start),
        args.end.unwrap_or(defaults.end),
    );

    Ok(ViewConfig { metrics, range })
}

/// Rewrite argv so `cvd` defaults to `cvd tui`.
///
/// Rules:
/// - `cvd`                      -> `cvd tui`
/// - `cvd --start 2020-04-01`   -> `cvd tui --start 2020-04-01`
/// - `cvd --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "show" | "metrics" | "export");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::DailyRecord;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["cvd"])), args(&["cvd", "tui"]));
        assert_eq!(
            rewrite_args(args(&["cvd", "--start", "2020-04-01"])),
            args(&["cvd", "tui", "--start", "2020-04-01"])
        );
        assert_eq!(rewrite_args(args(&["cvd", "--help"])), args(&["cvd", "--help"]));
        assert_eq!(rewrite_args(args(&["cvd", "show"])), args(&["cvd", "show"]));
    }

    #[test]
    fn resolve_view_defaults_and_errors() {
        let date = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
        let series = crate::domain::DailySeries::from_records(vec![DailyRecord::new(date)]);

        let view = ViewArgs { metrics: Vec::new(), start: None, end: None };
        let config = resolve_view(&view, &series).unwrap();
        assert_eq!(config.metrics, vec![Metric::Positive]);
        assert_eq!(config.range.start, pipeline::DEFAULT_START);
        assert_eq!(config.range.end, date);

        let view = ViewArgs {
            metrics: vec!["not a metric".to_string()],
            start: None,
            end: None,
        };
        assert!(matches!(
            resolve_view(&view, &series),
            Err(AppError::UnknownMetric(_))
        ));
    }
}
