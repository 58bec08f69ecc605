//! Formatted terminal output for the CLI front-end.
//!
//! We keep formatting code in one place so:
//! - the data code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::DashboardView;
use crate::domain::Metric;

/// Format the metric catalog as an aligned label/field table.
pub fn format_catalog() -> String {
    let width = Metric::ALL
        .iter()
        .map(|m| m.display_name().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!("{:<width$}  FIELD\n", "LABEL"));
    for metric in Metric::ALL {
        out.push_str(&format!(
            "{:<width$}  {}\n",
            metric.display_name(),
            metric.field_name()
        ));
    }
    out
}

/// Format a full view: one dated table per selected metric.
pub fn format_view(view: &DashboardView) -> String {
    let mut out = String::new();
    out.push_str("=== US COVID-19 daily statistics ===\n");
    out.push_str(&format!(
        "Range: {} to {} (inclusive)\n",
        view.range.start, view.range.end
    ));

    if view.slices.is_empty() {
        out.push_str("\nNo metrics selected.\n");
        return out;
    }

    for slice in &view.slices {
        out.push_str(&format!("\n{} ({})\n", slice.metric.display_name(), slice.metric.field_name()));
        if slice.is_empty() {
            out.push_str("  no data in range\n");
            continue;
        }
        for &(date, value) in &slice.points {
            out.push_str(&format!("  {date}  {}\n", format_count(value)));
        }
    }

    out
}

/// Counts are integers upstream; avoid printing a pointless `.00`.
pub fn format_count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Compact count for chart axis labels (e.g. `28.8M`, `125k`).
pub fn format_count_compact(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if magnitude >= 10_000.0 {
        format!("{:.0}k", value / 1_000.0)
    } else {
        format!("{value:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::app::pipeline::DashboardView;
    use crate::domain::{DateRange, MetricSlice};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn catalog_lists_every_metric() {
        let out = format_catalog();
        assert!(out.contains("Cumulative Deaths"));
        assert!(out.contains("hospitalizedCurrently"));
        assert_eq!(out.lines().count(), Metric::ALL.len() + 1);
    }

    #[test]
    fn view_shows_rows_and_empty_ranges() {
        let view = DashboardView {
            range: DateRange::new(date(2020, 3, 1), date(2020, 3, 2)),
            slices: vec![
                MetricSlice {
                    metric: Metric::Positive,
                    points: vec![(date(2020, 3, 1), 10.0), (date(2020, 3, 2), 15.0)],
                },
                MetricSlice {
                    metric: Metric::Recovered,
                    points: Vec::new(),
                },
            ],
        };

        let out = format_view(&view);
        assert!(out.contains("Range: 2020-03-01 to 2020-03-02 (inclusive)"));
        assert!(out.contains("2020-03-01  10"));
        assert!(out.contains("2020-03-02  15"));
        assert!(out.contains("Recovered Patients"));
        assert!(out.contains("no data in range"));
    }

    #[test]
    fn counts_format_compactly() {
        assert_eq!(format_count(15.0), "15");
        assert_eq!(format_count(15.5), "15.50");
        assert_eq!(format_count_compact(28_800_000.0), "28.8M");
        assert_eq!(format_count_compact(125_000.0), "125k");
        assert_eq!(format_count_compact(950.0), "950");
    }
}
