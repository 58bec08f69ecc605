//! Shared view-building logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! cached fetch -> metric resolution -> per-metric date slicing
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use chrono::NaiveDate;

use crate::domain::{DailySeries, DateRange, Metric, MetricSlice};

/// Start date preselected when the user has not chosen one.
pub const DEFAULT_START: NaiveDate = match NaiveDate::from_ymd_opt(2020, 3, 1) {
    Some(d) => d,
    None => unreachable!(),
};

/// What the user asked to see: which metrics over which window.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub metrics: Vec<Metric>,
    pub range: DateRange,
}

/// All slices backing one rendering of the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub range: DateRange,
    pub slices: Vec<MetricSlice>,
}

/// Slice the series once per selected metric.
///
/// The selection has set semantics: duplicates carry no information, so they
/// are dropped while preserving first-occurrence order.
pub fn build_view(series: &DailySeries, config: &ViewConfig) -> DashboardView {
    let mut seen = Vec::with_capacity(config.metrics.len());
    for &metric in &config.metrics {
        if !seen.contains(&metric) {
            seen.push(metric);
        }
    }

    let slices = seen
        .into_iter()
        .map(|metric| series.slice(metric, config.range))
        .collect();

    DashboardView {
        range: config.range,
        slices,
    }
}

/// The range shown before the user touches the date inputs:
/// 2020-03-01 through the latest reported day.
pub fn default_range(series: &DailySeries) -> DateRange {
    DateRange::new(DEFAULT_START, series.last_date().unwrap_or(DEFAULT_START))
}
