//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - the metric catalog (`Metric`, label/field lookups)
//! - the fetched dataset (`DailySeries`, `DailyRecord`)
//! - interaction inputs and outputs (`DateRange`, `MetricSlice`)

pub mod catalog;
pub mod types;

pub use catalog::Metric;
pub use types::*;
