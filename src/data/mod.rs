//! Upstream data access.
//!
//! - COVID Tracking Project client + payload parsing (`tracking`)
//! - process-lifetime series cache (`cache`)

pub mod cache;
pub mod tracking;

pub use cache::SeriesCache;
pub use tracking::{SeriesSource, TrackingClient, parse_daily};
