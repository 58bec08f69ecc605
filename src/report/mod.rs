//! Terminal-facing formatting helpers.

pub mod format;

pub use format::*;
