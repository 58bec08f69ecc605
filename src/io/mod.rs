//! Output helpers.
//!
//! - CSV export of a filtered view (`export`)

pub mod export;

pub use export::*;
