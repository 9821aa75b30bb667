//! Domain logic
//!
//! - `stats` - stat filter stage: captures, template resolution, dispatch

pub mod stats;

pub use stats::{StatAccumInput, StatFilter};
