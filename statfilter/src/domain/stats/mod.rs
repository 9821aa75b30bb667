//! Stat Filter
//!
//! Generates statsd-style stats from event messages by template substitution
//! and hands them to a stat accumulator input.
//!
//! ```text
//! WorkItem ──▶ captures ──▶ resolve (per template) ──▶ dispatch ──▶ accumulator
//! ```

mod accumulator;
mod captures;
mod dispatch;
mod filter;
mod resolve;
mod stat;

pub use accumulator::{StatAccumInput, StatAccumulator};
pub use captures::{
    CAPTURE_HOSTNAME, CAPTURE_LOGGER, CAPTURE_PAYLOAD, CAPTURE_TYPE, assemble_captures,
};
pub use dispatch::{DispatchSummary, dispatch_stats};
pub use filter::{
    DEFAULT_STAT_ACCUM_NAME, StageState, StatFilter, StatFilterConfig, StatFilterError,
    bind_accumulator,
};
pub use resolve::resolve_stat;
pub use stat::{GAUGE_MODIFIER, MetricKind, MetricTemplate, Stat, TIMER_MODIFIER};
