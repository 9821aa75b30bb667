//! Statsd-style metric generation from structured event messages.
//!
//! - `core` - application shell: CLI, configuration, shutdown
//! - `pipeline` - message model, pack pool, input registry, interpolation
//! - `domain` - the stat filter stage and its accumulator target

mod app;
pub mod core;
pub mod domain;
pub mod pipeline;
