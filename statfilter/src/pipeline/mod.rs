//! Pipeline runtime pieces shared by stages
//!
//! - `message` - event message model
//! - `pack` - pooled message carriers and work items
//! - `registry` - named inputs resolved by stages at start
//! - `input` - JSON-lines input feeding work items
//! - `interpolate` - `@name` placeholder substitution

mod error;
mod input;
mod interpolate;
mod message;
mod pack;
mod registry;

pub use error::PipelineError;
pub use input::{InputStats, JsonLinesInput};
pub use interpolate::interpolate_string;
pub use message::{Field, FieldType, FieldValue, Message};
pub use pack::{Captures, PackPool, PipelinePack, WorkItem};
pub use registry::{InputRegistry, PipelineInput};
