//! Pipeline error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("pack pool closed")]
    PoolClosed,

    #[error("invalid record on line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("input read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("input '{0}' already registered")]
    DuplicateInput(String),
}
