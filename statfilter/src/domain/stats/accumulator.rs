//! Stat accumulator capability and the in-process accumulator input

use std::sync::Arc;

use tokio::sync::mpsc;

use super::stat::Stat;
use crate::pipeline::PipelineInput;

/// Downstream target that takes resolved stats
pub trait StatAccumulator: Send + Sync {
    /// Offer a stat. Returns `false` if it was not taken.
    fn accept(&self, stat: Stat) -> bool;
}

/// Accumulator input backed by a bounded channel
///
/// `accept` never waits: a full or closed channel rejects the stat.
pub struct StatAccumInput {
    name: String,
    tx: mpsc::Sender<Stat>,
}

impl StatAccumInput {
    /// Create the input and the receiving end for the aggregation side
    pub fn new(name: impl Into<String>, capacity: usize) -> (Self, mpsc::Receiver<Stat>) {
        let (tx, rx) = mpsc::channel(capacity);
        let input = Self {
            name: name.into(),
            tx,
        };
        (input, rx)
    }
}

impl StatAccumulator for StatAccumInput {
    fn accept(&self, stat: Stat) -> bool {
        self.tx.try_send(stat).is_ok()
    }
}

impl PipelineInput for StatAccumInput {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_stat_accumulator(self: Arc<Self>) -> Option<Arc<dyn StatAccumulator>> {
        Some(self)
    }
}
