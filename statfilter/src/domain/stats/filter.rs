//! Stat filter stage
//!
//! Binds to a stat accumulator by name at start, then turns every work item
//! into one stat per configured template until the input stream closes.
//!
//! ```text
//! Unstarted ──start()──▶ Running ──input closed──▶ Stopped
//!     │
//!     └── accumulator missing / not a StatAccumulator ──▶ StatFilterError
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::accumulator::StatAccumulator;
use super::captures::assemble_captures;
use super::dispatch::{DispatchSummary, dispatch_stats};
use super::stat::MetricTemplate;
use crate::pipeline::{InputRegistry, WorkItem};

/// Accumulator input name used when none is configured
pub const DEFAULT_STAT_ACCUM_NAME: &str = "StatAccumInput";

/// Startup errors; the stage never runs after one of these
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StatFilterError {
    #[error("No Input named: '{0}'")]
    InputNotFound(String),

    #[error("Input '{0}' is not a StatAccumulator")]
    NotAStatAccumulator(String),
}

/// Lifecycle of a stat filter stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    Unstarted,
    Running,
    Stopped,
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageState::Unstarted => write!(f, "unstarted"),
            StageState::Running => write!(f, "running"),
            StageState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Stat filter settings, fixed once the stage is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatFilterConfig {
    /// Templates keyed by arbitrary metric id
    pub metrics: HashMap<String, MetricTemplate>,
    /// Name of the input stats are delivered to
    pub stat_accum_name: String,
}

impl Default for StatFilterConfig {
    fn default() -> Self {
        Self {
            metrics: HashMap::new(),
            stat_accum_name: DEFAULT_STAT_ACCUM_NAME.to_string(),
        }
    }
}

/// Look up `name` in the registry and require the stat accumulator capability
pub fn bind_accumulator(
    registry: &InputRegistry,
    name: &str,
) -> Result<Arc<dyn StatAccumulator>, StatFilterError> {
    let input = registry
        .get(name)
        .ok_or_else(|| StatFilterError::InputNotFound(name.to_string()))?;

    input
        .as_stat_accumulator()
        .ok_or_else(|| StatFilterError::NotAStatAccumulator(name.to_string()))
}

pub struct StatFilter {
    config: StatFilterConfig,
    state_tx: watch::Sender<StageState>,
}

impl StatFilter {
    pub fn new(config: StatFilterConfig) -> Self {
        let (state_tx, _) = watch::channel(StageState::Unstarted);
        Self { config, state_tx }
    }

    /// Observe lifecycle transitions
    pub fn state(&self) -> watch::Receiver<StageState> {
        self.state_tx.subscribe()
    }

    /// Bind the accumulator and spawn the consume loop.
    ///
    /// On error the stage stays `Unstarted` and the input is dropped.
    pub fn start(
        self,
        registry: &InputRegistry,
        input: mpsc::Receiver<WorkItem>,
    ) -> Result<JoinHandle<()>, StatFilterError> {
        let accumulator = match bind_accumulator(registry, &self.config.stat_accum_name) {
            Ok(accumulator) => accumulator,
            Err(e) => {
                tracing::error!(error = %e, "StatFilter failed to start");
                return Err(e);
            }
        };

        self.set_state(StageState::Running);
        tracing::debug!(
            metrics = self.config.metrics.len(),
            accumulator = %self.config.stat_accum_name,
            "StatFilter started"
        );

        Ok(tokio::spawn(self.run(accumulator, input)))
    }

    async fn run(self, accumulator: Arc<dyn StatAccumulator>, mut input: mpsc::Receiver<WorkItem>) {
        let mut messages = 0u64;
        let mut rejected = 0u64;

        while let Some(item) = input.recv().await {
            let summary = self.process(item, accumulator.as_ref());
            messages += 1;
            rejected += summary.rejected as u64;
        }

        self.set_state(StageState::Stopped);
        tracing::debug!(messages, rejected, "StatFilter input closed, stopped");
    }

    /// Turn one work item into stats, then recycle its pack
    fn process(&self, item: WorkItem, accumulator: &dyn StatAccumulator) -> DispatchSummary {
        let WorkItem { pack, captures } = item;
        let captures = assemble_captures(captures, &pack.message);
        let summary = dispatch_stats(&self.config.metrics, &captures, accumulator);
        pack.recycle();
        summary
    }

    fn set_state(&self, state: StageState) {
        self.state_tx.send_replace(state);
        tracing::trace!(state = %state, "StatFilter state changed");
    }
}
