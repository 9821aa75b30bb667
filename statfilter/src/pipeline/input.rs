//! JSON-lines input
//!
//! Reads one work record per line:
//!
//! ```text
//! {"message": {"hostname": "web1", "fields": [...]}, "captures": {"status": "404"}}
//! ```
//!
//! `captures` is optional. Malformed lines are logged and skipped.

use std::future::Future;

use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use super::error::PipelineError;
use super::message::Message;
use super::pack::{Captures, PackPool, WorkItem};
use super::registry::PipelineInput;

#[derive(Debug, Deserialize)]
struct InputRecord {
    message: Message,
    #[serde(default)]
    captures: Option<Captures>,
}

/// Counters reported when the input finishes
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputStats {
    pub delivered: u64,
    pub skipped: u64,
}

pub struct JsonLinesInput {
    name: String,
}

impl JsonLinesInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Read records until end of input, shutdown, or a closed output.
    ///
    /// The output sender is dropped on return, which closes the stream for
    /// the downstream stage.
    pub async fn run<R, S>(
        &self,
        reader: R,
        pool: &PackPool,
        output: mpsc::Sender<WorkItem>,
        shutdown: S,
    ) -> Result<InputStats, PipelineError>
    where
        R: AsyncBufRead + Unpin,
        S: Future<Output = ()>,
    {
        let mut lines = reader.lines();
        let mut stats = InputStats::default();
        let mut line_no = 0usize;
        tokio::pin!(shutdown);

        loop {
            let line = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::debug!(input = %self.name, "Input received shutdown");
                    break;
                }
                line = lines.next_line() => line?,
            };

            let Some(line) = line else {
                tracing::debug!(input = %self.name, lines = line_no, "End of input");
                break;
            };
            line_no += 1;

            if line.trim().is_empty() {
                continue;
            }

            let record = match parse_record(&line, line_no) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(input = %self.name, error = %e, "Skipping input line");
                    stats.skipped += 1;
                    continue;
                }
            };

            let pack = pool.acquire(record.message).await?;
            let item = WorkItem {
                pack,
                captures: record.captures,
            };

            if output.send(item).await.is_err() {
                tracing::warn!(input = %self.name, "Downstream closed, stopping input");
                break;
            }
            stats.delivered += 1;
        }

        tracing::debug!(
            input = %self.name,
            delivered = stats.delivered,
            skipped = stats.skipped,
            "Input finished"
        );
        Ok(stats)
    }
}

impl PipelineInput for JsonLinesInput {
    fn name(&self) -> &str {
        &self.name
    }
}

fn parse_record(line: &str, line_no: usize) -> Result<InputRecord, PipelineError> {
    serde_json::from_str(line).map_err(|source| PipelineError::Decode {
        line: line_no,
        source,
    })
}
