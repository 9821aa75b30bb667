//! Stat dispatch
//!
//! Resolves every template for one message and offers each stat to the
//! accumulator. A rejected stat is logged and does not stop the others.

use std::collections::HashMap;

use super::accumulator::StatAccumulator;
use super::resolve::resolve_stat;
use super::stat::MetricTemplate;
use crate::pipeline::Captures;

/// Outcome of dispatching one message's stats
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub attempted: usize,
    pub rejected: usize,
}

impl DispatchSummary {
    pub fn accepted(&self) -> usize {
        self.attempted - self.rejected
    }
}

/// Resolve and deliver one stat per template.
pub fn dispatch_stats(
    templates: &HashMap<String, MetricTemplate>,
    captures: &Captures,
    accumulator: &dyn StatAccumulator,
) -> DispatchSummary {
    let mut summary = DispatchSummary::default();

    for (id, template) in templates {
        summary.attempted += 1;
        if !accumulator.accept(resolve_stat(template, captures)) {
            summary.rejected += 1;
            // rebuilt for the log line only
            let stat = resolve_stat(template, captures);
            tracing::error!(stat = %stat, template = %id, "Undelivered stat");
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::domain::stats::stat::{MetricKind, Stat};

    /// Accepts stats until `capacity` is reached, recording every offer
    struct RecordingAccumulator {
        capacity: usize,
        offered: Mutex<Vec<Stat>>,
    }

    impl RecordingAccumulator {
        fn new(capacity: usize) -> Self {
            Self {
                capacity,
                offered: Mutex::new(Vec::new()),
            }
        }
    }

    impl StatAccumulator for RecordingAccumulator {
        fn accept(&self, stat: Stat) -> bool {
            let mut offered = self.offered.lock();
            offered.push(stat);
            offered.len() <= self.capacity
        }
    }

    fn templates() -> HashMap<String, MetricTemplate> {
        let mut templates = HashMap::new();
        templates.insert(
            "hits".to_string(),
            MetricTemplate::new(MetricKind::Counter, "@Hostname.hits", "1"),
        );
        templates.insert(
            "latency".to_string(),
            MetricTemplate::new(MetricKind::Timer, "@Hostname.latency", "@elapsed"),
        );
        templates.insert(
            "queue".to_string(),
            MetricTemplate::new(MetricKind::Gauge, "queue.depth", "@depth"),
        );
        templates
    }

    fn captures() -> Captures {
        [("Hostname", "web1"), ("elapsed", "12"), ("depth", "3")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_all_templates_delivered() {
        let accumulator = RecordingAccumulator::new(usize::MAX);
        let summary = dispatch_stats(&templates(), &captures(), &accumulator);

        assert_eq!(summary, DispatchSummary { attempted: 3, rejected: 0 });
        assert_eq!(summary.accepted(), 3);

        let mut lines: Vec<String> = accumulator
            .offered
            .lock()
            .iter()
            .map(|s| s.to_string())
            .collect();
        lines.sort();
        assert_eq!(
            lines,
            vec!["queue.depth:3|g", "web1.hits:1|c", "web1.latency:12|ms"]
        );
    }

    #[test]
    fn test_rejection_does_not_stop_remaining() {
        let accumulator = RecordingAccumulator::new(1);
        let summary = dispatch_stats(&templates(), &captures(), &accumulator);

        assert_eq!(summary, DispatchSummary { attempted: 3, rejected: 2 });
        assert_eq!(accumulator.offered.lock().len(), 3);
    }

    #[test]
    fn test_rejected_stats_offered_fully_resolved() {
        let accumulator = RecordingAccumulator::new(0);
        let summary = dispatch_stats(&templates(), &captures(), &accumulator);

        assert_eq!(summary.rejected, 3);
        let mut lines: Vec<String> = accumulator
            .offered
            .lock()
            .iter()
            .map(|s| s.to_string())
            .collect();
        lines.sort();
        assert_eq!(
            lines,
            vec!["queue.depth:3|g", "web1.hits:1|c", "web1.latency:12|ms"]
        );
    }

    #[test]
    fn test_all_rejected() {
        let accumulator = RecordingAccumulator::new(0);
        let summary = dispatch_stats(&templates(), &captures(), &accumulator);

        assert_eq!(summary.rejected, 3);
        assert_eq!(summary.accepted(), 0);
    }

    #[test]
    fn test_no_templates() {
        let accumulator = RecordingAccumulator::new(usize::MAX);
        let summary = dispatch_stats(&HashMap::new(), &captures(), &accumulator);

        assert_eq!(summary, DispatchSummary::default());
        assert!(accumulator.offered.lock().is_empty());
    }
}
