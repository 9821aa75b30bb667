//! Metric templates and resolved stats

use std::fmt;

use serde::{Deserialize, Serialize};

/// Modifier for timer stats
pub const TIMER_MODIFIER: &str = "ms";

/// Modifier for gauge stats
pub const GAUGE_MODIFIER: &str = "g";

/// Statsd metric kind of a template
///
/// Unrecognized kind names are kept as `Unknown` and resolve like counters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum MetricKind {
    Counter,
    Timer,
    Gauge,
    Unknown(String),
}

impl MetricKind {
    /// Stat modifier for this kind
    pub fn modifier(&self) -> &'static str {
        match self {
            MetricKind::Timer => TIMER_MODIFIER,
            MetricKind::Gauge => GAUGE_MODIFIER,
            MetricKind::Counter | MetricKind::Unknown(_) => "",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, MetricKind::Unknown(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            MetricKind::Counter => "Counter",
            MetricKind::Timer => "Timer",
            MetricKind::Gauge => "Gauge",
            MetricKind::Unknown(name) => name,
        }
    }
}

impl From<String> for MetricKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Counter" => MetricKind::Counter,
            "Timer" => MetricKind::Timer,
            "Gauge" => MetricKind::Gauge,
            _ => MetricKind::Unknown(name),
        }
    }
}

impl From<MetricKind> for String {
    fn from(kind: MetricKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configured metric template
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MetricTemplate {
    #[serde(rename = "type")]
    pub kind: MetricKind,
    pub name: String,
    pub value: String,
}

impl MetricTemplate {
    pub fn new(kind: MetricKind, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A single resolved statsd-style metric
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub bucket: String,
    pub value: String,
    /// Empty for counters, `ms` for timers, `g` for gauges
    pub modifier: &'static str,
}

impl fmt::Display for Stat {
    /// Statsd line form, e.g. `web1.404s:1|c`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.modifier.is_empty() {
            "c"
        } else {
            self.modifier
        };
        write!(f, "{}:{}|{}", self.bucket, self.value, kind)
    }
}
