//! Template resolution

use super::stat::{MetricTemplate, Stat};
use crate::pipeline::{Captures, interpolate_string};

/// Resolve one template against a capture map into a stat.
pub fn resolve_stat(template: &MetricTemplate, captures: &Captures) -> Stat {
    Stat {
        bucket: interpolate_string(&template.name, captures),
        value: interpolate_string(&template.value, captures),
        modifier: template.kind.modifier(),
    }
}
