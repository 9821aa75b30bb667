//! Registry of named pipeline inputs
//!
//! Inputs are registered once at startup and looked up by name when a stage
//! binds to its downstream target. The registry is handed to stages
//! explicitly; there is no global instance.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::error::PipelineError;
use crate::domain::stats::StatAccumulator;

/// A named pipeline input
///
/// Capabilities beyond the name are discovered through the `as_*` accessors,
/// which return `None` unless the input overrides them.
pub trait PipelineInput: Send + Sync {
    fn name(&self) -> &str;

    /// This input as a stat accumulator, if it accepts stats
    fn as_stat_accumulator(self: Arc<Self>) -> Option<Arc<dyn StatAccumulator>> {
        None
    }
}

/// Named inputs available to stages at start time
#[derive(Default)]
pub struct InputRegistry {
    inputs: RwLock<HashMap<String, Arc<dyn PipelineInput>>>,
}

impl InputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an input under its own name
    pub fn register(&self, input: Arc<dyn PipelineInput>) -> Result<(), PipelineError> {
        let name = input.name().to_string();
        let mut inputs = self.inputs.write();
        if inputs.contains_key(&name) {
            return Err(PipelineError::DuplicateInput(name));
        }
        tracing::debug!(input = %name, "Registered pipeline input");
        inputs.insert(name, input);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn PipelineInput>> {
        self.inputs.read().get(name).cloned()
    }

    /// Registered input names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inputs.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NamedInput(&'static str);

    impl PipelineInput for NamedInput {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_register_and_get() {
        let registry = InputRegistry::new();
        registry.register(Arc::new(NamedInput("LogInput"))).unwrap();

        let input = registry.get("LogInput").unwrap();
        assert_eq!(input.name(), "LogInput");
        assert!(registry.get("Missing").is_none());
    }

    #[test]
    fn test_register_duplicate_rejected() {
        let registry = InputRegistry::new();
        registry.register(Arc::new(NamedInput("LogInput"))).unwrap();

        let err = registry
            .register(Arc::new(NamedInput("LogInput")))
            .unwrap_err();
        assert!(matches!(err, PipelineError::DuplicateInput(name) if name == "LogInput"));
    }

    #[test]
    fn test_default_has_no_stat_accumulator() {
        let registry = InputRegistry::new();
        registry.register(Arc::new(NamedInput("LogInput"))).unwrap();

        let input = registry.get("LogInput").unwrap();
        assert!(input.as_stat_accumulator().is_none());
    }

    #[test]
    fn test_names_sorted() {
        let registry = InputRegistry::new();
        registry.register(Arc::new(NamedInput("b"))).unwrap();
        registry.register(Arc::new(NamedInput("a"))).unwrap();
        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);
    }
}
