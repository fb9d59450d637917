//! Configuration for the EventManager
//!
//! Controls how a manager identifies itself, how loudly it reports an empty
//! queue and how many strategies it accepts.

use signal_registry::Id;

use crate::error::{EventManagerError, Result};

/// Configuration for an [`EventManager`](crate::EventManager)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Name used in log output
    /// Default: "EventManager"
    pub label: String,

    /// Fixed identifier; strategies notify the manager under this id
    /// Default: None (allocate with `Id::next()`)
    pub id: Option<Id>,

    /// Report "No strategies found" at warn level instead of debug
    /// Default: true
    pub warn_on_empty_queue: bool,

    /// Maximum number of queued strategies
    /// Default: 32
    pub max_strategies: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            label: "EventManager".to_string(),
            id: None,
            warn_on_empty_queue: true,
            max_strategies: 32,
        }
    }
}

impl ManagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quiet preset for managers that are routinely idle
    pub fn quiet() -> Self {
        Self {
            warn_on_empty_queue: false,
            ..Default::default()
        }
    }

    /// Preset for small targets with only a handful of strategies
    pub fn constrained() -> Self {
        Self {
            max_strategies: 8,
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<Id>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_warn_on_empty_queue(mut self, warn: bool) -> Self {
        self.warn_on_empty_queue = warn;
        self
    }

    pub fn with_max_strategies(mut self, max: usize) -> Self {
        self.max_strategies = max;
        self
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            return Err(EventManagerError::Configuration(
                "Manager label must not be empty".to_string(),
            ));
        }

        if self.max_strategies == 0 {
            return Err(EventManagerError::Configuration(
                "Max strategies must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
