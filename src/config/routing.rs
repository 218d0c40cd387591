//! Routing configuration

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::routing::ledger::DEFAULT_LEDGER_CAPACITY;

/// Thresholds that gate automatic assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Tickets scoring below this go to the standard queue
    pub standard_threshold: u32,
    /// Tickets scoring at or above this may be assigned to agents over capacity
    pub override_threshold: u32,
    /// Default per-agent capacity (agents may override it)
    pub max_ideal_load: u32,
    /// Most recent ticket ids remembered for replay; 0 disables replay
    pub ledger_capacity: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            standard_threshold: 15,
            override_threshold: 25,
            max_ideal_load: 3,
            ledger_capacity: DEFAULT_LEDGER_CAPACITY,
        }
    }
}

impl RoutingConfig {
    /// The override threshold must not sit below the standard threshold,
    /// otherwise it could never apply to a ticket that reaches the balancer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.override_threshold < self.standard_threshold {
            return Err(ConfigError::Validation {
                field: "routing.override_threshold".to_string(),
                message: format!(
                    "must be >= standard_threshold ({}), got {}",
                    self.standard_threshold, self.override_threshold
                ),
            });
        }
        Ok(())
    }
}
