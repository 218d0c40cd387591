//! Configuration module for the triage router
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`TRIAGE_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use triage::config::TriageConfig;
//!
//! let config = TriageConfig::default();
//! assert_eq!(config.routing.standard_threshold, 15);
//!
//! let toml = r#"
//! [scoring.category_weights]
//! FINANCE = 10
//!
//! [[agents]]
//! id = "A001"
//! expertise = ["FINANCE"]
//! "#;
//! let config: TriageConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.agents.len(), 1);
//! ```

pub mod agent;
pub mod error;
pub mod logging;
pub mod routing;
pub mod scoring;

pub use agent::AgentConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use routing::RoutingConfig;
pub use scoring::ScoringConfig;

use crate::routing::decision::is_reserved_destination;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Unified configuration for the triage router.
///
/// Weight tables and thresholds are read once at startup; every component
/// copies what it needs so a decision always sees one consistent configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TriageConfig {
    /// Priority score weight tables
    pub scoring: ScoringConfig,
    /// Routing thresholds
    pub routing: RoutingConfig,
    /// Static agent definitions
    pub agents: Vec<AgentConfig>,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl TriageConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports TRIAGE_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("TRIAGE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("TRIAGE_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }
        if let Ok(load) = std::env::var("TRIAGE_MAX_IDEAL_LOAD") {
            if let Ok(l) = load.parse() {
                self.routing.max_ideal_load = l;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.routing.validate()?;

        let mut seen = HashSet::new();
        for (i, agent) in self.agents.iter().enumerate() {
            if agent.id.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("agents[{}].id", i),
                    message: "id cannot be empty".to_string(),
                });
            }
            if is_reserved_destination(&agent.id) {
                return Err(ConfigError::Validation {
                    field: format!("agents[{}].id", i),
                    message: format!("'{}' is a reserved destination name", agent.id),
                });
            }
            if !seen.insert(agent.id.as_str()) {
                return Err(ConfigError::Validation {
                    field: format!("agents[{}].id", i),
                    message: format!("duplicate agent id '{}'", agent.id),
                });
            }
            if agent.expertise.is_empty() {
                tracing::warn!(agent_id = %agent.id, "Agent has no expertise and will never be selected");
            }
        }

        Ok(())
    }
}
