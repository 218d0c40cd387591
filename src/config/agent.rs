//! Agent configuration

use crate::directory::AgentStatus;
use serde::{Deserialize, Serialize};

/// A statically configured support agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub status: AgentStatus,
    /// Overrides `routing.max_ideal_load` for this agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    /// Tickets already held when the directory starts
    #[serde(default)]
    pub initial_load: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_config_minimal() {
        let toml = r#"
        id = "A001"
        expertise = ["FINANCE"]
        "#;
        let config: AgentConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.id, "A001");
        assert_eq!(config.status, AgentStatus::Available);
        assert_eq!(config.capacity, None);
        assert_eq!(config.initial_load, 0);
    }

    #[test]
    fn test_agent_config_full() {
        let toml = r#"
        id = "A002"
        name = "Grace"
        expertise = ["TECH", "FINANCE"]
        status = "unavailable"
        capacity = 5
        initial_load = 2
        "#;
        let config: AgentConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.name.as_deref(), Some("Grace"));
        assert_eq!(config.expertise.len(), 2);
        assert_eq!(config.status, AgentStatus::Unavailable);
        assert_eq!(config.capacity, Some(5));
        assert_eq!(config.initial_load, 2);
    }
}
