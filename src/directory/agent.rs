use crate::config::AgentConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU32, Ordering};

/// Agent availability as reported by the external status feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// Agent is online and may receive new tickets
    #[default]
    Available,
    /// Agent is offline, on break, or otherwise not taking tickets
    Unavailable,
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentStatus::Available => write!(f, "AVAILABLE"),
            AgentStatus::Unavailable => write!(f, "UNAVAILABLE"),
        }
    }
}

impl std::str::FromStr for AgentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(AgentStatus::Available),
            "unavailable" => Ok(AgentStatus::Unavailable),
            _ => Err(format!(
                "Invalid agent status: {}. Use: available, unavailable",
                s
            )),
        }
    }
}

/// A support agent held by the directory.
///
/// Static attributes (expertise, capacity) come from configuration. The load
/// counter is atomic so it can be compared-and-incremented without taking a
/// write lock on the directory entry.
#[derive(Debug)]
pub struct Agent {
    /// Unique identifier (e.g. "A001")
    pub id: String,
    /// Display name
    pub name: String,
    /// Ticket categories this agent is qualified for
    pub expertise: BTreeSet<String>,
    /// Current availability
    pub status: AgentStatus,
    /// Ideal maximum number of concurrent tickets
    pub capacity: u32,
    /// Tickets currently assigned (atomic)
    pub current_load: AtomicU32,
}

impl Agent {
    /// Create an available agent with zero load.
    pub fn new<I, S>(id: impl Into<String>, expertise: I, capacity: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            expertise: expertise.into_iter().map(Into::into).collect(),
            status: AgentStatus::Available,
            capacity,
            current_load: AtomicU32::new(0),
        }
    }

    /// Builder-style override of the starting load.
    pub fn with_load(self, load: u32) -> Self {
        self.current_load.store(load, Ordering::SeqCst);
        self
    }

    /// Builder-style override of the status.
    pub fn with_status(mut self, status: AgentStatus) -> Self {
        self.status = status;
        self
    }

    /// Build an agent from its configuration entry.
    ///
    /// Agents without an explicit capacity inherit `default_capacity`.
    pub fn from_config(config: &AgentConfig, default_capacity: u32) -> Self {
        Self {
            id: config.id.clone(),
            name: config.name.clone().unwrap_or_else(|| config.id.clone()),
            expertise: config.expertise.iter().cloned().collect(),
            status: config.status,
            capacity: config.capacity.unwrap_or(default_capacity),
            current_load: AtomicU32::new(config.initial_load),
        }
    }

    /// Whether this agent may be offered a ticket of `category`.
    pub fn is_candidate_for(&self, category: &str) -> bool {
        self.status == AgentStatus::Available && self.expertise.contains(category)
    }

    pub fn load(&self) -> u32 {
        self.current_load.load(Ordering::SeqCst)
    }
}

/// Point-in-time snapshot of an agent.
///
/// The load recorded here is what the load balancer observed; it is handed
/// back to the directory on commit to detect concurrent assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentView {
    pub id: String,
    pub name: String,
    pub expertise: Vec<String>,
    pub status: AgentStatus,
    pub current_load: u32,
    pub capacity: u32,
}

impl AgentView {
    /// Load is at or below the agent's capacity threshold.
    pub fn is_within_capacity(&self) -> bool {
        self.current_load <= self.capacity
    }
}

impl From<&Agent> for AgentView {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id.clone(),
            name: agent.name.clone(),
            expertise: agent.expertise.iter().cloned().collect(),
            status: agent.status,
            current_load: agent.load(),
            capacity: agent.capacity,
        }
    }
}
