//! Agent Directory module.
//!
//! Provides thread-safe in-memory storage of support agents: their expertise,
//! availability and current ticket load.

mod agent;
mod error;

pub use agent::*;
pub use error::*;

use crate::config::AgentConfig;
use crate::routing::decision::is_reserved_destination;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// The Agent Directory stores all known support agents.
///
/// Reads and status updates go through DashMap's per-shard locks, so a status
/// change is never observed half-way by [`candidates`](Self::candidates). Load
/// only moves through [`commit_assignment`](Self::commit_assignment), which is a
/// compare-and-increment against the load seen at selection time.
///
/// # Examples
///
/// ```
/// use triage::directory::{Agent, AgentDirectory};
///
/// let directory = AgentDirectory::new();
/// directory.register(Agent::new("A001", ["FINANCE"], 3)).unwrap();
///
/// let candidates = directory.candidates("FINANCE").unwrap();
/// assert_eq!(candidates.len(), 1);
/// assert_eq!(directory.commit_assignment("A001", 0).unwrap(), 1);
/// ```
pub struct AgentDirectory {
    agents: DashMap<String, Agent>,
    online: AtomicBool,
}

impl AgentDirectory {
    /// Create a new empty directory.
    pub fn new() -> Self {
        Self {
            agents: DashMap::new(),
            online: AtomicBool::new(true),
        }
    }

    /// Build a directory from configured agents.
    ///
    /// # Errors
    ///
    /// Fails on the first duplicate or reserved agent id.
    pub fn from_config(
        agents: &[AgentConfig],
        default_capacity: u32,
    ) -> Result<Self, DirectoryError> {
        let directory = Self::new();
        for config in agents {
            directory.register(Agent::from_config(config, default_capacity))?;
        }
        tracing::debug!(agents = directory.agent_count(), "Agent directory loaded");
        Ok(directory)
    }

    /// Add an agent to the directory.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::DuplicateAgent` if the id is already registered and
    /// `DirectoryError::ReservedId` if it collides with a queue destination name.
    pub fn register(&self, agent: Agent) -> Result<(), DirectoryError> {
        self.ensure_online()?;

        if is_reserved_destination(&agent.id) {
            return Err(DirectoryError::ReservedId(agent.id));
        }

        match self.agents.entry(agent.id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(DirectoryError::DuplicateAgent(agent.id))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(agent);
                Ok(())
            }
        }
    }

    /// Available agents whose expertise covers `category`, ordered by id.
    pub fn candidates(&self, category: &str) -> Result<Vec<AgentView>, DirectoryError> {
        self.ensure_online()?;

        let mut candidates: Vec<AgentView> = self
            .agents
            .iter()
            .filter(|entry| entry.value().is_candidate_for(category))
            .map(|entry| AgentView::from(entry.value()))
            .collect();
        candidates.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(candidates)
    }

    /// Current load of an agent.
    pub fn load(&self, id: &str) -> Result<u32, DirectoryError> {
        self.ensure_online()?;
        self.agents
            .get(id)
            .map(|agent| agent.load())
            .ok_or_else(|| DirectoryError::UnknownAgent(id.to_string()))
    }

    /// Snapshot of a single agent.
    pub fn agent(&self, id: &str) -> Result<AgentView, DirectoryError> {
        self.ensure_online()?;
        self.agents
            .get(id)
            .map(|agent| AgentView::from(agent.value()))
            .ok_or_else(|| DirectoryError::UnknownAgent(id.to_string()))
    }

    /// Snapshot of every agent, ordered by id.
    pub fn agents(&self) -> Result<Vec<AgentView>, DirectoryError> {
        self.ensure_online()?;
        let mut agents: Vec<AgentView> = self
            .agents
            .iter()
            .map(|entry| AgentView::from(entry.value()))
            .collect();
        agents.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(agents)
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Apply a status change from the external status feed.
    pub fn set_status(&self, id: &str, status: AgentStatus) -> Result<(), DirectoryError> {
        self.ensure_online()?;
        let mut agent = self
            .agents
            .get_mut(id)
            .ok_or_else(|| DirectoryError::UnknownAgent(id.to_string()))?;

        if agent.status != status {
            tracing::info!(agent_id = %id, from = %agent.status, to = %status, "Agent status changed");
            agent.status = status;
        }
        Ok(())
    }

    /// Atomically record one more ticket against an agent.
    ///
    /// `observed_load` is the load the caller saw when it picked this agent. The
    /// increment only happens if the agent is still available and its load is
    /// unchanged; otherwise another assignment (or a status change) got there
    /// first and the caller must select again. An agent whose load counter is
    /// already at its maximum is refused with `DirectoryError::LoadOverflow`.
    /// Returns the new load.
    pub fn commit_assignment(&self, id: &str, observed_load: u32) -> Result<u32, DirectoryError> {
        self.ensure_online()?;
        let agent = self
            .agents
            .get(id)
            .ok_or_else(|| DirectoryError::UnknownAgent(id.to_string()))?;

        // Holding the shard read lock keeps set_status out until we are done.
        if agent.status != AgentStatus::Available {
            return Err(DirectoryError::AgentUnavailable(id.to_string()));
        }

        let new_load = observed_load
            .checked_add(1)
            .ok_or_else(|| DirectoryError::LoadOverflow(id.to_string()))?;
        match agent.current_load.compare_exchange(
            observed_load,
            new_load,
            Ordering::SeqCst,
            Ordering::SeqCst,
        ) {
            Ok(_) => {
                metrics::gauge!("triage_agent_load", "agent" => id.to_string())
                    .set(new_load as f64);
                Ok(new_load)
            }
            Err(actual_load) => Err(DirectoryError::StaleState {
                agent_id: id.to_string(),
                expected_load: observed_load,
                actual_load,
            }),
        }
    }

    /// Take the directory offline. Every later call fails with
    /// `DirectoryError::Unavailable`.
    pub fn close(&self) {
        if self.online.swap(false, Ordering::SeqCst) {
            tracing::info!("Agent directory closed");
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn ensure_online(&self) -> Result<(), DirectoryError> {
        if self.is_online() {
            Ok(())
        } else {
            Err(DirectoryError::Unavailable)
        }
    }
}

impl Default for AgentDirectory {
    fn default() -> Self {
        Self::new()
    }
}
