//! Load-aware agent selection

use crate::directory::{AgentDirectory, AgentView, DirectoryError};
use std::sync::Arc;

/// Result of a selection round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Chosen agent, as observed during selection
    Agent(AgentView),
    /// Nobody eligible; the ticket must be escalated
    NoCandidate,
}

/// Chooses an agent for a scored ticket.
///
/// The router commits whatever the selector returns against the directory,
/// so a selection that is out of date is caught there and reselected.
pub trait AgentSelector: Send + Sync {
    /// Only `DirectoryError::Unavailable` should be returned as an error; an
    /// empty candidate set is `Selection::NoCandidate`.
    fn select(&self, category: &str, score: u32) -> Result<Selection, DirectoryError>;
}

/// Picks the least-loaded qualified agent for a ticket.
pub struct LoadBalancer {
    directory: Arc<AgentDirectory>,
    override_threshold: u32,
}

impl LoadBalancer {
    pub fn new(directory: Arc<AgentDirectory>, override_threshold: u32) -> Self {
        Self {
            directory,
            override_threshold,
        }
    }

    /// Select an agent for a ticket of `category` carrying `score`.
    ///
    /// Only `DirectoryError::Unavailable` is returned as an error; an empty
    /// candidate set is a normal `Selection::NoCandidate`.
    pub fn select(&self, category: &str, score: u32) -> Result<Selection, DirectoryError> {
        let candidates = self.directory.candidates(category)?;
        tracing::debug!(
            category = %category,
            score,
            candidates = candidates.len(),
            "Evaluating candidates"
        );

        Ok(pick_least_loaded(&candidates, score, self.override_threshold)
            .map(|agent| Selection::Agent(agent.clone()))
            .unwrap_or(Selection::NoCandidate))
    }
}

impl AgentSelector for LoadBalancer {
    fn select(&self, category: &str, score: u32) -> Result<Selection, DirectoryError> {
        LoadBalancer::select(self, category, score)
    }
}

/// Choose from `candidates` by load, honouring capacity thresholds.
///
/// Agents at or under capacity are always preferred. Agents over capacity are
/// only considered when none are under it and `score` reaches
/// `override_threshold`. Equal loads are broken by agent id, lowest first.
pub fn pick_least_loaded(
    candidates: &[AgentView],
    score: u32,
    override_threshold: u32,
) -> Option<&AgentView> {
    let (within, over): (Vec<&AgentView>, Vec<&AgentView>) = candidates
        .iter()
        .partition(|agent| agent.is_within_capacity());

    let eligible = if !within.is_empty() {
        within
    } else if score >= override_threshold {
        over
    } else {
        return None;
    };

    eligible
        .into_iter()
        .min_by(|a, b| {
            a.current_load
                .cmp(&b.current_load)
                .then_with(|| a.id.cmp(&b.id))
        })
}
