//! Routing decision types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Destination name for tickets below the automatic-routing threshold.
pub const STANDARD_QUEUE: &str = "STANDARD_QUEUE";

/// Destination name for tickets no qualified agent can take.
pub const SENIOR_ESCALATION: &str = "SENIOR_ESCALATION";

/// Whether `id` collides with one of the queue destination names.
pub fn is_reserved_destination(id: &str) -> bool {
    id == STANDARD_QUEUE || id == SENIOR_ESCALATION
}

/// Where a ticket ends up.
///
/// Serializes as a bare string: the agent id or one of the reserved queue names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Destination {
    /// Assigned directly to the agent with this id
    Agent(String),
    /// Left for manual pickup
    StandardQueue,
    /// Handed to senior staff
    SeniorEscalation,
}

impl Destination {
    pub fn agent_id(&self) -> Option<&str> {
        match self {
            Destination::Agent(id) => Some(id),
            _ => None,
        }
    }
}

impl From<String> for Destination {
    fn from(value: String) -> Self {
        match value.as_str() {
            STANDARD_QUEUE => Destination::StandardQueue,
            SENIOR_ESCALATION => Destination::SeniorEscalation,
            _ => Destination::Agent(value),
        }
    }
}

impl From<Destination> for String {
    fn from(destination: Destination) -> Self {
        match destination {
            Destination::Agent(id) => id,
            Destination::StandardQueue => STANDARD_QUEUE.to_string(),
            Destination::SeniorEscalation => SENIOR_ESCALATION.to_string(),
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Agent(id) => write!(f, "{}", id),
            Destination::StandardQueue => write!(f, "{}", STANDARD_QUEUE),
            Destination::SeniorEscalation => write!(f, "{}", SENIOR_ESCALATION),
        }
    }
}

/// Terminal state a ticket reaches after scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingOutcome {
    Queued,
    Routed,
    Escalated,
}

impl RoutingOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingOutcome::Queued => "queued",
            RoutingOutcome::Routed => "routed",
            RoutingOutcome::Escalated => "escalated",
        }
    }
}

impl std::fmt::Display for RoutingOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single, immutable decision issued for a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub ticket_id: String,
    pub destination: Destination,
    pub score: u32,
    pub timestamp: DateTime<Utc>,
}

impl RoutingDecision {
    pub fn new(ticket_id: impl Into<String>, destination: Destination, score: u32) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            destination,
            score,
            timestamp: Utc::now(),
        }
    }

    pub fn outcome(&self) -> RoutingOutcome {
        match self.destination {
            Destination::Agent(_) => RoutingOutcome::Routed,
            Destination::StandardQueue => RoutingOutcome::Queued,
            Destination::SeniorEscalation => RoutingOutcome::Escalated,
        }
    }

    /// The ticket went straight to an agent without human triage.
    pub fn is_automated(&self) -> bool {
        self.outcome() == RoutingOutcome::Routed
    }
}

/// A decision as handed back to the submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub decision: RoutingDecision,
    /// The ticket id was already decided; this is the earlier decision and
    /// nothing was committed or counted for it
    pub replayed: bool,
}

impl Submission {
    pub fn fresh(decision: RoutingDecision) -> Self {
        Self {
            decision,
            replayed: false,
        }
    }

    pub fn replayed(decision: RoutingDecision) -> Self {
        Self {
            decision,
            replayed: true,
        }
    }
}
