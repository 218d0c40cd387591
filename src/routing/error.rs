//! Error types for routing failures

use crate::ticket::ValidationError;
use thiserror::Error;

/// Errors surfaced to the caller of the router.
///
/// Everything else (no candidates, lost commit races) resolves to a queue or
/// escalation decision instead of an error.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// The ticket submission was malformed and was not routed
    #[error("Invalid ticket: {0}")]
    Validation(#[from] ValidationError),

    /// The agent directory could not be queried; the ticket must be resubmitted
    #[error("Agent directory unavailable while routing ticket '{ticket_id}'")]
    DependencyUnavailable { ticket_id: String },
}
