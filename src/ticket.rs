//! Ticket submission types and validation.
//!
//! Tickets arrive as loosely-typed [`TicketRequest`] payloads and are turned into
//! validated [`Ticket`] values before they reach the router.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors raised when a ticket submission is malformed.
///
/// The caller must correct and resubmit the ticket; nothing is routed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("ticket is missing an id")]
    MissingId,

    #[error("ticket '{ticket_id}' is missing a category")]
    MissingCategory { ticket_id: String },
}

/// Raw ticket submission as received from the ingestion layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A validated support ticket.
///
/// Tags are held as an ordered set so that two submissions carrying the same
/// tags in a different order (or with repeats) are indistinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub id: String,
    pub category: String,
    pub tags: BTreeSet<String>,
}

impl Ticket {
    /// Build a ticket from already-trusted parts.
    ///
    /// # Examples
    ///
    /// ```
    /// use triage::ticket::Ticket;
    ///
    /// let ticket = Ticket::new("T-1", "FINANCE", ["CLIENT_VIP", "CLIENT_VIP"]);
    /// assert_eq!(ticket.tags.len(), 1);
    /// ```
    pub fn new<I, S>(id: impl Into<String>, category: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            category: category.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<TicketRequest> for Ticket {
    type Error = ValidationError;

    fn try_from(request: TicketRequest) -> Result<Self, Self::Error> {
        let id = request
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(ValidationError::MissingId)?;

        // An unknown category is fine (it scores zero); an absent one is not.
        let category = request
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ValidationError::MissingCategory {
                ticket_id: id.clone(),
            })?;

        let tags = request
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(Self { id, category, tags })
    }
}
