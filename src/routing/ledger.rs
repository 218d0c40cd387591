//! Bounded record of issued decisions
//!
//! The ledger remembers the most recent decisions by ticket id so a
//! resubmitted ticket gets its original answer back instead of a second
//! assignment. Only the newest `capacity` ids are kept; once full, the oldest
//! id is forgotten first. A ticket resubmitted after its id was evicted is
//! routed again as a new ticket. A capacity of zero disables replay.

use crate::routing::decision::{RoutingDecision, Submission};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Default number of ticket ids remembered for replay.
pub const DEFAULT_LEDGER_CAPACITY: usize = 10_000;

pub struct DecisionLedger {
    capacity: usize,
    entries: DashMap<String, RoutingDecision>,
    /// Insertion order, oldest first
    order: Mutex<VecDeque<String>>,
}

impl DecisionLedger {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of decisions currently remembered.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, ticket_id: &str) -> Option<RoutingDecision> {
        self.entries.get(ticket_id).map(|d| d.value().clone())
    }

    /// Replay the remembered decision for `ticket_id`, or run `decide` and
    /// remember its result.
    ///
    /// Concurrent calls for the same id are serialised, so `decide` runs at
    /// most once per remembered id. Errors from `decide` are not remembered.
    pub fn decide_once<F, E>(&self, ticket_id: &str, decide: F) -> Result<Submission, E>
    where
        F: FnOnce() -> Result<RoutingDecision, E>,
    {
        if self.capacity == 0 {
            return decide().map(Submission::fresh);
        }

        let decision = {
            let slot = match self.entries.entry(ticket_id.to_string()) {
                Entry::Occupied(existing) => {
                    return Ok(Submission::replayed(existing.get().clone()));
                }
                Entry::Vacant(slot) => slot,
            };
            let decision = decide()?;
            slot.insert(decision.clone());
            decision
        };

        // The shard guard is released above; eviction removes other ids and
        // must not run while it is held.
        self.remember(ticket_id);
        Ok(Submission::fresh(decision))
    }

    fn remember(&self, ticket_id: &str) {
        let mut order = self.order.lock().unwrap_or_else(|e| e.into_inner());
        order.push_back(ticket_id.to_string());
        while order.len() > self.capacity {
            if let Some(oldest) = order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }
}

impl Default for DecisionLedger {
    fn default() -> Self {
        Self::new(DEFAULT_LEDGER_CAPACITY)
    }
}
