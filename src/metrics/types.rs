//! # Metrics Types
//!
//! Data structures for the automation report.

use serde::{Deserialize, Serialize};

/// Snapshot of routing outcomes since the collector was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Decisions recorded
    pub total_decisions: u64,
    /// Decisions assigned straight to an agent
    pub automated_count: u64,
    /// Decisions left in the standard queue
    pub queued_count: u64,
    /// Decisions escalated to senior staff
    pub escalated_count: u64,
    /// automated_count / total_decisions * 100 (0 when nothing was recorded)
    pub automation_rate_percent: f64,
    /// Selections repeated because an assignment commit was lost
    pub commit_retries: u64,
}

impl MetricsReport {
    pub(crate) fn from_counts(
        automated: u64,
        queued: u64,
        escalated: u64,
        commit_retries: u64,
    ) -> Self {
        let total = automated + queued + escalated;
        let rate = if total == 0 {
            0.0
        } else {
            automated as f64 / total as f64 * 100.0
        };

        Self {
            total_decisions: total,
            automated_count: automated,
            queued_count: queued,
            escalated_count: escalated,
            automation_rate_percent: rate,
            commit_retries,
        }
    }
}
