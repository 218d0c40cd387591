//! # Metrics Collection Module
//!
//! Streams routing decisions into running totals and reports the automation
//! rate on demand. Nothing is buffered per ticket, so the collector can sit
//! behind an unbounded ticket stream.
//!
//! ## Metrics Emitted
//!
//! **Counters:**
//! - `triage_decisions_total{outcome}` - Decisions by outcome (routed, queued, escalated)
//! - `triage_commit_retries_total` - Selections repeated after a lost commit
//!
//! **Gauges:**
//! - `triage_agent_load{agent}` - Current load per agent
//! - `triage_agents_available` - Agents currently accepting tickets

pub mod types;

pub use types::*;

use crate::directory::{AgentDirectory, AgentStatus};
use crate::routing::decision::{RoutingDecision, RoutingOutcome};
use std::sync::atomic::{AtomicU64, Ordering};

/// Running tally of routing outcomes.
///
/// Counters are atomic, so `record` can be called from any worker thread.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    routed: AtomicU64,
    queued: AtomicU64,
    escalated: AtomicU64,
    commit_retries: AtomicU64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one decision to the tally.
    pub fn record(&self, decision: &RoutingDecision) {
        let outcome = decision.outcome();
        let counter = match outcome {
            RoutingOutcome::Routed => &self.routed,
            RoutingOutcome::Queued => &self.queued,
            RoutingOutcome::Escalated => &self.escalated,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        metrics::counter!("triage_decisions_total", "outcome" => outcome.as_str()).increment(1);
    }

    /// Note that a selection had to be repeated after a lost commit.
    pub fn record_commit_retry(&self) {
        self.commit_retries.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("triage_commit_retries_total").increment(1);
    }

    pub fn commit_retries(&self) -> u64 {
        self.commit_retries.load(Ordering::Relaxed)
    }

    /// Percentage of decisions that went directly to an agent.
    ///
    /// Returns 0.0 when nothing has been recorded.
    pub fn automation_rate(&self) -> f64 {
        self.report().automation_rate_percent
    }

    /// Snapshot of the current totals.
    pub fn report(&self) -> MetricsReport {
        MetricsReport::from_counts(
            self.routed.load(Ordering::Relaxed),
            self.queued.load(Ordering::Relaxed),
            self.escalated.load(Ordering::Relaxed),
            self.commit_retries.load(Ordering::Relaxed),
        )
    }

    /// Refresh agent gauges from the directory.
    ///
    /// A closed directory leaves the gauges untouched.
    pub fn update_agent_gauges(&self, directory: &AgentDirectory) {
        let Ok(agents) = directory.agents() else {
            return;
        };

        let available = agents
            .iter()
            .filter(|a| a.status == AgentStatus::Available)
            .count();
        metrics::gauge!("triage_agents_available").set(available as f64);

        for agent in &agents {
            metrics::gauge!("triage_agent_load", "agent" => agent.id.clone())
                .set(agent.current_load as f64);
        }
    }
}

/// Install the Prometheus recorder so emitted metrics can be rendered.
///
/// Returns a handle whose `render()` produces the Prometheus text format.
pub fn setup_metrics(
) -> Result<metrics_exporter_prometheus::PrometheusHandle, Box<dyn std::error::Error>> {
    let handle = metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}
