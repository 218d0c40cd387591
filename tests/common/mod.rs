//! Shared test utilities for triage integration tests.
//!
//! Provides reusable helpers for building configurations, directories and
//! routers so each test file only states what is specific to it.

#![allow(dead_code)]

use std::sync::Arc;
use triage::config::{AgentConfig, TriageConfig};
use triage::directory::{Agent, AgentDirectory, AgentStatus};
use triage::metrics::MetricsCollector;
use triage::routing::Router;
use triage::ticket::Ticket;

// =============================================================================
// Configuration
// =============================================================================

/// The reference weight tables: FINANCE 10, CLIENT_VIP 10, CRITICAL_OUTAGE 15.
pub fn reference_config() -> TriageConfig {
    let mut config = TriageConfig::default();
    config
        .scoring
        .category_weights
        .insert("FINANCE".to_string(), 10);
    config.scoring.category_weights.insert("TECH".to_string(), 8);
    config
        .scoring
        .risk_factors
        .insert("CLIENT_VIP".to_string(), 10);
    config
        .scoring
        .risk_factors
        .insert("CRITICAL_OUTAGE".to_string(), 15);
    config
}

pub fn agent_config(id: &str, expertise: &[&str], initial_load: u32) -> AgentConfig {
    AgentConfig {
        id: id.to_string(),
        name: None,
        expertise: expertise.iter().map(|e| e.to_string()).collect(),
        status: AgentStatus::Available,
        capacity: None,
        initial_load,
    }
}

// =============================================================================
// Directory / Router Builders
// =============================================================================

pub fn finance_agent(id: &str, load: u32) -> Agent {
    Agent::new(id, ["FINANCE"], 3).with_load(load)
}

pub fn directory_with(agents: Vec<Agent>) -> Arc<AgentDirectory> {
    let directory = Arc::new(AgentDirectory::new());
    for agent in agents {
        directory.register(agent).unwrap();
    }
    directory
}

/// Router over `agents` using the reference config, with a metrics collector attached.
pub fn router_with(agents: Vec<Agent>) -> (Arc<Router>, Arc<MetricsCollector>) {
    let metrics = Arc::new(MetricsCollector::new());
    let router = Router::from_config(directory_with(agents), &reference_config())
        .with_metrics(Arc::clone(&metrics));
    (Arc::new(router), metrics)
}

// =============================================================================
// Tickets
// =============================================================================

/// FINANCE + CLIENT_VIP + CRITICAL_OUTAGE: scores 45.
pub fn critical_finance(id: &str) -> Ticket {
    Ticket::new(id, "FINANCE", ["CLIENT_VIP", "CRITICAL_OUTAGE"])
}

/// FINANCE + CLIENT_VIP: scores 30.
pub fn vip_finance(id: &str) -> Ticket {
    Ticket::new(id, "FINANCE", ["CLIENT_VIP"])
}

/// FINANCE with no tags: scores 10.
pub fn plain_finance(id: &str) -> Ticket {
    Ticket::new(id, "FINANCE", Vec::<String>::new())
}
