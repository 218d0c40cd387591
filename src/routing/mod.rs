//! Ticket routing
//!
//! This module turns a validated ticket into exactly one routing decision:
//! score it, and either leave it in the standard queue, hand it to the
//! least-loaded qualified agent, or escalate it when nobody can take it.
//! The most recent decisions are kept in a bounded [`DecisionLedger`] so a
//! resubmitted ticket gets its earlier answer back.
//!
//! ```text
//! Ticket ─▶ PriorityScorer ─▶ score < standard? ──yes──▶ STANDARD_QUEUE
//!                                    │no
//!                                    ▼
//!                         LoadBalancer::select ──none──▶ SENIOR_ESCALATION
//!                                    │agent
//!                                    ▼
//!                   AgentDirectory::commit_assignment ──lost twice──▶ SENIOR_ESCALATION
//!                                    │ok
//!                                    ▼
//!                                 agent id
//! ```

pub mod balancer;
pub mod decision;
pub mod error;
pub mod ledger;
pub mod scoring;

pub use balancer::{pick_least_loaded, AgentSelector, LoadBalancer, Selection};
pub use decision::{Destination, RoutingDecision, RoutingOutcome, Submission};
pub use error::RoutingError;
pub use ledger::{DecisionLedger, DEFAULT_LEDGER_CAPACITY};
pub use scoring::{PriorityScorer, ScoreBreakdown};

use crate::config::{RoutingConfig, ScoringConfig, TriageConfig};
use crate::directory::{AgentDirectory, DirectoryError};
use crate::metrics::MetricsCollector;
use crate::ticket::{Ticket, TicketRequest};
use std::sync::Arc;

/// Select-and-commit rounds per ticket: the first try plus one retry.
pub const MAX_COMMIT_ATTEMPTS: usize = 2;

/// Router issues one decision per ticket and commits the matching load change.
pub struct Router {
    /// Reference to the agent directory
    directory: Arc<AgentDirectory>,

    /// Priority scorer (owns a copy of the weight tables)
    scorer: PriorityScorer,

    /// Agent selection
    selector: Box<dyn AgentSelector>,

    /// Tickets scoring below this are queued
    standard_threshold: u32,

    /// Recently issued decisions, by ticket id
    ledger: DecisionLedger,

    /// Optional outcome tally
    metrics: Option<Arc<MetricsCollector>>,
}

impl Router {
    /// Create a new router with the given configuration
    pub fn new(
        directory: Arc<AgentDirectory>,
        scoring: &ScoringConfig,
        routing: &RoutingConfig,
    ) -> Self {
        Self {
            selector: Box::new(LoadBalancer::new(
                Arc::clone(&directory),
                routing.override_threshold,
            )),
            directory,
            scorer: PriorityScorer::new(scoring),
            standard_threshold: routing.standard_threshold,
            ledger: DecisionLedger::new(routing.ledger_capacity),
            metrics: None,
        }
    }

    /// Create a router from the unified configuration.
    pub fn from_config(directory: Arc<AgentDirectory>, config: &TriageConfig) -> Self {
        Self::new(directory, &config.scoring, &config.routing)
    }

    /// Record every new decision into `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Replace the default least-loaded selection.
    pub fn with_selector(mut self, selector: impl AgentSelector + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    /// Remember at most `capacity` ticket ids for replay (0 disables replay).
    pub fn with_ledger_capacity(mut self, capacity: usize) -> Self {
        self.ledger = DecisionLedger::new(capacity);
        self
    }

    pub fn directory(&self) -> &Arc<AgentDirectory> {
        &self.directory
    }

    pub fn scorer(&self) -> &PriorityScorer {
        &self.scorer
    }

    pub fn ledger(&self) -> &DecisionLedger {
        &self.ledger
    }

    /// Decision previously issued for `ticket_id`, if still remembered.
    pub fn decision_for(&self, ticket_id: &str) -> Option<RoutingDecision> {
        self.ledger.get(ticket_id)
    }

    /// Validate a raw submission, then route it.
    pub fn route_request(&self, request: TicketRequest) -> Result<RoutingDecision, RoutingError> {
        self.submit_request(request).map(|s| s.decision)
    }

    /// Validate a raw submission, then submit it.
    pub fn submit_request(&self, request: TicketRequest) -> Result<Submission, RoutingError> {
        let ticket = Ticket::try_from(request)?;
        self.submit(&ticket)
    }

    /// Route a ticket.
    ///
    /// A ticket id that has already been decided gets its original decision
    /// back and nothing is re-committed.
    ///
    /// # Errors
    ///
    /// `RoutingError::DependencyUnavailable` when the directory is down. No
    /// decision is recorded in that case, so the ticket can be resubmitted.
    pub fn route(&self, ticket: &Ticket) -> Result<RoutingDecision, RoutingError> {
        self.submit(ticket).map(|s| s.decision)
    }

    /// Route a ticket, reporting whether the decision is a replay.
    pub fn submit(&self, ticket: &Ticket) -> Result<Submission, RoutingError> {
        let submission = self.ledger.decide_once(&ticket.id, || -> Result<_, RoutingError> {
            let score = self.scorer.score(ticket);
            let destination = self.decide(ticket, score)?;
            let decision = RoutingDecision::new(ticket.id.clone(), destination, score);

            tracing::info!(
                ticket_id = %decision.ticket_id,
                destination = %decision.destination,
                outcome = %decision.outcome(),
                score,
                "Ticket routed"
            );

            if let Some(metrics) = &self.metrics {
                metrics.record(&decision);
            }
            Ok(decision)
        })?;

        if submission.replayed {
            tracing::debug!(ticket_id = %ticket.id, "Ticket already decided, replaying decision");
        }
        Ok(submission)
    }

    fn decide(&self, ticket: &Ticket, score: u32) -> Result<Destination, RoutingError> {
        if score < self.standard_threshold {
            tracing::debug!(
                ticket_id = %ticket.id,
                score,
                threshold = self.standard_threshold,
                "Score below standard threshold"
            );
            return Ok(Destination::StandardQueue);
        }
        self.assign(ticket, score)
    }

    fn assign(&self, ticket: &Ticket, score: u32) -> Result<Destination, RoutingError> {
        let unavailable = |_: DirectoryError| {
            tracing::error!(ticket_id = %ticket.id, "Agent directory unavailable");
            RoutingError::DependencyUnavailable {
                ticket_id: ticket.id.clone(),
            }
        };

        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            let agent = match self
                .selector
                .select(&ticket.category, score)
                .map_err(unavailable)?
            {
                Selection::Agent(agent) => agent,
                Selection::NoCandidate => {
                    tracing::debug!(
                        ticket_id = %ticket.id,
                        category = %ticket.category,
                        "No eligible agent"
                    );
                    return Ok(Destination::SeniorEscalation);
                }
            };

            match self
                .directory
                .commit_assignment(&agent.id, agent.current_load)
            {
                Ok(new_load) => {
                    tracing::debug!(
                        ticket_id = %ticket.id,
                        agent_id = %agent.id,
                        load = new_load,
                        "Assignment committed"
                    );
                    return Ok(Destination::Agent(agent.id));
                }
                Err(e) if e.is_retryable() => {
                    tracing::warn!(
                        ticket_id = %ticket.id,
                        agent_id = %agent.id,
                        attempt,
                        error = %e,
                        "Assignment commit lost, reselecting"
                    );
                    if attempt < MAX_COMMIT_ATTEMPTS {
                        if let Some(metrics) = &self.metrics {
                            metrics.record_commit_retry();
                        }
                    }
                }
                Err(e @ DirectoryError::LoadOverflow(_)) => {
                    tracing::warn!(ticket_id = %ticket.id, error = %e, "Agent load saturated, escalating");
                    return Ok(Destination::SeniorEscalation);
                }
                Err(e @ DirectoryError::Unavailable) => return Err(unavailable(e)),
                Err(e) => {
                    // Registration errors cannot come out of a commit.
                    tracing::error!(ticket_id = %ticket.id, error = %e, "Unexpected directory error");
                    return Err(unavailable(e));
                }
            }
        }

        tracing::warn!(ticket_id = %ticket.id, "Commit retries exhausted, escalating");
        Ok(Destination::SeniorEscalation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{Agent, AgentStatus};

    fn config() -> TriageConfig {
        let mut config = TriageConfig::default();
        config
            .scoring
            .category_weights
            .insert("FINANCE".to_string(), 10);
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

    fn router_with(agents: Vec<Agent>) -> Router {
        let directory = Arc::new(AgentDirectory::new());
        for agent in agents {
            directory.register(agent).unwrap();
        }
        Router::from_config(directory, &config())
    }

    #[test]
    fn vip_outage_goes_to_only_agent() {
        let router = router_with(vec![Agent::new("A001", ["FINANCE"], 3).with_load(1)]);
        let ticket = Ticket::new("T1", "FINANCE", ["CLIENT_VIP", "CRITICAL_OUTAGE"]);

        let decision = router.route(&ticket).unwrap();
        assert_eq!(decision.score, 45);
        assert_eq!(decision.destination, Destination::Agent("A001".to_string()));
        assert_eq!(router.directory().load("A001").unwrap(), 2);
    }

    #[test]
    fn low_score_is_queued_without_load_change() {
        let router = router_with(vec![Agent::new("A001", ["FINANCE"], 3).with_load(1)]);
        let ticket = Ticket::new("T2", "FINANCE", Vec::<String>::new());

        let decision = router.route(&ticket).unwrap();
        assert_eq!(decision.score, 10);
        assert_eq!(decision.destination, Destination::StandardQueue);
        assert_eq!(router.directory().load("A001").unwrap(), 1);
    }

    #[test]
    fn no_matching_agent_escalates() {
        let router = router_with(vec![Agent::new("A001", ["TECH"], 3)]);
        let ticket = Ticket::new("T3", "FINANCE", ["CLIENT_VIP"]);

        let decision = router.route(&ticket).unwrap();
        assert_eq!(decision.destination, Destination::SeniorEscalation);
        assert_eq!(router.directory().load("A001").unwrap(), 0);
    }

    #[test]
    fn unavailable_agent_is_skipped() {
        let router = router_with(vec![
            Agent::new("A001", ["FINANCE"], 3).with_status(AgentStatus::Unavailable),
        ]);
        let ticket = Ticket::new("T4", "FINANCE", ["CLIENT_VIP"]);
        assert_eq!(
            router.route(&ticket).unwrap().destination,
            Destination::SeniorEscalation
        );
    }

    #[test]
    fn over_capacity_below_override_escalates() {
        // Keep the score at 20 by moving the critical bonus out of reach.
        let mut cfg = config();
        cfg.scoring.critical_threshold = 100;
        let directory = Arc::new(AgentDirectory::new());
        directory
            .register(Agent::new("A001", ["FINANCE"], 3).with_load(4))
            .unwrap();
        let router = Router::from_config(Arc::clone(&directory), &cfg);

        let ticket = Ticket::new("T5", "FINANCE", ["CLIENT_VIP"]);
        let decision = router.route(&ticket).unwrap();
        assert_eq!(decision.score, 20);
        assert_eq!(decision.destination, Destination::SeniorEscalation);
        assert_eq!(directory.load("A001").unwrap(), 4);
    }

    #[test]
    fn over_capacity_at_override_is_routed() {
        let router = router_with(vec![Agent::new("A001", ["FINANCE"], 3).with_load(4)]);
        let ticket = Ticket::new("T6", "FINANCE", ["CLIENT_VIP", "CRITICAL_OUTAGE"]);

        let decision = router.route(&ticket).unwrap();
        assert_eq!(decision.destination, Destination::Agent("A001".to_string()));
        assert_eq!(router.directory().load("A001").unwrap(), 5);
    }

    #[test]
    fn least_loaded_agent_preferred() {
        let router = router_with(vec![
            Agent::new("A", ["FINANCE"], 3).with_load(1),
            Agent::new("B", ["FINANCE"], 3).with_load(3),
        ]);
        let ticket = Ticket::new("T7", "FINANCE", ["CLIENT_VIP"]);
        assert_eq!(
            router.route(&ticket).unwrap().destination,
            Destination::Agent("A".to_string())
        );
    }

    #[test]
    fn repeated_ticket_replays_decision() {
        let router = router_with(vec![Agent::new("A001", ["FINANCE"], 3)]);
        let ticket = Ticket::new("T8", "FINANCE", ["CLIENT_VIP"]);

        let first = router.route(&ticket).unwrap();
        let second = router.route(&ticket).unwrap();

        assert_eq!(first, second);
        assert_eq!(router.directory().load("A001").unwrap(), 1);
        assert_eq!(router.decision_for("T8"), Some(first));
    }

    #[test]
    fn closed_directory_is_a_dependency_error() {
        let router = router_with(vec![Agent::new("A001", ["FINANCE"], 3)]);
        router.directory().close();
        let ticket = Ticket::new("T9", "FINANCE", ["CLIENT_VIP"]);

        let err = router.route(&ticket).unwrap_err();
        assert!(matches!(
            err,
            RoutingError::DependencyUnavailable { ref ticket_id } if ticket_id == "T9"
        ));
        assert!(router.decision_for("T9").is_none());
    }

    #[test]
    fn queued_tickets_do_not_need_the_directory() {
        let router = router_with(vec![]);
        router.directory().close();
        let ticket = Ticket::new("T10", "FINANCE", Vec::<String>::new());
        assert_eq!(
            router.route(&ticket).unwrap().destination,
            Destination::StandardQueue
        );
    }

    #[test]
    fn route_request_rejects_malformed_input() {
        let router = router_with(vec![]);
        let err = router
            .route_request(TicketRequest {
                id: Some("T11".to_string()),
                category: None,
                tags: vec![],
            })
            .unwrap_err();
        assert!(matches!(err, RoutingError::Validation(_)));
    }

    #[test]
    fn decisions_are_recorded_in_metrics() {
        let metrics = Arc::new(MetricsCollector::new());
        let router = router_with(vec![Agent::new("A001", ["FINANCE"], 3)])
            .with_metrics(Arc::clone(&metrics));

        router
            .route(&Ticket::new("T12", "FINANCE", ["CLIENT_VIP"]))
            .unwrap();
        router
            .route(&Ticket::new("T13", "FINANCE", Vec::<String>::new()))
            .unwrap();
        // Replay is not counted twice
        router
            .route(&Ticket::new("T12", "FINANCE", ["CLIENT_VIP"]))
            .unwrap();

        let report = metrics.report();
        assert_eq!(report.total_decisions, 2);
        assert_eq!(report.automated_count, 1);
        assert_eq!(report.automation_rate_percent, 50.0);
    }

    /// Hands out a fixed sequence of selections, then reports no candidate.
    struct ScriptedSelector {
        script: std::sync::Mutex<std::collections::VecDeque<Selection>>,
        calls: std::sync::atomic::AtomicUsize,
    }

    impl ScriptedSelector {
        fn new(script: Vec<Selection>) -> Arc<Self> {
            Arc::new(Self {
                script: std::sync::Mutex::new(script.into()),
                calls: std::sync::atomic::AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    impl AgentSelector for Arc<ScriptedSelector> {
        fn select(&self, _category: &str, _score: u32) -> Result<Selection, DirectoryError> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Selection::NoCandidate))
        }
    }

    fn seen(id: &str, load: u32) -> Selection {
        Selection::Agent(crate::directory::AgentView {
            id: id.to_string(),
            name: id.to_string(),
            expertise: vec!["FINANCE".to_string()],
            status: AgentStatus::Available,
            current_load: load,
            capacity: 3,
        })
    }

    fn scripted_router(
        agents: Vec<Agent>,
        script: Vec<Selection>,
    ) -> (Router, Arc<ScriptedSelector>, Arc<MetricsCollector>) {
        let selector = ScriptedSelector::new(script);
        let metrics = Arc::new(MetricsCollector::new());
        let router = router_with(agents)
            .with_selector(Arc::clone(&selector))
            .with_metrics(Arc::clone(&metrics));
        (router, selector, metrics)
    }

    #[test]
    fn stale_commit_is_reselected_once() {
        // First selection saw load 0, but A001 is already at 1.
        let (router, selector, metrics) = scripted_router(
            vec![Agent::new("A001", ["FINANCE"], 3).with_load(1)],
            vec![seen("A001", 0), seen("A001", 1)],
        );

        let decision = router
            .route(&Ticket::new("R1", "FINANCE", ["CLIENT_VIP"]))
            .unwrap();

        assert_eq!(decision.destination, Destination::Agent("A001".to_string()));
        assert_eq!(selector.calls(), 2);
        assert_eq!(metrics.commit_retries(), 1);
        assert_eq!(router.directory().load("A001").unwrap(), 2);
    }

    #[test]
    fn second_failed_commit_escalates() {
        let (router, selector, metrics) = scripted_router(
            vec![Agent::new("A001", ["FINANCE"], 3).with_load(1)],
            vec![seen("A001", 0), seen("GHOST", 0), seen("A001", 1)],
        );

        let decision = router
            .route(&Ticket::new("R2", "FINANCE", ["CLIENT_VIP"]))
            .unwrap();

        assert_eq!(decision.destination, Destination::SeniorEscalation);
        assert_eq!(selector.calls(), MAX_COMMIT_ATTEMPTS);
        assert_eq!(metrics.commit_retries(), 1);
        assert_eq!(metrics.report().escalated_count, 1);
        assert_eq!(router.directory().load("A001").unwrap(), 1);
    }

    #[test]
    fn agent_going_unavailable_twice_escalates() {
        let (router, selector, _metrics) = scripted_router(
            vec![Agent::new("A001", ["FINANCE"], 3).with_status(AgentStatus::Unavailable)],
            vec![seen("A001", 0), seen("A001", 0)],
        );

        let decision = router
            .route(&Ticket::new("R3", "FINANCE", ["CLIENT_VIP"]))
            .unwrap();

        assert_eq!(decision.destination, Destination::SeniorEscalation);
        assert_eq!(selector.calls(), 2);
        assert_eq!(router.directory().load("A001").unwrap(), 0);
    }

    #[test]
    fn saturated_agent_escalates_without_load_change() {
        let router = router_with(vec![Agent::new("A001", ["FINANCE"], 3).with_load(u32::MAX)]);
        let ticket = Ticket::new("R4", "FINANCE", ["CLIENT_VIP", "CRITICAL_OUTAGE"]);

        let decision = router.route(&ticket).unwrap();
        assert_eq!(decision.destination, Destination::SeniorEscalation);
        assert_eq!(router.directory().load("A001").unwrap(), u32::MAX);
    }

    #[test]
    fn ledger_stays_bounded_over_a_long_stream() {
        let router = router_with(vec![]).with_ledger_capacity(100);

        for i in 0..10_000 {
            let ticket = Ticket::new(format!("Q{}", i), "FINANCE", Vec::<String>::new());
            router.route(&ticket).unwrap();
            assert!(router.ledger().len() <= 100);
        }

        assert_eq!(router.ledger().len(), 100);
        assert!(router.decision_for("Q9899").is_none());
        assert!(router.decision_for("Q9999").is_some());
    }

    #[test]
    fn submit_flags_replays() {
        let metrics = Arc::new(MetricsCollector::new());
        let router = router_with(vec![Agent::new("A001", ["FINANCE"], 3)])
            .with_metrics(Arc::clone(&metrics));
        let ticket = Ticket::new("R5", "FINANCE", ["CLIENT_VIP"]);

        assert!(!router.submit(&ticket).unwrap().replayed);
        assert!(router.submit(&ticket).unwrap().replayed);
        assert_eq!(metrics.report().total_decisions, 1);
    }
}
