//! Priority scoring for incoming tickets

use crate::config::ScoringConfig;
use crate::ticket::Ticket;
use serde::Serialize;

/// How a priority score was put together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    /// Category weight (0 for unknown categories)
    pub base: u32,
    /// Sum of risk tag weights (unknown tags add 0)
    pub risk: u32,
    /// Critical bonus, if the threshold was reached
    pub bonus: u32,
    pub total: u32,
}

/// Computes ticket priority scores from the configured weight tables.
///
/// Scoring is pure: it reads only the ticket and its own copy of the weights,
/// so it is safe to call from any number of threads without coordination.
#[derive(Debug, Clone)]
pub struct PriorityScorer {
    config: ScoringConfig,
}

impl PriorityScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Score a validated ticket.
    ///
    /// # Examples
    ///
    /// ```
    /// use triage::config::ScoringConfig;
    /// use triage::routing::PriorityScorer;
    /// use triage::ticket::Ticket;
    ///
    /// let mut config = ScoringConfig::default();
    /// config.category_weights.insert("FINANCE".into(), 10);
    /// config.risk_factors.insert("CLIENT_VIP".into(), 10);
    ///
    /// let scorer = PriorityScorer::new(&config);
    /// let ticket = Ticket::new("T1", "FINANCE", ["CLIENT_VIP"]);
    /// // 10 + 10 reaches the critical threshold of 20, so +10
    /// assert_eq!(scorer.score(&ticket), 30);
    /// ```
    pub fn score(&self, ticket: &Ticket) -> u32 {
        self.breakdown(&ticket.category, ticket.tags.iter().map(String::as_str))
            .total
    }

    /// Score a category and tag list, itemised.
    pub fn breakdown<'a>(
        &self,
        category: &str,
        tags: impl IntoIterator<Item = &'a str>,
    ) -> ScoreBreakdown {
        let base = self
            .config
            .category_weights
            .get(category)
            .copied()
            .unwrap_or(0);

        let risk = tags
            .into_iter()
            .map(|tag| self.config.risk_factors.get(tag).copied().unwrap_or(0))
            .fold(0u32, u32::saturating_add);

        let subtotal = base.saturating_add(risk);
        let bonus = if subtotal >= self.config.critical_threshold {
            self.config.critical_bonus
        } else {
            0
        };

        ScoreBreakdown {
            base,
            risk,
            bonus,
            total: subtotal.saturating_add(bonus),
        }
    }
}
