//! Priority scoring configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Weight tables and critical-bonus rule used to score tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Base weight per ticket category (e.g. {"FINANCE": 10})
    pub category_weights: HashMap<String, u32>,
    /// Additional weight per risk tag (e.g. {"CLIENT_VIP": 10})
    pub risk_factors: HashMap<String, u32>,
    /// Scores at or above this value receive the critical bonus
    pub critical_threshold: u32,
    /// Bonus added once the critical threshold is reached
    pub critical_bonus: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            category_weights: HashMap::new(),
            risk_factors: HashMap::new(),
            critical_threshold: 20,
            critical_bonus: 10,
        }
    }
}
