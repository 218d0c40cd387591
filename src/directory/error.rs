/// Errors that can occur during directory operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("agent already exists: {0}")]
    DuplicateAgent(String),

    #[error("agent id is reserved for a routing destination: {0}")]
    ReservedId(String),

    #[error("agent not found: {0}")]
    UnknownAgent(String),

    #[error("agent {agent_id} load changed since selection (expected {expected_load}, found {actual_load})")]
    StaleState {
        agent_id: String,
        expected_load: u32,
        actual_load: u32,
    },

    #[error("agent {0} is no longer available")]
    AgentUnavailable(String),

    #[error("agent {0} cannot take more tickets: load counter is saturated")]
    LoadOverflow(String),

    #[error("agent directory is unavailable")]
    Unavailable,
}

impl DirectoryError {
    /// Errors caused by the directory changing under a selection; a fresh
    /// selection may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DirectoryError::UnknownAgent(_)
                | DirectoryError::StaleState { .. }
                | DirectoryError::AgentUnavailable(_)
        )
    }
}
