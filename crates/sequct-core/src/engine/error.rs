use super::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Dead end reached: expanded node at depth {depth} has no children to select")]
    DeadEndReached { depth: usize },

    #[error("Oracle evaluation failed: {source}")]
    OracleFailure {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Search cancelled after {completed} of {budget} iterations")]
    Cancelled { completed: usize, budget: usize },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl EngineError {
    pub(crate) fn oracle<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        EngineError::OracleFailure {
            source: Box::new(source),
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        EngineError::InvalidConfiguration(err.to_string())
    }
}
