use thiserror::Error;

use crate::graph::GraphError;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Token not found: {0}")]
    TokenNotFound(String),

    #[error("Graph data access failed: {0}")]
    DataAccess(#[source] GraphError),

    #[error("Graph data access failed for token {token}: {source}")]
    TokenDataAccess {
        token: String,
        #[source]
        source: GraphError,
    },

    #[error("Believers unavailable for token {token}: {source}")]
    BelieversUnavailable {
        token: String,
        #[source]
        source: GraphError,
    },
}

impl ScoreError {
    /// True when the caller asked for something that does not exist,
    /// as opposed to the graph store failing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ScoreError::TokenNotFound(_))
    }
}

pub type ScoreResult<T> = Result<T, ScoreError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid `{name}` environment variable: `{value}`")]
    InvalidValue { name: String, value: String },
}
