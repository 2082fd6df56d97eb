//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{DomainError, MoveRejection, NodeId};

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("move rejected: {0}")]
    Rejected(#[from] MoveRejection),

    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("no fresh node id after {attempts} attempts")]
    IdExhausted { attempts: usize },

    #[error("script line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
