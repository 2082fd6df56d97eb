//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::NodeId;

/// Domain errors represent structural violations in a forest.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate node id: {0}")]
    DuplicateId(NodeId),

    #[error("node has an empty id (title: {title:?})")]
    EmptyId { title: String },

    #[error("node has an empty title: {0}")]
    EmptyTitle(NodeId),
}

/// Why a move was refused. The forest is left untouched in every case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveRejection {
    #[error("node not found: {0}")]
    NotFound(NodeId),

    #[error("cannot move {dragged} next to {target}: target is inside the dragged subtree")]
    DescendantTarget { dragged: NodeId, target: NodeId },
}
