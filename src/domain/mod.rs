//! Domain layer: forest model and the tree mutation engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod invariants;
pub mod mutator;
pub mod node;

pub use error::{DomainError, MoveRejection};
pub use mutator::Position;
pub use node::{Forest, ForestIter, Node, NodeId};
