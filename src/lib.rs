//! In-memory editor for an ordered, nested table of contents.
//!
//! The heart of the crate is [`domain::mutator`]: pure functions that add,
//! rename, delete and move nodes in a [`domain::Forest`] while keeping ids
//! unique and the structure acyclic. [`application::EditorSession`] wraps it
//! with the caller-side state (expanded nodes, drag source, edit focus).

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use domain::mutator::{add, delete, move_node, rename};
pub use domain::{Forest, MoveRejection, Node, NodeId, Position};
