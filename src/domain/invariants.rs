//! Structural checks for forests that did not come out of the mutator,
//! e.g. imported documents.

use std::collections::HashSet;

use tracing::instrument;

use crate::domain::{DomainError, Forest};

/// Checks id uniqueness, non-empty ids and non-blank titles.
///
/// Acyclicity needs no check: children are owned values, so a node can
/// never be reached from itself.
#[instrument(level = "debug", skip(forest))]
pub fn validate(forest: &Forest) -> Result<(), DomainError> {
    let mut seen = HashSet::new();
    for node in forest.iter() {
        if node.id.as_str().is_empty() {
            return Err(DomainError::EmptyId {
                title: node.title.clone(),
            });
        }
        if !seen.insert(&node.id) {
            return Err(DomainError::DuplicateId(node.id.clone()));
        }
        if node.title.trim().is_empty() {
            return Err(DomainError::EmptyTitle(node.id.clone()));
        }
    }
    Ok(())
}

/// Whether every id occurs once.
pub fn has_unique_ids(forest: &Forest) -> bool {
    let mut seen = HashSet::new();
    forest.iter().all(|node| seen.insert(&node.id))
}
