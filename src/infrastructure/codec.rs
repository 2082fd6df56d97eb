//! Record-shape import/export
//!
//! A forest is exchanged as a JSON array of `{id, title, children: [...]}`
//! records, recursively. `children` may be omitted for leaves on input and
//! is always written on output.
//!
//! Each tree level nests two JSON values, so decoding runs without
//! serde_json's recursion limit and on a growable stack: any forest the
//! editor can build must read back.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::domain::{invariants, Forest};
use crate::infrastructure::{InfraError, InfraResult};

/// Serializes `forest` as pretty-printed JSON.
pub fn encode(forest: &Forest) -> InfraResult<String> {
    serde_json::to_string_pretty(forest).map_err(|e| InfraError::json("encode forest", e))
}

/// Parses and validates a forest document.
#[instrument(level = "debug", skip(text))]
pub fn decode(text: &str) -> InfraResult<Forest> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let forest = Forest::deserialize(serde_stacker::Deserializer::new(&mut deserializer))
        .map_err(|e| InfraError::json("parse forest", e))?;
    deserializer
        .end()
        .map_err(|e| InfraError::json("parse forest", e))?;
    invariants::validate(&forest)?;
    debug!("decoded {} nodes", forest.node_count());
    Ok(forest)
}

/// Reads and decodes the document at `path`.
#[instrument(level = "debug")]
pub fn import(path: &Path) -> InfraResult<Forest> {
    let text = fs::read_to_string(path)
        .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
    decode(&text)
}
