//! Node identifier generation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Forest, NodeId};

/// Source of fresh node ids.
pub trait IdGenerator: Send {
    /// Next candidate id, or `None` once the generator has run out.
    fn next_id(&mut self) -> Option<NodeId>;
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> Option<NodeId> {
        Some(NodeId::new(Uuid::new_v4().to_string()))
    }
}

/// `{prefix}{n}` with `n` strictly increasing.
///
/// Exhausted once `n` would pass `u64::MAX`.
#[derive(Debug, Clone)]
pub struct SequentialGenerator {
    prefix: String,
    next: Option<u64>,
}

impl SequentialGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Some(1),
        }
    }

    /// Starts past every `{prefix}{n}` id already present in `forest`.
    pub fn after(prefix: impl Into<String>, forest: &Forest) -> Self {
        let prefix = prefix.into();
        let highest = forest
            .iter()
            .filter_map(|node| node.id.as_str().strip_prefix(prefix.as_str()))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            prefix,
            next: highest.checked_add(1),
        }
    }
}

impl IdGenerator for SequentialGenerator {
    fn next_id(&mut self) -> Option<NodeId> {
        let n = self.next?;
        self.next = n.checked_add(1);
        Some(NodeId::new(format!("{}{}", self.prefix, n)))
    }
}

/// Which generator a session uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    #[default]
    Uuid,
    Sequential,
}

impl IdStrategy {
    pub fn generator(self, prefix: &str, forest: &Forest) -> Box<dyn IdGenerator> {
        match self {
            IdStrategy::Uuid => Box::new(UuidGenerator),
            IdStrategy::Sequential => Box::new(SequentialGenerator::after(prefix, forest)),
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdStrategy::Uuid => f.write_str("uuid"),
            IdStrategy::Sequential => f.write_str("sequential"),
        }
    }
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uuid" => Ok(IdStrategy::Uuid),
            "sequential" => Ok(IdStrategy::Sequential),
            other => Err(format!("unknown id strategy: {other}")),
        }
    }
}
