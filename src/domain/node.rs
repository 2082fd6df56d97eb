//! Domain entities: nodes and the forest they live in

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque node identifier, unique across a forest for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A labeled entry of the table of contents.
///
/// Children are owned: a child list belongs to exactly one node, and a node
/// cannot appear inside its own subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub title: String,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    /// Creates a leaf node.
    pub fn new(id: impl Into<NodeId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            children: Vec::new(),
        }
    }

    /// Builder-style helper, mostly for fixtures.
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(Node::depth)
            .max()
            .unwrap_or(0)
    }

    /// Ids of every node strictly below this one.
    pub fn descendant_ids(&self) -> HashSet<NodeId> {
        let mut ids = HashSet::new();
        let mut stack: Vec<&Node> = self.children.iter().collect();
        while let Some(node) = stack.pop() {
            ids.insert(node.id.clone());
            stack.extend(node.children.iter());
        }
        ids
    }
}

/// Ordered sequence of root-level trees.
///
/// Every mutation in [`crate::domain::mutator`] takes a forest by reference
/// and hands back a new one; a `Forest` value itself is never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest(Vec<Node>);

impl Forest {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn roots(&self) -> &[Node] {
        &self.0
    }

    pub fn into_roots(self) -> Vec<Node> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of nodes at every level.
    pub fn node_count(&self) -> usize {
        self.0.iter().map(Node::subtree_len).sum()
    }

    pub fn depth(&self) -> usize {
        self.0.iter().map(Node::depth).max().unwrap_or(0)
    }

    pub fn find(&self, id: &NodeId) -> Option<&Node> {
        self.iter().find(|node| &node.id == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.find(id).is_some()
    }

    /// Pre-order walk in document order.
    pub fn iter(&self) -> ForestIter<'_> {
        ForestIter::new(self)
    }

    /// Ids in document order.
    pub fn ids(&self) -> Vec<NodeId> {
        self.iter().map(|node| node.id.clone()).collect()
    }

    /// Titles of all leaves, in document order.
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|node| node.is_leaf())
            .map(|node| node.title.clone())
            .collect()
    }

    /// Titles from the root down to `id` (inclusive), or `None` if `id` is absent.
    pub fn path_to(&self, id: &NodeId) -> Option<Vec<String>> {
        fn walk(nodes: &[Node], id: &NodeId, path: &mut Vec<String>) -> bool {
            for node in nodes {
                path.push(node.title.clone());
                if &node.id == id || walk(&node.children, id, path) {
                    return true;
                }
                path.pop();
            }
            false
        }

        let mut path = Vec::new();
        walk(&self.0, id, &mut path).then_some(path)
    }
}

impl From<Vec<Node>> for Forest {
    fn from(roots: Vec<Node>) -> Self {
        Self(roots)
    }
}

impl<'a> IntoIterator for &'a Forest {
    type Item = &'a Node;
    type IntoIter = ForestIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct ForestIter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> ForestIter<'a> {
    fn new(forest: &'a Forest) -> Self {
        // Reversed so that popping yields roots left-to-right
        Self {
            stack: forest.0.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for ForestIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}
