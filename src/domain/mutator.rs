//! Tree mutation engine.
//!
//! Pure functions over a [`Forest`] snapshot. Each operation borrows the
//! current forest and returns a new one; the path from the root to the
//! touched node is rebuilt, everything else is carried over as-is.
//!
//! Unknown ids are a silent no-op for [`add`], [`rename`] and [`delete`].
//! [`move_node`] reports them explicitly so callers can reset drag state.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::domain::{Forest, MoveRejection, Node, NodeId};

/// Where a moved node lands relative to its target sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Before,
    After,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Before => f.write_str("before"),
            Position::After => f.write_str("after"),
        }
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "before" => Ok(Position::Before),
            "after" => Ok(Position::After),
            other => Err(format!("invalid position '{other}', expected 'before' or 'after'")),
        }
    }
}

/// Appends `node` to the children of `parent`, or to the roots when `parent` is `None`.
#[instrument(level = "trace", skip(forest, node), fields(id = %node.id))]
pub fn add(forest: &Forest, parent: Option<&NodeId>, node: Node) -> Forest {
    let Some(parent) = parent else {
        let mut roots = forest.roots().to_vec();
        roots.push(node);
        debug!("add: appended root");
        return Forest::from(roots);
    };

    let mut pending = Some(node);
    let roots = append_child(forest.roots(), parent, &mut pending);
    if pending.is_some() {
        debug!("add: parent {} not found, forest unchanged", parent);
        return forest.clone();
    }
    debug!("add: appended child of {}", parent);
    Forest::from(roots)
}

fn append_child(nodes: &[Node], parent: &NodeId, pending: &mut Option<Node>) -> Vec<Node> {
    nodes
        .iter()
        .map(|node| {
            if pending.is_none() {
                return node.clone();
            }
            if &node.id == parent {
                let mut children = node.children.clone();
                children.extend(pending.take());
                return Node {
                    id: node.id.clone(),
                    title: node.title.clone(),
                    children,
                };
            }
            Node {
                id: node.id.clone(),
                title: node.title.clone(),
                children: append_child(&node.children, parent, pending),
            }
        })
        .collect()
}

/// Replaces the title of `id`. Title validation is the caller's concern.
#[instrument(level = "trace", skip(forest))]
pub fn rename(forest: &Forest, id: &NodeId, title: &str) -> Forest {
    fn walk(nodes: &[Node], id: &NodeId, title: &str) -> Vec<Node> {
        nodes
            .iter()
            .map(|node| Node {
                id: node.id.clone(),
                title: if &node.id == id {
                    title.to_string()
                } else {
                    node.title.clone()
                },
                children: walk(&node.children, id, title),
            })
            .collect()
    }

    if !forest.contains(id) {
        debug!("rename: {} not found, forest unchanged", id);
        return forest.clone();
    }
    debug!("rename: {} -> {:?}", id, title);
    Forest::from(walk(forest.roots(), id, title))
}

/// Removes `id` together with its whole subtree.
#[instrument(level = "trace", skip(forest))]
pub fn delete(forest: &Forest, id: &NodeId) -> Forest {
    let mut removed = None;
    let roots = detach(forest.roots(), id, &mut removed);
    match removed {
        Some(node) => {
            debug!("delete: removed {} ({} nodes)", id, node.subtree_len());
            Forest::from(roots)
        }
        None => {
            debug!("delete: {} not found, forest unchanged", id);
            forest.clone()
        }
    }
}

/// Filters `id` out of every level, handing the removed subtree back through `removed`.
fn detach(nodes: &[Node], id: &NodeId, removed: &mut Option<Node>) -> Vec<Node> {
    let mut kept = Vec::with_capacity(nodes.len());
    for node in nodes {
        if &node.id == id {
            *removed = Some(node.clone());
            continue;
        }
        kept.push(Node {
            id: node.id.clone(),
            title: node.title.clone(),
            children: detach(&node.children, id, removed),
        });
    }
    kept
}

/// Ids strictly below `id`, or `None` if `id` is not in the forest.
pub fn descendant_ids(forest: &Forest, id: &NodeId) -> Option<HashSet<NodeId>> {
    forest.find(id).map(Node::descendant_ids)
}

/// First phase of a move: verifies both ids exist and that the target is
/// neither the dragged node nor one of its descendants.
#[instrument(level = "trace", skip(forest))]
pub fn check_move(forest: &Forest, dragged: &NodeId, target: &NodeId) -> Result<(), MoveRejection> {
    let descendants =
        descendant_ids(forest, dragged).ok_or_else(|| MoveRejection::NotFound(dragged.clone()))?;
    if dragged == target || descendants.contains(target) {
        return Err(MoveRejection::DescendantTarget {
            dragged: dragged.clone(),
            target: target.clone(),
        });
    }
    if !forest.contains(target) {
        return Err(MoveRejection::NotFound(target.clone()));
    }
    Ok(())
}

/// Relocates the subtree rooted at `dragged` so it becomes the sibling
/// immediately before or after `target`.
///
/// All-or-nothing: on rejection the caller keeps its forest and no partial
/// state is ever returned.
#[instrument(level = "trace", skip(forest))]
pub fn move_node(
    forest: &Forest,
    dragged: &NodeId,
    target: &NodeId,
    position: Position,
) -> Result<Forest, MoveRejection> {
    if let Err(rejection) = check_move(forest, dragged, target) {
        debug!("move: rejected: {}", rejection);
        return Err(rejection);
    }

    let mut removed = None;
    let detached = detach(forest.roots(), dragged, &mut removed);
    let subtree = removed.ok_or_else(|| MoveRejection::NotFound(dragged.clone()))?;

    let mut pending = Some(subtree);
    let roots = splice(&detached, target, position, &mut pending);
    if pending.is_some() {
        // check_move saw the target outside the dragged subtree, so it survives the detach
        return Err(MoveRejection::NotFound(target.clone()));
    }

    debug!("move: {} placed {} {}", dragged, position, target);
    Ok(Forest::from(roots))
}

/// Inserts `pending` next to `target` in whichever sequence holds it.
fn splice(
    nodes: &[Node],
    target: &NodeId,
    position: Position,
    pending: &mut Option<Node>,
) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len() + 1);
    for node in nodes {
        if pending.is_some() && &node.id == target {
            let inserted = pending.take();
            match position {
                Position::Before => {
                    out.extend(inserted);
                    out.push(node.clone());
                }
                Position::After => {
                    out.push(node.clone());
                    out.extend(inserted);
                }
            }
            continue;
        }
        if pending.is_none() {
            out.push(node.clone());
            continue;
        }
        out.push(Node {
            id: node.id.clone(),
            title: node.title.clone(),
            children: splice(&node.children, target, position, pending),
        });
    }
    out
}
