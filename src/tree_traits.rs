/*
Rendering of forests as text trees (termtree).

Expansion state is not part of the forest, so every conversion takes a
RenderView carrying the caller's expanded set and marker settings.
 */
use std::collections::HashSet;

use termtree::Tree;
use tracing::instrument;

use crate::config::RenderConfig;
use crate::domain::{Forest, Node, NodeId};

/// Label of the synthetic root a forest is rendered under.
pub const FOREST_ROOT_LABEL: &str = ".";

#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    pub expanded: &'a HashSet<NodeId>,
    pub show_ids: bool,
    pub collapsed_marker: &'a str,
    pub expanded_marker: &'a str,
}

impl<'a> RenderView<'a> {
    pub fn new(expanded: &'a HashSet<NodeId>, config: &'a RenderConfig) -> Self {
        Self {
            expanded,
            show_ids: config.show_ids,
            collapsed_marker: &config.collapsed_marker,
            expanded_marker: &config.expanded_marker,
        }
    }

    fn label(&self, node: &Node) -> String {
        let mut label = if node.is_leaf() {
            node.title.clone()
        } else if self.expanded.contains(&node.id) {
            format!("{} {}", self.expanded_marker, node.title)
        } else {
            format!("{} {}", self.collapsed_marker, node.title)
        };
        if self.show_ids {
            label.push_str(&format!(" [{}]", node.id));
        }
        label
    }
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self, view: &RenderView<'_>) -> Tree<String>;
}

impl TreeNodeConvert for Node {
    fn to_tree_string(&self, view: &RenderView<'_>) -> Tree<String> {
        let root = Tree::new(view.label(self));
        if !view.expanded.contains(&self.id) {
            return root;
        }
        // Collapsed subtrees are skipped entirely
        let leaves: Vec<_> = self
            .children
            .iter()
            .map(|c| c.to_tree_string(view))
            .collect();
        root.with_leaves(leaves)
    }
}

impl TreeNodeConvert for Forest {
    #[instrument(level = "trace", skip_all)]
    fn to_tree_string(&self, view: &RenderView<'_>) -> Tree<String> {
        let leaves: Vec<_> = self
            .roots()
            .iter()
            .map(|node| node.to_tree_string(view))
            .collect();
        Tree::new(FOREST_ROOT_LABEL.to_string()).with_leaves(leaves)
    }
}
