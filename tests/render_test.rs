//! Tests for termtree rendering

use std::collections::HashSet;

use tocedit::config::RenderConfig;
use tocedit::domain::{Forest, Node, NodeId};
use tocedit::tree_traits::{RenderView, TreeNodeConvert};

fn sample() -> Forest {
    Forest::from(vec![
        Node::new("1", "A").with_children(vec![
            Node::new("1-1", "B").with_children(vec![Node::new("1-1-1", "C")]),
        ]),
        Node::new("2", "D"),
    ])
}

#[test]
fn given_collapsed_parent_when_rendering_then_children_hidden() {
    let expanded = HashSet::new();
    let config = RenderConfig::default();
    let view = RenderView::new(&expanded, &config);

    let text = sample().to_tree_string(&view).to_string();

    assert!(text.contains("▸ A"));
    assert!(text.contains("D"));
    assert!(!text.contains("B"));
}

#[test]
fn given_partially_expanded_when_rendering_then_shows_one_level() {
    let expanded: HashSet<NodeId> = [NodeId::from("1")].into_iter().collect();
    let config = RenderConfig::default();
    let view = RenderView::new(&expanded, &config);

    let text = sample().to_tree_string(&view).to_string();

    assert!(text.contains("▾ A"));
    assert!(text.contains("▸ B"));
    assert!(!text.contains("C"));
}

#[test]
fn given_show_ids_when_rendering_then_appends_ids() {
    let expanded: HashSet<NodeId> = ["1", "1-1"].into_iter().map(NodeId::from).collect();
    let config = RenderConfig {
        show_ids: true,
        ..RenderConfig::default()
    };
    let view = RenderView::new(&expanded, &config);

    let text = sample().to_tree_string(&view).to_string();

    assert!(text.contains("C [1-1-1]"));
    assert!(text.contains("D [2]"));
    // leaves carry no marker
    assert!(!text.contains("▸ C"));
}
