//! Property tests: invariants over random operation sequences

use proptest::prelude::*;

use tocedit::domain::invariants::has_unique_ids;
use tocedit::domain::mutator::{add, delete, move_node, rename};
use tocedit::domain::{Forest, MoveRejection, Node, NodeId, Position};
use tocedit::infrastructure::codec;

#[derive(Debug, Clone)]
enum Op {
    Add { parent: Option<usize> },
    Rename { target: usize },
    Delete { target: usize },
    Move { dragged: usize, target: usize, before: bool },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => proptest::option::of(any::<usize>()).prop_map(|parent| Op::Add { parent }),
        1 => any::<usize>().prop_map(|target| Op::Rename { target }),
        1 => any::<usize>().prop_map(|target| Op::Delete { target }),
        2 => (any::<usize>(), any::<usize>(), any::<bool>())
            .prop_map(|(dragged, target, before)| Op::Move { dragged, target, before }),
    ]
}

/// Picks an existing id, or an unknown one for the slot past the end.
fn pick(forest: &Forest, index: usize) -> NodeId {
    let ids = forest.ids();
    let slot = index % (ids.len() + 1);
    ids.get(slot)
        .cloned()
        .unwrap_or_else(|| NodeId::from("ghost"))
}

/// Applies `ops` in order; every id is fresh and never reused.
fn build(ops: &[Op]) -> Forest {
    let mut forest = Forest::new();
    for (n, op) in ops.iter().enumerate() {
        forest = match op {
            Op::Add { parent } => {
                let parent = parent.map(|p| pick(&forest, p));
                add(&forest, parent.as_ref(), Node::new(format!("id{n}"), format!("t{n}")))
            }
            Op::Rename { target } => rename(&forest, &pick(&forest, *target), &format!("r{n}")),
            Op::Delete { target } => delete(&forest, &pick(&forest, *target)),
            Op::Move {
                dragged,
                target,
                before,
            } => {
                let position = if *before { Position::Before } else { Position::After };
                move_node(&forest, &pick(&forest, *dragged), &pick(&forest, *target), position)
                    .unwrap_or(forest)
            }
        };
    }
    forest
}

fn no_node_reaches_itself(forest: &Forest) -> bool {
    forest
        .iter()
        .all(|node| !node.descendant_ids().contains(&node.id))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn ids_stay_unique_and_acyclic(ops in proptest::collection::vec(op_strategy(), 0..48)) {
        let forest = build(&ops);
        prop_assert!(has_unique_ids(&forest));
        prop_assert!(no_node_reaches_itself(&forest));
        prop_assert_eq!(forest.iter().count(), forest.node_count());
    }

    #[test]
    fn move_into_own_subtree_is_rejected_without_change(
        ops in proptest::collection::vec(op_strategy(), 1..40),
        pick_dragged in any::<usize>(),
        before in any::<bool>(),
    ) {
        let forest = build(&ops);
        prop_assume!(!forest.is_empty());
        let ids = forest.ids();
        let dragged = ids[pick_dragged % ids.len()].clone();
        let node = forest.find(&dragged).unwrap();
        let mut targets: Vec<NodeId> = node.descendant_ids().into_iter().collect();
        targets.push(dragged.clone());

        let position = if before { Position::Before } else { Position::After };
        let snapshot = forest.clone();
        for target in targets {
            let result = move_node(&forest, &dragged, &target, position);
            let is_descendant_rejection =
                matches!(result, Err(MoveRejection::DescendantTarget { .. }));
            prop_assert!(is_descendant_rejection);
            prop_assert_eq!(&forest, &snapshot);
        }
    }

    #[test]
    fn accepted_moves_keep_every_node(
        ops in proptest::collection::vec(op_strategy(), 1..40),
        a in any::<usize>(),
        b in any::<usize>(),
    ) {
        let forest = build(&ops);
        prop_assume!(!forest.is_empty());
        let dragged = pick(&forest, a);
        let target = pick(&forest, b);
        if let Ok(moved) = move_node(&forest, &dragged, &target, Position::After) {
            let mut before_ids = forest.ids();
            let mut after_ids = moved.ids();
            before_ids.sort();
            after_ids.sort();
            prop_assert_eq!(before_ids, after_ids);
            // dragged now directly follows target among the same siblings
            let order = moved.ids();
            let t = order.iter().position(|i| i == &target).unwrap();
            let subtree = moved.find(&target).unwrap().subtree_len();
            prop_assert_eq!(&order[t + subtree], &dragged);
        }
    }

    #[test]
    fn delete_cascades_to_descendants(
        ops in proptest::collection::vec(op_strategy(), 1..40),
        victim in any::<usize>(),
    ) {
        let forest = build(&ops);
        prop_assume!(!forest.is_empty());
        let ids = forest.ids();
        let victim = ids[victim % ids.len()].clone();
        let node = forest.find(&victim).unwrap();
        let gone = node.descendant_ids();
        let size = node.subtree_len();

        let result = delete(&forest, &victim);

        prop_assert!(!result.contains(&victim));
        for id in &gone {
            prop_assert!(!result.contains(id));
        }
        prop_assert_eq!(result.node_count(), forest.node_count() - size);
    }

    #[test]
    fn record_shape_round_trips(ops in proptest::collection::vec(op_strategy(), 0..40)) {
        let forest = build(&ops);
        let json = codec::encode(&forest).unwrap();
        let decoded = codec::decode(&json).unwrap();
        prop_assert_eq!(decoded, forest);
    }
}
