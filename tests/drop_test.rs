//! Drop semantics through the controller: commits, rejections, tree invariants.

use std::collections::HashMap;

use rstest::{fixture, rstest};

use layertree::application::{move_node, DragController};
use layertree::domain::{
    Destination, DropPosition, DropRejection, DropTarget, Forest, Node, NodeId, NodeRef,
    PointerSample, Rect,
};
use layertree::util::testing;

fn dump(forest: &Forest<()>) -> String {
    fn walk(nodes: &[NodeRef<()>], out: &mut Vec<String>) {
        for node in nodes {
            match &node.children {
                Some(children) => {
                    let mut inner = Vec::new();
                    walk(children, &mut inner);
                    out.push(format!("{}[{}]", node.id, inner.join(", ")));
                }
                None => out.push(node.id.to_string()),
            }
        }
    }
    let mut out = Vec::new();
    walk(forest.roots(), &mut out);
    format!("[{}]", out.join(", "))
}

/// Parent id and sibling count for every group, root level under "".
fn sibling_counts(forest: &Forest<()>) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    counts.insert(String::new(), forest.roots().len());
    for (_, node) in forest.iter() {
        if node.is_group() {
            counts.insert(node.id.to_string(), node.children().len());
        }
    }
    counts
}

fn row_at(relative_y: f64) -> PointerSample {
    let bounds = Rect::new(0.0, 40.0, 240.0, 24.0);
    PointerSample::new(bounds, 80.0, bounds.top + relative_y * bounds.height)
}

// [A[B, C], D]
#[fixture]
fn abcd() -> Forest<()> {
    testing::init_test_setup();
    Forest::new(vec![
        Node::group("A", (), vec![Node::leaf("B", ()), Node::leaf("C", ())]),
        Node::leaf("D", ()),
    ])
    .unwrap()
}

// ============================================================
// Reference scenarios
// ============================================================

#[rstest]
fn given_d_hovering_top_of_b_when_dropping_then_lands_before_b_inside_a(abcd: Forest<()>) {
    let mut ctl = DragController::new(abcd);
    ctl.begin_drag("D".into());
    ctl.hover(&"B".into(), &row_at(0.1));
    assert_eq!(ctl.session().drop_position(), DropPosition::Before);

    let moved = ctl.drop_on(&DropTarget::parse("B")).unwrap();

    assert_eq!(dump(ctl.forest()), "[A[D, B, C]]");
    assert_eq!(
        moved.destination,
        Destination {
            parent: Some("A".into()),
            index: 0
        }
    );
    assert!(ctl.session().is_idle());
}

#[rstest]
fn given_group_dragged_onto_own_child_when_dropping_then_rejects_and_keeps_tree(
    abcd: Forest<()>,
) {
    let mut ctl = DragController::new(abcd.clone());
    ctl.begin_drag("A".into());
    ctl.hover(&"B".into(), &row_at(0.1));

    let result = ctl.drop_on(&DropTarget::parse("B"));

    assert_eq!(
        result,
        Err(DropRejection::InvalidDescendantDrop {
            dragged: "A".into(),
            target: "B".into()
        })
    );
    assert_eq!(ctl.forest(), &abcd);
    assert!(ctl.session().is_idle());
}

#[rstest]
fn given_nested_node_when_dropping_on_main_level_then_appends_to_root(abcd: Forest<()>) {
    let mut ctl = DragController::new(abcd);
    ctl.begin_drag("C".into());
    ctl.hover_main_level();

    let moved = ctl.drop_on(&DropTarget::parse("__main_level__")).unwrap();

    assert_eq!(dump(ctl.forest()), "[A[B], D, C]");
    assert_eq!(
        moved.destination,
        Destination {
            parent: None,
            index: 2
        }
    );
}

#[rstest]
fn given_empty_group_when_dropping_in_middle_then_nests_inside() {
    let forest = Forest::new(vec![Node::group("A", (), vec![]), Node::leaf("D", ())]).unwrap();
    let mut ctl = DragController::new(forest);
    ctl.begin_drag("D".into());
    ctl.hover(&"A".into(), &row_at(0.5));
    assert_eq!(ctl.session().drop_position(), DropPosition::Inside);

    ctl.drop_on(&DropTarget::parse("A")).unwrap();

    assert_eq!(dump(ctl.forest()), "[A[D]]");
    assert!(ctl.forest().roots()[0].expanded);
}

// ============================================================
// Rejections
// ============================================================

#[rstest]
#[case("A")]
#[case("B")]
#[case("D")]
fn given_node_dropped_on_itself_when_dropping_then_rejects(abcd: Forest<()>, #[case] id: &str) {
    let mut ctl = DragController::new(abcd.clone());
    ctl.begin_drag(id.into());
    assert_eq!(
        ctl.drop_on(&DropTarget::parse(id)),
        Err(DropRejection::InvalidSelfDrop(id.into()))
    );
    assert_eq!(ctl.forest(), &abcd);
}

#[rstest]
fn given_unknown_target_when_dropping_then_path_not_found(abcd: Forest<()>) {
    let mut ctl = DragController::new(abcd.clone());
    ctl.begin_drag("D".into());
    assert_eq!(
        ctl.drop_on(&DropTarget::parse("ghost")),
        Err(DropRejection::PathNotFound("ghost".into()))
    );
    assert_eq!(ctl.forest(), &abcd);
}

#[rstest]
fn given_dragged_node_removed_externally_when_dropping_then_path_not_found(abcd: Forest<()>) {
    let mut ctl = DragController::new(abcd.clone());
    ctl.begin_drag("C".into());
    ctl.hover(&"D".into(), &row_at(0.9));

    let (without_c, _) = abcd.remove_at_path(&abcd.find_path(&"C".into()).unwrap());
    ctl.replace_forest(without_c.clone());

    assert_eq!(
        ctl.drop_on(&DropTarget::parse("D")),
        Err(DropRejection::PathNotFound("C".into()))
    );
    assert_eq!(ctl.forest(), &without_c);
}

#[rstest]
fn given_inside_position_on_layer_when_moving_then_unsupported_insert_target(abcd: Forest<()>) {
    let result = move_node(
        &abcd,
        &"D".into(),
        &DropTarget::parse("B"),
        DropPosition::Inside,
    );
    assert_eq!(
        result.map(|_| ()),
        Err(DropRejection::UnsupportedInsertTarget("B".into()))
    );
}

#[rstest]
fn given_layer_when_dropping_at_end_of_layer_then_unsupported_insert_target(abcd: Forest<()>) {
    let mut ctl = DragController::new(abcd.clone());
    ctl.begin_drag("B".into());
    assert_eq!(
        ctl.drop_at_end(&"D".into()),
        Err(DropRejection::UnsupportedInsertTarget("D".into()))
    );
    assert_eq!(ctl.forest(), &abcd);
}

#[rstest]
fn given_cancelled_drag_when_dropping_later_then_no_active_drag(abcd: Forest<()>) {
    let mut ctl = DragController::new(abcd);
    ctl.begin_drag("D".into());
    ctl.hover(&"A".into(), &row_at(0.5));
    ctl.end_drag();
    assert!(ctl.session().is_idle());
    assert_eq!(
        ctl.drop_on(&DropTarget::parse("A")),
        Err(DropRejection::NoActiveDrag)
    );
}

// ============================================================
// Drop at end
// ============================================================

#[rstest]
fn given_pointer_suggesting_before_when_dropping_at_end_then_appends_to_group(abcd: Forest<()>) {
    let mut ctl = DragController::new(abcd);
    ctl.begin_drag("D".into());
    ctl.hover(&"B".into(), &row_at(0.1));

    let moved = ctl.drop_at_end(&"A".into()).unwrap();

    assert_eq!(dump(ctl.forest()), "[A[B, C, D]]");
    assert_eq!(moved.destination.index, 2);
}

#[rstest]
fn given_sibling_moved_within_group_when_dropping_at_end_then_reresolves_group(
    abcd: Forest<()>,
) {
    // B already lives in A: it is taken out first, then appended.
    let mut ctl = DragController::new(abcd);
    ctl.begin_drag("B".into());
    let moved = ctl.drop_at_end(&"A".into()).unwrap();
    assert_eq!(dump(ctl.forest()), "[A[C, B], D]");
    assert_eq!(moved.destination.index, 1);
}

// ============================================================
// Tree invariants
// ============================================================

fn every_pair() -> Vec<(&'static str, &'static str, DropPosition)> {
    let ids = ["A", "B", "C", "D"];
    let positions = [DropPosition::Before, DropPosition::After, DropPosition::Inside];
    let mut pairs = Vec::new();
    for dragged in ids {
        for target in ids {
            for position in positions {
                pairs.push((dragged, target, position));
            }
        }
    }
    pairs
}

#[rstest]
fn given_any_drop_when_applied_then_nodes_are_neither_lost_nor_duplicated(abcd: Forest<()>) {
    let mut expected_ids = abcd.order();
    expected_ids.sort();

    for (dragged, target, position) in every_pair() {
        let result = move_node(&abcd, &dragged.into(), &DropTarget::parse(target), position);
        if let Ok((moved, destination)) = result {
            let mut ids = moved.order();
            ids.sort();
            assert_eq!(ids, expected_ids, "{dragged} -> {target} ({position})");
            assert_eq!(moved.destination_of(&dragged.into()), Some(destination));
        }
    }
}

#[rstest]
fn given_valid_drop_when_applied_then_other_groups_keep_their_sizes(abcd: Forest<()>) {
    // D moves before B: only the root level and A change size.
    let before = sibling_counts(&abcd);
    let (moved, _) = move_node(
        &abcd,
        &"D".into(),
        &DropTarget::parse("B"),
        DropPosition::Before,
    )
    .unwrap();
    let after = sibling_counts(&moved);
    assert_eq!(after[""], before[""] - 1);
    assert_eq!(after["A"], before["A"] + 1);
}

#[rstest]
fn given_rejected_drop_when_repeated_then_tree_is_identical_each_time(abcd: Forest<()>) {
    let mut ctl = DragController::new(abcd.clone());
    for _ in 0..3 {
        ctl.begin_drag("A".into());
        ctl.hover(&"C".into(), &row_at(0.9));
        assert!(ctl.drop_on(&DropTarget::parse("C")).is_err());
        assert_eq!(ctl.forest(), &abcd);
    }
}

#[rstest]
fn given_drop_after_later_sibling_when_dragged_comes_first_then_index_accounts_for_removal() {
    // [X, Y, Z]: X after Z -> [Y, Z, X]; the target path shifts from /2 to /1.
    let forest = Forest::new(vec![
        Node::leaf("X", ()),
        Node::leaf("Y", ()),
        Node::leaf("Z", ()),
    ])
    .unwrap();
    let (moved, destination) = move_node(
        &forest,
        &NodeId::from("X"),
        &DropTarget::parse("Z"),
        DropPosition::After,
    )
    .unwrap();
    assert_eq!(dump(&moved), "[Y, Z, X]");
    assert_eq!(destination.index, 2);
}
