//! Tests for node-list navigation: next/previous resolution, peeking and restore.
mod common;
use common::*;
use serde_json::{Value, json};
use stepwise::prelude::*;
use stepwise::result::NavigationDirection::{Backward, Exit, Forward};

fn answered(identifier: &str, answer_type: AnswerType, value: Value) -> ResultData {
    let clock = ticking_clock();
    let mut answer = AnswerResult::new(identifier, answer_type, clock.now());
    answer
        .set_value(value)
        .expect("fixture answer should fit its type");
    ResultData::Answer(answer)
}

fn ids(nodes: &[&str]) -> Vec<Node> {
    nodes.iter().map(|id| Node::instruction(*id)).collect()
}

#[test]
fn test_construction_rejects_duplicate_identifiers() {
    let nodes = ids(&["A", "B", "A"]);
    let err = NodeNavigator::new(&nodes).expect_err("duplicate identifiers must fail");
    assert_eq!(
        err,
        ConfigurationError::DuplicateIdentifier {
            identifier: "A".to_string()
        }
    );

    let unique = ids(&["A", "B", "C"]);
    let navigator = NodeNavigator::new(&unique).expect("unique identifiers are valid");
    assert_eq!(navigator.nodes().len(), 3);
    assert_eq!(navigator.node("B").map(Node::identifier), Some("B"));
    assert!(navigator.node("Z").is_none());
}

#[test]
fn test_duplicates_are_checked_per_list() {
    // The same identifier may appear in a nested list without clashing.
    let nodes = vec![
        Node::instruction("A"),
        Node::section("B", vec![Node::instruction("A")]),
    ];
    assert!(NodeNavigator::new(&nodes).is_ok());
}

#[test]
fn test_sequential_forward_navigation() {
    let nodes = ids(&["A", "B", "C"]);
    let navigator = NodeNavigator::new(&nodes).unwrap();
    let result = BranchNodeResult::new("branch", ticking_clock().now());

    let first = navigator.node_after(None, &result).unwrap();
    assert_eq!(first.node.map(Node::identifier), Some("A"));
    assert_eq!(first.direction, Forward);

    let second = navigator.node_after(Some(&nodes[0]), &result).unwrap();
    assert_eq!(second.node.map(Node::identifier), Some("B"));

    let end = navigator.node_after(Some(&nodes[2]), &result).unwrap();
    assert!(end.node.is_none());
    assert_eq!(end.direction, Forward);
}

#[test]
fn test_empty_list_has_no_first_node() {
    let nodes: Vec<Node> = Vec::new();
    let navigator = NodeNavigator::new(&nodes).unwrap();
    let result = BranchNodeResult::new("branch", ticking_clock().now());
    assert!(navigator.node_after(None, &result).unwrap().node.is_none());
}

#[test]
fn test_rules_take_precedence_over_pointer() {
    let nodes = vec![
        Node::question("Q", AnswerType::Integer)
            .with_rules(vec![SurveyRule::equal(json!(1), "C")])
            .with_next_node("D"),
        Node::instruction("B"),
        Node::instruction("C"),
        Node::instruction("D"),
    ];
    let navigator = NodeNavigator::new(&nodes).unwrap();

    let mut result = BranchNodeResult::new("branch", ticking_clock().now());
    let unanswered = navigator.node_after(Some(&nodes[0]), &result).unwrap();
    assert_eq!(unanswered.node.map(Node::identifier), Some("D"));

    result.append_step_history(answered("Q", AnswerType::Integer, json!(1)), Forward);
    let matched = navigator.node_after(Some(&nodes[0]), &result).unwrap();
    assert_eq!(matched.node.map(Node::identifier), Some("C"));

    result.replace_step(answered("Q", AnswerType::Integer, json!(2)));
    let fallback = navigator.node_after(Some(&nodes[0]), &result).unwrap();
    assert_eq!(fallback.node.map(Node::identifier), Some("D"));
}

#[test]
fn test_rule_jump_to_earlier_node_is_forward() {
    let nodes = loop_nodes();
    let navigator = NodeNavigator::new(&nodes).unwrap();
    let mut result = branch_with_path(&[("Q0", Forward), ("Q1", Forward), ("Q3", Forward)]);
    result.replace_step(answered("Q3", AnswerType::String, json!("again")));

    let point = navigator.node_after(Some(&nodes[3]), &result).unwrap();
    assert_eq!(point.node.map(Node::identifier), Some("Q1"));
    assert_eq!(point.direction, Forward);
}

#[test]
fn test_exit_target_ends_the_branch() {
    let nodes = vec![
        Node::question("Q", AnswerType::Boolean)
            .with_rules(vec![SurveyRule::equal(json!(true), "exit")]),
        Node::instruction("B"),
    ];
    let navigator = NodeNavigator::new(&nodes).unwrap();
    let mut result = BranchNodeResult::new("branch", ticking_clock().now());
    result.append_step_history(answered("Q", AnswerType::Boolean, json!(true)), Forward);

    let point = navigator.node_after(Some(&nodes[0]), &result).unwrap();
    assert!(point.node.is_none());
    assert_eq!(point.direction, Exit);
}

#[test]
fn test_unknown_target_is_a_navigation_error() {
    let nodes = vec![
        Node::instruction("A").with_next_node("ghost"),
        Node::instruction("B"),
    ];
    let navigator = NodeNavigator::new(&nodes).unwrap();
    let result = BranchNodeResult::new("branch", ticking_clock().now());

    let err = navigator
        .node_after(Some(&nodes[0]), &result)
        .expect_err("an unknown pointer must fail");
    assert_eq!(
        err,
        NavigationError::UnknownIdentifier {
            identifier: "ghost".to_string(),
            source_node_id: "A".to_string(),
        }
    );
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn test_current_node_outside_list_is_an_error() {
    let nodes = ids(&["A", "B"]);
    let navigator = NodeNavigator::new(&nodes).unwrap();
    let result = BranchNodeResult::new("branch", ticking_clock().now());
    let stranger = Node::instruction("stranger");

    let err = navigator.node_after(Some(&stranger), &result).unwrap_err();
    assert_eq!(
        err,
        NavigationError::NodeNotInList {
            identifier: "stranger".to_string()
        }
    );
}

#[test]
fn test_peeking_ignores_rules_and_does_not_mutate() {
    let nodes = vec![
        Node::question("Q", AnswerType::Boolean).with_rules(vec![SurveyRule::always("exit")]),
        Node::instruction("B"),
    ];
    let navigator = NodeNavigator::new(&nodes).unwrap();
    let mut result = BranchNodeResult::new("branch", ticking_clock().now());
    result.append_step_history(answered("Q", AnswerType::Boolean, json!(true)), Forward);
    let before = result.clone();

    assert!(navigator.has_node_after(&nodes[0], &result));
    assert_eq!(result, before);

    // Actually moving does apply the rule.
    let point = navigator.node_after(Some(&nodes[0]), &result).unwrap();
    assert_eq!(point.direction, Exit);
}

#[test]
fn test_peeking_follows_pointers_and_list_end() {
    let nodes = vec![
        Node::instruction("A").with_next_node("C"),
        Node::instruction("B").with_next_node("exit"),
        Node::instruction("C"),
        Node::instruction("D").with_next_node("ghost"),
    ];
    let navigator = NodeNavigator::new(&nodes).unwrap();
    let result = BranchNodeResult::new("branch", ticking_clock().now());

    assert!(navigator.has_node_after(&nodes[0], &result));
    assert!(!navigator.has_node_after(&nodes[1], &result));
    assert!(navigator.has_node_after(&nodes[2], &result));
    assert!(!navigator.has_node_after(&nodes[3], &result));
}

#[test]
fn test_restore_resumes_at_last_marker() {
    let nodes = ids(&["A", "B", "C"]);
    let navigator = NodeNavigator::new(&nodes).unwrap();

    let result = branch_with_path(&[("A", Forward), ("B", Forward)]);
    let point = navigator.node_after(None, &result).unwrap();
    assert_eq!(point.node.map(Node::identifier), Some("B"));
    assert_eq!(point.direction, Forward);

    // A backward marker still names the node to resume at.
    let result = branch_with_path(&[("A", Forward), ("B", Forward), ("A", Backward)]);
    let point = navigator.node_after(None, &result).unwrap();
    assert_eq!(point.node.map(Node::identifier), Some("A"));
    assert_eq!(point.direction, Forward);
}

#[test]
fn test_restore_ignores_trailing_exit_marker() {
    let nodes = ids(&["A", "B", "C"]);
    let navigator = NodeNavigator::new(&nodes).unwrap();
    let result = branch_with_path(&[("A", Forward), ("B", Forward), ("B", Exit)]);

    // The branch was left early, so there is no step to resume at.
    let point = navigator.node_after(None, &result).unwrap();
    assert_eq!(point.node.map(Node::identifier), Some("A"));
}

#[test]
fn test_previous_node_uses_list_order_without_path() {
    let nodes = ids(&["A", "B", "C"]);
    let navigator = NodeNavigator::new(&nodes).unwrap();
    let result = BranchNodeResult::new("branch", ticking_clock().now());

    assert_eq!(
        navigator
            .previous_node(Some(&nodes[1]), &result)
            .map(Node::identifier),
        Some("A")
    );
    assert!(navigator.previous_node(Some(&nodes[0]), &result).is_none());
}

#[test]
fn test_previous_node_without_current_is_last_history_entry() {
    let nodes = ids(&["A", "B", "C"]);
    let navigator = NodeNavigator::new(&nodes).unwrap();
    let result = branch_with_path(&[("A", Forward), ("B", Forward)]);

    let point = navigator.node_before(None, &result);
    assert_eq!(point.node.map(Node::identifier), Some("B"));
    assert_eq!(point.direction, Backward);
}

#[test]
fn test_previous_node_follows_skips() {
    let nodes = ids(&["A", "B", "C", "D"]);
    let navigator = NodeNavigator::new(&nodes).unwrap();
    let result = branch_with_path(&[("A", Forward), ("D", Forward)]);

    assert_eq!(
        navigator
            .previous_node(Some(&nodes[3]), &result)
            .map(Node::identifier),
        Some("A")
    );
}

#[test]
fn test_back_navigation_through_a_loop_does_not_bounce() {
    let nodes = loop_nodes();
    let navigator = NodeNavigator::new(&nodes).unwrap();
    let (q1, q3) = (&nodes[1], &nodes[3]);

    let mut result = branch_with_path(&[
        ("Q0", Forward),
        ("Q1", Forward),
        ("Q3", Forward),
        ("Q1", Forward),
        ("Q3", Forward),
    ]);

    let back_from_q3 = navigator.previous_node(Some(q3), &result);
    assert_eq!(back_from_q3.map(Node::identifier), Some("Q1"));

    result.push_path_marker(PathMarker::new("Q1", Backward));
    let back_from_q1 = navigator.previous_node(Some(q1), &result);
    assert_eq!(back_from_q1.map(Node::identifier), Some("Q0"));
}

#[test]
fn test_back_navigation_capabilities() {
    let nodes = vec![
        Node::instruction("A"),
        Node::instruction("B").hiding(ButtonAction::GoBackward),
        Node::instruction("C"),
        Node::completion("done"),
    ];
    let navigator = NodeNavigator::new(&nodes).unwrap();
    let result = branch_with_path(&[("A", Forward), ("B", Forward), ("C", Forward)]);

    assert!(!navigator.allow_back_navigation(&nodes[0], &result));
    assert!(!navigator.allow_back_navigation(&nodes[1], &result));
    assert!(navigator.allow_back_navigation(&nodes[2], &result));
}

#[test]
fn test_progress_is_estimated() {
    let nodes = ids(&["A", "B", "C", "D", "E"]);
    let navigator = NodeNavigator::new(&nodes).unwrap();

    assert_eq!(
        navigator.progress(&nodes[2]),
        Progress {
            current: 2,
            total: 5,
            is_estimated: true,
        }
    );
}

#[test]
fn test_pause_and_completion() {
    let nodes = vec![
        Node::instruction("intro"),
        Node::question("Q", AnswerType::String),
        Node::completion("done").hiding(ButtonAction::GoBackward),
    ];
    let navigator = NodeNavigator::new(&nodes).unwrap();
    let result = branch_with_path(&[("intro", Forward), ("Q", Forward), ("done", Forward)]);

    assert!(!navigator.can_pause_assessment(&nodes[0], &result));
    assert!(navigator.can_pause_assessment(&nodes[1], &result));
    assert!(!navigator.can_pause_assessment(&nodes[2], &result));

    assert!(navigator.is_completed(&nodes[2], &result));
    assert!(!navigator.is_completed(&nodes[1], &result));

    // A completion step that can still go back is not final.
    let open_ended = vec![Node::instruction("intro"), Node::completion("done")];
    let navigator = NodeNavigator::new(&open_ended).unwrap();
    let result = branch_with_path(&[("intro", Forward), ("done", Forward)]);
    assert!(!navigator.is_completed(&open_ended[1], &result));
}
