//! Unit tests for the definition and result building blocks.
mod common;
use chrono::Duration;
use common::*;
use serde_json::json;
use stepwise::prelude::*;
use stepwise::result::BasicResult;

#[test]
fn test_answer_type_accepts() {
    assert!(AnswerType::Integer.accepts(&json!(3)));
    assert!(!AnswerType::Integer.accepts(&json!(3.5)));
    assert!(AnswerType::Number.accepts(&json!(3.5)));
    assert!(AnswerType::Boolean.accepts(&json!(false)));
    assert!(!AnswerType::String.accepts(&json!(1)));
    assert!(AnswerType::Object.accepts(&json!({ "systolic": 120 })));

    let multi = AnswerType::Array {
        base_type: BaseType::String,
    };
    assert!(multi.accepts(&json!(["a", "b"])));
    assert!(multi.accepts(&json!([])));
    assert!(!multi.accepts(&json!(["a", 1])));
    assert!(!multi.accepts(&json!("a")));

    // Clearing an answer is always allowed.
    assert!(AnswerType::Integer.accepts(&json!(null)));
}

#[test]
fn test_answer_result_value() {
    let clock = ticking_clock();
    let mut answer = AnswerResult::new("Q", AnswerType::Number, clock.now());
    assert!(answer.value().is_none());

    answer.set_value(json!(1.5)).unwrap();
    assert_eq!(answer.value(), Some(&json!(1.5)));

    let err = answer.set_value(json!("1.5")).unwrap_err();
    assert_eq!(
        err,
        DecodeError::AnswerTypeMismatch {
            identifier: "Q".to_string(),
            expected: "number".to_string(),
            found: "\"1.5\"".to_string(),
        }
    );
    // A rejected answer leaves the previous one in place.
    assert_eq!(answer.value(), Some(&json!(1.5)));

    answer.set_value(json!(null)).unwrap();
    assert!(answer.value().is_none());
}

#[test]
fn test_step_history_replaces_in_place() {
    let clock = ticking_clock();
    let mut branch = BranchNodeResult::new("branch", clock.now());
    branch.append_step_history(
        ResultData::Base(BasicResult::new("A", clock.now())),
        NavigationDirection::Forward,
    );
    branch.append_step_history(
        ResultData::Base(BasicResult::new("B", clock.now())),
        NavigationDirection::Forward,
    );
    let revisit = ResultData::Base(BasicResult::new("A", clock.now()));
    branch.append_step_history(revisit.clone(), NavigationDirection::Backward);

    assert_eq!(history_ids(&branch), vec!["A", "B"]);
    assert_eq!(branch.find_step("A"), Some(&revisit));
    assert_eq!(branch.path.len(), 3);
    assert_eq!(
        branch.last_marker(),
        Some(&PathMarker::new("A", NavigationDirection::Backward))
    );
}

#[test]
fn test_input_results_are_keyed_by_identifier() {
    let clock = ticking_clock();
    let mut branch = BranchNodeResult::new("branch", clock.now());
    branch.append_input_result(ResultData::Base(BasicResult::new("device", clock.now())));
    branch.append_input_result(ResultData::Base(BasicResult::new("device", clock.now())));
    branch.append_input_result(ResultData::Base(BasicResult::new("locale", clock.now())));

    assert_eq!(branch.input_results.len(), 2);
    assert!(branch.path.is_empty());
    assert!(branch.path_history.is_empty());
}

#[test]
fn test_answer_lookup_ignores_other_result_kinds() {
    let clock = ticking_clock();
    let mut branch = BranchNodeResult::new("branch", clock.now());
    branch.replace_step(ResultData::Base(BasicResult::new("intro", clock.now())));
    assert!(branch.answer_value("intro").is_none());
    assert!(branch.answer_value("missing").is_none());
}

#[test]
fn test_stepping_clock_advances_per_reading() {
    let clock = SteppingClock::new(chrono::DateTime::<chrono::Utc>::UNIX_EPOCH, Duration::minutes(5));
    let first = clock.now();
    let second = clock.now();
    assert_eq!(second - first, Duration::minutes(5));

    let borrowed = &clock;
    assert_eq!(borrowed.now() - second, Duration::minutes(5));
}

#[test]
fn test_node_helpers() {
    let node = Node::question("Q", AnswerType::Boolean)
        .hiding(ButtonAction::Pause)
        .hiding(ButtonAction::Pause);
    assert_eq!(node.buttons.should_hide_actions, vec![ButtonAction::Pause]);
    assert!(!node.is_instructional());
    assert!(Node::overview("O").is_instructional());
    assert!(Node::completion("C").is_completion());

    // Rules only apply to questions.
    let instruction = Node::instruction("I").with_rules(vec![SurveyRule::always("exit")]);
    let branch = BranchNodeResult::new("branch", ticking_clock().now());
    assert!(instruction.next_node_identifier(&branch, false).is_none());

    let created = Node::section("S", Vec::new()).create_result(ticking_clock().now());
    assert!(matches!(created, ResultData::Section(_)));
    let created = Node::question("Q", AnswerType::String).create_result(ticking_clock().now());
    assert!(created.as_answer().is_some_and(|a| a.value().is_none()));
}

#[test]
fn test_display_names() {
    assert_eq!(format!("{}", AssessmentStatus::ContinueLater), "continueLater");
    assert_eq!(format!("{}", AssessmentStatus::ReadyToSave), "readyToSave");
    assert_eq!(format!("{}", NavigationDirection::Backward), "backward");
    assert_eq!(format!("{}", ButtonAction::ReviewInstructions), "reviewInstructions");
    assert_eq!(format!("{}", AnswerType::Integer), "integer");
    assert!(AssessmentStatus::ReadyToSave.is_navigable());
    assert!(!AssessmentStatus::Paused.is_navigable());
}

#[test]
fn test_error_messages() {
    let err = AssessmentError::from(NavigationError::UnknownIdentifier {
        identifier: "Q9".to_string(),
        source_node_id: "Q1".to_string(),
    });
    assert_eq!(
        err.to_string(),
        "Navigation error: Node 'Q9' not found, which is required by a rule or pointer on node 'Q1'"
    );

    let err = AssessmentError::from(ConfigurationError::DuplicateIdentifier {
        identifier: "A".to_string(),
    });
    assert!(err.to_string().contains("'A' appears more than once"));
}
