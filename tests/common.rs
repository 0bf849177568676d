//! Common test utilities for building assessment definitions.
use serde_json::json;
use stepwise::prelude::*;

/// A deterministic clock: starts at the Unix epoch and ticks one second per reading.
#[allow(dead_code)]
pub fn ticking_clock() -> SteppingClock {
    SteppingClock::per_second()
}

/// Identifiers recorded in a branch's visible history, in order.
#[allow(dead_code)]
pub fn history_ids(result: &BranchNodeResult) -> Vec<String> {
    result
        .step_identifiers()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Path markers as `(identifier, direction)` pairs.
#[allow(dead_code)]
pub fn path_of(result: &BranchNodeResult) -> Vec<(String, NavigationDirection)> {
    result
        .path
        .iter()
        .map(|marker| (marker.identifier.clone(), marker.direction))
        .collect()
}

#[allow(dead_code)]
pub fn current_id<C: Clock>(controller: &AssessmentController<'_, C>) -> Option<String> {
    controller.current_node().map(|node| node.identifier.clone())
}

/// Builds a branch result whose path holds the given forward/backward markers.
#[allow(dead_code)]
pub fn branch_with_path(markers: &[(&str, NavigationDirection)]) -> BranchNodeResult {
    let clock = ticking_clock();
    let mut result = BranchNodeResult::new("branch", clock.now());
    for (identifier, direction) in markers {
        result.append_step_history(
            ResultData::Base(stepwise::result::BasicResult::new(*identifier, clock.now())),
            *direction,
        );
    }
    result
}

/// `[intro, step1 (full instructions only), step2, step3, completion]`
#[allow(dead_code)]
pub fn instruction_assessment() -> Assessment {
    Assessment::new(
        "instructions",
        vec![
            Node::instruction("intro"),
            Node::instruction("step1").with_full_instructions_only(),
            Node::instruction("step2"),
            Node::instruction("step3"),
            Node::completion("completion"),
        ],
    )
}

/// `[A, B { X, Y, Z }, C]`
#[allow(dead_code)]
pub fn section_assessment() -> Assessment {
    Assessment::new(
        "sections",
        vec![
            Node::instruction("A"),
            Node::section(
                "B",
                vec![
                    Node::question("X", AnswerType::Boolean),
                    Node::question("Y", AnswerType::Integer),
                    Node::question("Z", AnswerType::String),
                ],
            ),
            Node::instruction("C"),
        ],
    )
}

/// `Q1` jumps to `Q3` when answered `1`; `Q3` jumps back to `Q1` when answered `"again"`.
#[allow(dead_code)]
pub fn loop_nodes() -> Vec<Node> {
    vec![
        Node::instruction("Q0"),
        Node::question("Q1", AnswerType::Integer)
            .with_rules(vec![SurveyRule::equal(json!(1), "Q3")]),
        Node::question("Q2", AnswerType::Integer),
        Node::question("Q3", AnswerType::String)
            .with_rules(vec![SurveyRule::equal(json!("again"), "Q1")]),
        Node::completion("Q4"),
    ]
}

/// A boolean question that jumps to `choiceQ1` when answered `false`.
#[allow(dead_code)]
pub fn skip_rule_assessment() -> Assessment {
    Assessment::new(
        "skipRules",
        vec![
            Node::instruction("intro"),
            Node::question("question1", AnswerType::Boolean)
                .with_rules(vec![SurveyRule::equal(json!(false), "choiceQ1")]),
            Node::question("question2", AnswerType::String),
            Node::question("question3", AnswerType::Number),
            Node::question(
                "choiceQ1",
                AnswerType::Array {
                    base_type: BaseType::String,
                },
            ),
            Node::completion("completion"),
        ],
    )
}
