use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::trace;

mod compare;

pub use compare::compare;

/// Reserved skip target that ends the enclosing branch early.
pub const EXIT_IDENTIFIER: &str = "exit";

/// Where a rule or direct pointer sends navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SkipTarget {
    /// Leave the branch that owns the node.
    Exit,
    /// Jump to the node with this identifier.
    Node(String),
}

impl From<String> for SkipTarget {
    fn from(value: String) -> Self {
        if value == EXIT_IDENTIFIER {
            SkipTarget::Exit
        } else {
            SkipTarget::Node(value)
        }
    }
}

impl From<&str> for SkipTarget {
    fn from(value: &str) -> Self {
        SkipTarget::from(value.to_string())
    }
}

impl From<SkipTarget> for String {
    fn from(value: SkipTarget) -> Self {
        match value {
            SkipTarget::Exit => EXIT_IDENTIFIER.to_string(),
            SkipTarget::Node(identifier) => identifier,
        }
    }
}

impl fmt::Display for SkipTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipTarget::Exit => write!(f, "{}", EXIT_IDENTIFIER),
            SkipTarget::Node(identifier) => write!(f, "{}", identifier),
        }
    }
}

/// Comparison applied between a recorded answer and a rule's matching value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleOperator {
    #[serde(rename = "eq")]
    Equal,
    #[serde(rename = "ne")]
    NotEqual,
    #[serde(rename = "lt")]
    LessThan,
    #[serde(rename = "le")]
    LessThanOrEqual,
    #[serde(rename = "gt")]
    GreaterThan,
    #[serde(rename = "ge")]
    GreaterThanOrEqual,
    #[serde(rename = "always")]
    Always,
}

impl RuleOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            RuleOperator::Equal => "==",
            RuleOperator::NotEqual => "!=",
            RuleOperator::LessThan => "<",
            RuleOperator::LessThanOrEqual => "<=",
            RuleOperator::GreaterThan => ">",
            RuleOperator::GreaterThanOrEqual => ">=",
            RuleOperator::Always => "*",
        }
    }
}

/// A conditional skip instruction attached to a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyRule {
    pub skip_to_identifier: SkipTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_answer: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_operator: Option<RuleOperator>,
}

impl SurveyRule {
    /// A rule that always fires.
    pub fn always(target: impl Into<SkipTarget>) -> Self {
        Self {
            skip_to_identifier: target.into(),
            matching_answer: None,
            rule_operator: None,
        }
    }

    /// A rule that fires when the answer equals `matching`.
    pub fn equal(matching: Value, target: impl Into<SkipTarget>) -> Self {
        Self::comparing(RuleOperator::Equal, matching, target)
    }

    pub fn comparing(
        operator: RuleOperator,
        matching: Value,
        target: impl Into<SkipTarget>,
    ) -> Self {
        Self {
            skip_to_identifier: target.into(),
            matching_answer: Some(matching),
            rule_operator: Some(operator),
        }
    }

    /// The operator this rule actually applies.
    ///
    /// A rule without a matching value always fires; a matching value without an
    /// explicit operator compares for equality.
    pub fn effective_operator(&self) -> RuleOperator {
        match (&self.matching_answer, self.rule_operator) {
            (None, _) => RuleOperator::Always,
            (Some(_), None) => RuleOperator::Equal,
            (Some(_), Some(op)) => op,
        }
    }

    /// Returns `true` if this rule fires for the given answer.
    pub fn matches(&self, answer: Option<&Value>) -> bool {
        match (self.effective_operator(), &self.matching_answer) {
            (RuleOperator::Always, _) => true,
            (op, Some(matching)) => match answer {
                Some(value) if !value.is_null() => compare(value, op, matching),
                _ => false,
            },
            (_, None) => true,
        }
    }
}

/// Evaluates `rules` in order against `answer` and returns the first match's target.
///
/// This is a pure function so it can also be used to preview where an answer would
/// send navigation without moving.
pub fn evaluate<'r>(rules: &'r [SurveyRule], answer: Option<&Value>) -> Option<&'r SkipTarget> {
    let rule = rules.iter().find(|rule| rule.matches(answer))?;
    trace!(
        operator = rule.effective_operator().symbol(),
        target = %rule.skip_to_identifier,
        "survey rule matched"
    );
    Some(&rule.skip_to_identifier)
}
