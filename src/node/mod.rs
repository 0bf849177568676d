//! The immutable assessment definition: steps, questions and sections.

use crate::result::{AnswerResult, BasicResult, BranchNodeResult, ResultData};
use crate::rules::{self, SkipTarget, SurveyRule};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod answer;
mod assessment;
mod buttons;

pub use answer::*;
pub use assessment::*;
pub use buttons::*;

/// A single configuration unit of an assessment.
///
/// The `type` field of the JSON form selects the [`NodeKind`]; the remaining common
/// fields apply to every kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_node: Option<SkipTarget>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub full_instructions_only: bool,
    #[serde(flatten)]
    pub buttons: ButtonOverrides,
    #[serde(flatten)]
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeKind {
    Instruction(ContentStep),
    Overview(ContentStep),
    Question(QuestionStep),
    Section(SectionNode),
    Completion(ContentStep),
}

/// Text-only content shown to the participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub answer_type: AnswerType,
    /// Evaluated in order; the first match decides the jump.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub survey_rules: Vec<SurveyRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ChoiceOption>,
    #[serde(default = "default_optional")]
    pub optional: bool,
}

fn default_optional() -> bool {
    true
}

/// A nested, independently navigable list of nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub nodes: Vec<Node>,
}

impl Node {
    fn with_kind(identifier: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            identifier: identifier.into(),
            next_node: None,
            full_instructions_only: false,
            buttons: ButtonOverrides::default(),
            kind,
        }
    }

    pub fn instruction(identifier: impl Into<String>) -> Self {
        Self::with_kind(identifier, NodeKind::Instruction(ContentStep::default()))
    }

    pub fn overview(identifier: impl Into<String>) -> Self {
        Self::with_kind(identifier, NodeKind::Overview(ContentStep::default()))
    }

    pub fn completion(identifier: impl Into<String>) -> Self {
        Self::with_kind(identifier, NodeKind::Completion(ContentStep::default()))
    }

    pub fn question(identifier: impl Into<String>, answer_type: AnswerType) -> Self {
        Self::with_kind(
            identifier,
            NodeKind::Question(QuestionStep {
                title: None,
                answer_type,
                survey_rules: Vec::new(),
                choices: Vec::new(),
                optional: true,
            }),
        )
    }

    pub fn section(identifier: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self::with_kind(identifier, NodeKind::Section(SectionNode { title: None, nodes }))
    }

    /// Replaces the survey rules of a question. Has no effect on other kinds.
    pub fn with_rules(mut self, rules: Vec<SurveyRule>) -> Self {
        if let NodeKind::Question(question) = &mut self.kind {
            question.survey_rules = rules;
        }
        self
    }

    pub fn with_next_node(mut self, target: impl Into<SkipTarget>) -> Self {
        self.next_node = Some(target.into());
        self
    }

    pub fn with_full_instructions_only(mut self) -> Self {
        self.full_instructions_only = true;
        self
    }

    pub fn hiding(mut self, action: ButtonAction) -> Self {
        if !self.buttons.hides(action) {
            self.buttons.should_hide_actions.push(action);
        }
        self
    }

    pub fn with_button_title(mut self, action: ButtonAction, title: impl Into<String>) -> Self {
        self.buttons.actions.insert(
            action,
            ButtonActionInfo {
                button_title: Some(title.into()),
            },
        );
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn as_question(&self) -> Option<&QuestionStep> {
        match &self.kind {
            NodeKind::Question(question) => Some(question),
            _ => None,
        }
    }

    pub fn as_section(&self) -> Option<&SectionNode> {
        match &self.kind {
            NodeKind::Section(section) => Some(section),
            _ => None,
        }
    }

    pub fn is_completion(&self) -> bool {
        matches!(self.kind, NodeKind::Completion(_))
    }

    /// Instruction and overview steps carry no participant data.
    pub fn is_instructional(&self) -> bool {
        matches!(self.kind, NodeKind::Instruction(_) | NodeKind::Overview(_))
    }

    pub fn hides(&self, action: ButtonAction) -> bool {
        self.buttons.hides(action)
    }

    /// Resolves where this node sends navigation, if it overrides sequential order.
    ///
    /// Questions evaluate their survey rules against the answer recorded in
    /// `branch_result`, unless `is_peeking` is set. The direct `next_node` pointer is
    /// the fallback when no rule fires.
    pub fn next_node_identifier(
        &self,
        branch_result: &BranchNodeResult,
        is_peeking: bool,
    ) -> Option<&SkipTarget> {
        if !is_peeking {
            if let NodeKind::Question(question) = &self.kind {
                let answer = branch_result.answer_value(&self.identifier);
                if let Some(target) = rules::evaluate(&question.survey_rules, answer) {
                    return Some(target);
                }
            }
        }
        self.next_node.as_ref()
    }

    /// Creates the empty result recorded when this node is first shown.
    pub fn create_result(&self, start_date: DateTime<Utc>) -> ResultData {
        match &self.kind {
            NodeKind::Question(question) => ResultData::Answer(AnswerResult::new(
                &self.identifier,
                question.answer_type.clone(),
                start_date,
            )),
            NodeKind::Section(_) => {
                ResultData::Section(BranchNodeResult::new(&self.identifier, start_date))
            }
            NodeKind::Instruction(_) | NodeKind::Overview(_) | NodeKind::Completion(_) => {
                ResultData::Base(BasicResult::new(&self.identifier, start_date))
            }
        }
    }
}
