//! The mutable record of a run: timestamps, answers and traversal history.

use crate::error::DecodeError;
use crate::node::AnswerType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

mod assessment;
mod branch;

pub use assessment::*;
pub use branch::*;

/// Any recorded outcome, discriminated by the `type` field of its JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ResultData {
    Base(BasicResult),
    Answer(AnswerResult),
    Section(BranchNodeResult),
    Assessment(AssessmentResult),
}

impl ResultData {
    pub fn identifier(&self) -> &str {
        match self {
            ResultData::Base(r) => &r.identifier,
            ResultData::Answer(r) => &r.identifier,
            ResultData::Section(r) => &r.identifier,
            ResultData::Assessment(r) => &r.branch.identifier,
        }
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        match self {
            ResultData::Base(r) => r.start_date,
            ResultData::Answer(r) => r.start_date,
            ResultData::Section(r) => r.start_date,
            ResultData::Assessment(r) => r.branch.start_date,
        }
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        match self {
            ResultData::Base(r) => r.end_date,
            ResultData::Answer(r) => r.end_date,
            ResultData::Section(r) => r.end_date,
            ResultData::Assessment(r) => r.branch.end_date,
        }
    }

    pub fn set_start_date(&mut self, date: DateTime<Utc>) {
        match self {
            ResultData::Base(r) => r.start_date = date,
            ResultData::Answer(r) => r.start_date = date,
            ResultData::Section(r) => r.start_date = date,
            ResultData::Assessment(r) => r.branch.start_date = date,
        }
    }

    pub fn set_end_date(&mut self, date: Option<DateTime<Utc>>) {
        match self {
            ResultData::Base(r) => r.end_date = date,
            ResultData::Answer(r) => r.end_date = date,
            ResultData::Section(r) => r.end_date = date,
            ResultData::Assessment(r) => r.branch.end_date = date,
        }
    }

    pub fn as_answer(&self) -> Option<&AnswerResult> {
        match self {
            ResultData::Answer(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_answer_mut(&mut self) -> Option<&mut AnswerResult> {
        match self {
            ResultData::Answer(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_branch(&self) -> Option<&BranchNodeResult> {
        match self {
            ResultData::Section(r) => Some(r),
            ResultData::Assessment(r) => Some(&r.branch),
            _ => None,
        }
    }
}

/// A result that only records when a step was shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicResult {
    pub identifier: String,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl BasicResult {
    pub fn new(identifier: impl Into<String>, start_date: DateTime<Utc>) -> Self {
        Self {
            identifier: identifier.into(),
            start_date,
            end_date: None,
        }
    }
}

/// The answer given to a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub identifier: String,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_type: Option<AnswerType>,
    /// `null` means the question has not been answered yet.
    #[serde(default)]
    pub json_value: Value,
}

impl AnswerResult {
    pub fn new(
        identifier: impl Into<String>,
        answer_type: AnswerType,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            start_date,
            end_date: None,
            answer_type: Some(answer_type),
            json_value: Value::Null,
        }
    }

    /// The answer, or `None` when nothing has been recorded yet.
    pub fn value(&self) -> Option<&Value> {
        if self.json_value.is_null() {
            None
        } else {
            Some(&self.json_value)
        }
    }

    /// Records an answer after checking it against the answer type, if one is known.
    pub fn set_value(&mut self, value: Value) -> Result<(), DecodeError> {
        if let Some(answer_type) = &self.answer_type {
            if !answer_type.accepts(&value) {
                return Err(DecodeError::AnswerTypeMismatch {
                    identifier: self.identifier.clone(),
                    expected: answer_type.to_string(),
                    found: value.to_string(),
                });
            }
        }
        self.json_value = value;
        Ok(())
    }
}
