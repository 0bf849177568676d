use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The scalar kinds an answer can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BaseType {
    String,
    Integer,
    Number,
    Boolean,
}

impl BaseType {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            BaseType::String => value.is_string(),
            BaseType::Integer => value.is_i64() || value.is_u64(),
            BaseType::Number => value.is_number(),
            BaseType::Boolean => value.is_boolean(),
        }
    }
}

/// Describes the JSON shape of a question's answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AnswerType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    #[serde(rename_all = "camelCase")]
    Array {
        base_type: BaseType,
    },
}

impl AnswerType {
    /// Returns `true` if `value` fits this descriptor. `null` (no answer yet) always fits.
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }
        match self {
            AnswerType::String => BaseType::String.accepts(value),
            AnswerType::Integer => BaseType::Integer.accepts(value),
            AnswerType::Number => BaseType::Number.accepts(value),
            AnswerType::Boolean => BaseType::Boolean.accepts(value),
            AnswerType::Object => value.is_object(),
            AnswerType::Array { base_type } => value
                .as_array()
                .is_some_and(|items| items.iter().all(|item| base_type.accepts(item))),
        }
    }
}

impl fmt::Display for AnswerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerType::String => write!(f, "string"),
            AnswerType::Integer => write!(f, "integer"),
            AnswerType::Number => write!(f, "number"),
            AnswerType::Boolean => write!(f, "boolean"),
            AnswerType::Object => write!(f, "object"),
            AnswerType::Array { base_type } => write!(f, "array<{:?}>", base_type),
        }
    }
}

/// One selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOption {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exclusive: bool,
}
