use crate::controller::AssessmentStatus;
use thiserror::Error;

/// Errors raised while building a navigator from a node list.
///
/// These are fatal: a definition that fails here can never be navigated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Node identifier '{identifier}' appears more than once in the same node list")]
    DuplicateIdentifier { identifier: String },
}

/// Errors that can occur while resolving the next or previous node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error(
        "Node '{identifier}' not found, which is required by a rule or pointer on node '{source_node_id}'"
    )]
    UnknownIdentifier {
        identifier: String,
        source_node_id: String,
    },

    #[error("Node '{identifier}' is not part of the node list being navigated")]
    NodeNotInList { identifier: String },
}

/// Errors that can occur when decoding JSON-shaped nodes, results or answers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Failed to decode JSON: {0}")]
    Json(String),

    #[error("Could not read file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Answer for '{identifier}' does not match answer type {expected}: found '{found}'")]
    AnswerTypeMismatch {
        identifier: String,
        expected: String,
        found: String,
    },
}

impl From<serde_json::Error> for DecodeError {
    fn from(value: serde_json::Error) -> Self {
        DecodeError::Json(value.to_string())
    }
}

/// Errors surfaced by the assessment controller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssessmentError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("The assessment is not running (status: {status:?})")]
    NotRunning { status: AssessmentStatus },

    #[error("The assessment cannot be paused at this step")]
    CannotPause,

    #[error("There is no current step")]
    NoCurrentStep,

    #[error("Step '{identifier}' does not record an answer")]
    NotAnAnswerStep { identifier: String },
}
