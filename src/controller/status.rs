use crate::node::ButtonAction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssessmentStatus {
    NotStarted,
    Running,
    Paused,
    /// The participant chose not to take the assessment.
    Declined,
    /// The participant left and intends to resume later.
    ContinueLater,
    /// A completion step with no way back is showing; the result can be saved.
    ReadyToSave,
    Finished,
    Error,
}

impl AssessmentStatus {
    /// Statuses in which forward and backward navigation are accepted.
    pub fn is_navigable(&self) -> bool {
        matches!(self, AssessmentStatus::Running | AssessmentStatus::ReadyToSave)
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssessmentStatus::NotStarted => "notStarted",
            AssessmentStatus::Running => "running",
            AssessmentStatus::Paused => "paused",
            AssessmentStatus::Declined => "declined",
            AssessmentStatus::ContinueLater => "continueLater",
            AssessmentStatus::ReadyToSave => "readyToSave",
            AssessmentStatus::Finished => "finished",
            AssessmentStatus::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// The resolved visibility and label of one button for the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonState {
    pub action: ButtonAction,
    pub hidden: bool,
    pub title: Option<String>,
    /// Identifier of the node (or assessment) whose override applies, if any.
    pub owner: Option<String>,
}
