use super::ResultData;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The direction of one traversal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavigationDirection {
    Forward,
    Backward,
    /// A rule ended the branch early.
    Exit,
}

impl fmt::Display for NavigationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationDirection::Forward => write!(f, "forward"),
            NavigationDirection::Backward => write!(f, "backward"),
            NavigationDirection::Exit => write!(f, "exit"),
        }
    }
}

/// One entry of the append-only traversal log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathMarker {
    pub identifier: String,
    pub direction: NavigationDirection,
}

impl PathMarker {
    pub fn new(identifier: impl Into<String>, direction: NavigationDirection) -> Self {
        Self {
            identifier: identifier.into(),
            direction,
        }
    }
}

/// The result scope of one navigation level: an assessment or a nested section.
///
/// `path_history` holds one result per identifier in the order first shown; a
/// revisit replaces the entry in place. `path` keeps every traversal step,
/// duplicates included, and is what backward navigation and resuming rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchNodeResult {
    pub identifier: String,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub path_history: Vec<ResultData>,
    #[serde(default)]
    pub path: Vec<PathMarker>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_results: Vec<ResultData>,
}

impl BranchNodeResult {
    pub fn new(identifier: impl Into<String>, start_date: DateTime<Utc>) -> Self {
        Self {
            identifier: identifier.into(),
            start_date,
            end_date: None,
            path_history: Vec::new(),
            path: Vec::new(),
            input_results: Vec::new(),
        }
    }

    /// Records that `result`'s node was shown, moving in `direction`.
    ///
    /// An existing entry with the same identifier is replaced in place; a marker is
    /// always appended to `path`.
    pub fn append_step_history(&mut self, result: ResultData, direction: NavigationDirection) {
        self.path
            .push(PathMarker::new(result.identifier(), direction));
        self.replace_step(result);
    }

    pub fn push_path_marker(&mut self, marker: PathMarker) {
        self.path.push(marker);
    }

    /// Replaces the history entry with the same identifier, or appends it.
    /// Does not touch `path`.
    pub fn replace_step(&mut self, result: ResultData) {
        match self
            .path_history
            .iter()
            .position(|r| r.identifier() == result.identifier())
        {
            Some(index) => self.path_history[index] = result,
            None => self.path_history.push(result),
        }
    }

    /// Adds an auxiliary result, replacing any with the same identifier.
    pub fn append_input_result(&mut self, result: ResultData) {
        match self
            .input_results
            .iter()
            .position(|r| r.identifier() == result.identifier())
        {
            Some(index) => self.input_results[index] = result,
            None => self.input_results.push(result),
        }
    }

    pub fn find_step(&self, identifier: &str) -> Option<&ResultData> {
        self.path_history
            .iter()
            .find(|r| r.identifier() == identifier)
    }

    pub fn find_step_mut(&mut self, identifier: &str) -> Option<&mut ResultData> {
        self.path_history
            .iter_mut()
            .find(|r| r.identifier() == identifier)
    }

    /// The recorded answer for a question in this branch, if any.
    pub fn answer_value(&self, identifier: &str) -> Option<&Value> {
        self.find_step(identifier)
            .and_then(ResultData::as_answer)
            .and_then(|answer| answer.value())
    }

    pub fn step_identifiers(&self) -> Vec<&str> {
        self.path_history.iter().map(ResultData::identifier).collect()
    }

    pub fn last_marker(&self) -> Option<&PathMarker> {
        self.path.last()
    }
}
