use super::BranchNodeResult;
use crate::error::DecodeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one run of an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    #[serde(rename = "taskRunUUID")]
    pub task_run_uuid: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_identifier: Option<String>,
}

/// The top-level result of a run, persisted and restored wholesale by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    #[serde(flatten)]
    pub branch: BranchNodeResult,
    #[serde(flatten)]
    pub run: RunMetadata,
}

impl AssessmentResult {
    pub fn new(
        identifier: impl Into<String>,
        start_date: DateTime<Utc>,
        run: RunMetadata,
    ) -> Self {
        Self {
            branch: BranchNodeResult::new(identifier, start_date),
            run,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.branch.identifier
    }

    pub fn from_json_str(json: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, DecodeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
