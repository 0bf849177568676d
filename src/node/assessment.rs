use super::{ButtonOverrides, Node};
use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use std::fs;

/// The top-level, read-only definition of an assessment.
///
/// One `Assessment` is shared by every run; each run records its own
/// [`AssessmentResult`](crate::result::AssessmentResult).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub nodes: Vec<Node>,
    #[serde(flatten)]
    pub buttons: ButtonOverrides,
}

impl Assessment {
    pub fn new(identifier: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            identifier: identifier.into(),
            version_string: None,
            schema_identifier: None,
            title: None,
            nodes,
            buttons: ButtonOverrides::default(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version_string = Some(version.into());
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads an assessment definition from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, DecodeError> {
        let content = fs::read_to_string(path).map_err(|e| DecodeError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }

    /// Depth-first search for a node anywhere in the definition.
    pub fn find_node(&self, identifier: &str) -> Option<&Node> {
        fn search<'n>(nodes: &'n [Node], identifier: &str) -> Option<&'n Node> {
            nodes.iter().find_map(|node| {
                if node.identifier == identifier {
                    Some(node)
                } else {
                    node.as_section()
                        .and_then(|section| search(&section.nodes, identifier))
                }
            })
        }
        search(&self.nodes, identifier)
    }
}
