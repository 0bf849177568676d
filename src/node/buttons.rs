use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The navigation buttons a host UI can show around a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ButtonAction {
    GoForward,
    GoBackward,
    Skip,
    Cancel,
    Pause,
    ReviewInstructions,
}

impl fmt::Display for ButtonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ButtonAction::GoForward => "goForward",
            ButtonAction::GoBackward => "goBackward",
            ButtonAction::Skip => "skip",
            ButtonAction::Cancel => "cancel",
            ButtonAction::Pause => "pause",
            ButtonAction::ReviewInstructions => "reviewInstructions",
        };
        write!(f, "{}", name)
    }
}

/// Label override for a single button.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonActionInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_title: Option<String>,
}

/// Per-node button visibility and label overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonOverrides {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub actions: BTreeMap<ButtonAction, ButtonActionInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub should_hide_actions: Vec<ButtonAction>,
}

impl ButtonOverrides {
    pub fn hides(&self, action: ButtonAction) -> bool {
        self.should_hide_actions.contains(&action)
    }

    pub fn title(&self, action: ButtonAction) -> Option<&str> {
        self.actions
            .get(&action)
            .and_then(|info| info.button_title.as_deref())
    }

    /// Returns `true` if this set says anything about `action`.
    pub fn mentions(&self, action: ButtonAction) -> bool {
        self.hides(action) || self.actions.contains_key(&action)
    }
}
