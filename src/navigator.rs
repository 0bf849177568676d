//! Next/previous node resolution for one node list.

use crate::error::{ConfigurationError, NavigationError};
use crate::node::{ButtonAction, Node};
use crate::result::{BranchNodeResult, NavigationDirection, PathMarker};
use crate::rules::SkipTarget;
use ahash::AHashMap;
use itertools::Itertools;
use serde::Serialize;

/// The outcome of a navigation query: the node to show (if any) and the direction
/// the move is recorded with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationPoint<'a> {
    pub node: Option<&'a Node>,
    pub direction: NavigationDirection,
}

impl<'a> NavigationPoint<'a> {
    fn forward(node: Option<&'a Node>) -> Self {
        Self {
            node,
            direction: NavigationDirection::Forward,
        }
    }
}

/// Position within a node list. Always estimated because survey rules can shorten or
/// lengthen the realized path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    pub is_estimated: bool,
}

/// Computes navigation over an ordered list of sibling nodes.
///
/// The navigator holds no per-run state: every query takes the branch result that
/// records what has been shown so far.
#[derive(Debug, Clone)]
pub struct NodeNavigator<'a> {
    nodes: &'a [Node],
    positions: AHashMap<&'a str, usize>,
}

impl<'a> NodeNavigator<'a> {
    /// Fails if two nodes in the list share an identifier.
    pub fn new(nodes: &'a [Node]) -> Result<Self, ConfigurationError> {
        if let Some(identifier) = nodes.iter().map(Node::identifier).duplicates().next() {
            return Err(ConfigurationError::DuplicateIdentifier {
                identifier: identifier.to_string(),
            });
        }
        let positions = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.identifier(), index))
            .collect();
        Ok(Self { nodes, positions })
    }

    pub fn nodes(&self) -> &'a [Node] {
        self.nodes
    }

    pub fn node(&self, identifier: &str) -> Option<&'a Node> {
        self.index_of(identifier).map(|index| &self.nodes[index])
    }

    fn index_of(&self, identifier: &str) -> Option<usize> {
        self.positions.get(identifier).copied()
    }

    fn require_index(&self, node: &Node) -> Result<usize, NavigationError> {
        self.index_of(node.identifier())
            .ok_or_else(|| NavigationError::NodeNotInList {
                identifier: node.identifier.clone(),
            })
    }

    /// The node to show after `current`.
    ///
    /// With no current node, resumes at the node named by the last path marker, or
    /// starts at the first node. Rule and pointer jumps are always reported as forward,
    /// even when the target sits earlier in the list.
    pub fn node_after(
        &self,
        current: Option<&Node>,
        branch_result: &BranchNodeResult,
    ) -> Result<NavigationPoint<'a>, NavigationError> {
        let Some(current) = current else {
            let restored = branch_result
                .last_marker()
                .filter(|marker| marker.direction != NavigationDirection::Exit)
                .and_then(|marker| self.node(&marker.identifier));
            return Ok(NavigationPoint::forward(restored.or(self.nodes.first())));
        };

        match current.next_node_identifier(branch_result, false) {
            Some(SkipTarget::Exit) => Ok(NavigationPoint {
                node: None,
                direction: NavigationDirection::Exit,
            }),
            Some(SkipTarget::Node(identifier)) => {
                let node =
                    self.node(identifier)
                        .ok_or_else(|| NavigationError::UnknownIdentifier {
                            identifier: identifier.clone(),
                            source_node_id: current.identifier.clone(),
                        })?;
                Ok(NavigationPoint::forward(Some(node)))
            }
            None => {
                let index = self.require_index(current)?;
                Ok(NavigationPoint::forward(self.nodes.get(index + 1)))
            }
        }
    }

    /// Whether anything follows `current`, without evaluating survey rules.
    ///
    /// Only the direct pointer and list order are considered, so the answer cannot
    /// change while the participant is still choosing an answer.
    pub fn has_node_after(&self, current: &Node, branch_result: &BranchNodeResult) -> bool {
        match current.next_node_identifier(branch_result, true) {
            Some(SkipTarget::Exit) => false,
            Some(SkipTarget::Node(identifier)) => self.index_of(identifier).is_some(),
            None => self
                .index_of(current.identifier())
                .is_some_and(|index| index + 1 < self.nodes.len()),
        }
    }

    pub fn node_before(
        &self,
        current: Option<&Node>,
        branch_result: &BranchNodeResult,
    ) -> NavigationPoint<'a> {
        NavigationPoint {
            node: self.previous_node(current, branch_result),
            direction: NavigationDirection::Backward,
        }
    }

    /// The node that was shown before `current`.
    ///
    /// Uses the path log when one exists. The predecessor of the last forward visit is
    /// returned when it sits earlier in the list; otherwise the node was reached through
    /// a loop and the predecessor of its first forward visit is used, so that going back
    /// never bounces between two nodes that revisited each other.
    pub fn previous_node(
        &self,
        current: Option<&Node>,
        branch_result: &BranchNodeResult,
    ) -> Option<&'a Node> {
        let Some(current) = current else {
            return branch_result
                .path_history
                .last()
                .and_then(|result| self.node(result.identifier()));
        };

        let current_index = self.index_of(current.identifier())?;
        if branch_result.path.is_empty() {
            return current_index
                .checked_sub(1)
                .map(|index| &self.nodes[index]);
        }

        self.previous_in_path(current, current_index, &branch_result.path, true)
    }

    fn previous_in_path(
        &self,
        current: &Node,
        current_index: usize,
        path: &[PathMarker],
        find_last: bool,
    ) -> Option<&'a Node> {
        let is_forward_visit = |marker: &PathMarker| {
            marker.identifier == current.identifier
                && marker.direction == NavigationDirection::Forward
        };
        let position = if find_last {
            path.iter().rposition(is_forward_visit)
        } else {
            path.iter().position(is_forward_visit)
        }?;

        let marker_before = &path[position.checked_sub(1)?];
        let previous_index = self.index_of(&marker_before.identifier)?;

        if previous_index < current_index || !find_last {
            Some(&self.nodes[previous_index])
        } else {
            self.previous_in_path(current, current_index, path, false)
        }
    }

    pub fn allow_back_navigation(&self, current: &Node, branch_result: &BranchNodeResult) -> bool {
        !current.hides(ButtonAction::GoBackward)
            && self.previous_node(Some(current), branch_result).is_some()
    }

    pub fn can_pause_assessment(&self, current: &Node, branch_result: &BranchNodeResult) -> bool {
        self.index_of(current.identifier())
            .is_some_and(|index| index > 0)
            && !self.is_completed(current, branch_result)
    }

    pub fn progress(&self, current: &Node) -> Progress {
        Progress {
            current: self.index_of(current.identifier()).unwrap_or(0),
            total: self.nodes.len(),
            is_estimated: true,
        }
    }

    pub fn is_completed(&self, current: &Node, branch_result: &BranchNodeResult) -> bool {
        !self.allow_back_navigation(current, branch_result) && current.is_completion()
    }
}
