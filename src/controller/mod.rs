//! Drives a run through an assessment, one navigation level at a time.

use crate::clock::{Clock, SystemClock};
use crate::error::AssessmentError;
use crate::navigator::{NodeNavigator, Progress};
use crate::node::{Assessment, ButtonAction, ButtonOverrides, Node, NodeKind, SectionNode};
use crate::result::{
    AssessmentResult, BranchNodeResult, NavigationDirection, PathMarker, ResultData, RunMetadata,
};
use serde_json::Value;
use tracing::{debug, info, warn};

mod builder;
mod status;

pub use builder::ControllerBuilder;
pub use status::{AssessmentStatus, ButtonState};

/// One active level of the traversal: a navigator over a node list and the result
/// recording what was shown in it.
#[derive(Debug, Clone)]
struct TraversalFrame<'a> {
    /// The section node this level belongs to; `None` for the assessment itself.
    section: Option<&'a Node>,
    navigator: NodeNavigator<'a>,
    result: BranchNodeResult,
    /// A leaf step in the innermost frame, the entered section node in outer frames.
    current: Option<&'a Node>,
}

impl TraversalFrame<'_> {
    fn is_resuming_at(&self, node: &Node) -> bool {
        self.current.is_none()
            && self.result.last_marker().is_some_and(|marker| {
                marker.identifier == node.identifier
                    && marker.direction != NavigationDirection::Exit
            })
    }
}

/// Orchestrates navigation through an assessment and its nested sections.
///
/// The controller keeps a stack of traversal frames. Moving onto a section pushes a
/// frame scoped to the section's children; exhausting a section pops it and folds its
/// result into the parent's history.
///
/// Navigation errors are terminal: the status becomes [`AssessmentStatus::Error`] and
/// every later navigation call returns the retained error.
pub struct AssessmentController<'a, C: Clock = SystemClock> {
    assessment: &'a Assessment,
    clock: C,
    show_full_instructions: bool,
    status: AssessmentStatus,
    error: Option<AssessmentError>,
    has_partial_results: bool,
    run: RunMetadata,
    seed: BranchNodeResult,
    frames: Vec<TraversalFrame<'a>>,
}

impl<'a> AssessmentController<'a, SystemClock> {
    pub fn builder(assessment: &'a Assessment) -> ControllerBuilder<'a, SystemClock> {
        ControllerBuilder::new(assessment)
    }
}

impl<'a, C: Clock> AssessmentController<'a, C> {
    pub(crate) fn new(
        assessment: &'a Assessment,
        clock: C,
        show_full_instructions: bool,
        seed: AssessmentResult,
    ) -> Self {
        Self {
            assessment,
            clock,
            show_full_instructions,
            status: AssessmentStatus::NotStarted,
            error: None,
            has_partial_results: false,
            run: seed.run,
            seed: seed.branch,
            frames: Vec::new(),
        }
    }

    /// Builds the top-level navigator and moves onto the first (or restored) step.
    pub fn initialize(&mut self) -> Result<(), AssessmentError> {
        if self.status != AssessmentStatus::NotStarted {
            return Err(AssessmentError::NotRunning {
                status: self.status,
            });
        }

        let assessment = self.assessment;
        let navigator = match NodeNavigator::new(&assessment.nodes) {
            Ok(navigator) => navigator,
            Err(e) => return Err(self.fail(e.into())),
        };
        self.has_partial_results = has_left_answer_steps(&assessment.nodes, &self.seed);
        self.frames.push(TraversalFrame {
            section: None,
            navigator,
            result: self.seed.clone(),
            current: None,
        });

        info!(
            assessment = %self.assessment.identifier,
            run = %self.run.task_run_uuid,
            restored = !self.seed.path.is_empty(),
            "assessment started"
        );
        self.set_status(AssessmentStatus::Running);
        self.go_forward()
    }

    /// Leaves the current step and moves to the next one, entering and exiting
    /// sections as needed.
    pub fn go_forward(&mut self) -> Result<(), AssessmentError> {
        self.ensure_navigable()?;
        self.advance().map_err(|e| self.fail(e))
    }

    /// Moves back to the previously shown step. At the first step of the run this is
    /// a no-op.
    pub fn go_back(&mut self) -> Result<(), AssessmentError> {
        self.ensure_navigable()?;
        let saved_frames = self.frames.clone();
        let saved_partial = self.has_partial_results;
        match self.retreat() {
            Ok(true) => Ok(()),
            Ok(false) => {
                debug!("no earlier step to go back to");
                self.frames = saved_frames;
                self.has_partial_results = saved_partial;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Pauses the run. Not allowed on the first step or once the run is complete.
    pub fn pause(&mut self) -> Result<(), AssessmentError> {
        self.ensure_navigable()?;
        if !self.can_pause() {
            return Err(AssessmentError::CannotPause);
        }
        self.set_status(AssessmentStatus::Paused);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), AssessmentError> {
        if self.status != AssessmentStatus::Paused {
            return Err(AssessmentError::NotRunning {
                status: self.status,
            });
        }
        let status = self.settled_status();
        self.set_status(status);
        Ok(())
    }

    /// Opts the run into showing full instructions and resumes it if paused.
    pub fn review_instructions(&mut self) -> Result<(), AssessmentError> {
        if !self.status.is_navigable() && self.status != AssessmentStatus::Paused {
            return Err(AssessmentError::NotRunning {
                status: self.status,
            });
        }
        self.show_full_instructions = true;
        let status = self.settled_status();
        self.set_status(status);
        Ok(())
    }

    pub fn skip_assessment(&mut self) -> Result<(), AssessmentError> {
        self.transition_out(AssessmentStatus::Declined)
    }

    pub fn exit_assessment(&mut self) -> Result<(), AssessmentError> {
        self.transition_out(AssessmentStatus::ContinueLater)
    }

    /// Records an answer on the current step. Does not navigate.
    pub fn set_answer(&mut self, value: Value) -> Result<(), AssessmentError> {
        self.ensure_navigable()?;
        let result = self
            .current_result_mut()
            .ok_or(AssessmentError::NoCurrentStep)?;
        let identifier = result.identifier().to_string();
        let answer = result
            .as_answer_mut()
            .ok_or_else(|| AssessmentError::NotAnAnswerStep {
                identifier: identifier.clone(),
            })?;
        answer.set_value(value)?;
        debug!(step = %identifier, "answer recorded");
        Ok(())
    }

    pub fn assessment(&self) -> &'a Assessment {
        self.assessment
    }

    pub fn status(&self) -> AssessmentStatus {
        self.status
    }

    /// The error that halted the run, if any.
    pub fn error(&self) -> Option<&AssessmentError> {
        self.error.as_ref()
    }

    /// `true` once any non-instructional step has been left.
    pub fn has_partial_results(&self) -> bool {
        self.has_partial_results
    }

    pub fn shows_full_instructions(&self) -> bool {
        self.show_full_instructions
    }

    /// Number of active traversal frames; `1` at the assessment's own level.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The section nodes enclosing the current step, outermost first.
    pub fn section_path(&self) -> Vec<&'a Node> {
        self.frames.iter().filter_map(|frame| frame.section).collect()
    }

    pub fn current_node(&self) -> Option<&'a Node> {
        self.frames.last().and_then(|frame| frame.current)
    }

    pub fn current_result(&self) -> Option<&ResultData> {
        let frame = self.frames.last()?;
        frame.result.find_step(&frame.current?.identifier)
    }

    pub fn current_result_mut(&mut self) -> Option<&mut ResultData> {
        let frame = self.frames.last_mut()?;
        let identifier = &frame.current?.identifier;
        frame.result.find_step_mut(identifier)
    }

    pub fn back_enabled(&self) -> bool {
        if self.current_node().is_none() || self.button(ButtonAction::GoBackward).hidden {
            return false;
        }
        self.frames.iter().any(|frame| {
            frame.current.is_some_and(|node| {
                frame
                    .navigator
                    .previous_node(Some(node), &frame.result)
                    .is_some()
            })
        })
    }

    /// Whether anything follows the current step at any level, ignoring survey rules.
    pub fn has_step_after(&self) -> bool {
        self.frames.iter().any(|frame| {
            frame
                .current
                .is_some_and(|node| frame.navigator.has_node_after(node, &frame.result))
        })
    }

    pub fn can_pause(&self) -> bool {
        let Some(top) = self.frames.first() else {
            return false;
        };
        top.current
            .is_some_and(|node| top.navigator.can_pause_assessment(node, &top.result))
            && !self.is_completed()
    }

    /// Progress within the innermost node list.
    pub fn progress(&self) -> Option<Progress> {
        let frame = self.frames.last()?;
        frame.current.map(|node| frame.navigator.progress(node))
    }

    pub fn is_completed(&self) -> bool {
        self.current_node()
            .is_some_and(|node| node.is_completion() && !self.back_enabled())
    }

    /// Resolves a button override for the current step.
    ///
    /// The current step is consulted first, then each enclosing section from the
    /// innermost outwards, then the assessment. The first owner that mentions the
    /// action decides.
    pub fn button(&self, action: ButtonAction) -> ButtonState {
        let owners = self
            .current_node()
            .into_iter()
            .chain(self.frames.iter().rev().filter_map(|frame| frame.section))
            .map(|node| (node.identifier.as_str(), &node.buttons))
            .chain(std::iter::once((
                self.assessment.identifier.as_str(),
                &self.assessment.buttons,
            )));

        for (owner, overrides) in owners {
            if overrides.mentions(action) {
                return Self::button_state(action, owner, overrides);
            }
        }
        ButtonState {
            action,
            hidden: false,
            title: None,
            owner: None,
        }
    }

    fn button_state(action: ButtonAction, owner: &str, overrides: &ButtonOverrides) -> ButtonState {
        ButtonState {
            action,
            hidden: overrides.hides(action),
            title: overrides.title(action).map(str::to_string),
            owner: Some(owner.to_string()),
        }
    }

    /// A snapshot of the whole result tree, with the results of any open sections
    /// folded into their parents.
    pub fn assessment_result(&self) -> AssessmentResult {
        let branch = self
            .frames
            .iter()
            .rev()
            .fold(None::<BranchNodeResult>, |child, frame| {
                let mut result = frame.result.clone();
                if let Some(child) = child {
                    result.replace_step(ResultData::Section(child));
                }
                Some(result)
            })
            .unwrap_or_else(|| self.seed.clone());

        AssessmentResult {
            branch,
            run: self.run.clone(),
        }
    }

    fn advance(&mut self) -> Result<(), AssessmentError> {
        self.leave_current_step();
        loop {
            let frame = self.active_frame()?;
            let point = frame.navigator.node_after(frame.current, &frame.result)?;
            match point.node {
                Some(node) if self.should_skip(node) => {
                    debug!(step = %node.identifier, "skipping full-instructions-only step");
                    self.active_frame_mut()?.current = Some(node);
                }
                Some(node) => match &node.kind {
                    NodeKind::Section(section) => {
                        self.enter_section(node, section, NavigationDirection::Forward)?
                    }
                    _ => {
                        self.enter_step(node, NavigationDirection::Forward)?;
                        return Ok(());
                    }
                },
                None => {
                    let frame = self.active_frame_mut()?;
                    if point.direction == NavigationDirection::Exit {
                        if let Some(current) = frame.current {
                            frame.result.push_path_marker(PathMarker::new(
                                &current.identifier,
                                NavigationDirection::Exit,
                            ));
                        }
                    }
                    if self.frames.len() == 1 {
                        self.finish();
                        return Ok(());
                    }
                    self.exit_section()?;
                }
            }
        }
    }

    /// Returns `false` if there is no earlier step anywhere in the stack.
    fn retreat(&mut self) -> Result<bool, AssessmentError> {
        self.leave_current_step();
        loop {
            let frame = self.active_frame()?;
            let point = frame.navigator.node_before(frame.current, &frame.result);
            match point.node {
                Some(node) if self.should_skip(node) => {
                    debug!(step = %node.identifier, "skipping full-instructions-only step");
                    self.active_frame_mut()?.current = Some(node);
                }
                Some(node) => match &node.kind {
                    NodeKind::Section(section) => {
                        self.enter_section(node, section, NavigationDirection::Backward)?
                    }
                    _ => {
                        self.enter_step(node, NavigationDirection::Backward)?;
                        return Ok(true);
                    }
                },
                None if self.frames.len() == 1 => return Ok(false),
                None => self.exit_section()?,
            }
        }
    }

    fn enter_step(
        &mut self,
        node: &'a Node,
        direction: NavigationDirection,
    ) -> Result<(), AssessmentError> {
        let now = self.clock.now();
        let frame = self.active_frame_mut()?;
        let resuming = direction == NavigationDirection::Forward && frame.is_resuming_at(node);

        let result = match frame.result.find_step(&node.identifier) {
            Some(previous) => {
                let mut result = previous.clone();
                if !resuming {
                    result.set_start_date(now);
                }
                result.set_end_date(None);
                result
            }
            None => node.create_result(now),
        };
        if resuming {
            frame.result.replace_step(result);
        } else {
            frame.result.append_step_history(result, direction);
        }
        frame.current = Some(node);

        debug!(step = %node.identifier, %direction, resuming, "moved to step");
        let status = self.settled_status();
        self.set_status(status);
        Ok(())
    }

    fn enter_section(
        &mut self,
        node: &'a Node,
        section: &'a SectionNode,
        direction: NavigationDirection,
    ) -> Result<(), AssessmentError> {
        let navigator = NodeNavigator::new(&section.nodes)?;
        let now = self.clock.now();
        let parent = self.active_frame_mut()?;
        let resuming = direction == NavigationDirection::Forward && parent.is_resuming_at(node);

        // A forward entry starts the section over; only a resume or a backward
        // entry picks up the recorded branch.
        let previous = parent
            .result
            .find_step(&node.identifier)
            .and_then(ResultData::as_branch);
        let mut result = match previous {
            Some(previous) if resuming => previous.clone(),
            Some(previous) if direction == NavigationDirection::Backward => {
                let mut result = previous.clone();
                result.start_date = now;
                result
            }
            _ => BranchNodeResult::new(&node.identifier, now),
        };
        result.end_date = None;

        let entry = ResultData::Section(result.clone());
        if resuming {
            parent.result.replace_step(entry);
        } else {
            parent.result.append_step_history(entry, direction);
        }
        parent.current = Some(node);

        self.frames.push(TraversalFrame {
            section: Some(node),
            navigator,
            result,
            current: None,
        });
        debug!(section = %node.identifier, depth = self.frames.len(), %direction, "entered section");
        Ok(())
    }

    fn exit_section(&mut self) -> Result<(), AssessmentError> {
        let mut child = self.frames.pop().ok_or(AssessmentError::NoCurrentStep)?;
        child.result.end_date = Some(self.clock.now());
        debug!(section = %child.result.identifier, depth = self.frames.len(), "left section");

        let parent = self.active_frame_mut()?;
        parent.result.replace_step(ResultData::Section(child.result));
        Ok(())
    }

    fn leave_current_step(&mut self) {
        let Some(current) = self.current_node() else {
            return;
        };
        let now = self.clock.now();
        if let Some(result) = self.current_result_mut() {
            result.set_end_date(Some(now));
        }
        if !current.is_instructional() {
            self.has_partial_results = true;
        }
    }

    fn finish(&mut self) {
        let now = self.clock.now();
        if let Some(top) = self.frames.first_mut() {
            top.current = None;
            top.result.end_date = Some(now);
        }
        self.set_status(AssessmentStatus::Finished);
    }

    fn should_skip(&self, node: &Node) -> bool {
        node.full_instructions_only && !self.show_full_instructions
    }

    /// `ReadyToSave` when a top-level completion step with no way back is showing.
    fn settled_status(&self) -> AssessmentStatus {
        let at_final_completion = self.frames.len() == 1
            && self
                .current_node()
                .is_some_and(|node| node.is_completion() && !self.back_enabled());
        if at_final_completion {
            AssessmentStatus::ReadyToSave
        } else {
            AssessmentStatus::Running
        }
    }

    fn transition_out(&mut self, status: AssessmentStatus) -> Result<(), AssessmentError> {
        if self.status == AssessmentStatus::Error {
            return Err(self.retained_error());
        }
        self.set_status(status);
        Ok(())
    }

    fn ensure_navigable(&self) -> Result<(), AssessmentError> {
        match self.status {
            status if status.is_navigable() => Ok(()),
            AssessmentStatus::Error => Err(self.retained_error()),
            status => Err(AssessmentError::NotRunning { status }),
        }
    }

    fn retained_error(&self) -> AssessmentError {
        self.error.clone().unwrap_or(AssessmentError::NotRunning {
            status: self.status,
        })
    }

    fn fail(&mut self, error: AssessmentError) -> AssessmentError {
        warn!(error = %error, "assessment halted");
        self.error = Some(error.clone());
        self.set_status(AssessmentStatus::Error);
        error
    }

    fn set_status(&mut self, status: AssessmentStatus) {
        if self.status != status {
            info!(from = %self.status, to = %status, "assessment status changed");
            self.status = status;
        }
    }

    fn active_frame(&self) -> Result<&TraversalFrame<'a>, AssessmentError> {
        self.frames.last().ok_or(AssessmentError::NoCurrentStep)
    }

    fn active_frame_mut(&mut self) -> Result<&mut TraversalFrame<'a>, AssessmentError> {
        self.frames.last_mut().ok_or(AssessmentError::NoCurrentStep)
    }
}

/// Whether `branch` records a finished step that carries participant data.
fn has_left_answer_steps(nodes: &[Node], branch: &BranchNodeResult) -> bool {
    branch.path_history.iter().any(|result| {
        let Some(node) = nodes.iter().find(|n| n.identifier == result.identifier()) else {
            return false;
        };
        match (&node.kind, result) {
            (NodeKind::Section(section), ResultData::Section(child)) => {
                has_left_answer_steps(&section.nodes, child)
            }
            _ => result.end_date().is_some() && !node.is_instructional(),
        }
    })
}
