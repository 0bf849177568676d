use super::AssessmentController;
use crate::clock::{Clock, SystemClock};
use crate::node::Assessment;
use crate::result::{AssessmentResult, RunMetadata};
use uuid::Uuid;

/// Configures a run before it starts.
pub struct ControllerBuilder<'a, C: Clock = SystemClock> {
    assessment: &'a Assessment,
    clock: C,
    show_full_instructions: bool,
    restored: Option<AssessmentResult>,
    task_run_uuid: Option<Uuid>,
}

impl<'a> ControllerBuilder<'a, SystemClock> {
    pub fn new(assessment: &'a Assessment) -> Self {
        Self {
            assessment,
            clock: SystemClock,
            show_full_instructions: false,
            restored: None,
            task_run_uuid: None,
        }
    }
}

impl<'a, C: Clock> ControllerBuilder<'a, C> {
    /// Shows nodes flagged `fullInstructionsOnly` instead of skipping them.
    pub fn show_full_instructions(mut self, show: bool) -> Self {
        self.show_full_instructions = show;
        self
    }

    /// Resumes a persisted run instead of starting a fresh one.
    pub fn restore(mut self, result: AssessmentResult) -> Self {
        self.restored = Some(result);
        self
    }

    /// Overrides the generated run identifier. Ignored when restoring.
    pub fn task_run_uuid(mut self, task_run_uuid: Uuid) -> Self {
        self.task_run_uuid = Some(task_run_uuid);
        self
    }

    pub fn clock<D: Clock>(self, clock: D) -> ControllerBuilder<'a, D> {
        ControllerBuilder {
            assessment: self.assessment,
            clock,
            show_full_instructions: self.show_full_instructions,
            restored: self.restored,
            task_run_uuid: self.task_run_uuid,
        }
    }

    pub fn build(self) -> AssessmentController<'a, C> {
        let seed = match self.restored {
            Some(result) => result,
            None => AssessmentResult::new(
                &self.assessment.identifier,
                self.clock.now(),
                RunMetadata {
                    task_run_uuid: self.task_run_uuid.unwrap_or_else(Uuid::new_v4),
                    version_string: self.assessment.version_string.clone(),
                    schema_identifier: self.assessment.schema_identifier.clone(),
                },
            ),
        };
        AssessmentController::new(
            self.assessment,
            self.clock,
            self.show_full_instructions,
            seed,
        )
    }
}
