//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the stepwise
//! crate. Import this module to get access to the core functionality without having
//! to import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use stepwise::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let assessment = Assessment::from_file("path/to/assessment.json")?;
//! let mut controller = AssessmentController::builder(&assessment)
//!     .show_full_instructions(true)
//!     .build();
//! controller.initialize()?;
//!
//! while controller.status() == AssessmentStatus::Running {
//!     controller.go_forward()?;
//! }
//! println!("Finished with status {}", controller.status());
//! # Ok(())
//! # }
//! ```

// Navigation
pub use crate::controller::{AssessmentController, AssessmentStatus, ButtonState};
pub use crate::navigator::{NavigationPoint, NodeNavigator, Progress};

// Definition model
pub use crate::node::{
    AnswerType, Assessment, BaseType, ButtonAction, ChoiceOption, Node, NodeKind, QuestionStep,
    SectionNode,
};
pub use crate::rules::{RuleOperator, SkipTarget, SurveyRule};

// Result model
pub use crate::result::{
    AnswerResult, AssessmentResult, BranchNodeResult, NavigationDirection, PathMarker,
    ResultData,
};

// Time sources
pub use crate::clock::{Clock, SteppingClock, SystemClock};

// Error types
pub use crate::error::{AssessmentError, ConfigurationError, DecodeError, NavigationError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
