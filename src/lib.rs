//! # Stepwise - Assessment Navigation Engine
//!
//! **Stepwise** drives multi-step assessments such as health questionnaires: ordered or
//! branching sequences of steps with conditional skip logic, nested sections and
//! resumable runs.
//!
//! ## Core Workflow
//!
//! 1.  **Load the definition**: Decode an [`Assessment`](node::Assessment) from JSON. The
//!     definition is read-only and can be shared by any number of runs.
//! 2.  **Start a run**: Use `AssessmentController::builder` to configure a run (optionally
//!     restoring a persisted [`AssessmentResult`](result::AssessmentResult)) and call
//!     `initialize`.
//! 3.  **Drive it**: Record answers with `set_answer` and move with `go_forward` / `go_back`.
//!     Survey rules on questions decide where the next step is.
//! 4.  **Persist**: `assessment_result()` returns the whole result tree, ready to be
//!     encoded and stored by the caller.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stepwise::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let assessment = Assessment::new(
//!         "screening",
//!         vec![
//!             Node::instruction("intro"),
//!             Node::question("smoker", AnswerType::Boolean)
//!                 .with_rules(vec![SurveyRule::equal(json!(false), "done")]),
//!             Node::question("packsPerDay", AnswerType::Integer),
//!             Node::completion("done"),
//!         ],
//!     );
//!
//!     let mut controller = AssessmentController::builder(&assessment).build();
//!     controller.initialize()?;
//!     controller.go_forward()?; // intro -> smoker
//!     controller.set_answer(json!(false))?;
//!     controller.go_forward()?; // rule jumps to "done"
//!
//!     assert_eq!(controller.current_node().map(|n| n.identifier()), Some("done"));
//!     let result = controller.assessment_result();
//!     println!("{}", result.to_json_string()?);
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod codec;
pub mod controller;
pub mod error;
pub mod navigator;
pub mod node;
pub mod prelude;
pub mod result;
pub mod rules;
