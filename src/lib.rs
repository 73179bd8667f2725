//! # robot-pose-check
//!
//! Validation of initial pose submissions for a fleet of simulated robots.
//!
//! A submission is a comma-separated list of `id, x, y, theta` lines. Each
//! line is checked for format, a valid integral id, a starting position
//! inside the arena and a minimum separation from every other robot. The
//! result is a [`ValidationReport`] with one diagnostic per input line, in
//! input order, and a single accept/reject decision for the whole batch.
//!
//! [`Submission`] wraps the validator with the directory layout a scheduling
//! harness hands over: pose file, user program, and notification list.

pub mod error;
pub mod parser;
pub mod pose;
pub mod report;
pub mod rules;
pub mod submission;
pub mod validator;

pub use error::*;
pub use parser::*;
pub use pose::*;
pub use report::*;
pub use rules::*;
pub use submission::*;
pub use validator::*;
