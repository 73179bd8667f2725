//! Per-line diagnostics and the whole-batch validation report.

use crate::error::{SubmissionError, Violation};
use crate::pose::{PoseRecord, RobotKey};
use serde::Serialize;
use std::fmt;

/// What happened to one submitted line.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The line's robot passed every check. Carries the normalized pose.
    Accepted { pose: PoseRecord },
    /// The line's robot failed one or more checks.
    Rejected { violations: Vec<Violation> },
}

/// The outcome of a single non-empty input line.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    /// 1-based source line number.
    pub line: usize,
    pub key: RobotKey,
    pub outcome: Outcome,
}

impl Diagnostic {
    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, Outcome::Accepted { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Accepted { pose } => write!(f, "{pose}"),
            Outcome::Rejected { violations } => {
                let reasons: Vec<String> = violations.iter().map(ToString::to_string).collect();
                f.write_str(&reasons.join(" "))
            }
        }
    }
}

/// The result of validating one submission.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    /// True iff every line produced a fully valid robot.
    pub accepted: bool,

    /// Number of distinct robots that passed the format check.
    pub requested_robots: usize,

    /// One entry per non-empty input line, in input order.
    pub diagnostics: Vec<Diagnostic>,

    /// Every format-valid pose (normalized heading), ordered by first appearance.
    pub poses: Vec<PoseRecord>,

    /// Set when the submission was rejected outright; replaces per-line output.
    pub fatal: Option<String>,
}

impl ValidationReport {
    /// A rejection with a single explanatory line and no per-line detail.
    pub fn fatal(err: &SubmissionError) -> Self {
        Self {
            fatal: Some(err.to_string()),
            ..Self::default()
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal.is_some()
    }

    /// The validated poses, only if the whole batch was accepted.
    pub fn accepted_poses(&self) -> Option<&[PoseRecord]> {
        self.accepted.then_some(self.poses.as_slice())
    }

    pub fn rejected(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_accepted())
    }

    /// The text written to the report file: one `\n`-terminated line per
    /// diagnostic, or the single fatal message.
    pub fn render(&self) -> String {
        if let Some(message) = &self.fatal {
            return message.clone();
        }

        let mut out = String::new();
        for diagnostic in &self.diagnostics {
            out.push_str(&diagnostic.to_string());
            out.push('\n');
        }
        out
    }
}
