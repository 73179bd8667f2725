//! Validator that turns submitted pose text into a [`ValidationReport`].
//!
//! The entry point is [`PoseValidator`]. Configure it with a
//! [`ValidationConfig`], then call [`PoseValidator::validate`] with the raw
//! contents of a pose file.

use crate::error::{SubmissionError, Violation};
use crate::parser::SubmissionBatch;
use crate::pose::PoseRecord;
use crate::report::{Diagnostic, Outcome, ValidationReport};
use crate::rules::{ArenaBounds, check_bounds, check_format, check_identity, find_conflicts};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Limits a submission is validated against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Rectangle every starting position must lie in.
    pub arena: ArenaBounds,
    /// Largest allowed robot id. Ids start at 0.
    pub max_robot_id: u32,
    /// Minimum center-to-center distance between two robots, in meters.
    pub min_separation: f64,
    /// Maximum number of distinct robots per submission.
    pub max_robots: usize,
    /// Reject identifiers that appear on more than one line instead of
    /// letting the last occurrence win.
    pub reject_duplicates: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            arena: ArenaBounds::default(),
            max_robot_id: 99,
            min_separation: 0.25,
            max_robots: 50,
            reject_duplicates: false,
        }
    }
}

/// Validates pose submissions against a fixed [`ValidationConfig`].
#[derive(Clone, Debug, Default)]
pub struct PoseValidator {
    config: ValidationConfig,
}

impl PoseValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Parses `text` and validates it. See [`validate_batch`](Self::validate_batch).
    pub fn validate(&self, text: &str) -> ValidationReport {
        self.validate_batch(&SubmissionBatch::parse(text))
    }

    /// Validates an already parsed batch.
    ///
    /// # Order of checks
    ///
    /// 1. More than `max_robots` distinct identifiers rejects the batch with a
    ///    single fatal message.
    /// 2. Each identifier's latest record is format checked. Failures are
    ///    reported and take no part in the remaining checks.
    /// 3. Format-valid records are checked for id and bounds, their heading is
    ///    normalized, and they are compared pairwise for separation against
    ///    every other format-valid record. Violations accumulate.
    /// 4. Every non-empty input line gets the outcome of its identifier.
    pub fn validate_batch(&self, batch: &SubmissionBatch) -> ValidationReport {
        let cfg = &self.config;

        let distinct = batch.distinct_keys();
        if distinct > cfg.max_robots {
            let err = SubmissionError::Capacity {
                max: cfg.max_robots,
            };
            warn!(requested = distinct, max = cfg.max_robots, "{err}");
            return ValidationReport::fatal(&err);
        }

        let mut verdicts: HashMap<&str, Vec<Violation>> = HashMap::new();
        let mut poses: Vec<PoseRecord> = Vec::new();

        for raw in batch.latest() {
            match check_format(raw) {
                Ok(fields) => {
                    poses.push(PoseRecord::from_fields(raw.key.clone(), fields).normalized())
                }
                Err(violation) => {
                    debug!(line = raw.line, key = %raw.key, "format check failed");
                    verdicts.insert(raw.key.as_str(), vec![violation]);
                }
            }
        }

        for pose in &poses {
            let mut violations = Vec::new();
            if let Err(v) = check_identity(pose.id, cfg.max_robot_id) {
                violations.push(v);
            }
            if let Err(v) = check_bounds(pose.position, &cfg.arena) {
                violations.push(v);
            }
            let conflicts = find_conflicts(pose, &poses, cfg.min_separation);
            if !conflicts.is_empty() {
                violations.push(Violation::TooClose(conflicts));
            }
            if !violations.is_empty() {
                debug!(key = %pose.key, ?violations, "record rejected");
            }
            verdicts.insert(pose.key.as_str(), violations);
        }

        if cfg.reject_duplicates {
            for key in batch.duplicate_keys() {
                if let Some(v) = verdicts.get_mut(key.as_str()) {
                    v.push(Violation::DuplicateId);
                }
            }
        }

        let by_key: HashMap<&str, &PoseRecord> =
            poses.iter().map(|p| (p.key.as_str(), p)).collect();

        let diagnostics: Vec<Diagnostic> = batch
            .records()
            .iter()
            .map(|raw| {
                let violations = verdicts.get(raw.key.as_str()).cloned().unwrap_or_default();
                let outcome = match by_key.get(raw.key.as_str()) {
                    Some(pose) if violations.is_empty() => Outcome::Accepted {
                        pose: (*pose).clone(),
                    },
                    _ => Outcome::Rejected { violations },
                };
                Diagnostic {
                    line: raw.line,
                    key: raw.key.clone(),
                    outcome,
                }
            })
            .collect();

        let accepted = diagnostics.iter().all(Diagnostic::is_accepted);
        if diagnostics.is_empty() {
            warn!("submission contains no poses");
        }

        let report = ValidationReport {
            accepted,
            requested_robots: poses.len(),
            diagnostics,
            poses,
            fatal: None,
        };

        info!(
            accepted = report.accepted,
            robots = report.requested_robots,
            rejected_lines = report.rejected().count(),
            "validated pose submission"
        );
        report
    }
}
