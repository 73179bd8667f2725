//! The individual record checks.
//!
//! Each check is a pure function over one record (or one record against the
//! rest of the batch). The orchestration lives in [`crate::validator`].

use crate::error::Violation;
use crate::pose::{PoseRecord, RawRecord, RobotKey};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Number of fields in a pose line: `id, x, y, theta`.
pub const POSE_FIELDS: usize = 4;

/// An axis-aligned rectangle robots must start inside. Both edges are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    /// Lower-left corner (`x_lim_neg`, `y_lim_neg`).
    pub min: DVec2,
    /// Upper-right corner (`x_lim_pos`, `y_lim_pos`).
    pub max: DVec2,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            min: DVec2::new(-1.2, -1.4),
            max: DVec2::new(1.0, 2.35),
        }
    }
}

impl ArenaBounds {
    pub fn contains(&self, p: DVec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Checks that a record has exactly four finite numeric fields.
///
/// Fields are trimmed before parsing. `nan` and `inf` parse as floats but are
/// rejected here, since no bounds or distance check is meaningful for them.
pub fn check_format(raw: &RawRecord) -> Result<[f64; POSE_FIELDS], Violation> {
    if raw.fields.len() != POSE_FIELDS {
        return Err(Violation::InvalidFormat);
    }

    let mut out = [0.0; POSE_FIELDS];
    for (slot, field) in out.iter_mut().zip(&raw.fields) {
        let value: f64 = field.trim().parse().map_err(|_| Violation::InvalidFormat)?;
        if !value.is_finite() {
            return Err(Violation::InvalidFormat);
        }
        *slot = value;
    }
    Ok(out)
}

/// Checks that `id` is an integer in `[0, max_id]`.
pub fn check_identity(id: f64, max_id: u32) -> Result<(), Violation> {
    if id < 0.0 || id > f64::from(max_id) || id.fract() != 0.0 {
        return Err(Violation::InvalidId);
    }
    Ok(())
}

/// Checks that a position lies within the arena.
pub fn check_bounds(position: DVec2, arena: &ArenaBounds) -> Result<(), Violation> {
    if arena.contains(position) {
        Ok(())
    } else {
        Err(Violation::OutOfBounds)
    }
}

/// Reduces a heading into `[0, 2π)`.
pub fn normalize_heading(theta: f64) -> f64 {
    let r = theta.rem_euclid(TAU);
    // Tiny negative inputs round up to exactly TAU.
    if r >= TAU { 0.0 } else { r }
}

/// Returns the keys of every other pose strictly closer than `min_separation`
/// to `candidate`, in the order they appear in `poses`.
///
/// Poses sharing the candidate's key are skipped. Two poses exactly
/// `min_separation` apart do not conflict.
pub fn find_conflicts(
    candidate: &PoseRecord,
    poses: &[PoseRecord],
    min_separation: f64,
) -> Vec<RobotKey> {
    poses
        .iter()
        .filter(|other| other.key != candidate.key)
        .filter(|other| candidate.position.distance(other.position) < min_separation)
        .map(|other| other.key.clone())
        .collect()
}
