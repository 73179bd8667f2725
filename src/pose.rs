use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The identifier of a robot exactly as written in the submission.
///
/// This is the first token of a line, trimmed of surrounding whitespace. It is
/// the stable key for a record: `"1"` and `"1.0"` are distinct robots even
/// though they carry the same numeric id.
pub type RobotKey = String;

/// One non-empty line of a submission, before any numeric interpretation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// 1-based line number in the submitted text.
    pub line: usize,

    /// The identifier key (first token of the line).
    pub key: RobotKey,

    /// Every comma-separated token on the line, including the identifier.
    pub fields: Vec<String>,
}

/// A robot pose that passed the format check.
///
/// Built from a [`RawRecord`]'s four numeric fields. Records are never
/// mutated once constructed; heading normalization produces a new record via
/// [`PoseRecord::normalized`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseRecord {
    /// The identifier key this pose was declared under.
    pub key: RobotKey,

    /// Numeric robot id. Kept as `f64` because integrality is a separate check.
    pub id: f64,

    /// Position in the arena plane, in meters.
    pub position: DVec2,

    /// Heading in radians.
    pub theta: f64,
}

impl PoseRecord {
    /// Builds a pose from `[id, x, y, theta]`.
    pub fn from_fields(key: impl Into<RobotKey>, fields: [f64; 4]) -> Self {
        let [id, x, y, theta] = fields;
        Self {
            key: key.into(),
            id,
            position: DVec2::new(x, y),
            theta,
        }
    }

    /// Returns a copy of this pose with its heading reduced into `[0, 2π)`.
    pub fn normalized(&self) -> Self {
        Self {
            theta: crate::rules::normalize_heading(self.theta),
            ..self.clone()
        }
    }

    /// The pose as the `[id, x, y, theta]` tuple it was submitted as.
    pub fn to_fields(&self) -> [f64; 4] {
        [self.id, self.position.x, self.position.y, self.theta]
    }

    /// The id as an integer, if it is integral and non-negative.
    pub fn robot_id(&self) -> Option<u32> {
        (self.id.fract() == 0.0 && self.id >= 0.0 && self.id <= u32::MAX as f64)
            .then_some(self.id as u32)
    }
}

impl fmt::Display for PoseRecord {
    /// Renders the pose as `[id, x, y, theta]`, e.g. `[1.0, 0.0, 0.5, 3.0]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [id, x, y, theta] = self.to_fields();
        write!(f, "[{id:?}, {x:?}, {y:?}, {theta:?}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_restates_tuple() {
        let pose = PoseRecord::from_fields("1", [1.0, 0.0, -0.5, 2.25]);
        assert_eq!(pose.to_string(), "[1.0, 0.0, -0.5, 2.25]");
    }

    #[test]
    fn normalized_keeps_position_and_key() {
        let pose = PoseRecord::from_fields("7", [7.0, 0.2, 0.3, -std::f64::consts::PI]);
        let norm = pose.normalized();
        assert_eq!(norm.key, "7");
        assert_eq!(norm.position, pose.position);
        assert!((norm.theta - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn robot_id_requires_integral_value() {
        assert_eq!(PoseRecord::from_fields("a", [99.0, 0.0, 0.0, 0.0]).robot_id(), Some(99));
        assert_eq!(PoseRecord::from_fields("b", [2.5, 0.0, 0.0, 0.0]).robot_id(), None);
        assert_eq!(PoseRecord::from_fields("c", [-1.0, 0.0, 0.0, 0.0]).robot_id(), None);
    }
}
