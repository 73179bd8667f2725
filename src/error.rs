//! Error kinds: per-record violations and batch-fatal submission errors.

use crate::pose::RobotKey;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A reason a single record is rejected.
///
/// Violations never abort the batch. They accumulate per record and their
/// `Display` text is what the diagnostic report prints.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
pub enum Violation {
    /// Wrong field count, or a field that is not a finite number.
    #[error("Format of line is invalid, make sure there are 4 values and all are numerical values")]
    InvalidFormat,

    /// The id is out of range or not integral.
    #[error("ID is invalid")]
    InvalidId,

    /// x or y lies outside the arena.
    #[error("The x and/or y position is out of bounds")]
    OutOfBounds,

    /// Closer than the minimum separation to the listed robots.
    #[error("too close to {}", .0.join(" "))]
    TooClose(Vec<RobotKey>),

    /// The identifier appears on more than one line.
    #[error("Identifier is declared on more than one line")]
    DuplicateId,
}

/// A failure that rejects the whole submission without per-line detail.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Requesting too many robots, please limit your script to using {max} robots")]
    Capacity { max: usize },

    #[error("invalid user program, the code was either unable to compile or could not be found")]
    UpstreamCompile,

    #[error("Could not find/open {}", path.display())]
    MissingPoseFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
