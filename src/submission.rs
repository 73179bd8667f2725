//! Submission directory handling.
//!
//! A submission is a directory holding a pose file, a user program and an
//! optional notification list. [`Submission::process`] loads it, asks a
//! [`ProgramChecker`] whether the program is usable, validates the poses and
//! writes the diagnostic report back into the directory.

use crate::error::SubmissionError;
use crate::report::ValidationReport;
use crate::validator::PoseValidator;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// File names inside a submission directory, and the fallback recipient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionConfig {
    pub pose_file: String,
    pub program_file: String,
    pub notify_file: String,
    pub report_file: String,
    /// Recipients used when the submission has no notification file.
    pub default_notify: Vec<String>,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            pose_file: "init_pose.csv".into(),
            program_file: "usr_code.py".into(),
            notify_file: "email.txt".into(),
            report_file: "input_pose_errors.csv".into(),
            default_notify: vec!["operator@localhost".into()],
        }
    }
}

/// Decides whether the program accompanying a submission is usable.
///
/// The check itself (compiling, linting) is delegated; the validator only
/// consumes the yes/no answer.
pub trait ProgramChecker {
    fn check(&self, program: &Path) -> Result<(), SubmissionError>;
}

/// Accepts any program file that exists and is readable.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExistenceChecker;

impl ProgramChecker for ExistenceChecker {
    fn check(&self, program: &Path) -> Result<(), SubmissionError> {
        fs::File::open(program).map(|_| ()).map_err(|e| {
            debug!(path = %program.display(), error = %e, "program file unreadable");
            SubmissionError::UpstreamCompile
        })
    }
}

/// Runs an external command with the program path appended as the last
/// argument. The program is usable iff the command exits successfully.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandChecker {
    command: String,
    args: Vec<String>,
}

impl CommandChecker {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// `python3 -m py_compile <program>`.
    pub fn python() -> Self {
        Self::new("python3").arg("-m").arg("py_compile")
    }
}

impl ProgramChecker for CommandChecker {
    fn check(&self, program: &Path) -> Result<(), SubmissionError> {
        let output = Command::new(&self.command)
            .args(&self.args)
            .arg(program)
            .output()
            .map_err(|e| {
                warn!(command = %self.command, error = %e, "could not run program checker");
                SubmissionError::UpstreamCompile
            })?;

        if output.status.success() {
            return Ok(());
        }
        debug!(
            status = ?output.status.code(),
            stderr = %String::from_utf8_lossy(&output.stderr),
            "program checker rejected program"
        );
        Err(SubmissionError::UpstreamCompile)
    }
}

/// What a caller needs to decide what happens to a submission next.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubmissionOutcome {
    /// Both the pose file and the program were loaded.
    pub files_loaded: bool,
    /// The pose batch was validated and accepted.
    pub accepted: bool,
    pub requested_robots: usize,
    /// Addresses to notify about the result.
    pub notify: Vec<String>,
    pub report: ValidationReport,
}

/// One submission directory.
pub struct Submission {
    dir: PathBuf,
    config: SubmissionConfig,
    validator: PoseValidator,
    checker: Box<dyn ProgramChecker>,
}

impl Submission {
    /// A submission at `dir` with default file names, limits, and
    /// [`CommandChecker::python`] as program checker.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            config: SubmissionConfig::default(),
            validator: PoseValidator::default(),
            checker: Box::new(CommandChecker::python()),
        }
    }

    pub fn with_config(mut self, config: SubmissionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_validator(mut self, validator: PoseValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_checker(mut self, checker: impl ProgramChecker + 'static) -> Self {
        self.checker = Box::new(checker);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn report_path(&self) -> PathBuf {
        self.dir.join(&self.config.report_file)
    }

    /// Loads, checks and validates the submission, then writes the report.
    ///
    /// Rejections are returned as data in the outcome. The only error is a
    /// failure to write the report file.
    pub fn process(&self) -> Result<SubmissionOutcome, SubmissionError> {
        let poses = self.load_poses();
        let program = self.check_program();
        let notify = self.load_notify();

        let files_loaded = poses.is_ok() && program.is_ok();

        let report = match (poses, program) {
            (_, Err(err)) | (Err(err), _) => {
                warn!(dir = %self.dir.display(), "{err}");
                ValidationReport::fatal(&err)
            }
            (Ok(text), Ok(())) => self.validator.validate(&text),
        };

        self.write_report(&report)?;

        info!(
            dir = %self.dir.display(),
            accepted = report.accepted,
            robots = report.requested_robots,
            "submission processed"
        );

        Ok(SubmissionOutcome {
            files_loaded,
            accepted: report.accepted,
            requested_robots: report.requested_robots,
            notify,
            report,
        })
    }

    /// Reads the pose file.
    pub fn load_poses(&self) -> Result<String, SubmissionError> {
        let path = self.dir.join(&self.config.pose_file);
        fs::read_to_string(&path)
            .map_err(|source| SubmissionError::MissingPoseFile { path, source })
    }

    /// Runs the configured [`ProgramChecker`] on the program file.
    pub fn check_program(&self) -> Result<(), SubmissionError> {
        self.checker.check(&self.dir.join(&self.config.program_file))
    }

    /// Reads the notification list, one address per line.
    ///
    /// A missing or unreadable file yields the configured default recipients.
    pub fn load_notify(&self) -> Vec<String> {
        let path = self.dir.join(&self.config.notify_file);
        match fs::read_to_string(&path) {
            Ok(text) => text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_owned)
                .collect(),
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "notification list unreadable");
                }
                self.config.default_notify.clone()
            }
        }
    }

    fn write_report(&self, report: &ValidationReport) -> Result<(), SubmissionError> {
        let path = self.report_path();
        fs::write(&path, report.render()).map_err(|source| SubmissionError::Io { path, source })
    }
}
