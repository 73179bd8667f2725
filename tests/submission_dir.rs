// tests/submission_dir.rs
use robot_pose_check::{
    ExistenceChecker, PoseValidator, ProgramChecker, Submission, SubmissionError,
    ValidationConfig,
};
use rstest::{fixture, rstest};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = std::env::temp_dir();
        path.push(format!(
            "robot-pose-check-{prefix}-{}-{nanos}-{counter}",
            std::process::id()
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, name: &str, contents: &str) {
        std::fs::write(self.path.join(name), contents).unwrap();
    }

    fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path.join(name)).unwrap()
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Always reports the program as broken.
struct RejectingChecker;

impl ProgramChecker for RejectingChecker {
    fn check(&self, _program: &Path) -> Result<(), SubmissionError> {
        Err(SubmissionError::UpstreamCompile)
    }
}

#[fixture]
fn dir() -> TempDir {
    let dir = TempDir::new("submission");
    dir.write("usr_code.py", "print('hello')\n");
    dir
}

#[rstest]
fn accepted_submission_writes_one_line_per_pose(dir: TempDir) {
    dir.write("init_pose.csv", "1,0.0,0.0,0.0\n2,0.3,0.0,0.0\n");

    let outcome = Submission::new(dir.path())
        .with_checker(ExistenceChecker)
        .process()
        .unwrap();

    assert!(outcome.files_loaded);
    assert!(outcome.accepted);
    assert_eq!(outcome.requested_robots, 2);
    assert_eq!(
        dir.read("input_pose_errors.csv"),
        "[1.0, 0.0, 0.0, 0.0]\n[2.0, 0.3, 0.0, 0.0]\n"
    );
}

#[rstest]
fn rejected_submission_explains_each_line(dir: TempDir) {
    dir.write("init_pose.csv", "1,0.0,0.0,0.0\n2,0.1,0.0,0.0\n");

    let outcome = Submission::new(dir.path())
        .with_checker(ExistenceChecker)
        .process()
        .unwrap();

    assert!(outcome.files_loaded);
    assert!(!outcome.accepted);
    assert_eq!(
        dir.read("input_pose_errors.csv"),
        "too close to 2\ntoo close to 1\n"
    );
}

#[rstest]
fn broken_program_short_circuits_validation(dir: TempDir) {
    dir.write("init_pose.csv", "1,0.0,0.0,0.0\n");

    let outcome = Submission::new(dir.path())
        .with_checker(RejectingChecker)
        .process()
        .unwrap();

    assert!(!outcome.files_loaded);
    assert!(!outcome.accepted);
    assert_eq!(outcome.requested_robots, 0);
    assert!(outcome.report.diagnostics.is_empty());
    assert_eq!(
        dir.read("input_pose_errors.csv"),
        "invalid user program, the code was either unable to compile or could not be found"
    );
}

#[rstest]
fn missing_program_fails_existence_check() {
    let dir = TempDir::new("no-program");
    dir.write("init_pose.csv", "1,0.0,0.0,0.0\n");

    let outcome = Submission::new(dir.path())
        .with_checker(ExistenceChecker)
        .process()
        .unwrap();

    assert!(!outcome.files_loaded);
    assert!(outcome.report.is_fatal());
}

#[rstest]
fn missing_pose_file_is_reported(dir: TempDir) {
    let outcome = Submission::new(dir.path())
        .with_checker(ExistenceChecker)
        .process()
        .unwrap();

    assert!(!outcome.files_loaded);
    assert!(!outcome.accepted);
    assert!(dir.read("input_pose_errors.csv").starts_with("Could not find/open"));
}

#[rstest]
fn capacity_overflow_writes_single_line(dir: TempDir) {
    dir.write("init_pose.csv", "1,0.0,0.0,0.0\n2,0.5,0.0,0.0\n3,-0.5,0.0,0.0\n");

    let validator = PoseValidator::new(ValidationConfig {
        max_robots: 2,
        ..Default::default()
    });
    let outcome = Submission::new(dir.path())
        .with_checker(ExistenceChecker)
        .with_validator(validator)
        .process()
        .unwrap();

    assert!(outcome.files_loaded);
    assert!(!outcome.accepted);
    assert_eq!(
        dir.read("input_pose_errors.csv"),
        "Requesting too many robots, please limit your script to using 2 robots"
    );
}

#[rstest]
fn notify_list_defaults_when_absent(dir: TempDir) {
    let submission = Submission::new(dir.path());
    assert_eq!(submission.load_notify(), vec!["operator@localhost".to_string()]);
}

#[rstest]
fn notify_list_reads_one_address_per_line(dir: TempDir) {
    dir.write("email.txt", "a@example.com\n\nb@example.com\r\n");
    let submission = Submission::new(dir.path());
    assert_eq!(
        submission.load_notify(),
        vec!["a@example.com".to_string(), "b@example.com".to_string()]
    );
}

#[rstest]
fn unwritable_report_location_is_an_error() {
    let dir = TempDir::new("gone");
    let missing = dir.path().join("does-not-exist");

    let result = Submission::new(&missing)
        .with_checker(ExistenceChecker)
        .process();

    assert!(matches!(result, Err(SubmissionError::Io { .. })));
}

#[cfg(unix)]
mod command_checker {
    use super::*;
    use robot_pose_check::CommandChecker;

    #[rstest]
    fn zero_exit_status_accepts_program(dir: TempDir) {
        let checker = CommandChecker::new("true");
        assert!(checker.check(&dir.path().join("usr_code.py")).is_ok());
    }

    #[rstest]
    fn non_zero_exit_status_rejects_program(dir: TempDir) {
        let checker = CommandChecker::new("false");
        assert!(matches!(
            checker.check(&dir.path().join("usr_code.py")),
            Err(SubmissionError::UpstreamCompile)
        ));
    }

    #[test]
    fn unknown_command_rejects_program() {
        let checker = CommandChecker::new("robot-pose-check-no-such-binary");
        assert!(checker.check(Path::new("usr_code.py")).is_err());
    }
}
