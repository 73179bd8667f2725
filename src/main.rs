// Command-line front end: validate one submission directory and report the
// decision through the exit status.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::prelude::*;

use robot_pose_check::{
    CommandChecker, ExistenceChecker, PoseValidator, Submission, ValidationConfig,
};

/// Validate the initial robot poses of a submission directory.
#[derive(Parser, Debug)]
#[command(name = "robot-pose-check", version)]
struct Cli {
    /// Submission directory holding init_pose.csv and the user program.
    dir: PathBuf,

    /// Program check command; the program path is appended as last argument.
    /// Defaults to `python3 -m py_compile`.
    #[arg(long, num_args = 1.., allow_hyphen_values = true, conflicts_with = "skip_compile")]
    checker_cmd: Option<Vec<String>>,

    /// Only require the program file to exist.
    #[arg(long)]
    skip_compile: bool,

    /// Maximum number of distinct robots.
    #[arg(long)]
    max_robots: Option<usize>,

    /// Minimum distance between two robots, in meters.
    #[arg(long)]
    min_separation: Option<f64>,

    /// Reject identifiers declared on more than one line.
    #[arg(long)]
    reject_duplicates: bool,

    /// Print the full report as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn build_config(cli: &Cli) -> ValidationConfig {
    let mut cfg = ValidationConfig::default();
    if let Some(max) = cli.max_robots {
        cfg.max_robots = max;
    }
    if let Some(d) = cli.min_separation {
        cfg.min_separation = d;
    }
    cfg.reject_duplicates = cli.reject_duplicates;
    cfg
}

fn build_submission(cli: &Cli) -> Submission {
    let submission =
        Submission::new(cli.dir.clone()).with_validator(PoseValidator::new(build_config(cli)));

    if cli.skip_compile {
        return submission.with_checker(ExistenceChecker);
    }
    match cli.checker_cmd.as_deref() {
        Some([command, args @ ..]) => {
            let checker = args.iter().fold(CommandChecker::new(command), |c, a| c.arg(a));
            submission.with_checker(checker)
        }
        _ => submission,
    }
}

fn init_tracing() -> Result<(), String> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
        .map_err(|e| e.to_string())?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_tracing() {
        eprintln!("{e}");
        return ExitCode::from(2);
    }

    let outcome = match build_submission(&cli).process() {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&outcome) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("failed to encode report: {e}");
                return ExitCode::from(2);
            }
        }
    } else {
        print!("{}", outcome.report.render());
        if outcome.report.is_fatal() {
            println!();
        }
    }

    if outcome.accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
