//! Command execution.
//!
//! Commands are argument vectors handed straight to the OS, never to a
//! shell: the application image may not ship one, and arguments such as
//! passwords must not be re-parsed.

use crate::error::{InitError, Result};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output (empty unless captured).
    pub stdout: String,

    /// Standard error (empty unless captured).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Capture stdout and stderr (if false, both inherit from parent).
    pub capture_output: bool,
}

impl CommandOptions {
    /// Options that capture output, used for probes.
    pub fn captured() -> Self {
        Self {
            capture_output: true,
        }
    }
}

/// Something that can run an argument vector.
///
/// Provisioning only talks to the application CLI through this trait, so
/// tests can substitute [`MockRunner`](super::MockRunner).
pub trait CommandRunner {
    /// Run `argv[0]` with the remaining arguments.
    ///
    /// A non-zero exit is reported through [`CommandResult::success`], not
    /// as an error; only failing to start the program is an error.
    fn run(&self, argv: &[String], options: &CommandOptions) -> Result<CommandResult>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, argv: &[String], options: &CommandOptions) -> Result<CommandResult> {
        execute(argv, options)
    }
}

/// Execute an argument vector and wait for it to finish.
pub fn execute(argv: &[String], options: &CommandOptions) -> Result<CommandResult> {
    let (program, args) = argv.split_first().ok_or_else(|| InitError::Spawn {
        command: String::new(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
    })?;

    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args);

    if options.capture_output {
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
    }
    cmd.stdin(Stdio::null());

    let output = cmd.output().map_err(|source| InitError::Spawn {
        command: program.clone(),
        source,
    })?;

    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}
