//! Mock command runner for testing.
//!
//! `MockRunner` implements [`CommandRunner`] and records every argument
//! vector it is asked to run. Results are scripted by command prefix.
//!
//! # Example
//!
//! ```
//! use invenio_init::shell::{CommandOptions, CommandRunner, MockRunner};
//!
//! let runner = MockRunner::new();
//! runner.fail_on("invenio db check", 1);
//! runner.respond("invenio shell", 0, "12\n");
//!
//! let argv: Vec<String> = vec!["invenio".into(), "db".into(), "check".into()];
//! let result = runner.run(&argv, &CommandOptions::captured()).unwrap();
//! assert!(!result.success);
//! assert_eq!(runner.calls(), vec!["invenio db check".to_string()]);
//! ```

use std::cell::RefCell;
use std::io;
use std::time::Duration;

use crate::error::{InitError, Result};

use super::{CommandOptions, CommandResult, CommandRunner};

#[derive(Debug, Clone)]
enum Scripted {
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    SpawnError,
}

/// Scripted command runner.
///
/// The first registered prefix matching the space-joined argument vector
/// wins. Unmatched commands succeed with empty output.
#[derive(Debug, Default)]
pub struct MockRunner {
    scripts: RefCell<Vec<(String, Scripted)>>,
    calls: RefCell<Vec<String>>,
}

impl MockRunner {
    /// Create a runner where every command succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the exit code and stdout for commands starting with `prefix`.
    pub fn respond(&self, prefix: &str, code: i32, stdout: &str) {
        self.scripts.borrow_mut().push((
            prefix.to_string(),
            Scripted::Exit {
                code,
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        ));
    }

    /// Make commands starting with `prefix` exit with `code` and a stderr line.
    pub fn fail_on(&self, prefix: &str, code: i32) {
        self.scripts.borrow_mut().push((
            prefix.to_string(),
            Scripted::Exit {
                code,
                stdout: String::new(),
                stderr: format!("mock failure: {}", prefix),
            },
        ));
    }

    /// Make commands starting with `prefix` fail to spawn.
    pub fn spawn_error_on(&self, prefix: &str) {
        self.scripts
            .borrow_mut()
            .push((prefix.to_string(), Scripted::SpawnError));
    }

    /// Every command run so far, space-joined, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Whether any recorded command starts with `prefix`.
    pub fn was_called(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.starts_with(prefix))
    }

    /// Position of the first recorded command starting with `prefix`.
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.calls.borrow().iter().position(|c| c.starts_with(prefix))
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, argv: &[String], _options: &CommandOptions) -> Result<CommandResult> {
        let line = argv.join(" ");
        self.calls.borrow_mut().push(line.clone());

        let scripted = self
            .scripts
            .borrow()
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, s)| s.clone());

        match scripted {
            None => Ok(CommandResult::success(
                String::new(),
                String::new(),
                Duration::ZERO,
            )),
            Some(Scripted::Exit {
                code: 0,
                stdout,
                stderr,
            }) => Ok(CommandResult::success(stdout, stderr, Duration::ZERO)),
            Some(Scripted::Exit {
                code,
                stdout,
                stderr,
            }) => Ok(CommandResult::failure(
                Some(code),
                stdout,
                stderr,
                Duration::ZERO,
            )),
            Some(Scripted::SpawnError) => Err(InitError::Spawn {
                command: argv.first().cloned().unwrap_or_default(),
                source: io::Error::new(io::ErrorKind::NotFound, "mock spawn error"),
            }),
        }
    }
}
