//! The application CLI as seen by provisioning.

use crate::error::{InitError, Result};
use crate::secrets::SecretMasker;
use crate::shell::{CommandOptions, CommandResult, CommandRunner};
use tracing::debug;

/// Invokes subcommands of the configured application CLI.
///
/// # Example
///
/// ```
/// use invenio_init::provision::AppCli;
/// use invenio_init::shell::MockRunner;
///
/// let program = vec!["invenio".to_string()];
/// let runner = MockRunner::new();
/// let app = AppCli::new(&program, &runner);
///
/// app.run(&["index", "init"]).unwrap();
/// assert_eq!(runner.calls(), vec!["invenio index init".to_string()]);
/// ```
pub struct AppCli<'a> {
    program: &'a [String],
    runner: &'a dyn CommandRunner,
    masker: SecretMasker,
}

impl<'a> AppCli<'a> {
    pub fn new(program: &'a [String], runner: &'a dyn CommandRunner) -> Self {
        Self {
            program,
            runner,
            masker: SecretMasker::new(),
        }
    }

    /// Register a value that must never show up in logs or errors.
    pub fn add_secret(&mut self, value: &str) {
        self.masker.add_secret(value);
    }

    /// Full argument vector for a subcommand.
    pub fn argv(&self, args: &[&str]) -> Vec<String> {
        self.program
            .iter()
            .cloned()
            .chain(args.iter().map(|a| a.to_string()))
            .collect()
    }

    /// Masked, printable form of a subcommand.
    pub fn display(&self, args: &[&str]) -> String {
        self.masker.display_argv(&self.argv(args))
    }

    /// Run a subcommand with inherited output; a non-zero exit is an error.
    pub fn run(&self, args: &[&str]) -> Result<CommandResult> {
        let result = self.invoke(args, &CommandOptions::default())?;
        if result.success {
            Ok(result)
        } else {
            Err(InitError::CommandFailed {
                command: self.display(args),
                code: result.exit_code,
                stderr: self.masker.mask(&result.stderr),
            })
        }
    }

    /// Run a subcommand with inherited output and report any exit status.
    pub fn run_unchecked(&self, args: &[&str]) -> Result<CommandResult> {
        self.invoke(args, &CommandOptions::default())
    }

    /// Run a subcommand capturing its output and report any exit status.
    pub fn capture(&self, args: &[&str]) -> Result<CommandResult> {
        self.invoke(args, &CommandOptions::captured())
    }

    fn invoke(&self, args: &[&str], options: &CommandOptions) -> Result<CommandResult> {
        debug!("Running: {}", self.display(args));
        let argv = self.argv(args);
        self.runner.run(&argv, options).map_err(|e| match e {
            InitError::Spawn { source, .. } => InitError::Spawn {
                command: self.masker.display_argv(&argv),
                source,
            },
            other => other,
        })
    }
}
