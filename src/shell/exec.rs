//! Hand-off to the application process.

use crate::error::{InitError, Result};
use std::process::Command;

/// Replace the current process with `argv`.
///
/// The program is looked up on `PATH`, the environment is inherited, and
/// on success this never returns. On non-Unix targets the command runs as
/// a child and the current process exits with its status.
pub fn handoff(argv: &[String]) -> Result<std::convert::Infallible> {
    let (program, args) = argv.split_first().ok_or(InitError::NoCommand)?;

    let mut cmd = Command::new(program);
    cmd.args(args);

    replace(cmd, program)
}

#[cfg(unix)]
fn replace(mut cmd: Command, program: &str) -> Result<std::convert::Infallible> {
    use std::os::unix::process::CommandExt;

    // exec only returns on failure.
    let source = cmd.exec();
    Err(InitError::Exec {
        command: program.to_string(),
        source,
    })
}

#[cfg(not(unix))]
fn replace(mut cmd: Command, program: &str) -> Result<std::convert::Infallible> {
    let status = cmd.status().map_err(|source| InitError::Exec {
        command: program.to_string(),
        source,
    })?;
    std::process::exit(status.code().unwrap_or(1));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_argv_is_no_command() {
        let err = handoff(&[]).unwrap_err();
        assert!(matches!(err, InitError::NoCommand));
    }

    #[cfg(unix)]
    #[test]
    fn missing_program_returns_exec_error() {
        let err = handoff(&["definitely-not-a-real-program-xyz".to_string()]).unwrap_err();
        match err {
            InitError::Exec { command, source } => {
                assert_eq!(command, "definitely-not-a-real-program-xyz");
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
