//! The container entrypoint sequence.

use crate::cli::Cli;
use crate::config::{load_settings, system_env, Settings};
use crate::error::{InitError, Result};
use crate::lock::InitLock;
use crate::provision::{ProvisionReport, Provisioner};
use crate::shell::{handoff, CommandRunner, SystemRunner};
use std::collections::HashMap;
use std::convert::Infallible;
use tracing::{error, info};

/// Load settings, then provision under the initialization lock.
///
/// Returns `Ok(None)` when provisioning was skipped. The lock is released
/// before this returns, on success and on failure alike.
pub fn initialize(
    cli: &Cli,
    env: &HashMap<String, String>,
    runner: &dyn CommandRunner,
) -> Result<Option<ProvisionReport>> {
    let settings = load_settings(cli.config.as_deref(), env, &cli.overrides())?;

    if cli.skip_provision {
        info!("Provisioning skipped.");
        return Ok(None);
    }

    provision_locked(&settings, runner).map(Some)
}

fn provision_locked(settings: &Settings, runner: &dyn CommandRunner) -> Result<ProvisionReport> {
    let lock = InitLock::acquire(
        &settings.lock.path,
        settings.lock.timeout(),
        settings.lock.poll_interval(),
    )
    .inspect_err(|e| {
        if matches!(e, InitError::LockTimeout { .. }) {
            error!("Could not acquire initialization lock. Exiting.");
        }
    })?;

    let result = Provisioner::new(settings, runner).run();

    // Release before the hand-off so the server never holds it.
    lock.release();
    result
}

/// Run the whole entrypoint. Only returns on failure.
pub fn run(cli: &Cli) -> Result<Infallible> {
    let env = system_env();
    initialize(cli, &env, &SystemRunner)?;

    if cli.command.is_empty() {
        return Err(InitError::NoCommand);
    }

    info!("Starting application: {}", cli.command.join(" "));
    handoff(&cli.command)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::shell::MockRunner;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(temp: &TempDir, extra: &[&str]) -> Cli {
        let lock = temp.path().join("init.lock");
        let mut args = vec![
            "invenio-init".to_string(),
            "--lock-file".to_string(),
            lock.display().to_string(),
            "--lock-timeout".to_string(),
            "0".to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn provisions_and_releases_lock() {
        let temp = TempDir::new().unwrap();
        let cli = cli(&temp, &["true"]);
        let runner = MockRunner::new();
        runner.fail_on("invenio db check", 1);

        let report = initialize(&cli, &HashMap::new(), &runner).unwrap().unwrap();

        assert!(report.did_work());
        assert!(InitLock::try_acquire(&temp.path().join("init.lock"))
            .unwrap()
            .is_some());
    }

    #[test]
    fn lock_timeout_runs_no_commands() {
        let temp = TempDir::new().unwrap();
        let cli = cli(&temp, &["true"]);
        let _held = InitLock::try_acquire(&temp.path().join("init.lock"))
            .unwrap()
            .unwrap();
        let runner = MockRunner::new();

        let err = initialize(&cli, &HashMap::new(), &runner).unwrap_err();

        assert!(matches!(err, InitError::LockTimeout { .. }));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn failure_still_releases_lock() {
        let temp = TempDir::new().unwrap();
        let cli = cli(&temp, &["true"]);
        let runner = MockRunner::new();
        runner.fail_on("invenio db check", 1);
        runner.fail_on("invenio db init", 1);

        assert!(initialize(&cli, &HashMap::new(), &runner).is_err());
        assert!(InitLock::try_acquire(&temp.path().join("init.lock"))
            .unwrap()
            .is_some());
    }

    #[test]
    fn skip_provision_bypasses_everything() {
        let temp = TempDir::new().unwrap();
        let cli = cli(&temp, &["--skip-provision", "true"]);
        let _held = InitLock::try_acquire(&temp.path().join("init.lock"))
            .unwrap()
            .unwrap();
        let runner = MockRunner::new();

        let report = initialize(&cli, &HashMap::new(), &runner).unwrap();

        assert!(report.is_none());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn env_reaches_provisioning() {
        let temp = TempDir::new().unwrap();
        let cli = cli(&temp, &[]);
        let runner = MockRunner::new();
        runner.fail_on("invenio db check", 1);
        let mut env = HashMap::new();
        env.insert("INVENIO_S3_BUCKET_NAME".to_string(), "bucket".to_string());

        initialize(&cli, &env, &runner).unwrap();

        assert!(
            runner.was_called("invenio files location create --default s3-default s3://bucket")
        );
    }

    #[test]
    fn run_without_command_fails_after_init() {
        let temp = TempDir::new().unwrap();
        // `echo exists ...` passes both probes, so only they run.
        let cli = cli(&temp, &["--cli", "echo exists"]);
        let err = run(&cli).unwrap_err();
        assert!(matches!(err, InitError::NoCommand));
    }
}
