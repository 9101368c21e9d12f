//! Integration tests for the entrypoint binary.
//!
//! The application CLI is replaced by a small `sh` script that logs every
//! invocation and keeps just enough state on disk to answer the probes.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]
#![cfg(unix)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use invenio_init::lock::InitLock;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const FAKE_CLI: &str = r#"#!/bin/sh
echo "$*" >> "$FAKE_DIR/calls.log"
if [ -n "$FAKE_FAIL" ] && [ "$*" = "$FAKE_FAIL" ]; then
  echo "fake failure" >&2
  exit 1
fi
case "$*" in
  "db check")
    [ -f "$FAKE_DIR/db" ] && exit 0
    exit 1 ;;
  "db init create")
    touch "$FAKE_DIR/db" ;;
  "db drop --yes-i-know")
    rm -f "$FAKE_DIR/db" ;;
  "rdm-records custom-fields exists"*)
    [ -f "$FAKE_DIR/fields" ] && echo "Field exists"
    exit 0 ;;
  "communities custom-fields init")
    touch "$FAKE_DIR/fields" ;;
esac
exit 0
"#;

/// A scratch directory holding the fake CLI, its state, and the lock file.
struct Fixture {
    temp: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("fake-invenio.sh"), FAKE_CLI).unwrap();
        Self { temp }
    }

    fn lock_path(&self) -> PathBuf {
        self.temp.path().join("init.lock")
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.temp.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("invenio-init"));
        let script = self.temp.path().join("fake-invenio.sh");
        cmd.env("FAKE_DIR", self.temp.path())
            .env("INVENIO_INIT_CLI", format!("sh {}", script.display()))
            .env("INVENIO_INIT_LOCK_FILE", self.lock_path())
            .env("INVENIO_INIT_LOCK_TIMEOUT", "0")
            .env("NO_COLOR", "1")
            .env_remove("INVENIO_INIT_CONFIG")
            .env_remove("INVENIO_INIT_SKIP")
            .env_remove("INVENIO_ADMIN_EMAIL")
            .env_remove("INVENIO_ADMIN_PASSWORD")
            .env_remove("INVENIO_S3_BUCKET_NAME")
            .env_remove("INVENIO_DEMO_DATA")
            .env_remove("FAKE_FAIL")
            .env_remove("RUST_LOG");
        cmd
    }
}

// The shell expands this, the log line does not.
const HANDOFF: [&str; 4] = ["--", "sh", "-c", "echo hand-off-$((1+1))"];

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("invenio-init"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("first boot"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("invenio-init"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn fresh_boot_provisions_then_hands_off() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = Fixture::new();
    let mut cmd = fixture.command();
    cmd.args(HANDOFF);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Initialization completed successfully."))
        .stdout(predicate::str::contains("hand-off-2"));

    let calls = fixture.calls();
    assert_eq!(calls.first().map(String::as_str), Some("db check"));
    assert!(calls.contains(&"db init create".to_string()));
    assert!(calls.contains(&"files location create --default default file:///opt/invenio/var/instance/data".to_string()));
    assert!(calls.contains(&"index init".to_string()));
    assert!(calls.contains(&"rdm-records fixtures".to_string()));
    assert_eq!(calls.last().map(String::as_str), Some("queues declare"));
    Ok(())
}

#[test]
fn second_boot_only_probes() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = Fixture::new();
    fixture.command().args(HANDOFF).assert().success();
    let first_run = fixture.calls().len();

    fixture
        .command()
        .args(HANDOFF)
        .assert()
        .success()
        .stdout(predicate::str::contains("hand-off-2"));

    let calls = fixture.calls();
    assert_eq!(
        &calls[first_run..],
        &[
            "db check".to_string(),
            "rdm-records custom-fields exists -f journal:journal".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn missing_command_exits_with_error() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = Fixture::new();
    fixture
        .command()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No command provided to execute."));

    // Provisioning still happened before the hand-off check.
    assert!(fixture.calls().contains(&"db init create".to_string()));
    Ok(())
}

#[test]
fn failure_rolls_back_and_does_not_hand_off() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = Fixture::new();
    fixture
        .command()
        .env("FAKE_FAIL", "roles create administration")
        .args(HANDOFF)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("INITIALIZATION FAILED"))
        .stdout(predicate::str::contains("create-admin-role ("))
        .stdout(predicate::str::contains("create-administration-role - Command failed"))
        .stdout(predicate::str::contains("Initialization failed:"))
        .stdout(predicate::str::contains("hand-off-2").not());

    let calls = fixture.calls();
    let role = calls.iter().position(|c| c == "roles delete admin").unwrap();
    let db = calls.iter().position(|c| c == "db drop --yes-i-know").unwrap();
    assert!(role < db);
    assert!(!calls.contains(&"roles delete administration".to_string()));

    // The lock was released despite the failure.
    assert!(InitLock::try_acquire(&fixture.lock_path())?.is_some());
    Ok(())
}

#[test]
fn retry_after_rollback_provisions_cleanly() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = Fixture::new();
    fixture
        .command()
        .env("FAKE_FAIL", "index init")
        .args(HANDOFF)
        .assert()
        .code(1);

    fixture
        .command()
        .args(HANDOFF)
        .assert()
        .success()
        .stdout(predicate::str::contains("hand-off-2"));

    let inits = fixture
        .calls()
        .iter()
        .filter(|c| *c == "db init create")
        .count();
    assert_eq!(inits, 2);
    Ok(())
}

#[test]
fn held_lock_times_out() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = Fixture::new();
    let _held = InitLock::try_acquire(&fixture.lock_path())?.unwrap();

    fixture
        .command()
        .args(HANDOFF)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Could not acquire initialization lock. Exiting.",
        ))
        .stdout(predicate::str::contains("hand-off-2").not());

    assert!(fixture.calls().is_empty());
    Ok(())
}

#[test]
fn admin_password_never_printed() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = Fixture::new();
    fixture
        .command()
        .arg("--debug")
        .env("INVENIO_ADMIN_EMAIL", "admin@example.org")
        .env("INVENIO_ADMIN_PASSWORD", "pa55-w0rd-xyz")
        .env(
            "FAKE_FAIL",
            "users create admin@example.org --password pa55-w0rd-xyz --active --confirm",
        )
        .args(HANDOFF)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[REDACTED]"))
        .stdout(predicate::str::contains("pa55-w0rd-xyz").not())
        .stderr(predicate::str::contains("pa55-w0rd-xyz").not());

    // The admin user was never created, so rollback leaves it alone.
    assert!(!fixture
        .calls()
        .iter()
        .any(|c| c.starts_with("users delete")));
    Ok(())
}

#[test]
fn s3_bucket_and_demo_data_from_env() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = Fixture::new();
    fixture
        .command()
        .env("INVENIO_S3_BUCKET_NAME", "records")
        .env("INVENIO_ADMIN_EMAIL", "admin@example.org")
        .env("INVENIO_DEMO_DATA", "TRUE")
        .args(HANDOFF)
        .assert()
        .success();

    let calls = fixture.calls();
    assert!(calls.contains(&"files location create --default s3-default s3://records".to_string()));
    assert!(calls.contains(&"rdm-records demo records --user admin@example.org".to_string()));
    assert!(calls.contains(&"rdm-records demo communities --user admin@example.org".to_string()));
    Ok(())
}

#[test]
fn queue_failure_does_not_block_hand_off() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = Fixture::new();
    fixture
        .command()
        .env("FAKE_FAIL", "queues declare")
        .args(HANDOFF)
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed to declare queues"))
        .stdout(predicate::str::contains("hand-off-2"));
    Ok(())
}

#[test]
fn skip_provision_execs_immediately() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = Fixture::new();
    let _held = InitLock::try_acquire(&fixture.lock_path())?.unwrap();

    fixture
        .command()
        .arg("--skip-provision")
        .args(HANDOFF)
        .assert()
        .success()
        .stdout(predicate::str::contains("hand-off-2"));

    assert!(fixture.calls().is_empty());
    Ok(())
}

#[test]
fn skip_env_accepts_numeric_true() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = Fixture::new();
    let _held = InitLock::try_acquire(&fixture.lock_path())?.unwrap();

    for value in ["1", "TRUE", "yes"] {
        fixture
            .command()
            .env("INVENIO_INIT_SKIP", value)
            .args(HANDOFF)
            .assert()
            .success()
            .stdout(predicate::str::contains("hand-off-2"));
    }

    assert!(fixture.calls().is_empty());
    Ok(())
}

#[test]
fn settings_file_is_applied()-> Result<(), Box<dyn std::error::Error>> {
    let fixture = Fixture::new();
    let config = fixture.temp.path().join("init.yml");
    fs::write(
        &config,
        "storage:\n  local_location: local\n  local_uri: file:///data\ncustom_field_probe: \"custom:field\"\n",
    )?;

    fixture
        .command()
        .arg("--config")
        .arg(&config)
        .args(HANDOFF)
        .assert()
        .success();

    let calls = fixture.calls();
    assert!(calls.contains(&"files location create --default local file:///data".to_string()));
    assert!(calls.contains(&"rdm-records custom-fields exists -f custom:field".to_string()));
    Ok(())
}

#[test]
fn malformed_settings_file_fails_before_locking() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = Fixture::new();
    let config = fixture.temp.path().join("init.yml");
    fs::write(&config, "unknown_key: 1\n")?;

    fixture
        .command()
        .arg("--config")
        .arg(&config)
        .args(HANDOFF)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Failed to parse config"));

    assert!(fixture.calls().is_empty());
    assert!(!fixture.lock_path().exists());
    Ok(())
}
