//! Settings loading.
//!
//! Settings are layered, later layers overriding earlier ones:
//! 1. Built-in defaults
//! 2. Optional YAML settings file
//! 3. Application environment variables (`INVENIO_ADMIN_EMAIL`, ...)
//! 4. Command-line overrides

use crate::config::schema::Settings;
use crate::error::{InitError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_ADMIN_EMAIL: &str = "INVENIO_ADMIN_EMAIL";
pub const ENV_ADMIN_PASSWORD: &str = "INVENIO_ADMIN_PASSWORD";
pub const ENV_S3_BUCKET: &str = "INVENIO_S3_BUCKET_NAME";
pub const ENV_DEMO_DATA: &str = "INVENIO_DEMO_DATA";

/// Values supplied on the command line (or their `INVENIO_INIT_*` env forms).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub lock_file: Option<PathBuf>,
    pub lock_timeout: Option<u64>,
    pub cli: Option<Vec<String>>,
}

/// Snapshot of the process environment.
pub fn system_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Interpret a boolean-ish environment value.
///
/// `true`, `1` and `yes` enable, case-insensitively. Anything else is false.
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

/// Load and validate settings from all layers.
pub fn load_settings(
    config_path: Option<&Path>,
    env: &HashMap<String, String>,
    overrides: &Overrides,
) -> Result<Settings> {
    let mut settings = match config_path {
        Some(path) => load_settings_file(path)?,
        None => Settings::default(),
    };

    apply_env(&mut settings, env);
    apply_overrides(&mut settings, overrides);
    validate(&settings)?;

    tracing::debug!(
        cli = ?settings.cli,
        lock = %settings.lock.path.display(),
        demo_data = settings.demo_data,
        "Settings loaded"
    );

    Ok(settings)
}

/// Parse a YAML settings file.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            InitError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            InitError::Io(e)
        }
    })?;

    if content.trim().is_empty() {
        return Ok(Settings::default());
    }

    serde_yaml::from_str(&content).map_err(|e| InitError::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Overlay application environment variables. Empty values count as unset.
pub fn apply_env(settings: &mut Settings, env: &HashMap<String, String>) {
    let get = |key: &str| {
        env.get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    if let Some(email) = get(ENV_ADMIN_EMAIL) {
        settings.admin.email = Some(email);
    }
    if let Some(password) = env.get(ENV_ADMIN_PASSWORD).filter(|v| !v.is_empty()) {
        // Passwords are taken verbatim, surrounding whitespace included.
        settings.admin.password = Some(password.clone());
    }
    if let Some(bucket) = get(ENV_S3_BUCKET) {
        settings.storage.s3_bucket = Some(bucket);
    }
    if let Some(flag) = get(ENV_DEMO_DATA) {
        settings.demo_data = parse_flag(&flag);
    }
}

fn apply_overrides(settings: &mut Settings, overrides: &Overrides) {
    if let Some(path) = &overrides.lock_file {
        settings.lock.path = path.clone();
    }
    if let Some(timeout) = overrides.lock_timeout {
        settings.lock.timeout_secs = timeout;
    }
    if let Some(cli) = &overrides.cli {
        settings.cli = cli.iter().filter(|s| !s.is_empty()).cloned().collect();
    }
}

/// Reject settings the entrypoint cannot work with.
pub fn validate(settings: &Settings) -> Result<()> {
    if settings.cli.is_empty() || settings.cli[0].trim().is_empty() {
        return Err(InitError::ConfigInvalid {
            message: "cli must name the application program".to_string(),
        });
    }
    if settings.lock.poll_interval_secs == 0 {
        return Err(InitError::ConfigInvalid {
            message: "lock.poll_interval_secs must be greater than zero".to_string(),
        });
    }
    if settings.custom_field_probe.trim().is_empty() {
        return Err(InitError::ConfigInvalid {
            message: "custom_field_probe must not be empty".to_string(),
        });
    }
    Ok(())
}
