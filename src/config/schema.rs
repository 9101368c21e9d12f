//! Settings schema.
//!
//! These structs map one-to-one onto the optional YAML settings file.
//! Every field has a default so an empty file (or no file) is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default lock file shared by all replicas mounting the same `/tmp`.
pub const DEFAULT_LOCK_PATH: &str = "/tmp/invenio_init.lock";

/// Resolved entrypoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Application CLI: program followed by any leading arguments.
    pub cli: Vec<String>,

    /// Initialization lock.
    pub lock: LockSettings,

    /// Default file storage location.
    pub storage: StorageSettings,

    /// Bootstrap admin account.
    pub admin: AdminSettings,

    /// Custom field whose presence marks fixtures as initialized.
    pub custom_field_probe: String,

    /// Seed demo records and communities.
    pub demo_data: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cli: default_cli(),
            lock: LockSettings::default(),
            storage: StorageSettings::default(),
            admin: AdminSettings::default(),
            custom_field_probe: default_custom_field_probe(),
            demo_data: false,
        }
    }
}

/// Lock file location and timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LockSettings {
    /// Lock file path.
    pub path: PathBuf,

    /// How long to wait for another replica before giving up.
    pub timeout_secs: u64,

    /// Delay between lock attempts.
    pub poll_interval_secs: u64,
}

impl LockSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for LockSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_LOCK_PATH),
            timeout_secs: 300,
            poll_interval_secs: 2,
        }
    }
}

/// Default storage location registered on first boot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSettings {
    /// S3 bucket; when set, the default location points at it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_bucket: Option<String>,

    /// Location name used for the S3 bucket.
    pub s3_location: String,

    /// Location name used for local storage.
    pub local_location: String,

    /// URI of the local storage directory.
    pub local_uri: String,
}

impl StorageSettings {
    /// Location name and URI to register as default.
    pub fn default_location(&self) -> (String, String) {
        match &self.s3_bucket {
            Some(bucket) => (self.s3_location.clone(), format!("s3://{}", bucket)),
            None => (self.local_location.clone(), self.local_uri.clone()),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            s3_bucket: None,
            s3_location: "s3-default".to_string(),
            local_location: "default".to_string(),
            local_uri: "file:///opt/invenio/var/instance/data".to_string(),
        }
    }
}

/// Bootstrap admin account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdminSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl AdminSettings {
    /// Email and password, when both are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }
}

fn default_cli() -> Vec<String> {
    vec!["invenio".to_string()]
}

fn default_custom_field_probe() -> String {
    "journal:journal".to_string()
}
