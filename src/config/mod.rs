//! Entrypoint settings.
//!
//! - Schema definitions in [`schema`]
//! - Layered loading and validation in [`loader`]
//!
//! # Example
//!
//! ```
//! use invenio_init::config::{load_settings, Overrides};
//! use std::collections::HashMap;
//!
//! let mut env = HashMap::new();
//! env.insert("INVENIO_DEMO_DATA".to_string(), "yes".to_string());
//!
//! let settings = load_settings(None, &env, &Overrides::default()).unwrap();
//! assert!(settings.demo_data);
//! assert_eq!(settings.cli, vec!["invenio"]);
//! ```

pub mod loader;
pub mod schema;

pub use loader::{
    apply_env, load_settings, load_settings_file, parse_flag, system_env, validate, Overrides,
    ENV_ADMIN_EMAIL, ENV_ADMIN_PASSWORD, ENV_DEMO_DATA, ENV_S3_BUCKET,
};
pub use schema::{AdminSettings, LockSettings, Settings, StorageSettings, DEFAULT_LOCK_PATH};
