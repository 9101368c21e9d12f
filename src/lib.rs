//! invenio-init - first-boot provisioning entrypoint for Invenio RDM containers.
//!
//! The binary runs as a container's entrypoint. It takes a cross-replica
//! file lock, provisions whatever the application CLI reports as missing,
//! rolls back on failure, then replaces itself with the server process.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and the entrypoint sequence
//! - [`config`] - Settings schema and layered loading
//! - [`error`] - Error types and result aliases
//! - [`lock`] - Cross-process initialization lock
//! - [`provision`] - Probes, provisioning phases and rollback
//! - [`secrets`] - Masking of secrets in command lines
//! - [`shell`] - Command execution and process hand-off
//!
//! # Example
//!
//! ```
//! use invenio_init::config::Settings;
//! use invenio_init::provision::Provisioner;
//! use invenio_init::shell::MockRunner;
//!
//! let settings = Settings::default();
//! let runner = MockRunner::new();
//! runner.fail_on("invenio db check", 1);
//!
//! let report = Provisioner::new(&settings, &runner).run().unwrap();
//! assert!(report.did_work());
//! assert!(runner.was_called("invenio db init create"));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod provision;
pub mod secrets;
pub mod shell;

pub use error::{InitError, Result};
