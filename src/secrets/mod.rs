//! Masking of secret values in logged command lines.
//!
//! Provisioning passes the admin password to the application CLI as a
//! plain argument, so every command line that reaches a log line or an
//! error message goes through a [`SecretMasker`] first.
//!
//! # Example
//!
//! ```
//! use invenio_init::secrets::SecretMasker;
//!
//! let mut masker = SecretMasker::new();
//! masker.add_secret("hunter2");
//! let line = masker.mask("users create a@b.c --password hunter2");
//! assert!(!line.contains("hunter2"));
//! ```

pub mod mask;

pub use mask::{SecretMasker, SECRET_FLAGS};
