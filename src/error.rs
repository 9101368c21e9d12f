//! Error types for initialization.
//!
//! This module defines [`InitError`], the error type used throughout the
//! crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `InitError` for failures the entrypoint reports or reacts to
//! - Use `anyhow::Error` (via `InitError::Other`) for unexpected errors
//! - Command lines stored in errors are masked before they get here

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for initialization.
#[derive(Debug, Error)]
pub enum InitError {
    /// Another process kept the initialization lock for too long.
    #[error("Failed to acquire lock {path} after {waited_secs} seconds")]
    LockTimeout { path: PathBuf, waited_secs: u64 },

    /// The lock file could not be opened or locked.
    #[error("Lock error on {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The program could not be started at all.
    #[error("Failed to start command: {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A checked command exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The settings file does not exist.
    #[error("Config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse the settings file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Settings are structurally valid but unusable.
    #[error("Invalid configuration: {message}")]
    ConfigInvalid { message: String },

    /// Nothing to hand off to after initialization.
    #[error("No command provided to execute.")]
    NoCommand,

    /// Replacing the process with the application failed.
    #[error("Failed to execute {command}: {source}")]
    Exec {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for initialization operations.
pub type Result<T> = std::result::Result<T, InitError>;
