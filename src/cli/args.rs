//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use crate::config::Overrides;
use clap::builder::BoolishValueParser;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Provision an Invenio RDM instance on first boot, then exec the server.
#[derive(Debug, Parser)]
#[command(name = "invenio-init")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// YAML settings file
    #[arg(short, long, env = "INVENIO_INIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Lock file shared by replicas (default /tmp/invenio_init.lock)
    #[arg(long, env = "INVENIO_INIT_LOCK_FILE")]
    pub lock_file: Option<PathBuf>,

    /// Seconds to wait for another replica's lock (default 300)
    #[arg(long, value_name = "SECS", env = "INVENIO_INIT_LOCK_TIMEOUT")]
    pub lock_timeout: Option<u64>,

    /// Application CLI: program and leading arguments, space-separated
    #[arg(
        long,
        value_name = "PROGRAM",
        value_delimiter = ' ',
        env = "INVENIO_INIT_CLI"
    )]
    pub cli: Option<Vec<String>>,

    /// Skip locking and provisioning; exec the command immediately
    #[arg(
        long,
        env = "INVENIO_INIT_SKIP",
        value_parser = BoolishValueParser::new()
    )]
    pub skip_provision: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value_t = LogFormat::Text,
        env = "INVENIO_INIT_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Command to exec once initialization is done (e.g. gunicorn, celery)
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

impl Cli {
    /// Settings overrides carried by the command line.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            lock_file: self.lock_file.clone(),
            lock_timeout: self.lock_timeout,
            cli: self.cli.clone(),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line, for log collectors
    Json,
}
