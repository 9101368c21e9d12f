//! Command-line interface.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`entrypoint`] - Lock, provision, hand off

pub mod args;
pub mod entrypoint;

pub use args::{Cli, LogFormat};
pub use entrypoint::{initialize, run};
