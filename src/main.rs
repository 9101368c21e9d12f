//! invenio-init entry point.

use std::process::ExitCode;

use clap::Parser;
use invenio_init::cli::{run, Cli, LogFormat};
use invenio_init::InitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool, format: LogFormat) {
    let filter = if debug {
        EnvFilter::new("invenio_init=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("invenio_init=info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(fmt::layer().with_target(false)).init(),
        LogFormat::Json => registry
            .with(fmt::layer().with_target(false).json())
            .init(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug, cli.log_format);

    tracing::debug!("invenio-init starting with args: {:?}", cli);

    match run(&cli) {
        Ok(never) => match never {},
        Err(InitError::NoCommand) => {
            tracing::error!("{}", InitError::NoCommand);
            ExitCode::from(1)
        }
        Err(e) => {
            tracing::error!("Initialization failed: {}", e);
            ExitCode::from(1)
        }
    }
}
