//! Running the application CLI and handing off to the server process.

pub mod command;
pub mod exec;
pub mod mock;

pub use command::{execute, CommandOptions, CommandResult, CommandRunner, SystemRunner};
pub use exec::handoff;
pub use mock::MockRunner;
