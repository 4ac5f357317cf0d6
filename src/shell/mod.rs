//! External command execution.

pub mod command;
pub mod mock;

pub use command::{display_command, CommandOutput, CommandRunner, SystemRunner};
pub use mock::MockRunner;
