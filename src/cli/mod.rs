pub mod commands;
pub mod format;
pub mod output;
mod shell;
pub mod table;

pub use commands::{CliMode, CommandError, ShellContext};
pub use shell::{run_cli, CliError};
