mod commands;
mod completion;
mod context;
mod help;
pub mod output;
mod render;
mod shell;

pub use context::{CliError, CliMode, CommandError, ShellContext, HOME_ENV, SCRIPT_ENV};
pub use shell::run_cli;
