//! Dispatches to the command handler for the parsed arguments.
//!
//! Returns `Err` only for errors that prevent a command from running at all
//! (bad config, missing roots); those map to exit status 2.

use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, init::init, sort::sort, sync::sync},
};

pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Sync(args)) => sync(args),
        Some(Command::Sort(args)) => sort(args),
        Some(Command::Init(args)) => init(args),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
