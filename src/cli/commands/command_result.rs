use std::path::PathBuf;

use super::super::exit_status::ExitStatus;
use crate::core::{PassReport, WatchSummary};

#[derive(Debug)]
pub enum CommandSummary {
    Sync(PassReport),
    Watch(WatchSummary),
    Sort(SortSummary),
    Init(InitSummary),
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SortSummary {
    pub sorted: usize,
    pub failed: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub struct InitSummary {
    pub path: PathBuf,
    /// False when a config file was already there.
    pub created: bool,
}

/// Result of running a catsync command
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    pub status: ExitStatus,
}

impl CommandResult {
    pub fn new(summary: CommandSummary, has_failures: bool) -> Self {
        let status = if has_failures {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        };
        Self { summary, status }
    }
}
