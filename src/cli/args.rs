//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `sync`: scan the source tree, fill catalogs, optionally prune and watch
//! - `sort`: re-format every catalog file
//! - `init`: write a default `.catsyncrc.json`

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Sync(args)) => args.common.verbose,
            Some(Command::Sort(args)) => args.common.verbose,
            Some(Command::Init(args)) => args.verbose,
            None => false,
        }
    }
}

/// Common arguments shared by `sync` and `sort`.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Project directory; relative paths in the config resolve against it
    #[arg(long, default_value = ".")]
    pub project_root: PathBuf,

    /// Catalog root containing one directory per language (overrides config file)
    #[arg(long)]
    pub catalog_root: Option<PathBuf>,

    /// Source code root directory (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Languages to keep in sync, comma separated (overrides config file)
    #[arg(long, value_delimiter = ',')]
    pub languages: Option<Vec<String>>,

    /// Source file extensions, comma separated (overrides config file)
    #[arg(long, value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// Namespace for keys of the global binding (overrides config file)
    #[arg(long)]
    pub global_namespace: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Remove catalog entries no longer used in source after the scan
    #[arg(long)]
    pub prune: bool,

    /// Keep running and update catalogs whenever a source file changes
    #[arg(long)]
    pub watch: bool,

    /// Detect changes by polling instead of native file notifications
    #[arg(long, requires = "watch")]
    pub poll: bool,
}

#[derive(Debug, Args)]
pub struct SortArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory to create the config file in
    #[arg(long, default_value = ".")]
    pub project_root: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add missing keys to every catalog, optionally prune and watch
    Sync(SyncArgs),
    /// Re-format all catalog files with sorted keys
    Sort(SortArgs),
    /// Initialize a new .catsyncrc.json configuration file
    Init(InitArgs),
}
