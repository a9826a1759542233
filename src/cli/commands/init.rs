use std::fs;

use anyhow::{Context, Result};

use super::super::args::InitArgs;
use super::{CommandResult, CommandSummary, InitSummary};
use crate::config::{CONFIG_FILE_NAME, default_config_json};

pub fn init(args: InitArgs) -> Result<CommandResult> {
    let path = args.project_root.join(CONFIG_FILE_NAME);

    if path.exists() {
        return Ok(CommandResult::new(
            CommandSummary::Init(InitSummary {
                path,
                created: false,
            }),
            true,
        ));
    }

    fs::write(&path, default_config_json()? + "\n")
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(CommandResult::new(
        CommandSummary::Init(InitSummary {
            path,
            created: true,
        }),
        false,
    ))
}
