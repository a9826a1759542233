use anyhow::Result;
use tracing::error;

use super::super::args::SortArgs;
use super::{CommandResult, CommandSummary, SortSummary, context::CommandContext};
use crate::core::{CatalogStore, SyncError};

/// Re-format every `*.json` file in every directory of the catalog root,
/// configured language or not.
pub fn sort(args: SortArgs) -> Result<CommandResult> {
    let ctx = CommandContext::new(&args.common)?;
    let root = ctx.settings.catalog_root;
    if !root.is_dir() {
        return Err(SyncError::MissingRoot {
            what: "catalog",
            path: root,
        }
        .into());
    }

    let store = CatalogStore::new(root);
    let mut summary = SortSummary::default();
    for language in store.language_dirs()? {
        for namespace in store.namespaces(&language)? {
            match store.resort(&language, &namespace) {
                Ok(()) => summary.sorted += 1,
                Err(e) => {
                    summary.failed += 1;
                    error!(language, namespace, error = %e, "failed to sort catalog");
                }
            }
        }
    }

    let has_failures = summary.failed > 0;
    Ok(CommandResult::new(CommandSummary::Sort(summary), has_failures))
}
