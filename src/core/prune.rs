use std::collections::BTreeSet;

use tracing::{error, info};

use super::{
    catalog::{Catalog, CatalogStore},
    error::PruneError,
    key::KeyPair,
    registry::NamespaceRegistry,
    usage::UsageIndex,
};

/// Entries removed from one catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrunedCatalog {
    pub language: String,
    pub namespace: String,
    pub removed: Vec<KeyPair>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneSummary {
    /// Only catalogs that lost at least one entry.
    pub catalogs: Vec<PrunedCatalog>,
    /// Catalogs that could not be read or written.
    pub failed: usize,
}

impl PruneSummary {
    pub fn removed_count(&self) -> usize {
        self.catalogs.iter().map(|c| c.removed.len()).sum()
    }
}

/// Entries of `catalog` that are not in `used`.
pub fn stale_entries(catalog: &Catalog, used: Option<&BTreeSet<KeyPair>>) -> Vec<KeyPair> {
    catalog
        .entries()
        .into_iter()
        .filter(|pair| used.is_none_or(|used| !used.contains(pair)))
        .collect()
}

/// Remove every catalog entry that the usage index does not contain.
///
/// The index must come from a full-tree scan. One grown only by single-file
/// scans lacks the keys of every file that was not re-scanned, and pruning
/// against it would delete entries that are still in use; such an index is
/// rejected with [`PruneError::IncompleteUsageIndex`].
pub fn prune_unused(
    store: &CatalogStore,
    registry: &NamespaceRegistry,
    usage: &UsageIndex,
) -> Result<PruneSummary, PruneError> {
    if !usage.is_complete() {
        return Err(PruneError::IncompleteUsageIndex);
    }

    let mut summary = PruneSummary::default();
    for (language, namespace) in registry.catalogs() {
        let used = usage.keys(namespace);
        let pruned = store.update(language, namespace, |catalog| {
            let stale = stale_entries(catalog, used);
            for pair in &stale {
                catalog.remove(pair);
            }
            stale
        });

        match pruned {
            Ok(removed) if removed.is_empty() => {}
            Ok(removed) => {
                info!(language, namespace, count = removed.len(), "removed unused keys");
                summary.catalogs.push(PrunedCatalog {
                    language: language.to_string(),
                    namespace: namespace.to_string(),
                    removed,
                });
            }
            Err(e) => {
                summary.failed += 1;
                error!(language, namespace, error = %e, "failed to prune catalog");
            }
        }
    }
    Ok(summary)
}
