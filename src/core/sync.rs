//! Full-tree and single-file synchronization.
//!
//! [`Synchronizer`] is the context object for one run: it owns the settings,
//! the extractor, the catalog store, the namespace registry and the usage
//! index. Nothing here is process-global, so several synchronizers over
//! different trees can coexist (the tests rely on that).

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, error, info, warn};

use super::{
    catalog::{CatalogStore, MergeOutcome},
    error::{PruneError, SyncError},
    extract::{CallNames, Extractor},
    prune::{PruneSummary, prune_unused},
    registry::NamespaceRegistry,
    scanner::{SourceFilter, scan_files},
    usage::UsageIndex,
};

pub const DEFAULT_GLOBAL_NAMESPACE: &str = "translation";

/// Plain parameters for a synchronizer; the CLI builds these from the
/// config file and its flags.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub catalog_root: PathBuf,
    pub source_root: PathBuf,
    pub languages: Vec<String>,
    pub extensions: Vec<String>,
    pub ignores: Vec<String>,
    pub global_namespace: String,
    pub call_names: CallNames,
}

/// What processing one source file did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileOutcome {
    /// Namespaces the file declares (local ones first, then the global one).
    pub namespaces: Vec<String>,
    pub keys_added: usize,
    pub catalogs_created: usize,
    /// Catalogs skipped because their file was missing.
    pub catalogs_missing: usize,
    /// Catalogs that could not be created or written.
    pub catalogs_failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub files_scanned: usize,
    pub files_failed: usize,
    /// Paths the tree walk could not access.
    pub paths_skipped: usize,
    pub keys_added: usize,
    pub catalogs_created: usize,
    pub catalogs_missing: usize,
    pub catalogs_failed: usize,
    pub catalogs_sorted: usize,
}

impl ScanSummary {
    fn absorb(&mut self, outcome: &FileOutcome) {
        self.keys_added += outcome.keys_added;
        self.catalogs_created += outcome.catalogs_created;
        self.catalogs_missing += outcome.catalogs_missing;
        self.catalogs_failed += outcome.catalogs_failed;
    }

    pub fn has_failures(&self) -> bool {
        self.files_failed > 0 || self.paths_skipped > 0 || self.catalogs_failed > 0
    }
}

/// A full scan, optionally followed by pruning.
#[derive(Debug)]
pub struct PassReport {
    pub scan: ScanSummary,
    /// `None` when pruning was not requested.
    pub prune: Option<Result<PruneSummary, PruneError>>,
}

impl PassReport {
    pub fn has_failures(&self) -> bool {
        self.scan.has_failures()
            || match &self.prune {
                Some(Ok(summary)) => summary.failed > 0,
                Some(Err(_)) => true,
                None => false,
            }
    }
}

pub struct Synchronizer {
    global_namespace: String,
    filter: SourceFilter,
    extractor: Extractor,
    store: Arc<CatalogStore>,
    registry: NamespaceRegistry,
    usage: UsageIndex,
}

impl Synchronizer {
    /// Check both roots and seed the namespace registry from disk.
    pub fn new(settings: SyncSettings) -> Result<Self, SyncError> {
        if !settings.catalog_root.is_dir() {
            return Err(SyncError::MissingRoot {
                what: "catalog",
                path: settings.catalog_root,
            });
        }
        if !settings.source_root.is_dir() {
            return Err(SyncError::MissingRoot {
                what: "source",
                path: settings.source_root,
            });
        }
        // Watch events carry absolute paths; match them against the same root.
        let source_root =
            fs::canonicalize(&settings.source_root).map_err(|source| SyncError::Walk {
                path: settings.source_root.clone(),
                source,
            })?;

        let extractor = Extractor::new(&settings.call_names)?;
        let store = Arc::new(CatalogStore::new(settings.catalog_root));
        let registry = NamespaceRegistry::initialize(&store, &settings.languages)?;
        debug!(
            namespaces = ?registry.namespaces(),
            languages = ?registry.languages(),
            "registry initialized"
        );

        Ok(Self {
            global_namespace: settings.global_namespace,
            filter: SourceFilter::new(source_root, &settings.extensions, &settings.ignores),
            extractor,
            store,
            registry,
            usage: UsageIndex::new(),
        })
    }

    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    pub fn registry(&self) -> &NamespaceRegistry {
        &self.registry
    }

    pub fn usage(&self) -> &UsageIndex {
        &self.usage
    }

    pub fn filter(&self) -> &SourceFilter {
        &self.filter
    }

    /// Whether a change to `path` should trigger [`Synchronizer::scan_one`].
    pub fn watches(&self, path: &Path) -> bool {
        self.filter.matches(path)
    }

    /// Scan the whole source tree from a fresh usage index, then normalize
    /// every catalog.
    ///
    /// The usage index is marked complete only when every file was read, so
    /// a pass with unreadable files cannot drive pruning.
    pub fn scan_all(&mut self) -> ScanSummary {
        self.usage.reset();
        let mut summary = ScanSummary::default();

        let scan = scan_files(&self.filter);
        summary.paths_skipped = scan.skipped_count;

        for path in &scan.files {
            match self.scan_one(path) {
                Ok(outcome) => {
                    summary.files_scanned += 1;
                    summary.absorb(&outcome);
                }
                Err(e) => {
                    summary.files_failed += 1;
                    error!(path = %path.display(), error = %e, "failed to scan source file");
                }
            }
        }

        let (sorted, failed) = self.resort_all();
        summary.catalogs_sorted = sorted;
        summary.catalogs_failed += failed;

        if summary.files_failed == 0 && summary.paths_skipped == 0 {
            self.usage.mark_complete();
        } else {
            warn!("some source files were not scanned; pruning is disabled for this pass");
        }

        info!(
            files = summary.files_scanned,
            keys_added = summary.keys_added,
            catalogs_created = summary.catalogs_created,
            "scan complete"
        );
        summary
    }

    /// Process one source file: register its namespaces, merge its keys into
    /// every language and record them in the usage index.
    ///
    /// The usage index is not reset and catalogs are not re-sorted.
    pub fn scan_one(&mut self, path: &Path) -> Result<FileOutcome, SyncError> {
        let source = fs::read_to_string(path).map_err(|source| SyncError::ReadSource {
            path: path.to_path_buf(),
            source,
        })?;
        let extraction = self.extractor.extract(&source);
        let global_namespace = self.global_namespace.clone();

        let mut outcome = FileOutcome::default();
        for (namespace, pairs) in extraction.attributions(&global_namespace) {
            outcome.namespaces.push(namespace.to_string());
            self.usage.record(namespace, pairs);

            match self.registry.ensure(&self.store, namespace) {
                Ok(created) => outcome.catalogs_created += created.len(),
                Err(e) => {
                    outcome.catalogs_failed += 1;
                    error!(namespace, error = %e, "failed to create catalogs");
                }
            }

            for language in self.registry.languages() {
                match self.store.merge(language, namespace, pairs) {
                    Ok(MergeOutcome::MissingCatalog) => outcome.catalogs_missing += 1,
                    Ok(merged) => outcome.keys_added += merged.added(),
                    Err(e) => {
                        outcome.catalogs_failed += 1;
                        error!(language, namespace, error = %e, "failed to merge keys");
                    }
                }
            }
        }

        debug!(
            path = %path.display(),
            namespaces = ?outcome.namespaces,
            keys_added = outcome.keys_added,
            "scanned file"
        );
        Ok(outcome)
    }

    /// Delete catalog entries no longer used in source.
    ///
    /// Only valid right after [`Synchronizer::scan_all`]; see
    /// [`prune_unused`].
    pub fn prune_unused(&mut self) -> Result<PruneSummary, PruneError> {
        prune_unused(&self.store, &self.registry, &self.usage)
    }

    /// `scan_all`, then `prune_unused` when asked to.
    pub fn full_pass(&mut self, prune: bool) -> PassReport {
        let scan = self.scan_all();
        let prune = prune.then(|| self.prune_unused());
        PassReport { scan, prune }
    }

    fn resort_all(&self) -> (usize, usize) {
        let mut sorted = 0;
        let mut failed = 0;
        for (language, namespace) in self.registry.catalogs() {
            match self.store.resort(language, namespace) {
                Ok(()) => sorted += 1,
                Err(e) => {
                    failed += 1;
                    error!(language, namespace, error = %e, "failed to sort catalog");
                }
            }
        }
        (sorted, failed)
    }
}
