//! Catalog synchronization engine.
//!
//! - `catalog`: reading, merging and atomically writing catalog files
//! - `extract`: namespaces and keys from one source file
//! - `registry`: which namespaces have catalogs in every language
//! - `usage`: keys seen in source, per namespace
//! - `sync`: full-tree and single-file passes
//! - `prune`: removal of entries no longer used
//! - `watch`: the live loop over file changes

pub mod catalog;
pub mod error;
pub mod extract;
pub mod key;
pub mod prune;
pub mod registry;
pub mod scanner;
pub mod sync;
pub mod usage;
pub mod watch;

pub use catalog::{Catalog, CatalogStore, MergeOutcome};
pub use error::{CatalogError, PruneError, SyncError, WatchError};
pub use extract::{CallNames, Extraction, Extractor};
pub use key::KeyPair;
pub use prune::{PruneSummary, PrunedCatalog};
pub use registry::NamespaceRegistry;
pub use scanner::SourceFilter;
pub use sync::{
    DEFAULT_GLOBAL_NAMESPACE, FileOutcome, PassReport, ScanSummary, SyncSettings, Synchronizer,
};
pub use usage::UsageIndex;
pub use watch::{Backend, ChangeEvent, ChangeSource, NotifySource, WatchLoop, WatchState, WatchSummary};
