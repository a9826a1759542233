use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures touching a single catalog file.
///
/// Decode failures are not represented here: an unreadable catalog is
/// recovered as an empty one (with a warning) by the store.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read catalog {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write catalog {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize catalog {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{what} directory '{}' does not exist", path.display())]
    MissingRoot { what: &'static str, path: PathBuf },

    #[error("failed to read source file {}: {source}", path.display())]
    ReadSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to list {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid extractor pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Error)]
pub enum PruneError {
    /// Pruning against a partial index would delete keys that are still used
    /// by files that were not re-scanned.
    #[error(
        "refusing to prune: the usage index does not come from a complete scan of the source tree"
    )]
    IncompleteUsageIndex,
}

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to watch {}: {source}", path.display())]
    Subscribe {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("failed to stop watching {}: {source}", path.display())]
    Unsubscribe {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}
