use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::warn;
use walkdir::WalkDir;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths under the root.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Which files under the source root take part in a scan.
///
/// Shared by the full-tree walk and the watch loop so both see the same set.
#[derive(Debug, Clone)]
pub struct SourceFilter {
    root: PathBuf,
    extensions: Vec<String>,
    literal_ignores: Vec<PathBuf>,
    glob_ignores: Vec<Pattern>,
}

impl SourceFilter {
    pub fn new(root: impl Into<PathBuf>, extensions: &[String], ignores: &[String]) -> Self {
        let root = root.into();
        let mut literal_ignores = Vec::new();
        let mut glob_ignores = Vec::new();

        for p in ignores {
            if is_glob_pattern(p) {
                match Pattern::new(p) {
                    Ok(pattern) => glob_ignores.push(pattern),
                    Err(e) => warn!(pattern = %p, error = %e, "invalid ignore pattern"),
                }
            } else {
                literal_ignores.push(root.join(p));
            }
        }

        Self {
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect(),
            root,
            literal_ignores,
            glob_ignores,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|allowed| allowed == ext))
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        if self
            .literal_ignores
            .iter()
            .any(|ignore_path| path.starts_with(ignore_path))
        {
            return true;
        }
        let path_str = path.to_string_lossy();
        self.glob_ignores.iter().any(|p| p.matches(&path_str))
    }

    /// A path under the root, with an allowed extension, not ignored.
    pub fn matches(&self, path: &Path) -> bool {
        path.starts_with(&self.root) && self.has_extension(path) && !self.is_ignored(path)
    }
}

/// Result of walking the source tree.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Matching files, sorted for a stable processing order.
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
}

pub fn scan_files(filter: &SourceFilter) -> ScanResult {
    let mut result = ScanResult::default();

    for entry in WalkDir::new(filter.root()) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                result.skipped_count += 1;
                warn!(error = %e, "cannot access path");
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_file() && filter.matches(path) {
            result.files.push(path.to_path_buf());
        }
    }

    result.files.sort();
    result
}
