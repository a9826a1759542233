//! Catalog files: `root/{language}/{namespace}.json`.
//!
//! [`Catalog`] is the in-memory JSON object with the merge and prune rules.
//! [`CatalogStore`] owns the files on disk: reading with decode-failure
//! recovery, sorted 4-space formatting, atomic writes, and one write lock per
//! catalog so that overlapping load-modify-save cycles cannot lose updates.

use std::{
    collections::{BTreeSet, HashMap},
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use serde::Serialize;
use serde_json::{Map, Value, ser::PrettyFormatter};
use thiserror::Error;
use tracing::{debug, warn};

use super::{error::CatalogError, key::KeyPair};

pub const CATALOG_EXTENSION: &str = "json";

const INDENT: &[u8] = b"    ";

/// Whether `namespace` can be a catalog file directly inside a language
/// directory: non-empty, without path separators.
pub fn is_valid_namespace(namespace: &str) -> bool {
    !namespace.is_empty() && !namespace.contains(['/', '\\', '\0'])
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("top-level value is not an object")]
    NotAnObject,
}

/// One namespace's translations for one language.
///
/// Top-level values are either strings (flat keys) or objects of
/// inner-key -> string (nested keys).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Map<String, Value>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(content: &str) -> Result<Self, DecodeError> {
        match serde_json::from_str(content)? {
            Value::Object(entries) => Ok(Self { entries }),
            _ => Err(DecodeError::NotAnObject),
        }
    }

    pub fn get(&self, outer: &str) -> Option<&Value> {
        self.entries.get(outer)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert the placeholder for `pair` unless an entry already exists.
    ///
    /// Returns `true` if something was added. Existing values are never
    /// changed, except that a nested key forces its outer entry to be an
    /// object: a flat string sitting where a group is needed gets replaced.
    pub fn insert_missing(&mut self, pair: &KeyPair) -> bool {
        let Some(inner) = &pair.inner else {
            if self.entries.contains_key(&pair.outer) {
                return false;
            }
            self.entries
                .insert(pair.outer.clone(), Value::String(pair.placeholder()));
            return true;
        };

        let slot = self
            .entries
            .entry(pair.outer.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            warn!(
                key = %pair.outer,
                previous = %slot,
                "flat entry replaced by a group because `{}` is used",
                pair
            );
            *slot = Value::Object(Map::new());
        }
        let Some(group) = slot.as_object_mut() else {
            return false;
        };
        if group.contains_key(inner) {
            return false;
        }
        group.insert(inner.clone(), Value::String(pair.placeholder()));
        true
    }

    /// Every key pair stored in this catalog.
    ///
    /// An object yields one nested pair per inner key, anything else one flat
    /// pair.
    pub fn entries(&self) -> BTreeSet<KeyPair> {
        let mut pairs = BTreeSet::new();
        for (outer, value) in &self.entries {
            match value {
                Value::Object(group) => {
                    pairs.extend(group.keys().map(|inner| KeyPair::nested(outer, inner)));
                }
                _ => {
                    pairs.insert(KeyPair::flat(outer));
                }
            }
        }
        pairs
    }

    /// Remove `pair`, dropping its group once the group is empty.
    pub fn remove(&mut self, pair: &KeyPair) -> bool {
        match &pair.inner {
            None => {
                let is_flat = self
                    .entries
                    .get(&pair.outer)
                    .is_some_and(|value| !value.is_object());
                is_flat && self.entries.remove(&pair.outer).is_some()
            }
            Some(inner) => {
                let Some(Value::Object(group)) = self.entries.get_mut(&pair.outer) else {
                    return false;
                };
                let removed = group.remove(inner).is_some();
                if removed && group.is_empty() {
                    self.entries.remove(&pair.outer);
                }
                removed
            }
        }
    }

    /// Serialize with 4-space indentation and a trailing newline.
    ///
    /// `serde_json::Map` is ordered by key, so every level comes out sorted.
    pub fn to_pretty_string(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
        self.entries.serialize(&mut serializer)?;
        let mut content = String::from_utf8_lossy(&buf).into_owned();
        content.push('\n');
        Ok(content)
    }
}

/// Result of merging key pairs into one catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The catalog file does not exist; nothing was written.
    MissingCatalog,
    Unchanged,
    Added(usize),
}

impl MergeOutcome {
    pub fn added(self) -> usize {
        match self {
            MergeOutcome::Added(count) => count,
            _ => 0,
        }
    }
}

/// Catalog files under one root directory.
pub struct CatalogStore {
    root: PathBuf,
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl CatalogStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, language: &str, namespace: &str) -> PathBuf {
        self.root
            .join(language)
            .join(format!("{}.{}", namespace, CATALOG_EXTENSION))
    }

    pub fn exists(&self, language: &str, namespace: &str) -> bool {
        self.path(language, namespace).is_file()
    }

    /// Namespaces that have a catalog file for `language`.
    ///
    /// A missing language directory has no namespaces.
    pub fn namespaces(&self, language: &str) -> Result<BTreeSet<String>, CatalogError> {
        let dir = self.root.join(language);
        let read_dir = match fs::read_dir(&dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(source) => return Err(CatalogError::Read { path: dir, source }),
        };

        let mut namespaces = BTreeSet::new();
        for entry in read_dir {
            let entry = entry.map_err(|source| CatalogError::Read {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(CATALOG_EXTENSION)
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                namespaces.insert(stem.to_string());
            }
        }
        Ok(namespaces)
    }

    /// Every directory directly under the root, whether configured or not.
    pub fn language_dirs(&self) -> Result<Vec<String>, CatalogError> {
        let read_dir = fs::read_dir(&self.root).map_err(|source| CatalogError::Read {
            path: self.root.clone(),
            source,
        })?;
        let mut languages = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|source| CatalogError::Read {
                path: self.root.clone(),
                source,
            })?;
            if entry.path().is_dir()
                && let Some(name) = entry.file_name().to_str()
            {
                languages.push(name.to_string());
            }
        }
        languages.sort();
        Ok(languages)
    }

    /// Read a catalog. Content that is not a JSON object is treated as empty.
    pub fn load(&self, language: &str, namespace: &str) -> Result<Catalog, CatalogError> {
        read_catalog(&self.path(language, namespace))
    }

    pub fn save(
        &self,
        language: &str,
        namespace: &str,
        catalog: &Catalog,
    ) -> Result<(), CatalogError> {
        let path = self.path(language, namespace);
        let lock = self.lock_for(&path);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        write_catalog(&path, catalog)
    }

    /// Write `{}` unless the catalog already exists. Returns whether a file
    /// was created.
    pub fn create_empty(&self, language: &str, namespace: &str) -> Result<bool, CatalogError> {
        let path = self.path(language, namespace);
        let lock = self.lock_for(&path);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        if path.exists() {
            return Ok(false);
        }
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| CatalogError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        write_catalog(&path, &Catalog::new())?;
        Ok(true)
    }

    /// Add placeholders for the pairs that have no entry yet.
    pub fn merge(
        &self,
        language: &str,
        namespace: &str,
        pairs: &[KeyPair],
    ) -> Result<MergeOutcome, CatalogError> {
        let path = self.path(language, namespace);
        let lock = self.lock_for(&path);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if !path.is_file() {
            warn!(
                language,
                namespace,
                path = %path.display(),
                "catalog missing for a known namespace, skipping merge"
            );
            return Ok(MergeOutcome::MissingCatalog);
        }

        let mut catalog = read_catalog(&path)?;
        let added = pairs
            .iter()
            .filter(|pair| catalog.insert_missing(pair))
            .count();
        if added == 0 {
            return Ok(MergeOutcome::Unchanged);
        }
        write_catalog(&path, &catalog)?;
        debug!(language, namespace, added, "merged keys");
        Ok(MergeOutcome::Added(added))
    }

    /// Load and save without changing content, normalizing the formatting.
    pub fn resort(&self, language: &str, namespace: &str) -> Result<(), CatalogError> {
        self.update(language, namespace, |_| ())
    }

    /// Run a load-modify-save cycle on one catalog while holding its lock.
    pub fn update<T>(
        &self,
        language: &str,
        namespace: &str,
        f: impl FnOnce(&mut Catalog) -> T,
    ) -> Result<T, CatalogError> {
        let path = self.path(language, namespace);
        let lock = self.lock_for(&path);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut catalog = read_catalog(&path)?;
        let result = f(&mut catalog);
        write_catalog(&path, &catalog)?;
        Ok(result)
    }

    fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(path.to_path_buf()).or_default().clone()
    }
}

fn read_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            CatalogError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            CatalogError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    match Catalog::parse(&content) {
        Ok(catalog) => Ok(catalog),
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "catalog could not be decoded; treating it as empty, its content will be replaced"
            );
            Ok(Catalog::new())
        }
    }
}

/// Write to a sibling temp file, then rename over the target.
fn write_catalog(path: &Path, catalog: &Catalog) -> Result<(), CatalogError> {
    let content = catalog
        .to_pretty_string()
        .map_err(|source| CatalogError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;

    let temp_path = path.with_extension(format!("{}.tmp", CATALOG_EXTENSION));
    let written = fs::write(&temp_path, content).and_then(|()| fs::rename(&temp_path, path));
    if let Err(source) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(CatalogError::Write {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}
