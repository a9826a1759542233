use std::collections::BTreeSet;

use tracing::{debug, info};

use super::{catalog::CatalogStore, error::CatalogError};

/// Known namespaces, kept in step with the catalog files of every language.
#[derive(Debug)]
pub struct NamespaceRegistry {
    languages: Vec<String>,
    known: BTreeSet<String>,
}

impl NamespaceRegistry {
    /// Seed the registry from the catalogs already on disk.
    ///
    /// The known set is the union of namespaces over all configured
    /// languages. A language missing one of them gets an empty catalog, so
    /// every language starts out with the same set of files.
    pub fn initialize(store: &CatalogStore, languages: &[String]) -> Result<Self, CatalogError> {
        let mut known = BTreeSet::new();
        for language in languages {
            known.extend(store.namespaces(language)?);
        }
        debug!(count = known.len(), "discovered namespaces");

        let registry = Self {
            languages: languages.to_vec(),
            known,
        };
        for namespace in &registry.known {
            registry.create_missing(store, namespace)?;
        }
        Ok(registry)
    }

    /// Register `namespace`, creating empty catalogs where they are missing.
    ///
    /// Returns the languages for which a catalog was created. A no-op for
    /// namespaces that are already known.
    pub fn ensure(
        &mut self,
        store: &CatalogStore,
        namespace: &str,
    ) -> Result<Vec<String>, CatalogError> {
        if self.known.contains(namespace) {
            return Ok(Vec::new());
        }
        let created = self.create_missing(store, namespace)?;
        self.known.insert(namespace.to_string());
        Ok(created)
    }

    pub fn is_known(&self, namespace: &str) -> bool {
        self.known.contains(namespace)
    }

    pub fn namespaces(&self) -> &BTreeSet<String> {
        &self.known
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Every (language, namespace) pair that should have a catalog.
    pub fn catalogs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.languages.iter().flat_map(|language| {
            self.known
                .iter()
                .map(move |namespace| (language.as_str(), namespace.as_str()))
        })
    }

    fn create_missing(
        &self,
        store: &CatalogStore,
        namespace: &str,
    ) -> Result<Vec<String>, CatalogError> {
        let mut created = Vec::new();
        for language in &self.languages {
            if store.create_empty(language, namespace)? {
                created.push(language.clone());
            }
        }
        if !created.is_empty() {
            info!(namespace, languages = ?created, "created catalog");
        }
        Ok(created)
    }
}
