use std::collections::{BTreeSet, HashMap};

use super::key::KeyPair;

/// Keys observed in source during the current scan pass, per namespace.
///
/// The index is *complete* only after a full-tree scan read every source
/// file. Incremental single-file scans grow the index but never make it
/// complete, and only a complete index may drive pruning.
#[derive(Debug, Default)]
pub struct UsageIndex {
    used: HashMap<String, BTreeSet<KeyPair>>,
    complete: bool,
}

impl UsageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything, including completeness. Called when a full scan
    /// starts.
    pub fn reset(&mut self) {
        self.used.clear();
        self.complete = false;
    }

    pub fn record<'a>(&mut self, namespace: &str, pairs: impl IntoIterator<Item = &'a KeyPair>) {
        let entry = self.used.entry(namespace.to_string()).or_default();
        entry.extend(pairs.into_iter().cloned());
    }

    pub fn keys(&self, namespace: &str) -> Option<&BTreeSet<KeyPair>> {
        self.used.get(namespace)
    }

    pub fn contains(&self, namespace: &str, pair: &KeyPair) -> bool {
        self.used
            .get(namespace)
            .is_some_and(|pairs| pairs.contains(pair))
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.used.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.used.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub(crate) fn mark_complete(&mut self) {
        self.complete = true;
    }
}
