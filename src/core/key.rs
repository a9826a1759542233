use std::fmt;

/// A translation key as written at a call site, split at the first dot.
///
/// - `t("heading.title")` -> `outer = "heading"`, `inner = Some("title")`
/// - `t("save")` -> `outer = "save"`, `inner = None` (flat key)
/// - `t("a.b.c")` -> `outer = "a"`, `inner = Some("b.c")`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyPair {
    pub outer: String,
    pub inner: Option<String>,
}

impl KeyPair {
    pub fn nested(outer: impl Into<String>, inner: impl Into<String>) -> Self {
        Self {
            outer: outer.into(),
            inner: Some(inner.into()),
        }
    }

    pub fn flat(outer: impl Into<String>) -> Self {
        Self {
            outer: outer.into(),
            inner: None,
        }
    }

    /// Parse a key literal. Returns `None` when the outer segment is empty.
    ///
    /// A trailing dot (`"save."`) yields the flat key `save`.
    pub fn parse(literal: &str) -> Option<Self> {
        let (outer, inner) = match literal.split_once('.') {
            Some((outer, inner)) => (outer, Some(inner)),
            None => (literal, None),
        };
        if outer.is_empty() {
            return None;
        }
        Some(match inner {
            Some(inner) if !inner.is_empty() => Self::nested(outer, inner),
            _ => Self::flat(outer),
        })
    }

    /// Value written for a freshly discovered key: the key itself.
    pub fn placeholder(&self) -> String {
        self.to_string()
    }

    pub fn is_flat(&self) -> bool {
        self.inner.is_none()
    }
}

impl fmt::Display for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Some(inner) => write!(f, "{}.{}", self.outer, inner),
            None => f.write_str(&self.outer),
        }
    }
}
