//! Pattern-based extraction of namespaces and keys from one source file.
//!
//! Two call shapes are recognised, mirroring how react-i18next is used:
//!
//! ```text
//! const [t] = useTranslation("recipe");   // local namespace "recipe"
//! const [tg] = useTranslation();          // global namespace
//! t("heading.title")                      // ("heading", "title") in "recipe"
//! tg("label.name")                        // ("label", "name") in the global namespace
//! ```
//!
//! Only one accessor name, one local binding and one global binding are
//! understood. A file that binds the accessor to other names
//! (`const [tx] = useTranslation("x")`) contributes nothing for those names,
//! and every local key in a file is attributed to every local namespace the
//! file declares. This is a limitation of the tool, not something the
//! patterns try to work around.
//!
//! Escape sequences are not decoded. A literal containing a backslash
//! (`t("msg.it\"s")`) is matched whole but skipped, as is a namespace that
//! could not be used as a file name inside a language directory.

use std::collections::HashSet;

use regex::{Captures, Regex};
use tracing::warn;

use super::{catalog::is_valid_namespace, key::KeyPair};

pub const DEFAULT_ACCESSOR: &str = "useTranslation";
pub const DEFAULT_LOCAL_BINDING: &str = "t";
pub const DEFAULT_GLOBAL_BINDING: &str = "tg";

/// A single- or double-quoted string literal, captured in group 1 or 2.
/// Backslash escapes are consumed so an escaped quote does not end it.
const STRING_LITERAL: &str = r#"(?:"((?:[^"\\\n]|\\.)*)"|'((?:[^'\\\n]|\\.)*)')"#;

/// Names of the accessor and the two bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallNames {
    pub accessor: String,
    pub local_binding: String,
    pub global_binding: String,
}

impl Default for CallNames {
    fn default() -> Self {
        Self {
            accessor: DEFAULT_ACCESSOR.to_string(),
            local_binding: DEFAULT_LOCAL_BINDING.to_string(),
            global_binding: DEFAULT_GLOBAL_BINDING.to_string(),
        }
    }
}

/// What one source file declares and uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// The file calls the accessor without arguments.
    pub declares_global: bool,
    /// Local namespaces in order of first declaration.
    pub local_namespaces: Vec<String>,
    /// Keys used through the local binding.
    pub local_keys: Vec<KeyPair>,
    /// Keys used through the global binding. Empty unless `declares_global`.
    pub global_keys: Vec<KeyPair>,
}

impl Extraction {
    /// Namespaces touched by this file, each with the keys attributed to it.
    pub fn attributions<'a>(
        &'a self,
        global_namespace: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a [KeyPair])> + 'a {
        let global = self
            .declares_global
            .then_some((global_namespace, self.global_keys.as_slice()));
        self.local_namespaces
            .iter()
            .map(|namespace| (namespace.as_str(), self.local_keys.as_slice()))
            .chain(global)
    }

    pub fn is_empty(&self) -> bool {
        !self.declares_global && self.local_namespaces.is_empty()
    }
}

pub struct Extractor {
    accessor: Regex,
    local_call: Regex,
    global_call: Regex,
}

impl Extractor {
    pub fn new(names: &CallNames) -> Result<Self, regex::Error> {
        let accessor = Regex::new(&format!(
            r"\b{}\(\s*(?:{}\s*)?\)",
            regex::escape(&names.accessor),
            STRING_LITERAL
        ))?;
        Ok(Self {
            accessor,
            local_call: call_pattern(&names.local_binding)?,
            global_call: call_pattern(&names.global_binding)?,
        })
    }

    pub fn extract(&self, source: &str) -> Extraction {
        let mut extraction = Extraction::default();
        let mut seen_namespaces = HashSet::new();

        for caps in self.accessor.captures_iter(source) {
            match literal(&caps) {
                None => extraction.declares_global = true,
                Some("") => {}
                Some(namespace) if !is_valid_namespace(namespace) => {
                    warn!(namespace, "skipping namespace that is not a plain file name");
                }
                Some(namespace) => {
                    if seen_namespaces.insert(namespace) {
                        extraction.local_namespaces.push(namespace.to_string());
                    }
                }
            }
        }

        if !extraction.local_namespaces.is_empty() {
            extraction.local_keys = keys(&self.local_call, source);
        }
        if extraction.declares_global {
            extraction.global_keys = keys(&self.global_call, source);
        }
        extraction
    }
}

/// `name("...")` not preceded by an identifier character, `$` or `.`.
fn call_pattern(binding: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?:^|[^\w$.]){}\(\s*{}",
        regex::escape(binding),
        STRING_LITERAL
    ))
}

fn literal<'h>(caps: &Captures<'h>) -> Option<&'h str> {
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

fn keys(pattern: &Regex, source: &str) -> Vec<KeyPair> {
    let mut seen = HashSet::new();
    pattern
        .captures_iter(source)
        .filter_map(|caps| literal(&caps))
        .filter(|text| !text.contains('\\'))
        .filter_map(KeyPair::parse)
        .filter(|pair| seen.insert(pair.clone()))
        .collect()
}
