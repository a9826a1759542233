use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail, ensure};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{
    catalog::is_valid_namespace,
    extract::{DEFAULT_ACCESSOR, DEFAULT_GLOBAL_BINDING, DEFAULT_LOCAL_BINDING},
    sync::DEFAULT_GLOBAL_NAMESPACE,
};

pub const CONFIG_FILE_NAME: &str = ".catsyncrc.json";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_catalog_root")]
    pub catalog_root: String,
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_global_namespace")]
    pub global_namespace: String,
    #[serde(default = "default_accessor")]
    pub accessor: String,
    #[serde(default = "default_local_binding")]
    pub local_binding: String,
    #[serde(default = "default_global_binding")]
    pub global_binding: String,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default)]
    pub prune_unused: bool,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_catalog_root() -> String {
    "./public/locales".to_string()
}

fn default_source_root() -> String {
    "./src".to_string()
}

fn default_languages() -> Vec<String> {
    ["en", "de"].map(String::from).to_vec()
}

fn default_extensions() -> Vec<String> {
    ["ts", "tsx"].map(String::from).to_vec()
}

fn default_global_namespace() -> String {
    DEFAULT_GLOBAL_NAMESPACE.to_string()
}

fn default_accessor() -> String {
    DEFAULT_ACCESSOR.to_string()
}

fn default_local_binding() -> String {
    DEFAULT_LOCAL_BINDING.to_string()
}

fn default_global_binding() -> String {
    DEFAULT_GLOBAL_BINDING.to_string()
}

fn default_ignores() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

fn default_poll_interval_ms() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_root: default_catalog_root(),
            source_root: default_source_root(),
            languages: default_languages(),
            extensions: default_extensions(),
            global_namespace: default_global_namespace(),
            accessor: default_accessor(),
            local_binding: default_local_binding(),
            global_binding: default_global_binding(),
            ignores: default_ignores(),
            prune_unused: false,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// A JavaScript-style identifier: the extractor builds its patterns from these.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        ensure!(!self.languages.is_empty(), "'languages' must not be empty");
        ensure!(!self.extensions.is_empty(), "'extensions' must not be empty");
        for language in &self.languages {
            if language.is_empty() || language.contains(['/', '\\']) {
                bail!("Invalid language in 'languages': \"{}\"", language);
            }
        }
        if !is_valid_namespace(&self.global_namespace) {
            bail!(
                "Invalid 'globalNamespace': \"{}\"",
                self.global_namespace
            );
        }

        for (field, name) in [
            ("accessor", &self.accessor),
            ("localBinding", &self.local_binding),
            ("globalBinding", &self.global_binding),
        ] {
            ensure!(
                is_identifier(name),
                "'{}' must be an identifier, got \"{}\"",
                field,
                name
            );
        }
        ensure!(
            self.local_binding != self.global_binding,
            "'localBinding' and 'globalBinding' must differ"
        );
        ensure!(self.poll_interval_ms > 0, "'pollIntervalMs' must be positive");

        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// The file the config came from, `None` when using defaults.
    pub path: Option<PathBuf>,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
