use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::debug;

use super::super::args::CommonArgs;
use crate::{
    config::{Config, ConfigLoadResult, load_config},
    core::{CallNames, SyncSettings},
};

/// Config file merged with command line overrides.
pub struct CommandContext {
    pub project_root: PathBuf,
    pub config: Config,
    pub settings: SyncSettings,
}

impl CommandContext {
    pub fn new(common: &CommonArgs) -> Result<Self> {
        let project_root = fs::canonicalize(&common.project_root).with_context(|| {
            format!(
                "Project root does not exist: {}",
                common.project_root.display()
            )
        })?;

        let ConfigLoadResult { mut config, path } = load_config(&project_root)?;
        match &path {
            Some(path) => debug!(path = %path.display(), "loaded config"),
            None => debug!("no config file found, using defaults"),
        }

        if let Some(languages) = &common.languages {
            config.languages = languages.clone();
        }
        if let Some(extensions) = &common.extensions {
            config.extensions = extensions.clone();
        }
        if let Some(global_namespace) = &common.global_namespace {
            config.global_namespace = global_namespace.clone();
        }
        config
            .validate()
            .context("Invalid configuration after applying command line options")?;

        let catalog_root = resolve(
            &project_root,
            common.catalog_root.as_deref(),
            &config.catalog_root,
        );
        let source_root = resolve(
            &project_root,
            common.source_root.as_deref(),
            &config.source_root,
        );

        let settings = SyncSettings {
            catalog_root,
            source_root,
            languages: config.languages.clone(),
            extensions: config.extensions.clone(),
            ignores: config.ignores.clone(),
            global_namespace: config.global_namespace.clone(),
            call_names: CallNames {
                accessor: config.accessor.clone(),
                local_binding: config.local_binding.clone(),
                global_binding: config.global_binding.clone(),
            },
        };

        Ok(Self {
            project_root,
            config,
            settings,
        })
    }
}

/// A flag is taken as given; a config value is relative to the project root.
fn resolve(project_root: &Path, flag: Option<&Path>, configured: &str) -> PathBuf {
    match flag {
        Some(path) => path.to_path_buf(),
        None => project_root.join(configured),
    }
}
