//! Configuration assembly.
//!
//! Reads gantry's entry from the host build config (`build.toml`), applies
//! command-line overrides and defaults, and loads the app descriptor.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::core::descriptor::Descriptor;
use crate::error::{ConfigError, Result};

/// Host build configuration: a list of plugin entries.
///
/// Entries stay untyped; only gantry's entry is deserialized.
#[derive(Debug, Default, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub plugins: Vec<toml::Table>,
}

/// One plugin entry in the host build configuration.
///
/// Only the entry named [`constants::PLUGIN_NAME`] is read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PluginEntry {
    pub name: String,
    /// Environment variable names injected into the descriptor.
    #[serde(default)]
    pub secrets: Option<Vec<String>>,
    #[serde(default)]
    pub app_file: Option<PathBuf>,
    #[serde(default)]
    pub key_file: Option<PathBuf>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub cron_file: Option<PathBuf>,
}

impl HostConfig {
    /// Load the host config from `path`.
    ///
    /// A missing file yields an empty plugin list.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` if the file exists but can't be read,
    /// or `ConfigError::Parse` if the TOML is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading host config");

        if !path.exists() {
            debug!("host config not found, using empty plugin list");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;

        debug!(plugins = config.plugins.len(), "host config loaded");
        Ok(config)
    }

    /// Gantry's plugin entry.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingPluginConfig` if no entry has the plugin
    /// name, or `ConfigError::Parse` if gantry's own entry is malformed.
    pub fn plugin(&self) -> Result<PluginEntry> {
        let table = self
            .plugins
            .iter()
            .find(|t| t.get("name").and_then(toml::Value::as_str) == Some(constants::PLUGIN_NAME))
            .ok_or(ConfigError::MissingPluginConfig)?;

        let entry = toml::Value::Table(table.clone())
            .try_into::<PluginEntry>()
            .map_err(ConfigError::Parse)?;
        Ok(entry)
    }
}

/// Values supplied on the command line. Each one beats the plugin entry.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub app_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
    pub project: Option<String>,
    pub app_version: Option<String>,
    pub cron_file: Option<PathBuf>,
}

/// Everything one deployment run needs, assembled once.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub app_file_name: PathBuf,
    pub app_file: Option<Descriptor>,
    pub secrets: Vec<String>,
    pub project: Option<String>,
    pub key_file: Option<PathBuf>,
    pub version: Option<String>,
    pub cron_file: Option<PathBuf>,
}

/// Assemble the configuration for a run.
///
/// The plugin entry is located before anything touches the filesystem.
/// The descriptor is loaded relative to the current directory; an absent
/// or unparsable descriptor is recorded as `None`, not reported here.
///
/// # Errors
///
/// Returns `ConfigError::MissingPluginConfig` if the host config has no
/// gantry entry.
pub fn assemble(host: &HostConfig, cli: CliOverrides) -> Result<ResolvedConfig> {
    let plugin = host.plugin()?;

    let app_file_name = cli
        .app_file
        .or_else(|| plugin.app_file.clone())
        .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_APP_FILE));
    let app_file = Descriptor::load(&app_file_name);

    let config = ResolvedConfig {
        app_file,
        secrets: plugin.secrets.clone().unwrap_or_default(),
        project: cli.project.or_else(|| plugin.project.clone()),
        key_file: cli.key_file.or_else(|| plugin.key_file.clone()),
        version: cli.app_version,
        cron_file: cli.cron_file.or_else(|| plugin.cron_file.clone()),
        app_file_name,
    };

    debug!(
        app_file = %config.app_file_name.display(),
        descriptor_loaded = config.app_file.is_some(),
        secrets = config.secrets.len(),
        cron = config.cron_file.is_some(),
        "config assembled"
    );

    Ok(config)
}
