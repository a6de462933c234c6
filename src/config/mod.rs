pub mod types;

use std::path::Path;

use tracing::debug;

use crate::error::{ChangelogError, Result};

pub use types::{Config, PluginConfig};

pub const DEFAULT_CONFIG_PATH: &str = "configs/plugins.toml";

impl Config {
    /// Reads and parses the TOML configuration at `path`.
    ///
    /// A missing file falls back to the defaults only when `required` is false.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        if !path.exists() && !required {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ChangelogError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;

        Self::parse(&content)
            .map_err(|e| ChangelogError::Config(format!("invalid {}: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn find_plugin(&self, option: &str) -> Option<&PluginConfig> {
        self.plugins.iter().find(|plugin| plugin.option == option)
    }

    pub fn plugin_options(&self, buildable_only: bool) -> Vec<&PluginConfig> {
        self.plugins
            .iter()
            .filter(|plugin| !buildable_only || plugin.buildable)
            .collect()
    }
}
