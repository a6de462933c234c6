use serde::{Deserialize, Serialize};
use std::fmt;

use crate::changelog::report::OutputFormat;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GithubConfig,
    pub output: OutputConfig,
    pub plugins: Vec<PluginConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub owner: String,
    /// Overrides `https://api.github.com`, e.g. for GitHub Enterprise.
    pub api_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub format: OutputFormat,
    pub template: Option<String>,
}

/// One plugin repository the tool knows about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Short key used on the command line and in menus.
    pub option: String,
    pub label: String,
    /// Repository name under the configured owner.
    pub endpoint: String,
    #[serde(default)]
    pub main_file: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub buildable: bool,
}

impl fmt::Display for PluginConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.option)
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            owner: "Yoast".to_string(),
            api_url: None,
            timeout_secs: 30,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            path: "changelogs".to_string(),
            format: OutputFormat::Markdown,
            template: None,
        }
    }
}
