use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use wikiedit_editor::EditorConfig;

pub const DEFAULT_CONFIG_NAME: &str = "wikiedit.config.json";

/// Wikiedit configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Default log filter (overridden by RUST_LOG)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Editing engine settings
    #[serde(flatten)]
    pub editor: EditorConfig,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Read `wikiedit.config.json` from `cwd`, falling back to defaults
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Cannot read {}", config_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid {}", DEFAULT_CONFIG_NAME))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            editor: EditorConfig::default(),
        }
    }
}
