use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub launcher: LauncherConfig,
}

impl Config {
    /// Load config from file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        super::validation::warn_unknown_fields(&content, "config.json");
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LauncherConfig {
    /// Terminal emulator used for entries with `Terminal=true`
    #[serde(default)]
    pub terminal: Option<String>,

    /// Extra application directories, scanned after the XDG ones
    #[serde(default)]
    pub extra_app_dirs: Vec<PathBuf>,

    /// How long a transient notice stays on screen
    #[serde(default = "default_notice_ms")]
    pub notice_ms: u64,

    #[serde(default = "default_title")]
    pub title: String,
}

fn default_notice_ms() -> u64 {
    2000
}
fn default_title() -> String {
    "Apps".to_string()
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            terminal: None,
            extra_app_dirs: Vec::new(),
            notice_ms: default_notice_ms(),
            title: default_title(),
        }
    }
}
