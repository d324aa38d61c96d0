//! Configuration loading and management
//!
//! Handles parsing of `.tl.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::task::Filter;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE: &str = ".tl.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UiConfig,
}

/// Storage-related configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the task file (defaults to the platform data directory)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// UI-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Filter mode selected at startup: all, active, or completed
    #[serde(default = "default_filter")]
    pub default_filter: String,
}

fn default_filter() -> String {
    "all".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_filter: default_filter(),
        }
    }
}

impl Config {
    /// Load configuration from a `.tl.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the given directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Filter mode the UI starts in
    pub fn default_filter(&self) -> Filter {
        Filter::parse(&self.ui.default_filter).unwrap_or(Filter::All)
    }

    fn validate(&self) -> crate::error::Result<()> {
        if Filter::parse(&self.ui.default_filter).is_none() {
            return Err(crate::error::Error::InvalidConfig(format!(
                "ui.default_filter: invalid mode '{}' (expected all|active|completed)",
                self.ui.default_filter
            )));
        }
        if let Some(path) = &self.storage.path {
            if path.as_os_str().is_empty() {
                return Err(crate::error::Error::InvalidConfig(
                    "storage.path cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_no_file() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from_dir(temp.path());
        assert_eq!(config.ui.default_filter, "all");
        assert!(config.storage.path.is_none());
        assert_eq!(config.default_filter(), Filter::All);
    }

    #[test]
    fn loads_partial_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        std::fs::write(&path, "[ui]\ndefault_filter = \"active\"\n").unwrap();

        let config = Config::load_from_dir(temp.path());
        assert_eq!(config.default_filter(), Filter::Active);
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn loads_storage_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        std::fs::write(&path, "[storage]\npath = \"/tmp/my-tasks.json\"\n").unwrap();

        let config = Config::load_from_dir(temp.path());
        assert_eq!(
            config.storage.path.as_deref(),
            Some(Path::new("/tmp/my-tasks.json"))
        );
    }

    #[test]
    fn invalid_filter_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        std::fs::write(&path, "[ui]\ndefault_filter = \"bogus\"\n").unwrap();

        assert!(Config::load(&path).is_err());
        // load_from_dir falls back to defaults instead of failing startup
        let config = Config::load_from_dir(temp.path());
        assert_eq!(config.default_filter(), Filter::All);
    }
}
