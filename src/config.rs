// Store configuration loaded from YAML

use crate::filter::ViewFilter;
use crate::models::Priority;
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default cap on task text length, in characters
pub const DEFAULT_MAX_TEXT_LEN: usize = 120;

/// Configuration for a [`crate::TaskStore`]
///
/// Every field is optional in the YAML file:
///
/// ```yaml
/// max_text_len: 120
/// default_priority: medium
/// default_filter: all
/// seed: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum task text length in characters; longer text is truncated
    pub max_text_len: usize,
    /// Initial pending priority
    pub default_priority: Priority,
    /// Initial view filter
    pub default_filter: ViewFilter,
    /// Start with the demonstration task set
    pub seed: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_text_len: DEFAULT_MAX_TEXT_LEN,
            default_priority: Priority::default(),
            default_filter: ViewFilter::default(),
            seed: false,
        }
    }
}

impl StoreConfig {
    /// Load and validate a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).context(format!("Failed to read config file {}", path.display()))?;

        let config: StoreConfig = if content.trim().is_empty() {
            StoreConfig::default()
        } else {
            serde_yaml::from_str(&content).context(format!("Failed to parse config file {}", path.display()))?
        };

        config.validate()?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Load from an explicit path, or the default location if present
    ///
    /// An explicit path must exist. The default location is optional and
    /// falls back to built-in defaults when missing.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// `<config_dir>/tasklist/tasklist.yml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tasklist").join("tasklist.yml"))
    }

    /// Reject settings the store cannot operate with
    pub fn validate(&self) -> Result<()> {
        if self.max_text_len == 0 {
            return Err(eyre!("max_text_len must be greater than zero"));
        }
        Ok(())
    }
}
