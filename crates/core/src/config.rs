use crate::action::Locale;
use crate::error::{NutrackError, Result};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutrackConfig {
    /// How many edits each session can undo
    pub max_history: usize,

    /// Language for action descriptions
    pub locale: Locale,

    /// Document opened when none is given on the command line
    pub document: Option<PathBuf>,
}

impl Default for NutrackConfig {
    fn default() -> Self {
        Self {
            max_history: crate::undo_manager::DEFAULT_MAX_STACK_SIZE.get(),
            locale: Locale::default(),
            document: None,
        }
    }
}

impl NutrackConfig {
    /// Location of the user config file, `<config dir>/nutrack/config.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform config directory cannot be found.
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("nutrack").join("config.yaml"))
            .ok_or_else(|| NutrackError::InvalidConfig("could not find config directory".to_string()))
    }

    /// Validated undo capacity.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when `max_history` is zero.
    pub fn max_stack_size(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.max_history)
            .ok_or_else(|| NutrackError::InvalidConfig("max_history must be greater than zero".to_string()))
    }

    /// Saves the configuration to a YAML file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration cannot be serialized to YAML
    /// - The file cannot be written to disk (e.g., permission denied, disk full)
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Loads a configuration from a YAML file and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (e.g., file not found, permission denied)
    /// - The YAML content cannot be parsed into a valid `NutrackConfig`
    /// - `max_history` is zero
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.max_stack_size()?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is invalid.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!(path = %path.display(), "Loading config");
            Self::load(path)
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }
}
