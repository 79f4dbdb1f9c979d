//! Configuration file loading and management
//!
//! This module handles loading and parsing the runner configuration from
//! `$XDG_CONFIG_HOME/nuv/config.toml`. A missing file means defaults; a
//! documented default file can be written with [`Config::create_default_file`].

use anyhow::{Context, Result};
use nuv_host::CapabilitySet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Valid values for `runner.log_level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main runner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Runner settings
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Script engine limits
    #[serde(default)]
    pub engine: EngineConfig,
    /// Capabilities granted to scripts
    #[serde(default)]
    pub capabilities: CapabilitiesConfig,
}

/// Runner settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    /// Log level (trace, debug, info, warn, error)
    /// Default: "warn"
    pub log_level: String,
}

/// Script engine limits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum function call nesting
    /// Default: 64
    pub max_call_levels: usize,
    /// Maximum number of operations per run, 0 for no limit
    /// Default: 0
    pub max_operations: u64,
    /// Maximum expression nesting depth, 0 for no limit
    /// Default: 64
    pub max_expr_depth: usize,
}

/// Capabilities granted to scripts
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CapabilitiesConfig {
    /// Capability names. When absent every capability is granted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<Vec<String>>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_call_levels: 64,
            max_operations: 0,
            max_expr_depth: 64,
        }
    }
}

impl Config {
    /// Load configuration from the specified path
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// The parsed configuration or an error if loading/parsing fails
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default XDG config location
    ///
    /// Falls back to the defaults when the file does not exist.
    pub fn load_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        Self::load(&config_path)
    }

    /// Get the default configuration file path
    ///
    /// Returns `$XDG_CONFIG_HOME/nuv/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "nuvolaris", "nuv")
            .context("Failed to determine project directories")?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Create a default configuration file with documented comments
    pub fn create_default_file(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, Self::default_config_content())
            .with_context(|| format!("Failed to write default config file: {}", path.display()))?;

        tracing::info!("Created default configuration file at: {}", path.display());
        Ok(())
    }

    /// Generate the default configuration file content with comments
    pub fn default_config_content() -> String {
        r#"# nuv runner configuration

[runner]
# Log level: trace, debug, info, warn, error
# RUST_LOG overrides this setting.
# Default: "warn"
log_level = "warn"

[engine]
# Maximum function call nesting
# Default: 64
max_call_levels = 64

# Maximum number of operations per script run, 0 for no limit
# Default: 0
max_operations = 0

# Maximum expression nesting depth, 0 for no limit
# Default: 64
max_expr_depth = 64

[capabilities]
# Capabilities granted to scripts. Leave unset to grant all of them.
# Names: exists, read_file, write_file, read_dir, to_yaml, from_yaml,
#        scan, base_path, file_ext, is_dir, join_path, exec
# allow = ["exists", "read_file", "read_dir", "from_yaml", "scan"]
"#
        .to_string()
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are valid and within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.runner.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log_level: {}. Must be one of: {}",
                self.runner.log_level,
                LOG_LEVELS.join(", ")
            );
        }

        if self.engine.max_call_levels == 0 {
            anyhow::bail!("engine.max_call_levels must be greater than 0");
        }

        self.granted()?;
        Ok(())
    }

    /// Capabilities to enforce, or `None` when every capability is granted
    pub fn granted(&self) -> Result<Option<CapabilitySet>> {
        match &self.capabilities.allow {
            None => Ok(None),
            Some(names) => CapabilitySet::from_strings(names)
                .map(Some)
                .map_err(|name| anyhow::anyhow!("Unknown capability in allow list: {}", name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nuv_host::Capability;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.runner.log_level, "warn");
        assert_eq!(config.engine.max_call_levels, 64);
        assert_eq!(config.engine.max_operations, 0);
        assert!(config.capabilities.allow.is_none());
        assert!(config.granted().unwrap().is_none());
    }

    #[test]
    fn test_default_content_parses_to_defaults() {
        let config: Config = toml::from_str(&Config::default_config_content()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[runner]
log_level = "debug"

[engine]
max_operations = 100000

[capabilities]
allow = ["read_file", "scan"]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.runner.log_level, "debug");
        assert_eq!(config.engine.max_operations, 100_000);
        assert_eq!(config.engine.max_call_levels, 64);

        let granted = config.granted().unwrap().unwrap();
        assert!(granted.has(Capability::ReadFile));
        assert!(granted.has(Capability::Scan));
        assert!(!granted.has(Capability::Exec));
    }

    #[test]
    fn test_load_empty_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_partial_sections() {
        let config_content = r#"
[runner]

[engine]
max_call_levels = 16
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.runner, RunnerConfig::default());
        assert_eq!(config.engine.max_call_levels, 16);
        assert_eq!(config.engine.max_expr_depth, 64);
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.runner.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_unknown_capability() {
        let mut config = Config::default();
        config.capabilities.allow = Some(vec!["read_file".into(), "network".into()]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("network"));
    }

    #[test]
    fn test_validate_zero_call_levels() {
        let mut config = Config::default();
        config.engine.max_call_levels = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_create_default_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nuv").join("config.toml");

        Config::create_default_file(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }
}
