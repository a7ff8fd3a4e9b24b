//! Platform layer tunables, persistence and path resolution.
//!
//! Covers:
//! - [`PlatformConfig`] and its serde defaults
//! - `load_from` / `save_to` (TOML file I/O with atomic write)
//! - XDG-style path helpers (`config_dir`, `config_path`, `settings_path`)

use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Tunables for the normalization rules of the platform layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Window after an unselected popup-menu dismissal during which pointer
    /// button events are swallowed.
    #[serde(default = "crate::defaults::menu_dismiss_suppression_ms")]
    pub menu_dismiss_suppression_ms: u64,

    /// Maximum interval between two presses that form a double click, for
    /// toolkits that do not report double clicks themselves.
    #[serde(default = "crate::defaults::double_click_ms")]
    pub double_click_ms: u64,

    /// Maximum pointer travel between the two presses of a double click.
    #[serde(default = "crate::defaults::double_click_slop")]
    pub double_click_slop: f64,

    /// Density that corresponds to a scale factor of 1.
    #[serde(default = "crate::defaults::reference_dpi")]
    pub reference_dpi: f64,

    /// Treat key events with Alt or Super held as unmappable.
    #[serde(default = "crate::defaults::drop_keys_with_extra_modifiers")]
    pub drop_keys_with_extra_modifiers: bool,

    /// File name of the settings store inside [`PlatformConfig::config_dir`].
    #[serde(default = "crate::defaults::settings_file_name")]
    pub settings_file_name: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            menu_dismiss_suppression_ms: crate::defaults::menu_dismiss_suppression_ms(),
            double_click_ms: crate::defaults::double_click_ms(),
            double_click_slop: crate::defaults::double_click_slop(),
            reference_dpi: crate::defaults::reference_dpi(),
            drop_keys_with_extra_modifiers: crate::defaults::drop_keys_with_extra_modifiers(),
            settings_file_name: crate::defaults::settings_file_name(),
        }
    }
}

impl PlatformConfig {
    pub fn menu_dismiss_suppression(&self) -> Duration {
        Duration::from_millis(self.menu_dismiss_suppression_ms)
    }

    pub fn double_click_interval(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }

    /// Load configuration from the default location, or defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`.
    ///
    /// A missing or empty file yields the default configuration.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: PlatformConfig = toml::from_str(&contents)
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to parse config from {:?}", path))?;
        log::info!("Loaded platform config from {:?}", path);
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self).map_err(ConfigError::from)?;
        write_atomic(path, &contents)
    }

    /// Get the configuration directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("uniplat")
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("uniplat")
            } else {
                PathBuf::from(".")
            }
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("platform.toml")
    }

    /// Get the settings store path for this configuration
    pub fn settings_path(&self) -> PathBuf {
        Self::config_dir().join(&self.settings_file_name)
    }
}

/// Atomic save: write to a temp file then rename to prevent corruption on crash.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {:?}", parent))?;
    }

    let temp_path = path.with_extension("toml.tmp");
    fs::write(&temp_path, contents).map_err(ConfigError::from)?;
    fs::rename(&temp_path, path).map_err(ConfigError::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = PlatformConfig::default();
        assert_eq!(config.menu_dismiss_suppression_ms, 100);
        assert_eq!(config.menu_dismiss_suppression(), Duration::from_millis(100));
        assert_eq!(config.reference_dpi, 96.0);
        assert!(config.drop_keys_with_extra_modifiers);
    }

    #[test]
    fn test_load_missing_file() {
        let temp = tempdir().unwrap();
        let config = PlatformConfig::load_from(&temp.path().join("missing.toml")).unwrap();
        assert_eq!(config, PlatformConfig::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("platform.toml");
        fs::write(&path, "menu_dismiss_suppression_ms = 250\n").unwrap();

        let config = PlatformConfig::load_from(&path).unwrap();
        assert_eq!(config.menu_dismiss_suppression_ms, 250);
        assert_eq!(config.double_click_ms, 500);
    }

    #[test]
    fn test_save_then_load() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("platform.toml");

        let config = PlatformConfig {
            reference_dpi: 72.0,
            ..PlatformConfig::default()
        };
        config.save_to(&path).unwrap();

        let loaded = PlatformConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_invalid_file_reports_parse_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("platform.toml");
        fs::write(&path, "menu_dismiss_suppression_ms = \"soon\"\n").unwrap();

        let err = PlatformConfig::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Parse(_))
        ));
    }
}
