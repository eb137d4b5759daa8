//! Configuration management for the first input delay recorder
//!
//! Configuration is optional: every field defaults to the standard FID
//! behaviour, and a missing file yields [`Config::default`].
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/first-input-delay/config.toml` |
//! | macOS | `~/Library/Application Support/first-input-delay/config.toml` |
//! | Windows | `%APPDATA%\first-input-delay\config.toml` |
//!
//! ## Example
//!
//! ```no_run
//! use first_input_delay::Config;
//!
//! let mut config = Config::load().unwrap_or_default();
//! config.pointer.key_by_pointer_id = false;
//! config.save().expect("Failed to save config");
//! ```

use crate::clock::EPOCH_THRESHOLD_MS;
use crate::event::ListenerOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Could not determine config directory")]
    NoConfigDir,
    /// IO error reading or writing config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse config file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize config
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Returns the path to the config file, creating its directory if needed.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = config_dir.join("first-input-delay");

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir.join("config.toml"))
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Options for every listener the recorder attaches
    #[serde(default)]
    pub listener: ListenerConfig,
    /// Timestamp classification and delay validation
    #[serde(default)]
    pub timing: TimingConfig,
    /// Pointer session tracking
    #[serde(default)]
    pub pointer: PointerConfig,
    /// Probe UI settings
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ListenerConfig {
    pub passive: bool,
    pub capture: bool,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            passive: true,
            capture: true,
        }
    }
}

impl ListenerConfig {
    pub fn options(&self) -> ListenerOptions {
        ListenerOptions {
            passive: self.passive,
            capture: self.capture,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Timestamps above this many milliseconds are epoch based
    pub epoch_threshold_ms: f64,
    /// Reject delays not shorter than the recorder's own lifetime
    pub validate_lifetime: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            epoch_threshold_ms: EPOCH_THRESHOLD_MS,
            validate_lifetime: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointerConfig {
    /// Track one session per pointer id instead of a single shared one
    pub key_by_pointer_id: bool,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            key_by_pointer_id: true,
        }
    }
}

/// UI configuration for the probe binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Refresh rate for UI updates (in Hz)
    pub refresh_rate_hz: u32,
    /// Color theme (dark/light)
    pub theme: Theme,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_hz: 60,
            theme: Theme::Dark,
        }
    }
}

/// Color theme options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get UI refresh interval as Duration
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.ui.refresh_rate_hz.max(1) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_config_path(tag: &str) -> PathBuf {
        env::temp_dir().join(format!(
            "first-input-delay-test-{}-{}.toml",
            tag,
            std::process::id()
        ))
    }

    #[test]
    fn config_default_values() {
        let config = Config::default();
        assert!(config.listener.passive);
        assert!(config.listener.capture);
        assert_eq!(config.timing.epoch_threshold_ms, 1e12);
        assert!(config.timing.validate_lifetime);
        assert!(config.pointer.key_by_pointer_id);
        assert_eq!(config.ui.refresh_rate_hz, 60);
        assert_eq!(config.ui.theme, Theme::Dark);
    }

    #[test]
    fn config_refresh_interval() {
        let config = Config::default();
        // 60 Hz = 16666 microseconds per frame
        assert_eq!(config.refresh_interval().as_micros(), 16666);
    }

    #[test]
    fn zero_refresh_rate_does_not_divide_by_zero() {
        let mut config = Config::default();
        config.ui.refresh_rate_hz = 0;
        assert_eq!(config.refresh_interval().as_secs(), 1);
    }

    #[test]
    fn config_save_and_load_roundtrip() {
        let path = temp_config_path("roundtrip");

        let mut config = Config::default();
        config.pointer.key_by_pointer_id = false;
        config.ui.theme = Theme::Light;

        config.save_to(&path).expect("Failed to save config");
        let loaded = Config::load_from(&path).expect("Failed to load config");

        assert!(!loaded.pointer.key_by_pointer_id);
        assert_eq!(loaded.ui.theme, Theme::Light);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn config_load_missing_file_is_error() {
        let path = PathBuf::from("/nonexistent/path/config.toml");
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let toml_str = r#"
[timing]
epoch_threshold_ms = 5e11
validate_lifetime = false
"#;
        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");

        assert_eq!(config.timing.epoch_threshold_ms, 5e11);
        assert!(!config.timing.validate_lifetime);
        assert!(config.listener.capture);
        assert!(config.pointer.key_by_pointer_id);
    }

    #[test]
    fn listener_config_maps_to_options() {
        let config = ListenerConfig {
            passive: true,
            capture: false,
        };
        let options = config.options();
        assert!(options.passive);
        assert!(!options.capture);
    }

    #[test]
    fn config_error_display() {
        assert_eq!(
            ConfigError::NoConfigDir.to_string(),
            "Could not determine config directory"
        );
        let io_err = ConfigError::Io(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        assert!(io_err.to_string().contains("IO error"));
    }
}
