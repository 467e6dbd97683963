// Configuration management
//
// Handles front end configuration and settings persistence. The file is TOML;
// missing sections and fields fall back to their defaults.

use crate::input::HotkeyConfig;
use crate::timing::TimingConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default configuration file path
pub const CONFIG_FILE: &str = "frontend_config.toml";

/// Errors raised while reading or writing the configuration file
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error
    Io(io::Error),

    /// The file is not valid TOML for [`FrontendConfig`]
    Parse(toml::de::Error),

    /// The configuration could not be serialized
    Serialize(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

/// Front end configuration
///
/// Stores all user-configurable settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Video settings
    pub video: VideoConfig,

    /// Tick timing settings
    pub timing: TimingConfig,

    /// Catalog location
    pub catalog: CatalogConfig,

    /// Screenshot settings
    pub screenshot: ScreenshotConfig,

    /// Hotkeys
    pub hotkeys: HotkeyConfig,
}

/// Video configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Initial window scale (1-8)
    pub scale: u32,

    /// Enable VSync
    pub vsync: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            scale: 3,
            vsync: true,
        }
    }
}

/// Catalog configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Directory that contains `roms/index.json`
    pub root: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

/// Screenshot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotConfig {
    /// Screenshot directory
    pub directory: PathBuf,

    /// Include timestamp in filename
    pub include_timestamp: bool,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("screenshots"),
            include_timestamp: true,
        }
    }
}

impl FrontendConfig {
    /// Load configuration from `path`, or fall back to defaults
    ///
    /// If the file doesn't exist, the default configuration is written to it.
    /// A file that exists but cannot be parsed is left alone.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                let config = Self::default();
                match config.save(path) {
                    Ok(()) => log::info!("Created default configuration at {}", path.display()),
                    Err(e) => log::warn!("Could not save default configuration: {}", e),
                }
                config
            }
            Err(e) => {
                log::warn!(
                    "Could not load configuration from {} ({}), using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::{TimingScheduler, DEFAULT_ANOMALY_THRESHOLD_MS};

    #[test]
    fn test_default_config() {
        let config = FrontendConfig::default();
        assert_eq!(config.video.scale, 3);
        assert!(config.video.vsync);
        assert_eq!(config.timing.anomaly_threshold_ms, 35.0);
        assert_eq!(config.catalog.root, PathBuf::from("."));
        assert_eq!(config.hotkeys.screenshot, "F9");
    }

    #[test]
    fn test_config_serialization() {
        let config = FrontendConfig::default();
        let toml_str = toml::to_string(&config).expect("Failed to serialize");
        let deserialized: FrontendConfig =
            toml::from_str(&toml_str).expect("Failed to deserialize");

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: FrontendConfig = toml::from_str(
            "[timing]\nanomaly_threshold_ms = 50.0\n\n[video]\nscale = 2\n",
        )
        .unwrap();

        assert_eq!(config.timing.anomaly_threshold_ms, 50.0);
        assert_eq!(config.video.scale, 2);
        assert!(config.video.vsync);
        assert_eq!(config.screenshot, ScreenshotConfig::default());
    }

    #[test]
    fn test_load_or_default_creates_file() {
        let dir = std::env::temp_dir().join("nes_frontend_config_test_create");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE);

        let config = FrontendConfig::load_or_default(&path);
        assert_eq!(config, FrontendConfig::default());
        assert!(path.exists());
        assert_eq!(FrontendConfig::load(&path).unwrap(), config);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_or_default_keeps_broken_file() {
        let dir = std::env::temp_dir().join("nes_frontend_config_test_broken");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE);
        fs::write(&path, "video = [").unwrap();

        let config = FrontendConfig::load_or_default(&path);
        assert_eq!(config, FrontendConfig::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), "video = [");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_unusable_threshold_is_replaced_by_scheduler() {
        for value in ["nan", "-1.0", "1e9"] {
            let text = format!("[timing]\nanomaly_threshold_ms = {}\n", value);
            let config: FrontendConfig = toml::from_str(&text).unwrap();
            let scheduler = TimingScheduler::new(config.timing);
            assert_eq!(
                scheduler.config().anomaly_threshold_ms,
                DEFAULT_ANOMALY_THRESHOLD_MS,
                "value {}",
                value
            );
        }
    }
}
