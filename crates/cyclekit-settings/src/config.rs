//! Configuration sections and file I/O.
//!
//! A [`Config`] is stored as `.json` or `.toml`, chosen by file extension.
//! Every section has defaults, so partial files are accepted.

use cyclekit_designer::ToolpathSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Directory name under the platform config directory
pub const CONFIG_DIR_NAME: &str = "cyclekit";

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Program interpretation preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterSettings {
    /// Skip lines that start with `;` before tokenizing
    pub skip_semicolon_lines: bool,
    /// Abort a run at the first invalid cycle result or malformed line
    pub stop_on_invalid: bool,
}

impl Default for InterpreterSettings {
    fn default() -> Self {
        Self {
            skip_semicolon_lines: true,
            stop_on_invalid: false,
        }
    }
}

/// Generated program formatting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Prefix motion lines with `N` numbers
    pub line_numbers_enabled: bool,
    /// Finish programs with a rapid to X0 Y0
    pub return_to_origin: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            line_numbers_enabled: false,
            return_to_origin: true,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Contour cutting parameters
    pub toolpath: ToolpathSettings,
    /// Interpretation preferences
    pub interpreter: InterpreterSettings,
    /// Output formatting
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform default location, e.g. `~/.config/cyclekit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `path`, or from the default location when it exists, or defaults
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Ok(default) if default.exists() => Self::load_from_file(&default),
            _ => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        self.toolpath
            .validate()
            .map_err(|e| ConfigError::InvalidSection {
                section: "toolpath".to_string(),
                reason: e.to_string(),
            })?;

        if self.toolpath.depth < 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "toolpath.depth".to_string(),
                value: self.toolpath.depth.to_string(),
            });
        }

        if self.toolpath.stepdown < 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "toolpath.stepdown".to_string(),
                value: self.toolpath.stepdown.to_string(),
            });
        }

        Ok(())
    }
}
