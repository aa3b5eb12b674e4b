//! # CycleKit Settings
//!
//! Configuration management: cutting defaults, interpreter preferences and
//! output formatting, persisted as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{Config, InterpreterSettings, OutputSettings, CONFIG_DIR_NAME, CONFIG_FILE_NAME};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
