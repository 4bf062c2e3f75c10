//! Configuration management for padpoll
//!
//! Handles loading, parsing, validation and saving of the YAML configuration file.

use crate::input::gamepad::ResponseDefaults;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub gamepad: GamepadConfig,
}

/// Gamepad polling configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GamepadConfig {
    /// Deadzone given to newly attached devices, in [0, 1]
    #[serde(default = "default_deadzone")]
    pub default_deadzone: f64,
    /// Trigger threshold given to newly attached devices, in [0, 1]
    #[serde(default = "default_threshold")]
    pub default_threshold: f64,
    /// Extra SDL mapping database loaded by the live device layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_db: Option<PathBuf>,
    /// Period of the live polling loop
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

impl Default for GamepadConfig {
    fn default() -> Self {
        Self {
            default_deadzone: default_deadzone(),
            default_threshold: default_threshold(),
            mapping_db: None,
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl GamepadConfig {
    /// Response parameters handed to the device registry
    pub fn response_defaults(&self) -> ResponseDefaults {
        ResponseDefaults {
            deadzone: self.default_deadzone,
            threshold: self.default_threshold,
        }
    }
}

impl AppConfig {
    /// Load configuration from file with validation
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: AppConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self)
            .context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        let gamepad = &self.gamepad;

        if !(0.0..=1.0).contains(&gamepad.default_deadzone) {
            anyhow::bail!(
                "gamepad.default_deadzone must be within [0, 1], got {}",
                gamepad.default_deadzone
            );
        }

        if !(0.0..=1.0).contains(&gamepad.default_threshold) {
            anyhow::bail!(
                "gamepad.default_threshold must be within [0, 1], got {}",
                gamepad.default_threshold
            );
        }

        if gamepad.poll_interval_ms == 0 {
            anyhow::bail!("gamepad.poll_interval_ms must be greater than 0");
        }

        Ok(())
    }
}

// Default value functions
fn default_deadzone() -> f64 { 0.05 }
fn default_threshold() -> f64 { 0.05 }
fn default_poll_interval() -> u64 { 16 }
