//! Controller Configuration
//!
//! Every section and field is optional in JSON; anything missing keeps its
//! default. Values are validated after parsing.
//!
//! ```json
//! {
//!     "movement": { "walk_speed": 450.0, "dash_cooldown": 0.5 },
//!     "interaction": { "check_interval": 0.1 },
//!     "camera": { "base_turn_rate": 45.0 }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::interaction::InteractionConfig;
use crate::player::MovementTuning;

/// Rates applied to the turn and look-up axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Degrees per second at full turn input
    pub base_turn_rate: f32,
    /// Degrees per second at full look-up input
    pub base_look_up_rate: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            base_turn_rate: 25.0,
            base_look_up_rate: 25.0,
        }
    }
}

/// Everything the player controller is configured with.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub movement: MovementTuning,
    pub interaction: InteractionConfig,
    pub camera: CameraConfig,
}

/// Errors that can occur while loading a controller config.
#[derive(Debug)]
pub enum ConfigError {
    /// Standard I/O error.
    IoError(std::io::Error),
    /// JSON deserialization error.
    JsonError(serde_json::Error),
    /// Parsed, but a value is out of range.
    Invalid(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::JsonError(e) => write!(f, "JSON error: {e}"),
            ConfigError::Invalid(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            ConfigError::JsonError(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::JsonError(e)
    }
}

impl ControllerConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json).inspect_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "rejected controller config");
        })?;
        tracing::info!(path = %path.display(), walk_speed = config.movement.walk_speed, "loaded controller config");
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.movement.validate().map_err(ConfigError::Invalid)?;

        let interaction = &self.interaction;
        if !(interaction.check_interval.is_finite() && interaction.check_interval >= 0.0) {
            return Err(ConfigError::Invalid("interaction check_interval must be >= 0"));
        }
        if !(interaction.trace_distance.is_finite() && interaction.trace_distance > 0.0) {
            return Err(ConfigError::Invalid("interaction trace_distance must be > 0"));
        }
        if !self.camera.base_turn_rate.is_finite() || !self.camera.base_look_up_rate.is_finite() {
            return Err(ConfigError::Invalid("camera rates must be finite"));
        }
        Ok(())
    }
}
