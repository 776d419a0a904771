//! Config Module
//!
//! Controller configuration: movement tuning, interaction scanning and
//! camera turn rates, loadable from JSON.

pub mod controller_config;

pub use controller_config::{CameraConfig, ConfigError, ControllerConfig};
