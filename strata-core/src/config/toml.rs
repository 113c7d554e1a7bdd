//! TOML configuration loading
//!
//! Reads the `[display]` table; missing keys keep their defaults and
//! unknown keys are rejected.
//!
//! ```toml
//! [display]
//! width = 240
//! height = 320
//! strip_height = 8
//! tick_interval_ms = 100
//! cache = "per_strip"
//! priority = "background"
//! ```

use serde::Deserialize;

use super::{ConfigError, DisplayConfig};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    display: DisplayConfig,
}

/// Parse and validate a display configuration
pub fn parse_config(input: &str) -> Result<DisplayConfig, ConfigError> {
    let file: ConfigFile = ::toml::from_str(input).map_err(|_| ConfigError::Parse)?;
    file.display.validate()?;
    Ok(file.display)
}
