//! Configuration type definitions

use core::time::Duration;

use strata_protocol::Priority;

use crate::cache::CacheMode;
use crate::geometry::Geometry;

use super::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reference panel (ST7789V) width
pub const DEFAULT_WIDTH: u16 = 240;

/// Reference panel (ST7789V) height
pub const DEFAULT_HEIGHT: u16 = 320;

/// Rows per strip: 240 * 8 * 2 = 3840 bytes per transmission
pub const DEFAULT_STRIP_HEIGHT: u16 = 8;

pub const DEFAULT_TICK_INTERVAL_MS: u32 = 100;

pub const DEFAULT_MAX_CYCLE_DURATION_MS: u32 = 100;

/// Scheduling class used for refresh traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PriorityClass {
    /// Yield to all scheduled controller traffic
    #[default]
    Background,
    /// Send ahead of scheduled traffic
    Immediate,
}

impl From<PriorityClass> for Priority {
    fn from(class: PriorityClass) -> Self {
        match class {
            PriorityClass::Background => Priority::Background,
            PriorityClass::Immediate => Priority::Immediate,
        }
    }
}

/// Display driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct DisplayConfig {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
    /// Rows per strip
    pub strip_height: u16,
    /// Expected interval between refresh ticks (ms)
    pub tick_interval_ms: u32,
    /// Upper bound reported to callers for one refresh cycle (ms)
    pub max_cycle_duration_ms: u32,
    /// Change-detection strategy
    pub cache: CacheMode,
    /// Scheduling class for window and data commands
    pub priority: PriorityClass,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            strip_height: DEFAULT_STRIP_HEIGHT,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            max_cycle_duration_ms: DEFAULT_MAX_CYCLE_DURATION_MS,
            cache: CacheMode::PerStrip,
            priority: PriorityClass::Background,
        }
    }
}

impl DisplayConfig {
    /// Config for a `width` x `height` panel, other fields at defaults
    pub fn with_size(width: u16, height: u16, strip_height: u16) -> Self {
        Self {
            width,
            height,
            strip_height,
            ..Self::default()
        }
    }

    /// Check every field, returning the first violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.geometry()?;
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }

    /// Validated geometry
    pub fn geometry(&self) -> Result<Geometry, ConfigError> {
        Geometry::new(self.width, self.height, self.strip_height)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.tick_interval_ms))
    }

    pub fn max_cycle_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.max_cycle_duration_ms))
    }
}
