//! Display geometry
//!
//! Fixed at construction; every buffer size in the engine derives from it.

use crate::config::ConfigError;

/// Bytes per RGB565 pixel
pub const BYTES_PER_PIXEL: usize = 2;

/// Display size and strip height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    width: u16,
    height: u16,
    strip_height: u16,
}

impl Geometry {
    /// Validate and build a geometry
    pub fn new(width: u16, height: u16, strip_height: u16) -> Result<Self, ConfigError> {
        if width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        if strip_height == 0 {
            return Err(ConfigError::ZeroStripHeight);
        }
        Ok(Self {
            width,
            height,
            strip_height,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Nominal strip height in rows (the last strip may be shorter)
    pub fn strip_height(&self) -> u16 {
        self.strip_height
    }

    /// `(width, height)` in pixels
    pub fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Number of strips: `ceil(height / strip_height)`
    pub fn total_strips(&self) -> u16 {
        self.height.div_ceil(self.strip_height)
    }

    /// Bytes in one pixel row
    pub fn row_len(&self) -> usize {
        usize::from(self.width) * BYTES_PER_PIXEL
    }

    /// Bytes in a full-height strip
    pub fn strip_len(&self) -> usize {
        self.row_len() * usize::from(self.strip_height)
    }

    /// Bytes in the whole framebuffer
    pub fn framebuffer_len(&self) -> usize {
        self.row_len() * usize::from(self.height)
    }
}
