//! Framebuffer store
//!
//! Full-resolution RGB565 image, row-major, 2 bytes per pixel in
//! big-endian order (the byte order the controller's RAMWR expects). The
//! content producer writes into it between ticks; the refresh engine only
//! reads it.

use alloc::vec;
use alloc::vec::Vec;

use crate::config::ConfigError;
use crate::geometry::{Geometry, BYTES_PER_PIXEL};

/// Caller-owned pixel image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u16,
    height: u16,
    pixels: Vec<u8>,
}

impl Framebuffer {
    /// Black framebuffer sized for `geometry`
    pub fn new(geometry: &Geometry) -> Self {
        Self {
            width: geometry.width(),
            height: geometry.height(),
            pixels: vec![0; geometry.framebuffer_len()],
        }
    }

    /// Wrap existing pixel bytes
    pub fn from_bytes(width: u16, height: u16, pixels: Vec<u8>) -> Result<Self, ConfigError> {
        if width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        if pixels.len() != usize::from(width) * usize::from(height) * BYTES_PER_PIXEL {
            return Err(ConfigError::FramebufferSize);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    fn row_len(&self) -> usize {
        usize::from(self.width) * BYTES_PER_PIXEL
    }

    fn offset(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(usize::from(y) * self.row_len() + usize::from(x) * BYTES_PER_PIXEL)
    }

    /// Raw bytes of rows `y_start..=y_end`
    pub fn rows(&self, y_start: u16, y_end: u16) -> Option<&[u8]> {
        if y_start > y_end || y_end >= self.height {
            return None;
        }
        let start = usize::from(y_start) * self.row_len();
        let end = (usize::from(y_end) + 1) * self.row_len();
        self.pixels.get(start..end)
    }

    /// RGB565 value at `(x, y)`
    pub fn pixel(&self, x: u16, y: u16) -> Option<u16> {
        let offset = self.offset(x, y)?;
        let bytes = self.pixels.get(offset..offset + BYTES_PER_PIXEL)?;
        Some(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Set one pixel; returns false if `(x, y)` is off-screen
    pub fn set_pixel(&mut self, x: u16, y: u16, color: u16) -> bool {
        let Some(offset) = self.offset(x, y) else {
            return false;
        };
        match self.pixels.get_mut(offset..offset + BYTES_PER_PIXEL) {
            Some(dest) => {
                dest.copy_from_slice(&color.to_be_bytes());
                true
            }
            None => false,
        }
    }

    /// Fill the whole image with one color
    pub fn fill(&mut self, color: u16) {
        let bytes = color.to_be_bytes();
        for pixel in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&bytes);
        }
    }

    /// Fill a rectangle, clipped to the image
    pub fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16, color: u16) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        if x >= x_end || y >= y_end {
            return;
        }

        let bytes = color.to_be_bytes();
        let row_len = self.row_len();
        for row in y..y_end {
            let start = usize::from(row) * row_len + usize::from(x) * BYTES_PER_PIXEL;
            let end = usize::from(row) * row_len + usize::from(x_end) * BYTES_PER_PIXEL;
            if let Some(span) = self.pixels.get_mut(start..end) {
                for pixel in span.chunks_exact_mut(BYTES_PER_PIXEL) {
                    pixel.copy_from_slice(&bytes);
                }
            }
        }
    }
}

#[cfg(feature = "graphics")]
mod graphics {
    use core::convert::Infallible;

    use embedded_graphics_core::draw_target::DrawTarget;
    use embedded_graphics_core::geometry::{OriginDimensions, Size};
    use embedded_graphics_core::pixelcolor::{IntoStorage, Rgb565};
    use embedded_graphics_core::Pixel;

    use super::Framebuffer;

    impl OriginDimensions for Framebuffer {
        fn size(&self) -> Size {
            Size::new(u32::from(self.width), u32::from(self.height))
        }
    }

    impl DrawTarget for Framebuffer {
        type Color = Rgb565;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                // Off-screen pixels are dropped
                if let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) {
                    self.set_pixel(x, y, color.into_storage());
                }
            }
            Ok(())
        }

        fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
            self.fill(color.into_storage());
            Ok(())
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn framebuffer(width: u16, height: u16) -> Framebuffer {
        Framebuffer::new(&Geometry::new(width, height, 1).unwrap())
    }

    #[test]
    fn test_pixels_stored_big_endian() {
        let mut fb = framebuffer(4, 2);
        assert!(fb.set_pixel(1, 1, 0xF800));
        assert_eq!(fb.pixel(1, 1), Some(0xF800));
        assert_eq!(&fb.as_bytes()[10..12], &[0xF8, 0x00]);
    }

    #[test]
    fn test_off_screen_pixel_rejected() {
        let mut fb = framebuffer(4, 2);
        assert!(!fb.set_pixel(4, 0, 0xFFFF));
        assert!(!fb.set_pixel(0, 2, 0xFFFF));
        assert_eq!(fb.pixel(4, 0), None);
    }

    #[test]
    fn test_rows_slice() {
        let mut fb = framebuffer(3, 4);
        fb.fill_rect(0, 2, 3, 1, 0x07E0);
        let rows = fb.rows(2, 3).unwrap();
        assert_eq!(rows.len(), 3 * 2 * 2);
        assert_eq!(&rows[..6], &[0x07, 0xE0, 0x07, 0xE0, 0x07, 0xE0]);
        assert!(rows[6..].iter().all(|&b| b == 0));
        assert_eq!(fb.rows(3, 4), None);
        assert_eq!(fb.rows(2, 1), None);
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut fb = framebuffer(4, 4);
        fb.fill_rect(2, 2, 10, 10, 0x001F);
        assert_eq!(fb.pixel(3, 3), Some(0x001F));
        assert_eq!(fb.pixel(1, 3), Some(0));
        assert_eq!(fb.pixel(3, 1), Some(0));
    }

    #[test]
    fn test_from_bytes_checks_length() {
        assert!(Framebuffer::from_bytes(2, 2, vec![0; 8]).is_ok());
        assert_eq!(
            Framebuffer::from_bytes(2, 2, vec![0; 7]),
            Err(ConfigError::FramebufferSize)
        );
    }
}
