//! Strip partitioner
//!
//! Splits the display's rows into fixed-height horizontal strips. Strip
//! `i` covers rows `[i * strip_height, min((i + 1) * strip_height, height) - 1]`
//! and always spans the full width.

use strata_protocol::Window;

use crate::geometry::{Geometry, BYTES_PER_PIXEL};

/// Index of a strip, `0..total_strips`
pub type StripIndex = u16;

/// Row extent of one strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StripSpan {
    pub index: StripIndex,
    /// First row (inclusive)
    pub y_start: u16,
    /// Last row (inclusive), clipped to `height - 1`
    pub y_end: u16,
}

impl StripSpan {
    /// Actual row count after clipping
    pub fn rows(&self) -> u16 {
        self.y_end - self.y_start + 1
    }

    /// Bytes to transmit for this strip on a display `width` pixels wide
    pub fn byte_len(&self, width: u16) -> usize {
        usize::from(width) * usize::from(self.rows()) * BYTES_PER_PIXEL
    }

    /// Full-width addressing window covering this strip
    pub fn window(&self, width: u16) -> Window {
        Window::new(0, width.saturating_sub(1), self.y_start, self.y_end)
    }
}

/// Maps a geometry onto its strip sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripLayout {
    geometry: Geometry,
    total_strips: u16,
}

impl StripLayout {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            total_strips: geometry.total_strips(),
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn total_strips(&self) -> u16 {
        self.total_strips
    }

    /// Row extent of `index`, taken modulo the strip count
    pub fn span(&self, index: StripIndex) -> StripSpan {
        let index = index % self.total_strips;
        let strip_height = u32::from(self.geometry.strip_height());
        let y_start = u32::from(index) * strip_height;
        let y_end = (y_start + strip_height - 1).min(u32::from(self.geometry.height()) - 1);

        // Both bounds are below `height`, so they fit in u16
        StripSpan {
            index,
            y_start: y_start as u16,
            y_end: y_end as u16,
        }
    }

    /// Strip visited after `index` in round-robin order
    pub fn next_index(&self, index: StripIndex) -> StripIndex {
        (index % self.total_strips + 1) % self.total_strips
    }

    /// All strips, top to bottom
    pub fn spans(&self) -> impl Iterator<Item = StripSpan> + '_ {
        (0..self.total_strips).map(move |index| self.span(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn layout(width: u16, height: u16, strip_height: u16) -> StripLayout {
        StripLayout::new(Geometry::new(width, height, strip_height).unwrap())
    }

    #[test]
    fn test_first_and_last_strip_of_reference_panel() {
        let layout = layout(240, 320, 8);
        assert_eq!(
            layout.span(0),
            StripSpan {
                index: 0,
                y_start: 0,
                y_end: 7
            }
        );
        let last = layout.span(39);
        assert_eq!((last.y_start, last.y_end), (312, 319));
        assert_eq!(last.byte_len(240), 3840);
    }

    #[test]
    fn test_last_strip_clipped() {
        let layout = layout(240, 20, 8);
        let last = layout.span(2);
        assert_eq!((last.y_start, last.y_end), (16, 19));
        assert_eq!(last.rows(), 4);
        assert_eq!(last.byte_len(240), 240 * 4 * 2);
        assert_eq!(last.window(240), Window::new(0, 239, 16, 19));
    }

    #[test]
    fn test_index_wraps() {
        let layout = layout(240, 320, 8);
        assert_eq!(layout.next_index(39), 0);
        assert_eq!(layout.span(41).index, 1);
    }

    #[test]
    fn test_single_strip_display() {
        let layout = layout(16, 8, 8);
        assert_eq!(layout.total_strips(), 1);
        assert_eq!(layout.next_index(0), 0);
    }

    proptest! {
        #[test]
        fn prop_spans_tile_the_display(
            width in 1u16..400,
            height in 1u16..600,
            strip_height in 1u16..64,
        ) {
            let layout = layout(width, height, strip_height);

            let mut expected_start = 0u16;
            for span in layout.spans() {
                prop_assert_eq!(span.y_start, expected_start);
                prop_assert!(span.y_end < height);
                prop_assert!(span.rows() <= strip_height);
                expected_start = span.y_end + 1;
            }
            prop_assert_eq!(expected_start, height);
        }
    }
}
