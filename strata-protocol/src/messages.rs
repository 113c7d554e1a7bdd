//! Command messages for the display channel
//!
//! Only two commands cross the channel, always in this order per refresh:
//! - `SET_WINDOW`: declare the destination rectangle
//! - `WRITE_DATA`: stream RGB565 bytes into it (may repeat for long strips)

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};

// Message type IDs: host → controller
pub const MSG_SET_WINDOW: u8 = 0x30;
pub const MSG_WRITE_DATA: u8 = 0x31;

/// Size of an encoded [`Window`] payload
pub const WINDOW_PAYLOAD_SIZE: usize = 8;

/// Destination rectangle for the next pixel stream
///
/// Both ranges are inclusive, as the controller's column/row address-set
/// registers expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Window {
    pub x_start: u16,
    pub x_end: u16,
    pub y_start: u16,
    pub y_end: u16,
}

impl Window {
    /// Create a window from inclusive column and row ranges
    pub const fn new(x_start: u16, x_end: u16, y_start: u16, y_end: u16) -> Self {
        Self {
            x_start,
            x_end,
            y_start,
            y_end,
        }
    }

    /// Columns covered (inclusive range)
    pub fn columns(&self) -> usize {
        usize::from(self.x_end.saturating_sub(self.x_start)) + 1
    }

    /// Rows covered (inclusive range)
    pub fn rows(&self) -> usize {
        usize::from(self.y_end.saturating_sub(self.y_start)) + 1
    }

    /// Bytes needed to fill the window at 2 bytes per pixel
    pub fn byte_len(&self) -> usize {
        self.columns() * self.rows() * 2
    }

    /// Big-endian wire payload: x_start, x_end, y_start, y_end
    pub fn to_bytes(&self) -> [u8; WINDOW_PAYLOAD_SIZE] {
        let [xs0, xs1] = self.x_start.to_be_bytes();
        let [xe0, xe1] = self.x_end.to_be_bytes();
        let [ys0, ys1] = self.y_start.to_be_bytes();
        let [ye0, ye1] = self.y_end.to_be_bytes();
        [xs0, xs1, xe0, xe1, ys0, ys1, ye0, ye1]
    }

    /// Decode a wire payload
    pub fn from_bytes(payload: &[u8]) -> Result<Self, FrameError> {
        match payload {
            [xs0, xs1, xe0, xe1, ys0, ys1, ye0, ye1] => Ok(Self {
                x_start: u16::from_be_bytes([*xs0, *xs1]),
                x_end: u16::from_be_bytes([*xe0, *xe1]),
                y_start: u16::from_be_bytes([*ys0, *ys1]),
                y_end: u16::from_be_bytes([*ye0, *ye1]),
            }),
            _ => Err(FrameError::InvalidFrame),
        }
    }
}

/// Commands from the host to the display controller
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayCommand<'a> {
    /// Set the addressing window
    SetWindow(Window),
    /// Stream pixel bytes into the current window
    WriteData(&'a [u8]),
}

impl<'a> DisplayCommand<'a> {
    /// Wire message type for this command
    pub fn msg_type(&self) -> u8 {
        match self {
            DisplayCommand::SetWindow(_) => MSG_SET_WINDOW,
            DisplayCommand::WriteData(_) => MSG_WRITE_DATA,
        }
    }

    /// Encode this command into a frame
    ///
    /// `WriteData` bursts longer than [`MAX_PAYLOAD_SIZE`] must be split by
    /// the caller.
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            DisplayCommand::SetWindow(window) => Frame::new(MSG_SET_WINDOW, &window.to_bytes()),
            DisplayCommand::WriteData(data) => {
                if data.len() > MAX_PAYLOAD_SIZE {
                    return Err(FrameError::PayloadTooLarge);
                }
                Frame::new(MSG_WRITE_DATA, data)
            }
        }
    }

    /// Decode a command from a received frame
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_SET_WINDOW => Window::from_bytes(&frame.payload).map(DisplayCommand::SetWindow),
            MSG_WRITE_DATA => Ok(DisplayCommand::WriteData(&frame.payload)),
            _ => Err(FrameError::UnknownMessage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_payload_is_big_endian() {
        let window = Window::new(0, 239, 312, 319);
        assert_eq!(window.to_bytes(), [0x00, 0x00, 0x00, 0xEF, 0x01, 0x38, 0x01, 0x3F]);
    }

    #[test]
    fn test_window_byte_len_counts_inclusive_ranges() {
        let window = Window::new(0, 239, 0, 7);
        assert_eq!(window.columns(), 240);
        assert_eq!(window.rows(), 8);
        assert_eq!(window.byte_len(), 3840);
    }

    #[test]
    fn test_set_window_frame_decodes() {
        let window = Window::new(0, 239, 8, 15);
        let frame = DisplayCommand::SetWindow(window).to_frame().unwrap();
        assert_eq!(frame.msg_type, MSG_SET_WINDOW);
        assert_eq!(
            DisplayCommand::from_frame(&frame),
            Ok(DisplayCommand::SetWindow(window))
        );
    }

    #[test]
    fn test_short_window_payload_rejected() {
        let frame = Frame::new(MSG_SET_WINDOW, &[0, 0, 0, 239]).unwrap();
        assert_eq!(DisplayCommand::from_frame(&frame), Err(FrameError::InvalidFrame));
    }

    #[test]
    fn test_oversized_data_rejected() {
        let data = [0u8; MAX_PAYLOAD_SIZE + 2];
        assert_eq!(
            DisplayCommand::WriteData(&data).to_frame(),
            Err(FrameError::PayloadTooLarge)
        );
    }

    #[test]
    fn test_unknown_message() {
        let frame = Frame::new(0x02, &[]).unwrap();
        assert_eq!(DisplayCommand::from_frame(&frame), Err(FrameError::UnknownMessage));
    }
}
