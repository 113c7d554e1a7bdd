//! Command channel trait
//!
//! The two operations a display controller link must offer. Submissions
//! are fire-and-forget: `Ok` means the command was accepted into the
//! outbound path in order, not that the panel has drawn it.

use strata_protocol::{Priority, Window};

/// Errors a channel reports when it refuses a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelError {
    /// Outbound queue has no room for the command
    QueueFull,
    /// Link is down or the controller is not configured
    Unavailable,
    /// Command does not fit the transport
    PayloadTooLarge,
    /// Bus-level failure while issuing the command
    Bus,
}

/// Ordered command submission to a display controller
///
/// Implementations must deliver commands in submission order: a
/// `write_data` always lands in the window declared by the most recent
/// `set_window`.
pub trait CommandChannel {
    /// Declare the destination rectangle for the next data stream
    fn set_window(&mut self, window: Window, priority: Priority) -> Result<(), ChannelError>;

    /// Stream RGB565 bytes (row-major, big-endian) into the current window
    fn write_data(&mut self, data: &[u8], priority: Priority) -> Result<(), ChannelError>;

    /// Whether the channel can accept commands at all
    fn is_available(&self) -> bool {
        true
    }
}

impl<T: CommandChannel + ?Sized> CommandChannel for &mut T {
    fn set_window(&mut self, window: Window, priority: Priority) -> Result<(), ChannelError> {
        (**self).set_window(window, priority)
    }

    fn write_data(&mut self, data: &[u8], priority: Priority) -> Result<(), ChannelError> {
        (**self).write_data(data, priority)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}
