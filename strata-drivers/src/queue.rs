//! Outbound command queue
//!
//! Host-side [`CommandChannel`] that encodes each command into a protocol
//! frame and parks it in a bounded FIFO. The byte transport drains frames in
//! submission order, so a strip's data can never overtake its window, and an
//! older strip's data can never land in a newer strip's window.
//!
//! Pixel bursts longer than one frame payload are split into consecutive
//! `WRITE_DATA` frames. A burst is queued whole or not at all.

use heapless::Deque;

use strata_core::{ChannelError, CommandChannel};
use strata_protocol::{DisplayCommand, Frame, FrameError, Priority, Window, MAX_PAYLOAD_SIZE};

/// Frame waiting for the transport
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueuedCommand {
    /// Submission sequence, monotonically increasing
    pub seq: u32,
    /// Scheduling class requested by the submitter
    pub priority: Priority,
    /// Encoded command; `frame.seq` is the low byte of `seq`
    pub frame: Frame,
}

/// Bounded FIFO command channel holding up to `N` frames
#[derive(Debug)]
pub struct QueuedChannel<const N: usize> {
    queue: Deque<QueuedCommand, N>,
    next_seq: u32,
    online: bool,
    high_water: usize,
}

impl<const N: usize> Default for QueuedChannel<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> QueuedChannel<N> {
    /// Create an empty, online channel
    pub const fn new() -> Self {
        Self {
            queue: Deque::new(),
            next_seq: 0,
            online: true,
            high_water: 0,
        }
    }

    /// Mark the link up or down
    ///
    /// Going offline keeps already-queued frames; call [`Self::clear`] to
    /// drop them.
    pub fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Free frame slots
    pub fn free(&self) -> usize {
        N - self.queue.len()
    }

    /// Deepest the queue has been since creation
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// Sequence number the next submission will get
    pub fn next_seq(&self) -> u32 {
        self.next_seq
    }

    /// Oldest queued frame, without removing it
    pub fn peek(&self) -> Option<&QueuedCommand> {
        self.queue.front()
    }

    /// Remove the oldest queued frame
    pub fn pop(&mut self) -> Option<QueuedCommand> {
        self.queue.pop_front()
    }

    /// Encode the oldest frame into `buffer` and remove it
    ///
    /// Returns `Ok(None)` when the queue is empty. On error the frame stays
    /// queued.
    pub fn encode_next(&mut self, buffer: &mut [u8]) -> Result<Option<usize>, FrameError> {
        let Some(next) = self.queue.front() else {
            return Ok(None);
        };
        let len = next.frame.encode(buffer)?;
        self.queue.pop_front();
        Ok(Some(len))
    }

    /// Drop every queued frame, returning how many were discarded
    pub fn clear(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }

    fn push(&mut self, frame: Frame, priority: Priority) -> Result<(), ChannelError> {
        let seq = self.next_seq;
        let command = QueuedCommand {
            seq,
            priority,
            frame: frame.with_seq(seq as u8),
        };
        self.queue
            .push_back(command)
            .map_err(|_| ChannelError::QueueFull)?;
        self.next_seq = seq.wrapping_add(1);
        self.high_water = self.high_water.max(self.queue.len());
        Ok(())
    }

    fn check_online(&self) -> Result<(), ChannelError> {
        if self.online {
            Ok(())
        } else {
            Err(ChannelError::Unavailable)
        }
    }
}

impl<const N: usize> CommandChannel for QueuedChannel<N> {
    fn set_window(&mut self, window: Window, priority: Priority) -> Result<(), ChannelError> {
        self.check_online()?;
        let frame = DisplayCommand::SetWindow(window)
            .to_frame()
            .map_err(|_| ChannelError::PayloadTooLarge)?;
        self.push(frame, priority)
    }

    fn write_data(&mut self, data: &[u8], priority: Priority) -> Result<(), ChannelError> {
        self.check_online()?;

        // Reserve room for the whole burst before queueing any of it
        let frames_needed = data.len().div_ceil(MAX_PAYLOAD_SIZE);
        if frames_needed > self.free() {
            return Err(ChannelError::QueueFull);
        }

        for chunk in data.chunks(MAX_PAYLOAD_SIZE) {
            let frame = DisplayCommand::WriteData(chunk)
                .to_frame()
                .map_err(|_| ChannelError::PayloadTooLarge)?;
            self.push(frame, priority)?;
        }
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.online
    }
}
