//! Scriptable command channel for engine tests

use alloc::vec::Vec;

use strata_protocol::{Priority, Window};

use crate::traits::{ChannelError, CommandChannel};

/// One accepted submission, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Window {
        seq: u32,
        window: Window,
        priority: Priority,
    },
    Data {
        seq: u32,
        bytes: Vec<u8>,
        priority: Priority,
    },
}

impl Submission {
    pub fn priority(&self) -> Priority {
        match self {
            Submission::Window { priority, .. } | Submission::Data { priority, .. } => *priority,
        }
    }
}

/// Failure to inject on the next matching call
#[derive(Debug, Clone, Copy)]
pub enum Fail {
    Window(ChannelError),
    Data(ChannelError),
}

/// Records accepted commands with a submission sequence number
#[derive(Debug, Default)]
pub struct RecordingChannel {
    pub log: Vec<Submission>,
    next_seq: u32,
    pending_failure: Option<Fail>,
    offline: bool,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn fail_next(&mut self, failure: Fail) {
        self.pending_failure = Some(failure);
    }

    /// Lengths of every accepted data submission
    pub fn data_lens(&self) -> Vec<usize> {
        self.log
            .iter()
            .filter_map(|s| match s {
                Submission::Data { bytes, .. } => Some(bytes.len()),
                Submission::Window { .. } => None,
            })
            .collect()
    }

    fn seq(&mut self) -> u32 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

impl CommandChannel for RecordingChannel {
    fn set_window(&mut self, window: Window, priority: Priority) -> Result<(), ChannelError> {
        if let Some(Fail::Window(e)) = self.pending_failure {
            self.pending_failure = None;
            return Err(e);
        }
        let seq = self.seq();
        self.log.push(Submission::Window {
            seq,
            window,
            priority,
        });
        Ok(())
    }

    fn write_data(&mut self, data: &[u8], priority: Priority) -> Result<(), ChannelError> {
        if let Some(Fail::Data(e)) = self.pending_failure {
            self.pending_failure = None;
            return Err(e);
        }
        let seq = self.seq();
        self.log.push(Submission::Data {
            seq,
            bytes: data.to_vec(),
            priority,
        });
        Ok(())
    }

    fn is_available(&self) -> bool {
        !self.offline
    }
}
