//! Frame encoding and decoding for the display command channel.
//!
//! Frame format:
//! - START (1 byte): 0x7E synchronization byte
//! - LENGTH (1 byte): payload length (0-250)
//! - SEQ (1 byte): wrapping submission sequence number
//! - TYPE (1 byte): message type identifier
//! - PAYLOAD (0-250 bytes): type-specific data
//! - CHECKSUM (1 byte): XOR of LENGTH, SEQ, TYPE and all PAYLOAD bytes

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0x7E;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 250;

/// Bytes a frame adds around its payload
pub const FRAME_OVERHEAD: usize = 5;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = FRAME_OVERHEAD + MAX_PAYLOAD_SIZE;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Checksum mismatch
    InvalidChecksum,
    /// Frame is incomplete (need more bytes)
    Incomplete,
    /// Invalid frame structure
    InvalidFrame,
    /// Buffer too small for encoding
    BufferTooSmall,
    /// Message type is not part of the command set
    UnknownMessage,
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Submission sequence number (wraps at 256)
    pub seq: u8,
    /// Message type identifier
    pub msg_type: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given message type and payload
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            seq: 0,
            msg_type,
            payload: payload_vec,
        })
    }

    /// Return this frame stamped with a sequence number
    pub fn with_seq(mut self, seq: u8) -> Self {
        self.seq = seq;
        self
    }

    /// Number of bytes [`Frame::encode`] writes
    pub fn encoded_len(&self) -> usize {
        FRAME_OVERHEAD + self.payload.len()
    }

    fn calculate_checksum(length: u8, seq: u8, msg_type: u8, payload: &[u8]) -> u8 {
        payload
            .iter()
            .fold(length ^ seq ^ msg_type, |checksum, &byte| checksum ^ byte)
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        let out = buffer
            .get_mut(..frame_len)
            .ok_or(FrameError::BufferTooSmall)?;

        let length = self.payload.len() as u8;
        let payload_end = 4 + self.payload.len();

        out[0] = FRAME_START;
        out[1] = length;
        out[2] = self.seq;
        out[3] = self.msg_type;
        out[4..payload_end].copy_from_slice(&self.payload);
        out[payload_end] = Self::calculate_checksum(length, self.seq, self.msg_type, &self.payload);

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }
}

/// State machine for parsing incoming frames
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    buffer: Vec<u8, MAX_PAYLOAD_SIZE>,
    expected_length: u8,
    seq: u8,
    msg_type: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    WaitingForStart,
    WaitingForLength,
    WaitingForSeq,
    WaitingForType,
    ReadingPayload,
    WaitingForChecksum,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForStart,
            buffer: Vec::new(),
            expected_length: 0,
            seq: 0,
            msg_type: 0,
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForStart;
        self.buffer.clear();
        self.expected_length = 0;
        self.seq = 0;
        self.msg_type = 0;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on parse error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::WaitingForStart => {
                // Anything before a START byte is line noise
                if byte == FRAME_START {
                    self.state = ParseState::WaitingForLength;
                }
                Ok(None)
            }
            ParseState::WaitingForLength => {
                if usize::from(byte) > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(FrameError::InvalidFrame);
                }
                self.expected_length = byte;
                self.state = ParseState::WaitingForSeq;
                Ok(None)
            }
            ParseState::WaitingForSeq => {
                self.seq = byte;
                self.state = ParseState::WaitingForType;
                Ok(None)
            }
            ParseState::WaitingForType => {
                self.msg_type = byte;
                self.buffer.clear();
                self.state = if self.expected_length == 0 {
                    ParseState::WaitingForChecksum
                } else {
                    ParseState::ReadingPayload
                };
                Ok(None)
            }
            ParseState::ReadingPayload => {
                if self.buffer.push(byte).is_err() {
                    self.reset();
                    return Err(FrameError::PayloadTooLarge);
                }
                if self.buffer.len() == usize::from(self.expected_length) {
                    self.state = ParseState::WaitingForChecksum;
                }
                Ok(None)
            }
            ParseState::WaitingForChecksum => {
                let expected = Frame::calculate_checksum(
                    self.expected_length,
                    self.seq,
                    self.msg_type,
                    &self.buffer,
                );

                if byte != expected {
                    self.reset();
                    return Err(FrameError::InvalidChecksum);
                }

                let frame = Frame {
                    seq: self.seq,
                    msg_type: self.msg_type,
                    payload: self.buffer.clone(),
                };

                self.reset();
                Ok(Some(frame))
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Stops after the first complete frame or the first error and returns
    /// it with the number of bytes consumed, including the byte that
    /// completed or broke the frame. Resume with `bytes[consumed..]`.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (Result<Option<Frame>, FrameError>, usize) {
        for (i, &byte) in bytes.iter().enumerate() {
            match self.feed(byte) {
                Ok(None) => {}
                result => return (result, i + 1),
            }
        }
        (Ok(None), bytes.len())
    }

    /// True while the parser sits between frames
    pub fn is_idle(&self) -> bool {
        self.state == ParseState::WaitingForStart
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_frame_encode_empty_payload() {
        let frame = Frame::new(0x31, &[]).unwrap().with_seq(3);
        let mut buffer = [0u8; 10];
        let len = frame.encode(&mut buffer).unwrap();

        assert_eq!(len, 5);
        assert_eq!(buffer[0], FRAME_START);
        assert_eq!(buffer[1], 0); // length
        assert_eq!(buffer[2], 3); // seq
        assert_eq!(buffer[3], 0x31); // type
        assert_eq!(buffer[4], 3 ^ 0x31); // checksum
    }

    #[test]
    fn test_frame_encode_buffer_too_small() {
        let frame = Frame::new(0x30, &[0, 0, 0, 239, 0, 0, 0, 7]).unwrap();
        let mut buffer = [0u8; 8];
        assert_eq!(frame.encode(&mut buffer), Err(FrameError::BufferTooSmall));
    }

    #[test]
    fn test_parser_keeps_sequence_number() {
        let frame = Frame::new(0x31, &[0xF8, 0x00]).unwrap().with_seq(200);
        let encoded = frame.encode_to_vec().unwrap();

        let mut parser = FrameParser::new();
        let (parsed, used) = parser.feed_bytes(&encoded);
        let parsed = parsed.unwrap().unwrap();

        assert_eq!(used, encoded.len());
        assert_eq!(parsed.seq, 200);
        assert_eq!(&parsed.payload[..], &[0xF8, 0x00]);
        assert!(parser.is_idle());
    }

    #[test]
    fn test_parser_invalid_checksum() {
        let frame = Frame::new(0x30, &[1, 2]).unwrap();
        let mut encoded = frame.encode_to_vec().unwrap();
        let last_idx = encoded.len() - 1;
        encoded[last_idx] ^= 0xFF;

        let mut parser = FrameParser::new();
        assert_eq!(
            parser.feed_bytes(&encoded),
            (Err(FrameError::InvalidChecksum), encoded.len())
        );
        assert!(parser.is_idle());
    }

    #[test]
    fn test_parser_resumes_after_bad_frame() {
        let mut bad = Frame::new(0x30, &[1, 2]).unwrap().encode_to_vec().unwrap();
        let last_idx = bad.len() - 1;
        bad[last_idx] ^= 0xFF;
        let good = Frame::new(0x31, &[7]).unwrap().with_seq(5).encode_to_vec().unwrap();

        let mut stream = Vec::<u8, 32>::new();
        stream.extend_from_slice(&bad).unwrap();
        stream.extend_from_slice(&good).unwrap();

        let mut parser = FrameParser::new();
        let (result, used) = parser.feed_bytes(&stream);
        assert_eq!(result, Err(FrameError::InvalidChecksum));
        assert_eq!(used, bad.len());

        let (frame, rest) = parser.feed_bytes(&stream[used..]);
        assert_eq!(frame.unwrap().unwrap().seq, 5);
        assert_eq!(used + rest, stream.len());
    }

    #[test]
    fn test_parser_rejects_oversized_length() {
        let mut parser = FrameParser::new();
        assert_eq!(parser.feed(FRAME_START), Ok(None));
        assert_eq!(parser.feed(251), Err(FrameError::InvalidFrame));
    }

    #[test]
    fn test_parser_leaves_following_frame_unconsumed() {
        let first = Frame::new(0x30, &[9]).unwrap().with_seq(1).encode_to_vec().unwrap();
        let second = Frame::new(0x31, &[7]).unwrap().with_seq(2).encode_to_vec().unwrap();
        let mut stream = Vec::<u8, 32>::new();
        stream.extend_from_slice(&first).unwrap();
        stream.extend_from_slice(&second).unwrap();

        let mut parser = FrameParser::new();
        let (frame, used) = parser.feed_bytes(&stream);
        assert_eq!(frame.unwrap().unwrap().seq, 1);
        let (frame, _) = parser.feed_bytes(&stream[used..]);
        assert_eq!(frame.unwrap().unwrap().seq, 2);
    }

    #[test]
    fn test_payload_too_large() {
        let large_payload = [0u8; MAX_PAYLOAD_SIZE + 1];
        assert_eq!(Frame::new(0x31, &large_payload), Err(FrameError::PayloadTooLarge));
    }

    proptest! {
        #[test]
        fn prop_parser_resyncs_after_noise(
            noise in proptest::collection::vec(any::<u8>().prop_filter("no start byte", |b| *b != FRAME_START), 0..16),
            payload in proptest::collection::vec(any::<u8>(), 0..MAX_PAYLOAD_SIZE),
            seq in any::<u8>(),
        ) {
            let frame = Frame::new(0x31, &payload).unwrap().with_seq(seq);
            let encoded = frame.encode_to_vec().unwrap();

            let mut parser = FrameParser::new();
            let (none, used) = parser.feed_bytes(&noise);
            prop_assert_eq!(none, Ok(None));
            prop_assert_eq!(used, noise.len());

            let (parsed, _) = parser.feed_bytes(&encoded);
            prop_assert_eq!(parsed, Ok(Some(frame)));
        }
    }
}
