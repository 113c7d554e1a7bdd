//! Display Command-Channel Protocol
//!
//! This crate defines the two commands the host sends to a remote display
//! controller and the binary framing used to carry them over a byte
//! transport.
//!
//! # Protocol Overview
//!
//! A refresh is always a pair: declare the destination window, then stream
//! pixel bytes into it.
//!
//! ```text
//! host                                   controller
//!  │── SET_WINDOW x0 x1 y0 y1 ──────────▶ CASET / RASET / RAMWR
//!  │── WRITE_DATA <≤250 bytes> ─────────▶ pixel burst
//!  │── WRITE_DATA <≤250 bytes> ─────────▶ pixel burst (continues)
//! ```
//!
//! Every message uses the frame format:
//! ```text
//! ┌───────┬────────┬─────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ SEQ │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B  │ 1B   │ 0–250B      │ 1B       │
//! └───────┴────────┴─────┴──────┴─────────────┴──────────┘
//! ```
//!
//! Frames must be delivered in submission order; a data burst that
//! overtakes its window lands in the wrong rectangle.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod frame;
pub mod messages;
pub mod priority;

pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use messages::{DisplayCommand, Window, MSG_SET_WINDOW, MSG_WRITE_DATA};
pub use priority::{Priority, BACKGROUND_PRIORITY_CLOCK};
