//! Command channel implementations
//!
//! Concrete [`CommandChannel`](strata_core::CommandChannel) backends:
//!
//! - [`queue::QueuedChannel`] - host side; encodes commands into frames and
//!   holds them in a FIFO until the byte transport drains them
//! - [`st7789::St7789`] - controller side; turns window/data commands into
//!   ST7789 register and pixel traffic over SPI

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod queue;
pub mod st7789;

pub use queue::{QueuedChannel, QueuedCommand};
pub use st7789::St7789;
