//! Strata Hardware Abstraction Layer
//!
//! Traits the controller-side display backends are written against. A
//! chip-specific HAL (or a test double) implements them, so the same
//! command executor drives an ST7789 on any MCU.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  strata-drivers (St7789 executor)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  strata-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  chip HAL / mock bus                    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - DC and CS lines
//! - [`spi::SpiBus`] - pixel and register traffic

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod spi;

pub use gpio::OutputPin;
pub use spi::{Mode, SpiBus, SpiConfig};
