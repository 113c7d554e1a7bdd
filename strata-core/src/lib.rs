//! Differential strip-refresh engine
//!
//! This crate contains everything between the caller's framebuffer and the
//! command channel, without depending on a specific transport:
//!
//! - Display geometry and strip partitioning
//! - Per-strip change detection against the last committed transmission
//! - The round-robin refresh controller and its outcome reporting
//! - The framebuffer store the content producer draws into
//! - The `CommandChannel` trait transports implement
//! - Configuration types, validation and TOML loading
//!
//! # Refresh cycle
//!
//! ```text
//! tick ──▶ next strip ──▶ extract rows ──▶ changed? ──no──▶ Skipped
//!                                              │
//!                                             yes
//!                                              ▼
//!                         set_window ──▶ write_data ──▶ commit ──▶ Transmitted
//!                              │              │
//!                              └──── error ───┴──────────────────▶ Failed
//! ```
//!
//! A failed strip is never committed, so it is retried the next time the
//! round-robin reaches it.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;
#[cfg(test)]
extern crate std;

#[macro_use]
mod fmt;

pub mod cache;
pub mod config;
pub mod framebuffer;
pub mod geometry;
pub mod refresh;
pub mod shared;
pub mod strip;
pub mod traits;

#[cfg(test)]
mod test_support;

pub use cache::{CacheMode, StripCache};
pub use config::{ConfigError, DisplayConfig, PriorityClass};
pub use framebuffer::Framebuffer;
pub use geometry::Geometry;
pub use refresh::{RefreshError, RefreshOutcome, RefreshStats, StripRefresher};
pub use shared::SharedRefresher;
pub use strip::{StripIndex, StripLayout, StripSpan};
pub use traits::{ChannelError, CommandChannel};

pub use strata_protocol::{Priority, Window};
