//! Configuration
//!
//! Display configuration types, validation and (with the `toml` feature)
//! loading from a `[display]` table.

#[cfg(feature = "toml")]
pub mod toml;
pub mod types;

#[cfg(feature = "toml")]
pub use self::toml::parse_config;
pub use types::*;

/// Configuration errors
///
/// All of these are fatal: a driver is never constructed from a
/// configuration that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Display width is zero
    ZeroWidth,
    /// Display height is zero
    ZeroHeight,
    /// Strip height is zero
    ZeroStripHeight,
    /// Tick interval is zero
    ZeroTickInterval,
    /// Command channel reported itself unavailable
    ChannelUnavailable,
    /// Framebuffer byte length does not match its dimensions
    FramebufferSize,
    /// Configuration text could not be parsed
    Parse,
}
