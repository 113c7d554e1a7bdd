//! Abstractions at the engine's boundary
//!
//! The engine never touches a transport directly; it submits commands
//! through [`CommandChannel`].

pub mod channel;

pub use channel::{ChannelError, CommandChannel};
