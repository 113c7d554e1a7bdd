//! Scheduling priority attached to each submitted command
//!
//! The controller's command queue orders work by a requested clock. Display
//! refresh rides in the background class so it never delays motion or
//! heater traffic sharing the same link.

/// Request clock of the background class: "as soon as possible, non-urgent"
pub const BACKGROUND_PRIORITY_CLOCK: u64 = 0x7fff_ffff_0000_0000;

/// Scheduling class of a submitted command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Priority {
    /// Send before anything already scheduled at a later clock
    Immediate,
    /// Fill idle link time; never preempts scheduled traffic
    #[default]
    Background,
    /// Due at a specific controller clock
    At(u64),
}

impl Priority {
    /// Request clock the transport stamps on the command
    pub const fn req_clock(self) -> u64 {
        match self {
            Priority::Immediate => 0,
            Priority::Background => BACKGROUND_PRIORITY_CLOCK,
            Priority::At(clock) => clock,
        }
    }

    pub const fn is_background(self) -> bool {
        matches!(self, Priority::Background)
    }
}
