//! Refresh cycle controller
//!
//! One call to [`StripRefresher::on_refresh_tick`] services exactly one strip,
//! chosen round-robin. Worst-case staleness of any strip is therefore
//! `total_strips` ticks no matter how many strips are dirty.
//!
//! Per tick:
//! 1. Select the next strip (wrapping)
//! 2. Copy its clipped rows from the framebuffer into the working buffer
//! 3. Skip if the cache says nothing changed
//! 4. Submit `set_window`, then `write_data`
//! 5. Commit the baseline only if both were accepted

use alloc::vec;
use alloc::vec::Vec;
use core::time::Duration;

use strata_protocol::Priority;

use crate::cache::{CacheMode, StripCache};
use crate::config::{ConfigError, DisplayConfig};
use crate::framebuffer::Framebuffer;
use crate::geometry::Geometry;
use crate::strip::{StripIndex, StripLayout};
use crate::traits::{ChannelError, CommandChannel};

/// Why a tick failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshError {
    /// The window command was refused; nothing was sent for this strip
    Window(ChannelError),
    /// The window was accepted but the pixel data was refused
    Data(ChannelError),
    /// Framebuffer dimensions differ from the configured geometry
    FramebufferMismatch,
}

/// Result of one refresh tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshOutcome {
    /// Strip content matched the cache; nothing was sent
    Skipped,
    /// Window and data for the strip were submitted
    Transmitted {
        strip_index: StripIndex,
        y_start: u16,
        y_end: u16,
    },
    /// Submission failed; the strip stays dirty until its next visit
    Failed { reason: RefreshError },
}

impl RefreshOutcome {
    pub fn is_transmitted(&self) -> bool {
        matches!(self, RefreshOutcome::Transmitted { .. })
    }
}

/// Running counters, for logging and metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshStats {
    pub transmitted: u32,
    pub skipped: u32,
    pub failed: u32,
    /// Pixel bytes accepted by the channel
    pub bytes_sent: u64,
}

#[derive(Debug, Clone, Copy)]
struct RefreshState {
    /// Strip the next tick will visit
    next_strip: StripIndex,
    /// Strip visited by the most recent tick
    last_strip: Option<StripIndex>,
    /// Caller timestamp of the last successful transmission (µs)
    last_flush_us: Option<u64>,
}

/// Differential strip-refresh driver
///
/// Owns its command channel, working buffer and cache. Not internally
/// synchronised; see [`crate::SharedRefresher`] for multi-context use.
pub struct StripRefresher<C> {
    layout: StripLayout,
    channel: C,
    cache: StripCache,
    /// Nominal-size strip buffer, reused every tick
    working: Vec<u8>,
    state: RefreshState,
    stats: RefreshStats,
    priority: Priority,
    tick_interval: Duration,
    max_cycle_duration: Duration,
    initialized: bool,
}

impl<C: CommandChannel> StripRefresher<C> {
    /// Build a driver from a validated configuration
    ///
    /// Fails if the configuration is invalid or the channel is unavailable.
    /// All buffers are allocated here and reused for the driver's lifetime.
    pub fn new(config: &DisplayConfig, channel: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let geometry = config.geometry()?;

        if !channel.is_available() {
            warn!("display channel unavailable at construction");
            return Err(ConfigError::ChannelUnavailable);
        }

        let layout = StripLayout::new(geometry);
        let cache = StripCache::new(config.cache, layout.total_strips(), geometry.strip_len());

        info!(
            "strip refresher: {}x{}, {} strips of {} rows",
            geometry.width(),
            geometry.height(),
            layout.total_strips(),
            geometry.strip_height()
        );
        if config.cache.is_degraded() {
            warn!("strip cache degraded: {}", config.cache);
        }

        Ok(Self {
            layout,
            channel,
            cache,
            working: vec![0; geometry.strip_len()],
            state: RefreshState {
                next_strip: 0,
                last_strip: None,
                last_flush_us: None,
            },
            stats: RefreshStats::default(),
            priority: config.priority.into(),
            tick_interval: config.tick_interval(),
            max_cycle_duration: config.max_cycle_duration(),
            initialized: false,
        })
    }

    /// Device bring-up hook
    ///
    /// Bring-up belongs to the channel's own configuration handshake, so
    /// this only records that the caller asked. Safe to call repeatedly.
    pub fn init(&mut self) {
        if !self.initialized {
            debug!("strip refresher init");
            self.initialized = true;
        }
    }

    /// Service the next strip
    ///
    /// `now_us` is the caller's monotonic clock, recorded as the flush time
    /// when the strip is transmitted. Never blocks and never retries within
    /// the tick.
    pub fn on_refresh_tick(&mut self, framebuffer: &Framebuffer, now_us: u64) -> RefreshOutcome {
        if framebuffer.dimensions() != self.dimensions() {
            return self.fail(RefreshError::FramebufferMismatch);
        }

        let index = self.state.next_strip;
        self.state.next_strip = self.layout.next_index(index);
        self.state.last_strip = Some(index);

        let span = self.layout.span(index);
        let width = self.layout.geometry().width();
        let len = span.byte_len(width);

        let Some(rows) = framebuffer.rows(span.y_start, span.y_end) else {
            return self.fail(RefreshError::FramebufferMismatch);
        };
        // Only the clipped row count is used; the tail of the working
        // buffer is never sent.
        self.working[..len].copy_from_slice(rows);
        let candidate = &self.working[..len];

        if !self.cache.should_transmit(index, candidate) {
            self.stats.skipped = self.stats.skipped.wrapping_add(1);
            trace!("strip {} unchanged", index);
            return RefreshOutcome::Skipped;
        }

        if let Err(e) = self.channel.set_window(span.window(width), self.priority) {
            return self.fail(RefreshError::Window(e));
        }
        if let Err(e) = self.channel.write_data(candidate, self.priority) {
            return self.fail(RefreshError::Data(e));
        }

        self.cache.commit(index, candidate);
        self.state.last_flush_us = Some(now_us);
        self.stats.transmitted = self.stats.transmitted.wrapping_add(1);
        self.stats.bytes_sent = self.stats.bytes_sent.wrapping_add(len as u64);
        debug!(
            "strip {} sent: rows {}..={}, {} bytes",
            index,
            span.y_start,
            span.y_end,
            len
        );

        RefreshOutcome::Transmitted {
            strip_index: index,
            y_start: span.y_start,
            y_end: span.y_end,
        }
    }

    fn fail(&mut self, reason: RefreshError) -> RefreshOutcome {
        self.stats.failed = self.stats.failed.wrapping_add(1);
        warn!("strip refresh failed: {}", reason);
        RefreshOutcome::Failed { reason }
    }

    /// Force every strip to be resent on its next visit
    ///
    /// Use after the controller lost its RAM contents (reset, reconnect).
    pub fn invalidate_all(&mut self) {
        self.cache.invalidate_all();
    }

    /// Force one strip to be resent on its next visit
    pub fn invalidate_strip(&mut self, index: StripIndex) {
        self.cache.invalidate(index);
    }

    /// `(width, height)` in pixels
    pub fn dimensions(&self) -> (u16, u16) {
        self.layout.geometry().dimensions()
    }

    pub fn geometry(&self) -> &Geometry {
        self.layout.geometry()
    }

    pub fn total_strips(&self) -> u16 {
        self.layout.total_strips()
    }

    /// Upper bound for one refresh cycle, for caller timeouts and budgeting
    pub fn max_cycle_duration(&self) -> Duration {
        self.max_cycle_duration
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Time for the round-robin to visit every strip once:
    /// `total_strips * tick_interval`
    pub fn expected_full_refresh_latency(&self) -> Duration {
        self.tick_interval * u32::from(self.layout.total_strips())
    }

    pub fn cache_mode(&self) -> CacheMode {
        self.cache.mode()
    }

    /// True when change detection cannot suppress redundant sends
    pub fn is_degraded(&self) -> bool {
        self.cache.mode().is_degraded()
    }

    pub fn stats(&self) -> RefreshStats {
        self.stats
    }

    /// Strip the next tick will visit
    pub fn next_strip(&self) -> StripIndex {
        self.state.next_strip
    }

    /// Strip visited by the most recent tick
    pub fn last_strip(&self) -> Option<StripIndex> {
        self.state.last_strip
    }

    /// Timestamp passed with the last successful transmission
    pub fn last_flush_us(&self) -> Option<u64> {
        self.state.last_flush_us
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Consume the driver and return its channel
    pub fn into_channel(self) -> C {
        self.channel
    }
}
