//! Shared refresher
//!
//! Wraps a [`StripRefresher`] in a blocking mutex so ticks can be issued
//! from more than one context (timer interrupt, main loop, another thread).
//! The lock is held for one whole tick, so window/data pairs from different
//! callers never interleave.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::framebuffer::Framebuffer;
use crate::refresh::{RefreshOutcome, StripRefresher};
use crate::traits::CommandChannel;

/// Mutual-exclusion boundary around one refresher
pub struct SharedRefresher<R: RawMutex, C> {
    inner: Mutex<R, RefCell<StripRefresher<C>>>,
}

impl<R: RawMutex, C: CommandChannel> SharedRefresher<R, C> {
    pub fn new(refresher: StripRefresher<C>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(refresher)),
        }
    }

    /// Run one complete tick under the lock
    pub fn tick(&self, framebuffer: &Framebuffer, now_us: u64) -> RefreshOutcome {
        self.inner
            .lock(|refresher| refresher.borrow_mut().on_refresh_tick(framebuffer, now_us))
    }

    /// Run `f` with exclusive access to the refresher
    pub fn with<T>(&self, f: impl FnOnce(&mut StripRefresher<C>) -> T) -> T {
        self.inner.lock(|refresher| f(&mut refresher.borrow_mut()))
    }
}
