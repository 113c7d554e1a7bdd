//! Strip cache comparator
//!
//! Remembers what was last sent for each strip so unchanged strips can be
//! skipped. A baseline only changes through [`StripCache::commit`], which the
//! refresh controller calls after both commands of a strip were accepted by
//! the channel.

use alloc::vec;
use alloc::vec::Vec;

use crate::strip::StripIndex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Change-detection strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CacheMode {
    /// One baseline per strip: full dirty tracking across the round-robin
    #[default]
    PerStrip,
    /// Only the most recently sent strip is remembered
    SingleStrip,
    /// No baseline; every visit resends (degraded)
    Disabled,
}

impl CacheMode {
    /// Modes that cannot suppress redundant sends across a full cycle
    pub fn is_degraded(self) -> bool {
        !matches!(self, CacheMode::PerStrip)
    }
}

/// Last-transmitted strip content
#[derive(Debug, Clone)]
pub struct StripCache {
    mode: CacheMode,
    strip_len: usize,
    total_strips: u16,
    /// Baseline bytes, one `strip_len` slot per tracked strip
    baselines: Vec<u8>,
    /// Committed length per slot, `None` until first commit
    committed: Vec<Option<usize>>,
    /// Strip owning the single slot in `SingleStrip` mode
    single_owner: Option<StripIndex>,
}

impl StripCache {
    /// Allocate baselines for `total_strips` strips of at most `strip_len` bytes
    pub fn new(mode: CacheMode, total_strips: u16, strip_len: usize) -> Self {
        let slots = match mode {
            CacheMode::PerStrip => usize::from(total_strips),
            CacheMode::SingleStrip => 1,
            CacheMode::Disabled => 0,
        };

        Self {
            mode,
            strip_len,
            total_strips,
            baselines: vec![0; slots * strip_len],
            committed: vec![None; slots],
            single_owner: None,
        }
    }

    pub fn mode(&self) -> CacheMode {
        self.mode
    }

    fn slot(&self, index: StripIndex) -> Option<usize> {
        if index >= self.total_strips {
            return None;
        }
        match self.mode {
            CacheMode::PerStrip => Some(usize::from(index)),
            CacheMode::SingleStrip => (self.single_owner == Some(index)).then_some(0),
            CacheMode::Disabled => None,
        }
    }

    fn baseline(&self, slot: usize) -> Option<&[u8]> {
        let len = (*self.committed.get(slot)?)?;
        let start = slot * self.strip_len;
        self.baselines.get(start..start + len)
    }

    /// True if `candidate` differs from the committed baseline for `index`,
    /// or if there is no baseline yet
    pub fn should_transmit(&self, index: StripIndex, candidate: &[u8]) -> bool {
        match self.slot(index).and_then(|slot| self.baseline(slot)) {
            Some(baseline) => baseline != candidate,
            None => true,
        }
    }

    /// Make `sent` the new baseline for `index`
    ///
    /// Ignored for out-of-range strips, oversized buffers and in
    /// `Disabled` mode.
    pub fn commit(&mut self, index: StripIndex, sent: &[u8]) {
        if index >= self.total_strips || sent.len() > self.strip_len {
            return;
        }

        let slot = match self.mode {
            CacheMode::PerStrip => usize::from(index),
            CacheMode::SingleStrip => {
                self.single_owner = Some(index);
                0
            }
            CacheMode::Disabled => return,
        };

        let start = slot * self.strip_len;
        if let Some(dest) = self.baselines.get_mut(start..start + sent.len()) {
            dest.copy_from_slice(sent);
            self.committed[slot] = Some(sent.len());
        }
    }

    /// Forget the baseline for one strip so its next visit transmits
    pub fn invalidate(&mut self, index: StripIndex) {
        match self.mode {
            CacheMode::PerStrip => {
                if let Some(committed) = self.committed.get_mut(usize::from(index)) {
                    *committed = None;
                }
            }
            CacheMode::SingleStrip => {
                if self.single_owner == Some(index) {
                    self.invalidate_all();
                }
            }
            CacheMode::Disabled => {}
        }
    }

    /// Forget every baseline
    pub fn invalidate_all(&mut self) {
        self.committed.iter_mut().for_each(|committed| *committed = None);
        self.single_owner = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_visit_always_transmits() {
        let cache = StripCache::new(CacheMode::PerStrip, 4, 8);
        assert!(cache.should_transmit(0, &[0; 8]));
    }

    #[test]
    fn test_committed_strip_suppressed_until_changed() {
        let mut cache = StripCache::new(CacheMode::PerStrip, 4, 8);
        let mut content = [0x11u8; 8];
        cache.commit(2, &content);

        assert!(!cache.should_transmit(2, &content));
        content[5] ^= 0x01;
        assert!(cache.should_transmit(2, &content));
        // Other strips are unaffected
        assert!(cache.should_transmit(1, &[0x11; 8]));
    }

    #[test]
    fn test_per_strip_keeps_every_baseline() {
        let mut cache = StripCache::new(CacheMode::PerStrip, 3, 4);
        cache.commit(0, &[1; 4]);
        cache.commit(1, &[2; 4]);
        cache.commit(2, &[3; 4]);

        assert!(!cache.should_transmit(0, &[1; 4]));
        assert!(!cache.should_transmit(1, &[2; 4]));
        assert!(!cache.should_transmit(2, &[3; 4]));
    }

    #[test]
    fn test_clipped_strip_compares_by_length() {
        let mut cache = StripCache::new(CacheMode::PerStrip, 2, 8);
        cache.commit(1, &[7; 4]);
        assert!(!cache.should_transmit(1, &[7; 4]));
        assert!(cache.should_transmit(1, &[7; 8]));
    }

    #[test]
    fn test_single_strip_only_remembers_latest() {
        let mut cache = StripCache::new(CacheMode::SingleStrip, 3, 4);
        cache.commit(0, &[1; 4]);
        assert!(!cache.should_transmit(0, &[1; 4]));

        cache.commit(1, &[2; 4]);
        assert!(!cache.should_transmit(1, &[2; 4]));
        assert!(cache.should_transmit(0, &[1; 4]));
    }

    #[test]
    fn test_disabled_always_transmits() {
        let mut cache = StripCache::new(CacheMode::Disabled, 3, 4);
        cache.commit(0, &[1; 4]);
        assert!(cache.should_transmit(0, &[1; 4]));
        assert!(CacheMode::Disabled.is_degraded());
        assert!(!CacheMode::PerStrip.is_degraded());
    }

    #[test]
    fn test_invalidate_forces_resend() {
        let mut cache = StripCache::new(CacheMode::PerStrip, 2, 4);
        cache.commit(0, &[1; 4]);
        cache.commit(1, &[1; 4]);

        cache.invalidate(0);
        assert!(cache.should_transmit(0, &[1; 4]));
        assert!(!cache.should_transmit(1, &[1; 4]));

        cache.invalidate_all();
        assert!(cache.should_transmit(1, &[1; 4]));
    }

    #[test]
    fn test_out_of_range_commit_ignored() {
        let mut cache = StripCache::new(CacheMode::PerStrip, 2, 4);
        cache.commit(5, &[1; 4]);
        cache.commit(0, &[1; 6]);
        assert!(cache.should_transmit(0, &[1; 4]));
        assert!(cache.should_transmit(5, &[1; 4]));
    }
}
