//! Thread-safe per-site insertion counter.
//!
//! Every symbol a site creates is stamped with the next value of this counter,
//! which together with the site id makes the symbol's identity globally unique.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::crdt::types::site::SiteId;
use crate::crdt::types::symbol_id::SymbolId;

/// A monotonic counter issuing symbol identities for one site.
///
/// Values start at 0 and are never reused, even if the symbol that received a
/// value is later erased.
#[derive(Debug)]
pub struct SiteCounter {
    counter: AtomicU64,
    site_id: SiteId,
}

impl SiteCounter {
    /// Creates a counter for `site_id` starting at 0.
    pub fn new(site_id: SiteId) -> Self {
        SiteCounter {
            counter: AtomicU64::new(0),
            site_id,
        }
    }

    /// Returns the next identity for this site and advances the counter.
    pub fn tick(&self) -> SymbolId {
        let site_counter = self.counter.fetch_add(1, AtomicOrdering::SeqCst);
        SymbolId::new(self.site_id, site_counter)
    }

    /// The value the next call to [`tick`](Self::tick) will hand out.
    pub fn current(&self) -> u64 {
        self.counter.load(AtomicOrdering::SeqCst)
    }

    pub fn site_id(&self) -> SiteId {
        self.site_id
    }
}
