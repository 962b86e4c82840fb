//! Globally unique symbol identity.
//!
//! A symbol is identified by the site that created it and that site's counter at
//! creation time. The identity is independent of where the symbol sits in the
//! document, which is what erase matching relies on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::crdt::types::site::SiteId;

/// The `(site_id, site_counter)` pair that names exactly one symbol.
///
/// Ordered by site first, then counter, so identities from the same site sort
/// in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolId {
    site_id: SiteId,
    site_counter: u64,
}

impl SymbolId {
    pub fn new(site_id: SiteId, site_counter: u64) -> Self {
        SymbolId {
            site_id,
            site_counter,
        }
    }

    pub fn site_id(&self) -> SiteId {
        self.site_id
    }

    pub fn site_counter(&self) -> u64 {
        self.site_counter
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.site_id, self.site_counter)
    }
}
