//! Symbol definition for the LSEQ CRDT.
//!
//! A symbol is one inserted character together with the identity of the insert
//! that created it and the position it was given. Symbols are immutable once
//! created; erasing one removes it from the document outright.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::crdt::types::{Position, SiteId, SymbolId};

/// A single character within the replicated sequence.
///
/// # Ordering
///
/// Symbols sort by position, then by the creating site, then by that site's
/// counter. Two sites may independently allocate the same position for
/// concurrent inserts; the site id keeps their relative order identical on every
/// replica. The counter only matters when one site reuses a position it freed
/// by erasing an earlier symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    value: char,
    site_id: SiteId,
    site_counter: u64,
    position: Position,
}

impl Symbol {
    pub fn new(value: char, id: SymbolId, position: Position) -> Self {
        Symbol {
            value,
            site_id: id.site_id(),
            site_counter: id.site_counter(),
            position,
        }
    }

    pub fn value(&self) -> char {
        self.value
    }

    pub fn site_id(&self) -> SiteId {
        self.site_id
    }

    pub fn site_counter(&self) -> u64 {
        self.site_counter
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The globally unique identity of this symbol.
    pub fn id(&self) -> SymbolId {
        SymbolId::new(self.site_id, self.site_counter)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Symbol {}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position
            .cmp(&other.position)
            .then(self.site_id.cmp(&other.site_id))
            .then(self.site_counter.cmp(&other.site_counter))
    }
}
