//! Fractional positions for the LSEQ sequence.
//!
//! A position is a variable-length path of integer components, most significant
//! first. Positions compare lexicographically, with a proper prefix sorting
//! before any of its extensions, which yields a dense total order: the allocator
//! can always find a new position between two existing ones by going deeper.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The reserved component value marking the start of every level.
pub const BEGIN: u32 = 0;

/// A position in the replicated sequence.
///
/// Components are stored in a growable vector so there is no maximum depth.
/// The derived ordering on `Vec<u32>` is exactly the lexicographic order the
/// sequence needs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(Vec<u32>);

impl Position {
    pub fn new(components: Vec<u32>) -> Self {
        Position(components)
    }

    /// The synthetic position before every symbol.
    pub fn begin() -> Self {
        Position(vec![BEGIN])
    }

    /// The synthetic position after every symbol, for a level width of `base`.
    pub fn end(base: u32) -> Self {
        Position(vec![base])
    }

    /// The component at `depth`, if the position is that deep.
    pub fn get(&self, depth: usize) -> Option<u32> {
        self.0.get(depth).copied()
    }

    pub fn components(&self) -> &[u32] {
        &self.0
    }

    /// Number of components.
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<u32>> for Position {
    fn from(components: Vec<u32>) -> Self {
        Position(components)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut components = self.0.iter();
        if let Some(first) = components.next() {
            write!(f, "{first}")?;
        }
        for component in components {
            write!(f, ".{component}")?;
        }
        Ok(())
    }
}
