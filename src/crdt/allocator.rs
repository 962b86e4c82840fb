//! LSEQ position allocator.
//!
//! Given two neighbouring positions, the allocator produces a new position
//! strictly between them. It walks both positions level by level, copying
//! shared components, and stops at the first level with a free slot.
//!
//! Where the free interval touches the edge of the position space (typing at the
//! end or the start of a line) the allocator does not pick the midpoint: it
//! stays within `boundary` of the neighbour on the side given by the level's
//! strategy, so repeated appends consume the level slowly instead of halving it.
//! A level's strategy is committed the first time the level needs one.

use tracing::trace;

use crate::config::{AllocatorConfig, ConfigError};
use crate::crdt::types::{BEGIN, Position};

/// Which side of a boundary interval new components hug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Stay close to the lower neighbour; suits appending.
    BoundaryPlus,
    /// Stay close to the upper neighbour; suits prepending.
    BoundaryMinus,
}

/// Per-replica allocator state.
#[derive(Debug, Clone)]
pub struct Allocator {
    base: u32,
    boundary: u32,
    strategies: Vec<Option<Strategy>>,
}

impl Default for Allocator {
    fn default() -> Self {
        let config = AllocatorConfig::default();
        Allocator {
            base: config.base,
            boundary: config.boundary,
            strategies: Vec::new(),
        }
    }
}

impl Allocator {
    pub fn new(config: AllocatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Allocator {
            base: config.base,
            boundary: config.boundary,
            strategies: Vec::new(),
        })
    }

    /// The position before every symbol.
    pub fn begin(&self) -> Position {
        Position::begin()
    }

    /// The position after every symbol.
    pub fn end(&self) -> Position {
        Position::end(self.base)
    }

    /// The strategy committed for `depth`, if that level has needed one yet.
    pub fn strategy_at(&self, depth: usize) -> Option<Strategy> {
        self.strategies.get(depth).copied().flatten()
    }

    /// Whether `position` could have been handed out by this allocator.
    ///
    /// Assignable positions are non-empty, keep every component below `base`
    /// and end in a component above [`BEGIN`]. Both sentinels fail the test.
    pub fn is_assignable(&self, position: &Position) -> bool {
        match position.components().split_last() {
            Some((&last, _)) => {
                last > BEGIN && position.components().iter().all(|&c| c < self.base)
            }
            None => false,
        }
    }

    /// Returns a position `r` with `prev < r < next`.
    ///
    /// `prev` must sort strictly before `next`.
    pub fn allocate_between(&mut self, prev: &Position, next: &Position) -> Position {
        debug_assert!(prev < next, "allocate_between({prev}, {next}) needs prev < next");

        let mut components = Vec::with_capacity(prev.depth().max(next.depth()) + 1);
        // Set once the walk has copied a component one below `next`'s: from then
        // on anything under the copied prefix already sorts before `next`.
        let mut consecutive = false;
        let mut depth = 0;

        loop {
            let lo = prev.get(depth).unwrap_or(BEGIN);
            let hi = if consecutive {
                self.base
            } else {
                next.get(depth).unwrap_or(self.base)
            };

            match hi.saturating_sub(lo) {
                0 => components.push(lo),
                1 => {
                    components.push(lo);
                    consecutive = true;
                }
                _ => {
                    components.push(self.pick(depth, lo, hi, consecutive));
                    break;
                }
            }
            depth += 1;
        }

        let position = Position::new(components);
        trace!(%prev, %next, %position, "allocated position");
        position
    }

    /// Chooses a component strictly inside `(lo, hi)`; requires `hi - lo >= 2`.
    ///
    /// Below a consecutive split the interval is the fresh level under `prev`,
    /// which is always grown from its lower side.
    fn pick(&mut self, depth: usize, lo: u32, hi: u32, consecutive: bool) -> u32 {
        let at_begin = lo == BEGIN && !consecutive;
        let at_end = hi == self.base;

        if at_begin == at_end {
            return lo + (hi - lo) / 2;
        }

        let step = (hi - lo - 1).min(self.boundary);
        let offset = step.div_ceil(2);
        match self.commit_strategy(depth, at_begin) {
            Strategy::BoundaryPlus => lo + offset,
            Strategy::BoundaryMinus => hi - offset,
        }
    }

    fn commit_strategy(&mut self, depth: usize, at_begin: bool) -> Strategy {
        if self.strategies.len() <= depth {
            self.strategies.resize(depth + 1, None);
        }
        *self.strategies[depth].get_or_insert(if at_begin {
            Strategy::BoundaryMinus
        } else {
            Strategy::BoundaryPlus
        })
    }
}
