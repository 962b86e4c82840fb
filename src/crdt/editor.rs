//! Core replica implementation.
//!
//! This module contains [`SharedEditor`], one site's copy of the shared document.
//! Local edits mutate the copy immediately and return the [`Message`] the other
//! replicas need; remote messages are merged by position so every replica ends up
//! with the same symbol order no matter how concurrent edits interleave.

use std::fmt;

use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::crdt::allocator::Allocator;
use crate::crdt::error::EditorError;
use crate::crdt::message::{Message, MessageKind};
use crate::crdt::symbol::Symbol;
use crate::crdt::types::{SiteCounter, SiteId};

/// A single site's replica of the shared document.
///
/// # Design
///
/// - Symbols are kept in a vector sorted by [`Symbol`] ordering; document order
///   is position order, so indices map straight onto the vector
/// - Remote inserts and erases locate their target by binary search
/// - Erased symbols are removed outright; no tombstones are kept
/// - The symbol list and the allocator share one lock, so local edits and remote
///   applies on the same replica never interleave
pub struct SharedEditor {
    /// The site this replica edits as
    site_id: SiteId,
    /// Source of ids for local inserts
    counter: SiteCounter,
    /// Document and allocator, guarded together
    state: RwLock<EditorState>,
}

struct EditorState {
    /// Visible symbols in document order
    symbols: Vec<Symbol>,
    /// Position allocator with this replica's committed strategies
    allocator: Allocator,
}

impl SharedEditor {
    /// Creates an empty replica for `site_id` with the default allocator.
    pub fn new(site_id: SiteId) -> Self {
        Self::with_allocator(site_id, Allocator::default())
    }

    pub fn with_allocator(site_id: SiteId, allocator: Allocator) -> Self {
        SharedEditor {
            site_id,
            counter: SiteCounter::new(site_id),
            state: RwLock::new(EditorState {
                symbols: Vec::new(),
                allocator,
            }),
        }
    }

    pub fn site_id(&self) -> SiteId {
        self.site_id
    }

    /// The counter value the next local insert will use.
    pub fn site_counter(&self) -> u64 {
        self.counter.current()
    }

    /// Inserts `value` so that it ends up at `index` and returns the message
    /// announcing it.
    ///
    /// # Arguments
    ///
    /// * `index` - Target index, `0..=len`
    /// * `value` - The character to insert
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - The insert message for the other replicas
    /// * `Err(EditorError::IndexOutOfRange)` - `index > len`; nothing changed
    pub fn local_insert(&self, index: usize, value: char) -> Result<Message, EditorError> {
        let mut state = self.state.write();
        let EditorState { symbols, allocator } = &mut *state;

        let len = symbols.len();
        if index > len {
            return Err(EditorError::IndexOutOfRange { index, len });
        }

        let prev = match index.checked_sub(1) {
            Some(before) => symbols[before].position().clone(),
            None => allocator.begin(),
        };
        // Concurrent inserts can leave neighbours sharing a position; bound the
        // allocation by the first strictly greater one instead.
        let next = symbols[index..]
            .iter()
            .map(Symbol::position)
            .find(|position| **position > prev)
            .cloned()
            .unwrap_or_else(|| allocator.end());

        let position = allocator.allocate_between(&prev, &next);
        let symbol = Symbol::new(value, self.counter.tick(), position);

        let at = symbols.partition_point(|existing| existing < &symbol);
        symbols.insert(at, symbol.clone());

        debug!(
            site_id = self.site_id,
            index,
            at,
            value = %value,
            position = %symbol.position(),
            "local insert"
        );
        Ok(Message::insert(self.site_id, symbol))
    }

    /// Removes the symbol at `index` and returns the message announcing it.
    ///
    /// * `Err(EditorError::IndexOutOfRange)` - `index >= len`; nothing changed
    pub fn local_erase(&self, index: usize) -> Result<Message, EditorError> {
        let mut state = self.state.write();

        let len = state.symbols.len();
        if index >= len {
            return Err(EditorError::IndexOutOfRange { index, len });
        }

        let symbol = state.symbols.remove(index);
        debug!(
            site_id = self.site_id,
            index,
            id = %symbol.id(),
            "local erase"
        );
        Ok(Message::erase(self.site_id, symbol))
    }

    /// Merges a message produced by another replica.
    ///
    /// Returns whether the document changed. Re-delivered inserts and erases of
    /// symbols this replica does not hold are no-ops, which keeps the merge
    /// idempotent and lets concurrent erases of the same symbol commute.
    ///
    /// * `Err(EditorError::InvalidPosition)` - the symbol's position is empty,
    ///   a sentinel, or outside this replica's position space; nothing changed
    pub fn apply_remote(&self, message: &Message) -> Result<bool, EditorError> {
        let symbol = message.symbol();
        let mut state = self.state.write();

        if !state.allocator.is_assignable(symbol.position()) {
            warn!(
                site_id = self.site_id,
                origin = message.origin(),
                position = %symbol.position(),
                "rejecting message with unassignable position"
            );
            return Err(EditorError::InvalidPosition(symbol.position().clone()));
        }

        let applied = match message.kind() {
            MessageKind::Insert => match state.symbols.binary_search(symbol) {
                Ok(_) => {
                    debug!(
                        site_id = self.site_id,
                        id = %symbol.id(),
                        "ignoring duplicate insert"
                    );
                    false
                }
                Err(at) => {
                    state.symbols.insert(at, symbol.clone());
                    trace!(
                        site_id = self.site_id,
                        origin = message.origin(),
                        at,
                        "applied remote insert"
                    );
                    true
                }
            },
            MessageKind::Erase => match state.symbols.binary_search(symbol) {
                Ok(at) => {
                    state.symbols.remove(at);
                    trace!(
                        site_id = self.site_id,
                        origin = message.origin(),
                        at,
                        "applied remote erase"
                    );
                    true
                }
                Err(_) => {
                    debug!(
                        site_id = self.site_id,
                        id = %symbol.id(),
                        "ignoring erase of absent symbol"
                    );
                    false
                }
            },
        };
        Ok(applied)
    }

    /// Returns the visible document text.
    pub fn render(&self) -> String {
        self.state
            .read()
            .symbols
            .iter()
            .map(Symbol::value)
            .collect()
    }

    /// Number of characters in the document.
    pub fn len(&self) -> usize {
        self.state.read().symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().symbols.is_empty()
    }

    /// Returns a snapshot of all symbols in document order.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.state.read().symbols.clone()
    }

    pub fn symbol_at(&self, index: usize) -> Option<Symbol> {
        self.state.read().symbols.get(index).cloned()
    }

    /// Index of the first symbol holding `value` (useful for tests and demos).
    pub fn find_by_char(&self, value: char) -> Option<usize> {
        self.state
            .read()
            .symbols
            .iter()
            .position(|symbol| symbol.value() == value)
    }

    /// Logs every symbol with its identity and position at debug level.
    pub fn dump_symbols(&self) {
        let state = self.state.read();
        debug!(site_id = self.site_id, len = state.symbols.len(), "symbol dump");
        for (index, symbol) in state.symbols.iter().enumerate() {
            debug!(
                index,
                value = ?symbol.value(),
                id = %symbol.id(),
                position = %symbol.position(),
                "symbol"
            );
        }
    }
}

impl fmt::Display for SharedEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for SharedEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedEditor")
            .field("site_id", &self.site_id)
            .field("site_counter", &self.site_counter())
            .field("text", &self.render())
            .finish()
    }
}
