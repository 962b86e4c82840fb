//! CRDT (Conflict-free Replicated Data Type) implementation module.
//!
//! This module contains the LSEQ replicated sequence: the position allocator,
//! symbols and messages, and the per-site editor that merges them.

pub mod allocator;
pub mod editor;
pub mod error;
pub mod message;
pub mod symbol;
pub mod types;

// Re-export the main public API
pub use allocator::{Allocator, Strategy};
pub use editor::SharedEditor;
pub use error::EditorError;
pub use message::{Message, MessageKind};
pub use symbol::Symbol;
pub use types::{BEGIN, Position, SiteCounter, SiteId, SymbolId};
