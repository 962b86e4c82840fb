//! Type definitions for the LSEQ CRDT.
//!
//! This module contains the fundamental identity and ordering types used
//! throughout the replicated sequence.

pub mod clock;
pub mod position;
pub mod site;
pub mod symbol_id;

pub use clock::SiteCounter;
pub use position::{BEGIN, Position};
pub use site::SiteId;
pub use symbol_id::SymbolId;
