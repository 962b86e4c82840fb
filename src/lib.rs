//! # LSEQ CRDT - Replicated text editing
//!
//! A Conflict-free Replicated Data Type (CRDT) for collaborative text editing.
//! Every character carries a fractional position computed locally by an LSEQ
//! allocator, so replicas converge without global sequence numbers or a
//! consensus round-trip.
//!
//! ## Features
//!
//! - **Conflict-free**: Concurrent edits can be applied in any order and converge
//! - **Idempotent**: Re-delivered inserts and erases are absorbed as no-ops
//! - **Dense positions**: A new position always exists between two neighbours
//! - **True deletion**: Erased characters are removed, no tombstones are kept
//!
//! ## Example
//!
//! ```rust
//! use crdt_lseq::NetworkServer;
//!
//! let network = NetworkServer::new();
//! let alice = network.register_replica();
//! let bob = network.register_replica();
//!
//! network.local_insert(alice, 0, 'h').unwrap();
//! network.local_insert(alice, 1, 'i').unwrap();
//! network.dispatch_pending();
//!
//! assert_eq!(network.render(bob).unwrap(), "hi");
//! ```

pub mod config;
pub mod crdt;
pub mod network;
pub mod server;

// Re-export the main public API
pub use config::{AllocatorConfig, Config, ConfigError};
pub use crdt::{Allocator, EditorError, Message, MessageKind, SharedEditor, Strategy, Symbol};
pub use crdt::{Position, SiteId, SymbolId};
pub use network::{Broadcaster, FifoBroadcaster, NetworkServer};
