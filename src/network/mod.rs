//! Message fabric and replica host.
//!
//! The fabric decides who receives a message and in which order; the host owns
//! the replicas and turns deliveries into [`SharedEditor::apply_remote`] calls.
//!
//! [`SharedEditor::apply_remote`]: crate::crdt::SharedEditor::apply_remote

pub mod broadcast;
pub mod server;

pub use broadcast::{Broadcaster, FifoBroadcaster};
pub use server::NetworkServer;
