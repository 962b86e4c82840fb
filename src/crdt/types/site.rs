//! Site identifier type.
//!
//! A site is one replica of the shared document. Its identifier is handed out by
//! the broadcast fabric at registration and never changes afterwards.

/// A unique identifier for each site (replica) taking part in an editing session.
///
/// Site identifiers double as the tie-break when two sites independently allocate
/// the same position, so every replica must agree on them.
pub type SiteId = u64;
