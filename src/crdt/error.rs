//! Errors reported by replica operations.
//!
//! Caller mistakes and malformed remote messages surface here. Protocol
//! inconsistencies such as a duplicate insert or an erase of an unknown symbol
//! are absorbed by the merge logic and never reach the caller.

use thiserror::Error;

use crate::crdt::types::{Position, SiteId};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("index {index} is out of range for a document of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("position [{0}] cannot hold a symbol")]
    InvalidPosition(Position),
    #[error("site {0} is not registered")]
    UnknownSite(SiteId),
    #[error("malformed message: {0}")]
    Codec(#[from] serde_json::Error),
}
