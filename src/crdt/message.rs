//! Messages exchanged between replicas.
//!
//! Each local edit produces exactly one message. The fabric delivers it to every
//! other replica, which applies it with [`SharedEditor::apply_remote`].
//!
//! [`SharedEditor::apply_remote`]: crate::crdt::SharedEditor::apply_remote

use serde::{Deserialize, Serialize};

use crate::crdt::error::EditorError;
use crate::crdt::symbol::Symbol;
use crate::crdt::types::SiteId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Insert,
    Erase,
}

/// An edit as seen by the other replicas.
///
/// The JSON encoding is the cross-process wire format:
///
/// ```json
/// {"origin":0,"kind":"insert","symbol":{"value":"c","site_id":0,"site_counter":0,"position":[512]}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    origin: SiteId,
    kind: MessageKind,
    symbol: Symbol,
}

impl Message {
    pub fn new(origin: SiteId, kind: MessageKind, symbol: Symbol) -> Self {
        Message {
            origin,
            kind,
            symbol,
        }
    }

    pub fn insert(origin: SiteId, symbol: Symbol) -> Self {
        Self::new(origin, MessageKind::Insert, symbol)
    }

    pub fn erase(origin: SiteId, symbol: Symbol) -> Self {
        Self::new(origin, MessageKind::Erase, symbol)
    }

    /// The site whose local edit produced this message.
    pub fn origin(&self) -> SiteId {
        self.origin
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(raw)?)
    }
}
