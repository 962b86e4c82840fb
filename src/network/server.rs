//! Host for a set of replicas sharing one document.
//!
//! [`NetworkServer`] owns the replicas in an arena indexed by site id and pairs
//! it with a [`Broadcaster`] that only ever sees site ids. It exposes the
//! operations a host application drives: register, edit, dispatch, render.

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::config::{AllocatorConfig, ConfigError};
use crate::crdt::{Allocator, EditorError, Message, SharedEditor, SiteId, Symbol, SymbolId};
use crate::network::broadcast::{Broadcaster, FifoBroadcaster};

/// Replica arena plus broadcast fabric.
///
/// Locks are always taken fabric first, then the arena, then a replica. Local
/// edits hold the fabric lock while they run so each replica's messages are
/// queued in the order its edits happened.
pub struct NetworkServer<B: Broadcaster = FifoBroadcaster> {
    /// Prototype cloned into every new replica
    allocator: Allocator,
    /// Site registry and pending message queue
    fabric: Mutex<B>,
    /// Replicas indexed by site id; `None` once deregistered
    editors: RwLock<Vec<Option<SharedEditor>>>,
}

impl NetworkServer<FifoBroadcaster> {
    pub fn new() -> Self {
        Self::from_parts(FifoBroadcaster::new(), Allocator::default())
    }

    pub fn with_config(config: AllocatorConfig) -> Result<Self, ConfigError> {
        Self::with_broadcaster(FifoBroadcaster::new(), config)
    }
}

impl Default for NetworkServer<FifoBroadcaster> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Broadcaster> NetworkServer<B> {
    /// Creates a host on top of a custom fabric.
    pub fn with_broadcaster(broadcaster: B, config: AllocatorConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_parts(broadcaster, Allocator::new(config)?))
    }

    fn from_parts(broadcaster: B, allocator: Allocator) -> Self {
        NetworkServer {
            allocator,
            fabric: Mutex::new(broadcaster),
            editors: RwLock::new(Vec::new()),
        }
    }

    /// Creates a new empty replica and returns its site id.
    ///
    /// A replica joining after edits were dispatched starts empty; it only sees
    /// messages sent from now on.
    pub fn register_replica(&self) -> SiteId {
        let mut fabric = self.fabric.lock();
        let site_id = fabric.register();

        let mut editors = self.editors.write();
        let slot = site_id as usize;
        if editors.len() <= slot {
            editors.resize_with(slot + 1, || None);
        }
        editors[slot] = Some(SharedEditor::with_allocator(site_id, self.allocator.clone()));

        info!(site_id, "replica registered");
        site_id
    }

    /// Removes a replica. Messages already queued are not delivered to it.
    pub fn deregister_replica(&self, site_id: SiteId) -> Result<(), EditorError> {
        let mut fabric = self.fabric.lock();
        if !fabric.deregister(site_id) {
            return Err(EditorError::UnknownSite(site_id));
        }

        if let Some(slot) = self.editors.write().get_mut(site_id as usize) {
            *slot = None;
        }

        info!(site_id, "replica deregistered");
        Ok(())
    }

    /// Runs `f` against the replica for `site_id`.
    pub fn with_replica<T>(
        &self,
        site_id: SiteId,
        f: impl FnOnce(&SharedEditor) -> T,
    ) -> Result<T, EditorError> {
        let editors = self.editors.read();
        let editor = editors
            .get(site_id as usize)
            .and_then(Option::as_ref)
            .ok_or(EditorError::UnknownSite(site_id))?;
        Ok(f(editor))
    }

    /// Inserts `value` at `index` on `site_id` and queues the insert for the
    /// other replicas.
    pub fn local_insert(
        &self,
        site_id: SiteId,
        index: usize,
        value: char,
    ) -> Result<SymbolId, EditorError> {
        let mut fabric = self.fabric.lock();
        let message = self.with_replica(site_id, |editor| editor.local_insert(index, value))??;
        let id = message.symbol().id();
        fabric.send(message);
        Ok(id)
    }

    /// Erases the character at `index` on `site_id` and queues the erase for the
    /// other replicas. Returns the erased symbol.
    pub fn local_erase(&self, site_id: SiteId, index: usize) -> Result<Symbol, EditorError> {
        let mut fabric = self.fabric.lock();
        let message = self.with_replica(site_id, |editor| editor.local_erase(index))??;
        let symbol = message.symbol().clone();
        fabric.send(message);
        Ok(symbol)
    }

    /// Applies a message to one replica directly, bypassing the fabric.
    ///
    /// This is the entry point for messages arriving from outside the process.
    pub fn apply_remote(&self, site_id: SiteId, message: &Message) -> Result<bool, EditorError> {
        self.with_replica(site_id, |editor| editor.apply_remote(message))?
    }

    /// Delivers every queued message. Returns the number of deliveries.
    pub fn dispatch_pending(&self) -> usize {
        let mut fabric = self.fabric.lock();
        let editors = self.editors.read();

        let deliveries = fabric.dispatch(&mut |site_id, message| {
            match editors.get(site_id as usize).and_then(Option::as_ref) {
                Some(editor) => {
                    if let Err(error) = editor.apply_remote(message) {
                        warn!(site_id, %error, "dropping undeliverable message");
                    }
                }
                None => warn!(site_id, "no replica for registered site"),
            }
        });

        debug!(deliveries, "dispatch complete");
        deliveries
    }

    pub fn render(&self, site_id: SiteId) -> Result<String, EditorError> {
        self.with_replica(site_id, SharedEditor::render)
    }

    /// Site ids of all live replicas, ascending.
    pub fn replicas(&self) -> Vec<SiteId> {
        self.editors
            .read()
            .iter()
            .flatten()
            .map(SharedEditor::site_id)
            .collect()
    }

    /// Number of messages waiting for dispatch.
    pub fn pending(&self) -> usize {
        self.fabric.lock().pending()
    }
}
