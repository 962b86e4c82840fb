//! The broadcast fabric.
//!
//! A [`Broadcaster`] knows which sites are registered and holds the queue of
//! messages not yet delivered. It never owns the replicas themselves: delivery
//! goes through a callback keyed by [`SiteId`], so the host decides how a site id
//! maps onto a replica.

use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, trace};

use crate::crdt::{Message, SiteId};

/// Delivery fabric connecting the replicas of one document.
///
/// Implementations must deliver each message to every registered site except
/// its origin, and must preserve send order for messages from the same origin.
pub trait Broadcaster {
    /// Adds a new site to the delivery set and returns its id.
    fn register(&mut self) -> SiteId;

    /// Removes `site_id` from the delivery set. Returns false if it was not
    /// registered.
    fn deregister(&mut self, site_id: SiteId) -> bool;

    /// Queues a message for delivery.
    fn send(&mut self, message: Message);

    /// Number of queued messages.
    fn pending(&self) -> usize;

    /// Drains the queue, handing each message to `deliver` once per
    /// destination. Returns the number of deliveries made.
    fn dispatch(&mut self, deliver: &mut dyn FnMut(SiteId, &Message)) -> usize;
}

/// In-process fabric with a single global FIFO queue.
///
/// Site ids are handed out from 0 upwards and never reused. A global FIFO is
/// stricter than the per-origin ordering the trait requires.
#[derive(Debug, Default)]
pub struct FifoBroadcaster {
    registered: BTreeSet<SiteId>,
    queue: VecDeque<Message>,
    next_site_id: SiteId,
}

impl FifoBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered sites in ascending order.
    pub fn sites(&self) -> impl Iterator<Item = SiteId> + '_ {
        self.registered.iter().copied()
    }
}

impl Broadcaster for FifoBroadcaster {
    fn register(&mut self) -> SiteId {
        let site_id = self.next_site_id;
        self.next_site_id += 1;
        self.registered.insert(site_id);
        site_id
    }

    fn deregister(&mut self, site_id: SiteId) -> bool {
        self.registered.remove(&site_id)
    }

    fn send(&mut self, message: Message) {
        self.queue.push_back(message);
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }

    fn dispatch(&mut self, deliver: &mut dyn FnMut(SiteId, &Message)) -> usize {
        let mut messages = 0;
        let mut deliveries = 0;

        while let Some(message) = self.queue.pop_front() {
            messages += 1;
            for &site_id in &self.registered {
                if site_id == message.origin() {
                    continue;
                }
                trace!(site_id, origin = message.origin(), kind = ?message.kind(), "delivering");
                deliver(site_id, &message);
                deliveries += 1;
            }
        }

        if messages > 0 {
            debug!(messages, deliveries, "dispatched pending messages");
        }
        deliveries
    }
}
