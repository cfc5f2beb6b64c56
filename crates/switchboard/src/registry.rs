//! Bounded client registry
//!
//! A fixed number of slots, each holding one connected client. Ids are
//! assigned from a monotonic counter and never reused within a process
//! run, so routes keyed by a stale id stay dead instead of aliasing a
//! later client that happens to land in the same slot.

use std::net::SocketAddr;

use patchbay_protocol::ClientId;

use crate::error::{Result, SwitchboardError};
use crate::handle::ClientHandle;

/// One registered client
#[derive(Debug, Clone)]
pub struct ClientSlot {
    id: ClientId,
    name: String,
    peer: SocketAddr,
    handle: ClientHandle,
}

impl ClientSlot {
    /// Client id
    #[inline]
    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Display name (defaults to `Client<id>`)
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remote address the client connected from
    #[inline]
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Outbound delivery handle
    #[inline]
    pub fn handle(&self) -> &ClientHandle {
        &self.handle
    }
}

/// Registry of connected clients with a fixed slot capacity
#[derive(Debug)]
pub struct ClientRegistry {
    slots: Vec<Option<ClientSlot>>,
    next_id: u32,
}

impl ClientRegistry {
    /// Create a registry with the given slot capacity
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots, next_id: 1 }
    }

    /// Register a new client in the first free slot
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` when every slot is occupied; the caller
    /// is expected to notify and close the connection.
    pub fn register(&mut self, peer: SocketAddr, handle: ClientHandle) -> Result<ClientId> {
        let slot_index = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or_else(|| SwitchboardError::capacity_exceeded(self.slots.len()))?;

        let id = ClientId::new(self.next_id);
        self.next_id += 1;

        self.slots[slot_index] = Some(ClientSlot {
            id,
            name: format!("Client{}", id.as_u32()),
            peer,
            handle,
        });
        Ok(id)
    }

    /// Free the slot held by `id`
    ///
    /// Remaining clients are not renumbered, and routing entries that
    /// reference the id are left alone. Returns the removed slot, if any.
    pub fn deregister(&mut self, id: ClientId) -> Option<ClientSlot> {
        self.slots
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|c| c.id == id))?
            .take()
    }

    /// Look up a live client by id
    pub fn get(&self, id: ClientId) -> Option<&ClientSlot> {
        self.slots
            .iter()
            .flatten()
            .find(|client| client.id == id)
    }

    /// True if the id resolves to a live client
    #[inline]
    pub fn is_live(&self, id: ClientId) -> bool {
        self.get(id).is_some()
    }

    /// True if the id has been issued at least once this run
    #[inline]
    pub fn was_seen(&self, id: ClientId) -> bool {
        id.as_u32() >= 1 && id.as_u32() < self.next_id
    }

    /// Iterate live clients in slot order
    ///
    /// Slot order is stable while clients stay connected, but a reconnect
    /// may land in a different slot.
    pub fn iter(&self) -> impl Iterator<Item = &ClientSlot> {
        self.slots.iter().flatten()
    }

    /// Number of live clients
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// True if no clients are connected
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured slot capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
