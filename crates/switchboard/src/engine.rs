//! Switchboard engine
//!
//! Ties the registry, routing table, and channel state store together
//! behind one owner. The server task calls into this from both the
//! network-event path and the console path; sequential dispatch in that
//! task is what makes the shared state race-free.

use std::net::SocketAddr;

use patchbay_protocol::{
    forwarded_text, greeting_line, parse_output_line, ChannelId, ClientId, CHANNELS_PER_CLIENT,
};
use patchbay_routing::{expand_pairs, ChannelSelector, RouteTarget, RoutingTable};

use crate::channels::{ChannelStateStore, ChannelValues};
use crate::error::{Result, SwitchboardError};
use crate::handle::ClientHandle;
use crate::registry::{ClientRegistry, ClientSlot};

/// What happened to one inbound line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Not a routable line; ignored without acknowledgment
    Ignored,
    /// Output recorded, but no live destination; message dropped
    Dropped {
        /// Output channel the line addressed
        channel: ChannelId,
        /// The configured destination, if a (dead) route existed
        target: Option<RouteTarget>,
    },
    /// Output recorded and the message delivered
    Forwarded {
        /// Output channel the line addressed
        channel: ChannelId,
        /// Destination the message was queued for
        target: RouteTarget,
    },
}

/// The broker's shared state: registry, routes, and channel values
#[derive(Debug)]
pub struct Switchboard {
    registry: ClientRegistry,
    table: RoutingTable,
    store: ChannelStateStore,
}

impl Switchboard {
    /// Create a switchboard with the given client capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            registry: ClientRegistry::new(capacity),
            table: RoutingTable::new(),
            store: ChannelStateStore::new(),
        }
    }

    /// Register a new client and greet it
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` when no slot is free; the caller notifies
    /// and closes the connection.
    pub fn connect(&mut self, peer: SocketAddr, handle: ClientHandle) -> Result<ClientId> {
        let id = self.registry.register(peer, handle)?;
        self.store.allocate(id);

        if let Some(slot) = self.registry.get(id) {
            slot.handle().send(greeting_line(id));
        }
        tracing::info!(client = %id, peer = %peer, "client connected");
        Ok(id)
    }

    /// Remove a client after disconnect or read error
    ///
    /// Routes referencing the id are left in place; they evaluate as "no
    /// destination" until the id is explicitly re-routed. It never comes
    /// back on its own, since ids are not reused.
    pub fn disconnect(&mut self, id: ClientId) -> bool {
        self.store.release(id);
        let removed = self.registry.deregister(id).is_some();
        if removed {
            tracing::info!(client = %id, "client disconnected");
        }
        removed
    }

    /// Process one complete line received from a client
    ///
    /// Non-routable lines are ignored. Routable lines update the sender's
    /// latest-output value, then forward along the configured route if its
    /// destination is currently live.
    pub fn dispatch_line(&mut self, src: ClientId, line: &str) -> Dispatch {
        let Some(parsed) = parse_output_line(line) else {
            return Dispatch::Ignored;
        };
        let channel = parsed.channel;
        self.store.record_output(src, channel, parsed.text);

        let Some(target) = self.table.get(src, channel) else {
            return Dispatch::Dropped {
                channel,
                target: None,
            };
        };

        let text = forwarded_text(target.channel, src, parsed.text);
        let queued = match self.registry.get(target.client) {
            Some(slot) => slot.handle().send(format!("{text}\n")),
            None => false,
        };
        if !queued {
            tracing::trace!(client = %src, channel = %channel, "no live destination, dropping");
            return Dispatch::Dropped {
                channel,
                target: Some(target),
            };
        }

        self.store.record_input(target.client, target.channel, &text);
        Dispatch::Forwarded { channel, target }
    }

    /// Apply a `route` command from the console
    ///
    /// Unlike file preconfiguration, interactive routing requires both
    /// endpoints to be live. Validation failures mutate nothing.
    pub fn route_interactive(
        &mut self,
        src: ClientId,
        src_sel: ChannelSelector,
        dst: ClientId,
        dst_sel: ChannelSelector,
    ) -> Result<Vec<(ChannelId, ChannelId)>> {
        if !self.registry.is_live(src) {
            return Err(SwitchboardError::unknown_client(src));
        }
        if !self.registry.is_live(dst) {
            return Err(SwitchboardError::unknown_client(dst));
        }
        Ok(self.apply_route(src, src_sel, dst, dst_sel))
    }

    /// Apply a `route` command from the startup file
    ///
    /// Endpoints need not be connected yet.
    pub fn route_preconfigured(
        &mut self,
        src: ClientId,
        src_sel: ChannelSelector,
        dst: ClientId,
        dst_sel: ChannelSelector,
    ) -> Vec<(ChannelId, ChannelId)> {
        self.apply_route(src, src_sel, dst, dst_sel)
    }

    fn apply_route(
        &mut self,
        src: ClientId,
        src_sel: ChannelSelector,
        dst: ClientId,
        dst_sel: ChannelSelector,
    ) -> Vec<(ChannelId, ChannelId)> {
        let pairs = expand_pairs(src_sel, dst_sel);
        for &(src_ch, dst_ch) in &pairs {
            self.table.set(src, src_ch, RouteTarget::new(dst, dst_ch));
        }
        pairs
    }

    /// Live clients in slot order
    pub fn clients(&self) -> impl Iterator<Item = &ClientSlot> {
        self.registry.iter()
    }

    /// Configured routes whose source id has been issued at least once,
    /// ordered by source id then channel
    pub fn routes(&self) -> Vec<(ClientId, ChannelId, RouteTarget)> {
        self.table
            .entries()
            .filter(|(src, _, _)| self.registry.was_seen(*src))
            .collect()
    }

    /// Copy a live client's channel values
    ///
    /// # Errors
    ///
    /// Returns `UnknownClient` if the id is not currently live.
    pub fn channel_snapshot(&self, id: ClientId) -> Result<ChannelValues> {
        self.store
            .snapshot(id)
            .ok_or_else(|| SwitchboardError::unknown_client(id))
    }

    /// Copy a live client's latest output values, for the recorder
    pub fn outputs_snapshot(&self, id: ClientId) -> Option<[String; CHANNELS_PER_CLIENT]> {
        self.store.snapshot(id).map(|values| values.outputs)
    }

    /// True if the id resolves to a live client
    #[inline]
    pub fn is_live(&self, id: ClientId) -> bool {
        self.registry.is_live(id)
    }

    /// The underlying registry (read-only)
    #[inline]
    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }
}
