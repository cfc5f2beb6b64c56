//! Routing table for (client, output channel) → (client, input channel)

use std::collections::BTreeMap;

use patchbay_protocol::{ChannelId, ClientId};

/// Destination of a route: a client input channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteTarget {
    /// Destination client id
    pub client: ClientId,
    /// Destination input channel
    pub channel: ChannelId,
}

impl RouteTarget {
    /// Create a route target
    #[inline]
    pub const fn new(client: ClientId, channel: ChannelId) -> Self {
        Self { client, channel }
    }
}

/// Table of configured routes
///
/// Keys are (source client id, source output channel). Entries are only
/// ever overwritten, never removed; a route whose endpoints are gone is
/// simply never delivered to.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    routes: BTreeMap<(ClientId, ChannelId), RouteTarget>,
}

impl RoutingTable {
    /// Create an empty routing table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a route, overwriting any previous destination for the key
    pub fn set(&mut self, src: ClientId, src_ch: ChannelId, target: RouteTarget) {
        self.routes.insert((src, src_ch), target);
    }

    /// Look up the destination for a source key
    #[inline]
    pub fn get(&self, src: ClientId, src_ch: ChannelId) -> Option<RouteTarget> {
        self.routes.get(&(src, src_ch)).copied()
    }

    /// Iterate all entries ordered by ascending source id, then channel
    pub fn entries(&self) -> impl Iterator<Item = (ClientId, ChannelId, RouteTarget)> + '_ {
        self.routes
            .iter()
            .map(|(&(src, src_ch), &target)| (src, src_ch, target))
    }

    /// Number of configured routes
    #[inline]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True if no routes are configured
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
