//! Patchbay - Routing
//!
//! The routing table maps (source client, output channel) to
//! (destination client, input channel). Routes are set by operator
//! commands or a startup routing file and consulted once per inbound
//! routable line.
//!
//! # Design
//!
//! Routes are keyed by client *id*, not by connection slot: a route may be
//! configured before its endpoints connect, and it survives the endpoints
//! disconnecting. Destination validity is checked lazily at delivery time,
//! never at route-creation time. A `set` is an unconditional overwrite:
//! the table holds at most one destination per source key.
//!
//! # Example
//!
//! ```
//! use patchbay_routing::{RouteTarget, RoutingTable};
//! use patchbay_protocol::{ChannelId, ClientId};
//!
//! let mut table = RoutingTable::new();
//! let ch0 = ChannelId::new(0).unwrap();
//! table.set(ClientId::new(1), ch0, RouteTarget::new(ClientId::new(2), ch0));
//!
//! let target = table.get(ClientId::new(1), ch0).unwrap();
//! assert_eq!(target.client, ClientId::new(2));
//! ```

mod error;
mod selector;
mod table;


pub use error::{Result, RoutingError};
pub use selector::{expand_pairs, ChannelSelector};
pub use table::{RouteTarget, RoutingTable};

// Re-export the id types for convenience
pub use patchbay_protocol::{ChannelId, ClientId};
