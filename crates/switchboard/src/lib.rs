//! Patchbay - Switchboard
//!
//! The stateful heart of the broker: a bounded client registry, the
//! per-client channel state store, and the engine that records inbound
//! output lines and forwards them along configured routes.
//!
//! # Design
//!
//! All three tables are owned by a single [`Switchboard`] value, and every
//! mutation goes through `&mut self` methods. The server drives those
//! methods from one task, so the registry, routing table, and state store
//! are never touched concurrently and need no locks. Connection reader
//! tasks and the console task only parse bytes and forward events.
//!
//! Outbound delivery is decoupled through [`ClientHandle`]: the engine
//! queues a line on the destination's channel and moves on. A destination
//! that is unset, disconnected, or mid-teardown means the message is
//! silently dropped. The broker never queues for absent clients and never
//! surfaces delivery failures to the sender.

mod channels;
mod command;
mod engine;
mod error;
mod handle;
mod registry;
mod routefile;

#[cfg(test)]
mod command_test;
#[cfg(test)]
mod registry_test;

pub use channels::{ChannelStateStore, ChannelValues};
pub use command::{help_text, Command, CommandError};
pub use engine::{Dispatch, Switchboard};
pub use error::{Result, SwitchboardError};
pub use handle::ClientHandle;
pub use registry::{ClientRegistry, ClientSlot};
pub use routefile::{apply_route_file, RouteFileOutcome, RouteFileReport};

// Re-export the id types for convenience
pub use patchbay_protocol::{ChannelId, ClientId, CHANNELS_PER_CLIENT};
pub use patchbay_routing::{ChannelSelector, RouteTarget};
