//! Channel state store
//!
//! Keeps the latest value seen on every output and input channel of every
//! live client. Values are overwritten, never appended: this is a
//! "last known" view, not a log. Entries exist exactly as long as the
//! owning client's registry slot.

use std::collections::HashMap;

use patchbay_protocol::{truncate_message, ChannelId, ClientId, CHANNELS_PER_CLIENT};

/// Latest values for one client's channels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelValues {
    /// Latest message per output channel
    pub outputs: [String; CHANNELS_PER_CLIENT],
    /// Latest forwarded text per input channel
    pub inputs: [String; CHANNELS_PER_CLIENT],
}

/// Store of per-client channel values
#[derive(Debug, Default)]
pub struct ChannelStateStore {
    values: HashMap<ClientId, ChannelValues>,
}

impl ChannelStateStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a zeroed entry for a newly registered client
    pub fn allocate(&mut self, id: ClientId) {
        self.values.insert(id, ChannelValues::default());
    }

    /// Drop the entry for a freed client slot
    pub fn release(&mut self, id: ClientId) {
        self.values.remove(&id);
    }

    /// Overwrite the latest-output slot, truncating to the message bound
    ///
    /// Unknown ids are ignored; recording never fails.
    pub fn record_output(&mut self, id: ClientId, channel: ChannelId, message: &str) {
        if let Some(values) = self.values.get_mut(&id) {
            values.outputs[channel.index()] = truncate_message(message).to_string();
        }
    }

    /// Overwrite the latest-input slot with the formatted forwarded text
    pub fn record_input(&mut self, id: ClientId, channel: ChannelId, text: &str) {
        if let Some(values) = self.values.get_mut(&id) {
            values.inputs[channel.index()] = truncate_message(text).to_string();
        }
    }

    /// Copy a client's channel values for display or recording
    pub fn snapshot(&self, id: ClientId) -> Option<ChannelValues> {
        self.values.get(&id).cloned()
    }
}
