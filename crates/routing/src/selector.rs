//! Channel selectors for route commands
//!
//! A route command names a channel either by index (`0`, or the prefixed
//! forms `out0` / `in0`) or with the wildcard `all`. Wildcards expand at
//! the command layer into plain table entries; the table itself never
//! stores a wildcard.

use patchbay_protocol::ChannelId;

use crate::error::{Result, RoutingError};

/// One side of a route specification: a fixed channel or the wildcard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSelector {
    /// Every channel index
    All,
    /// A single channel index
    One(ChannelId),
}

impl ChannelSelector {
    /// Parse a channel token from a route command
    ///
    /// `side` is `"output"` or `"input"` and selects both the error wording
    /// and the accepted prefixed form (`out<d>` on the output side, `in<d>`
    /// on the input side).
    pub fn parse(token: &str, side: &'static str) -> Result<Self> {
        if token == "all" {
            return Ok(Self::All);
        }
        if let Some(ch) = ChannelId::parse(token) {
            return Ok(Self::One(ch));
        }
        let prefix = match side {
            "output" => "out",
            _ => "in",
        };
        if let Some(rest) = token.strip_prefix(prefix)
            && let Some(ch) = ChannelId::parse(rest)
        {
            return Ok(Self::One(ch));
        }
        Err(RoutingError::invalid_channel(side, token))
    }
}

/// Expand a pair of selectors into concrete (source, destination) channel
/// pairs
///
/// Wildcards iterate independently, except that `all`/`all` pairs channel
/// `i` with channel `i` (parallel wiring, never a cross-product).
pub fn expand_pairs(src: ChannelSelector, dst: ChannelSelector) -> Vec<(ChannelId, ChannelId)> {
    match (src, dst) {
        (ChannelSelector::All, ChannelSelector::All) => {
            ChannelId::all().map(|ch| (ch, ch)).collect()
        }
        (ChannelSelector::All, ChannelSelector::One(dst_ch)) => {
            ChannelId::all().map(|ch| (ch, dst_ch)).collect()
        }
        (ChannelSelector::One(src_ch), ChannelSelector::All) => {
            ChannelId::all().map(|ch| (src_ch, ch)).collect()
        }
        (ChannelSelector::One(src_ch), ChannelSelector::One(dst_ch)) => {
            vec![(src_ch, dst_ch)]
        }
    }
}
