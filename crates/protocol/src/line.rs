//! Line codec for the client wire protocol
//!
//! Inbound lines carry output-channel updates in the shape
//! `out<ch>:<text>`; outbound lines are forwarded messages and the two
//! fixed server notices (greeting, server-full).

use crate::channel::ChannelId;
use crate::client_id::ClientId;

/// Maximum stored message length in bytes; longer payloads are truncated,
/// never rejected
pub const MAX_MESSAGE_LEN: usize = 512;

/// Notice sent to a connection rejected because the registry is full
pub const SERVER_FULL_LINE: &str = "Server full.\n";

/// A parsed routable line: one update to a client output channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLine<'a> {
    /// Output channel being written
    pub channel: ChannelId,
    /// Message text, leading whitespace after the colon stripped
    pub text: &'a str,
}

/// Parse one inbound line (newline already stripped)
///
/// Returns `None` for anything that is not `out<0-4>:<text>`; such lines
/// are ignored by the switchboard, not errors. A trailing carriage return
/// is tolerated for clients that send CRLF.
pub fn parse_output_line(line: &str) -> Option<OutputLine<'_>> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let rest = line.strip_prefix("out")?;

    let mut chars = rest.chars();
    let digit = chars.next()?.to_digit(10)?;
    if chars.next()? != ':' {
        return None;
    }
    let channel = ChannelId::new(digit as u8)?;

    let text = rest[2..].trim_start_matches([' ', '\t']);
    Some(OutputLine { channel, text })
}

/// Format a forwarded message as stored and delivered to the destination
///
/// The wire line is this text plus a trailing newline.
pub fn forwarded_text(channel: ChannelId, from: ClientId, text: &str) -> String {
    format!("in{channel} from {from}: {text}")
}

/// Greeting line sent to a client right after it is registered
pub fn greeting_line(id: ClientId) -> String {
    format!(
        "Welcome to Patchbay. You are client_id={}, with 5 in / 5 out.\n",
        id.as_u32()
    )
}

/// Decode a raw wire line (newline already split off) into text
///
/// Invalid UTF-8 is replaced rather than rejected, and a trailing
/// carriage return from CRLF clients is stripped.
pub fn decode_wire_line(raw: &[u8]) -> String {
    let mut line = String::from_utf8_lossy(raw).into_owned();
    if line.ends_with('\r') {
        line.pop();
    }
    line
}

/// Truncate a message to [`MAX_MESSAGE_LEN`] bytes on a char boundary
pub fn truncate_message(text: &str) -> &str {
    if text.len() <= MAX_MESSAGE_LEN {
        return text;
    }
    let mut end = MAX_MESSAGE_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
