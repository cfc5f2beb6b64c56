//! Patchbay - Protocol
//!
//! Wire-level vocabulary shared by every crate in the workspace: client
//! identifiers, channel indices, and the newline-delimited line codec.
//!
//! # Wire format
//!
//! Clients speak newline-terminated ASCII lines. A line is routable only if
//! it has the shape `out<0-4>:<text>`; everything else is ignored without
//! acknowledgment. Forwarded messages are delivered to the destination as
//! `in<ch> from client<id>: <text>\n`.
//!
//! # Example
//!
//! ```
//! use patchbay_protocol::{parse_output_line, ClientId};
//!
//! let line = parse_output_line("out2: hello").unwrap();
//! assert_eq!(line.channel.index(), 2);
//! assert_eq!(line.text, "hello");
//! ```

mod channel;
mod client_id;
mod line;


pub use channel::{ChannelId, CHANNELS_PER_CLIENT};
pub use client_id::ClientId;
pub use line::{
    decode_wire_line, forwarded_text, greeting_line, parse_output_line, truncate_message,
    OutputLine, MAX_MESSAGE_LEN, SERVER_FULL_LINE,
};
