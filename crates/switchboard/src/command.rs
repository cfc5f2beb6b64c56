//! Console command parsing
//!
//! One command per line. Parsing is pure; execution happens against the
//! [`Switchboard`](crate::Switchboard) in the server task, so commands
//! never race with socket processing.

use patchbay_protocol::ClientId;
use patchbay_routing::{ChannelSelector, RoutingError};
use thiserror::Error;

/// A parsed console command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Show usage text
    Help,
    /// List connected clients
    List,
    /// List the routing table
    Routes,
    /// Connect an output channel to an input channel
    Route {
        /// Source client
        src: ClientId,
        /// Source output channel(s)
        src_sel: ChannelSelector,
        /// Destination client
        dst: ClientId,
        /// Destination input channel(s)
        dst_sel: ChannelSelector,
    },
    /// Show the latest value on every channel of one client
    Print {
        /// Client to dump
        id: ClientId,
    },
    /// Enter the monitor view, optionally overriding the refresh rate
    Monitor {
        /// Requested refresh rate; `None` means the configured default
        fps: Option<u32>,
    },
    /// Shut down the server and its hosting session
    Exit,
}

/// Errors produced while parsing a console command
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// First token is not a known command
    #[error("unknown command: {0}")]
    Unknown(String),

    /// Known command with missing or extra arguments
    #[error("usage: {0}")]
    Usage(&'static str),

    /// Client id token is not a number
    #[error("invalid client id '{0}'")]
    InvalidClientId(String),

    /// Channel token is invalid
    #[error(transparent)]
    Channel(#[from] RoutingError),
}

const ROUTE_USAGE: &str = "route <srcId> <srcCh|all> <dstId> <dstCh|all>";
const PRINT_USAGE: &str = "print <clientId>";

impl Command {
    /// Parse one console line
    ///
    /// Returns `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&name) = tokens.first() else {
            return Ok(None);
        };

        let command = match name {
            "help" if tokens.len() == 1 => Command::Help,
            "list" if tokens.len() == 1 => Command::List,
            "routes" if tokens.len() == 1 => Command::Routes,
            "exit" if tokens.len() == 1 => Command::Exit,
            "monitor" => Command::Monitor {
                fps: tokens
                    .get(1)
                    .and_then(|arg| arg.parse::<i64>().ok())
                    .filter(|&fps| fps > 0)
                    .map(|fps| fps as u32),
            },
            "print" => {
                let &[_, token] = &tokens[..] else {
                    return Err(CommandError::Usage(PRINT_USAGE));
                };
                let id = parse_client_id(token)?;
                Command::Print { id }
            }
            "route" => {
                let &[_, src, src_ch, dst, dst_ch] = &tokens[..] else {
                    return Err(CommandError::Usage(ROUTE_USAGE));
                };
                Command::Route {
                    src: parse_client_id(src)?,
                    src_sel: ChannelSelector::parse(src_ch, "output")?,
                    dst: parse_client_id(dst)?,
                    dst_sel: ChannelSelector::parse(dst_ch, "input")?,
                }
            }
            _ => return Err(CommandError::Unknown(line.trim().to_string())),
        };
        Ok(Some(command))
    }
}

fn parse_client_id(token: &str) -> Result<ClientId, CommandError> {
    ClientId::parse(token).ok_or_else(|| CommandError::InvalidClientId(token.to_string()))
}

/// Static usage text for the `help` command
pub fn help_text() -> &'static str {
    "Commands:\n\
     \x20help                 - show this help\n\
     \x20list                 - list connected clients\n\
     \x20routes               - list routing table\n\
     \x20route X Y Z W        - connect clientX outY -> clientZ inW\n\
     \x20   (Y and/or W can be 'all' to route multiple channels)\n\
     \x20print <clientId>     - show last data for all channels of the given client\n\
     \x20monitor [FPS]        - display real time output of all clients\n\
     \x20   (press 'R' to toggle recording to CSV, 'Q' to quit)\n\
     \x20exit                 - shut down the server and its session\n"
}
