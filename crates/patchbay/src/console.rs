//! Console input task
//!
//! One task owns stdin for the whole process. In line mode (normal
//! console operation) it assembles newline-terminated commands; in key
//! mode (monitor view, terminal in raw mode) it forwards each received
//! byte as a keypress. The serve loop switches modes through a watch
//! channel when entering and leaving the monitor.

use bytes::BytesMut;
use patchbay_protocol::decode_wire_line;
use tokio::io::AsyncReadExt;
use tokio::sync::{mpsc, watch};

/// How stdin bytes are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleMode {
    /// Assemble newline-terminated command lines
    #[default]
    Line,
    /// Forward single keypresses (terminal is in raw mode)
    Key,
}

/// One unit of operator input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// A complete command line, newline stripped
    Line(String),
    /// A single keypress from the monitor view
    Key(char),
}

/// Spawn the console reader task
///
/// The task runs until stdin reaches EOF or the receiver is dropped.
pub fn spawn(mode: watch::Receiver<ConsoleMode>) -> mpsc::UnboundedReceiver<ConsoleEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(read_loop(mode, tx));
    rx
}

async fn read_loop(mode: watch::Receiver<ConsoleMode>, tx: mpsc::UnboundedSender<ConsoleEvent>) {
    let mut stdin = tokio::io::stdin();
    let mut chunk = BytesMut::with_capacity(1024);
    let mut pending = BytesMut::new();

    loop {
        chunk.clear();
        match stdin.read_buf(&mut chunk).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(error = %e, "console read error");
                break;
            }
        }

        match *mode.borrow() {
            ConsoleMode::Line => {
                pending.extend_from_slice(&chunk);
                while let Some(pos) = pending.iter().position(|&b| b == b'\n') {
                    let raw = pending.split_to(pos + 1);
                    let line = decode_wire_line(&raw[..raw.len() - 1]);
                    if tx.send(ConsoleEvent::Line(line)).is_err() {
                        return;
                    }
                }
            }
            ConsoleMode::Key => {
                // A partial line buffered before the mode switch is stale
                pending.clear();
                for &byte in chunk.iter() {
                    if tx.send(ConsoleEvent::Key(byte as char)).is_err() {
                        return;
                    }
                }
            }
        }
    }
}

