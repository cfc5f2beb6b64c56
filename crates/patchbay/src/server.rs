//! Serve loop and connection plumbing
//!
//! One task owns the [`Switchboard`] and drives everything that mutates
//! it: listener accepts, client line events, and console commands all
//! arrive in a single `select!` loop. Per-connection reader tasks and
//! per-client writer tasks touch nothing but their own socket half and a
//! channel endpoint.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use bytes::BytesMut;
use patchbay_config::Config;
use patchbay_protocol::{decode_wire_line, ChannelId, ClientId, SERVER_FULL_LINE};
use patchbay_switchboard::{
    apply_route_file, help_text, ClientHandle, Command, RouteFileOutcome, Switchboard,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::console::{self, ConsoleEvent, ConsoleMode};
use crate::{monitor, teardown};

/// Cap on a buffered partial line before it is discarded
const MAX_PENDING_LINE: usize = 64 * 1024;

/// Events delivered to the serve loop by connection reader tasks
#[derive(Debug)]
pub enum Event {
    /// A complete line arrived from a client
    Line {
        /// Sending client
        id: ClientId,
        /// Line text, newline stripped
        line: String,
    },
    /// A client's socket reached EOF or failed
    Closed {
        /// The client to deregister
        id: ClientId,
    },
}

/// What a console command asks the serve loop to do next
enum ConsoleFlow {
    Continue,
    Monitor { fps: u32 },
    Exit,
}

/// Serve-loop state: the switchboard plus the channel endpoints handed to
/// spawned tasks
pub struct Server {
    config: Config,
    switchboard: Switchboard,
    events_tx: mpsc::UnboundedSender<Event>,
    console_mode: watch::Sender<ConsoleMode>,
}

impl Server {
    /// Shared state (read-only view for the monitor)
    pub fn switchboard(&self) -> &Switchboard {
        &self.switchboard
    }

    /// Server configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Switch how the console task interprets stdin
    pub fn set_console_mode(&self, mode: ConsoleMode) {
        self.console_mode.send_replace(mode);
    }

    /// Accept a new connection, or turn it away when full
    fn accept(&mut self, stream: TcpStream, peer: SocketAddr) {
        let (handle, outbound) = ClientHandle::channel();
        match self.switchboard.connect(peer, handle) {
            Ok(id) => {
                let (read_half, write_half) = stream.into_split();
                tokio::spawn(write_client(write_half, outbound));
                tokio::spawn(read_client(id, read_half, self.events_tx.clone()));
                println!("Client {} connected.", id.as_u32());
            }
            Err(e) => {
                tracing::warn!(peer = %peer, error = %e, "connection rejected");
                tokio::spawn(async move {
                    let mut stream = stream;
                    let _ = stream.write_all(SERVER_FULL_LINE.as_bytes()).await;
                });
            }
        }
    }

    /// Apply one client event to the switchboard
    ///
    /// Shared by the main loop and the monitor sub-loop, so the monitor
    /// view always reflects live data.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Line { id, line } => {
                let dispatch = self.switchboard.dispatch_line(id, &line);
                tracing::trace!(client = %id, ?dispatch, "line dispatched");
            }
            Event::Closed { id } => {
                if self.switchboard.disconnect(id) {
                    println!("Client {} disconnected.", id.as_u32());
                }
            }
        }
    }

    /// Execute one console line
    fn handle_console(&mut self, input: ConsoleEvent) -> ConsoleFlow {
        let ConsoleEvent::Line(line) = input else {
            // Stray keypress outside the monitor view
            return ConsoleFlow::Continue;
        };

        match Command::parse(&line) {
            Ok(None) => ConsoleFlow::Continue,
            Ok(Some(command)) => self.execute(command),
            Err(e) => {
                println!("{e}");
                ConsoleFlow::Continue
            }
        }
    }

    fn execute(&mut self, command: Command) -> ConsoleFlow {
        match command {
            Command::Help => print!("{}", help_text()),
            Command::List => {
                println!("Active clients:");
                for slot in self.switchboard.clients() {
                    println!(" {} ({}) {}", slot.id(), slot.name(), slot.peer());
                }
            }
            Command::Routes => {
                println!("Routes:");
                for (src, src_ch, target) in self.switchboard.routes() {
                    println!(" {src}.out{src_ch} -> {}.in{}", target.client, target.channel);
                }
            }
            Command::Route {
                src,
                src_sel,
                dst,
                dst_sel,
            } => match self.switchboard.route_interactive(src, src_sel, dst, dst_sel) {
                Ok(pairs) => {
                    for (src_ch, dst_ch) in pairs {
                        println!("Routed {src} out{src_ch} -> {dst} in{dst_ch}");
                    }
                }
                Err(e) => println!("{e}"),
            },
            Command::Print { id } => self.print_client(id),
            Command::Monitor { fps } => {
                return ConsoleFlow::Monitor {
                    fps: fps.unwrap_or(self.config.monitor.default_fps),
                };
            }
            Command::Exit => return ConsoleFlow::Exit,
        }
        ConsoleFlow::Continue
    }

    fn print_client(&self, id: ClientId) {
        let snapshot = match self.switchboard.channel_snapshot(id) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                println!("{e}");
                return;
            }
        };
        let name = self
            .switchboard
            .registry()
            .get(id)
            .map(|slot| slot.name().to_string())
            .unwrap_or_default();

        println!("Data for {id} ({name}):");
        println!("{:<8} | {:<50} | {:<50}", "Channel", "Output", "Input");
        println!("{}", "-".repeat(112));
        for ch in ChannelId::all() {
            println!(
                "{:<8} | {:<50.50} | {:<50.50}",
                ch.index(),
                snapshot.outputs[ch.index()],
                snapshot.inputs[ch.index()],
            );
        }
    }
}

/// Bind the listener and run the serve loop until cancelled
pub async fn run(config: Config, cancel: CancellationToken) -> Result<()> {
    let bind_addr = config.server.bind_address();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    serve(listener, config, cancel).await
}

/// Run the serve loop on an already-bound listener
pub async fn serve(listener: TcpListener, config: Config, cancel: CancellationToken) -> Result<()> {
    let port = listener.local_addr().map(|a| a.port()).unwrap_or(0);
    println!("Patchbay listening on port {port}.");
    println!("Type 'help' for commands.");

    let mut switchboard = Switchboard::new(config.server.max_clients);
    let outcome = apply_route_file(&config.routes.file, &mut switchboard);
    report_route_file(&config.routes.file, outcome);

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let (mode_tx, mode_rx) = watch::channel(ConsoleMode::Line);
    let mut console_rx = console::spawn(mode_rx);

    let mut server = Server {
        config,
        switchboard,
        events_tx,
        console_mode: mode_tx,
    };

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,

            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => server.accept(stream, peer),
                Err(e) => tracing::warn!(error = %e, "accept error"),
            },

            Some(event) = events_rx.recv() => server.handle_event(event),

            Some(input) = console_rx.recv() => match server.handle_console(input) {
                ConsoleFlow::Continue => {}
                ConsoleFlow::Monitor { fps } => {
                    monitor::run(&mut server, &mut events_rx, &mut console_rx, fps).await;
                }
                ConsoleFlow::Exit => {
                    teardown::shutdown_session().await;
                    cancel.cancel();
                }
            },
        }
    }

    tracing::info!("server stopped");
    Ok(())
}

fn report_route_file(path: &std::path::Path, outcome: RouteFileOutcome) {
    match outcome {
        RouteFileOutcome::Missing => {
            println!("Routing file '{}' not found.", path.display());
        }
        RouteFileOutcome::Processed(report) => {
            for (src, src_ch, target) in &report.applied {
                println!(
                    "Preconfigured: {src} out{src_ch} -> {} in{}",
                    target.client, target.channel
                );
            }
            for (line, message) in &report.errors {
                println!("Routing file line {line}: {message}");
            }
            if report.succeeded() {
                println!(
                    "Routing file executed successfully. Contents of '{}':",
                    report.path.display()
                );
                print!("{}", report.contents);
                if !report.contents.ends_with('\n') {
                    println!();
                }
            } else {
                println!("Error processing routing file or no valid commands found.");
            }
        }
    }
}

/// Drain a client's outbound queue into its socket
async fn write_client(mut write_half: OwnedWriteHalf, mut outbound: mpsc::UnboundedReceiver<String>) {
    while let Some(line) = outbound.recv().await {
        if write_half.write_all(line.as_bytes()).await.is_err() {
            break;
        }
    }
}

/// Read a client's socket, emitting one event per complete line
///
/// Partial lines are carried across reads; a runaway line with no newline
/// in sight is discarded rather than buffered without bound.
async fn read_client(id: ClientId, mut read_half: OwnedReadHalf, events: mpsc::UnboundedSender<Event>) {
    let mut buf = BytesMut::with_capacity(4096);
    loop {
        match read_half.read_buf(&mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                    let raw = buf.split_to(pos + 1);
                    let line = decode_wire_line(&raw[..raw.len() - 1]);
                    if events.send(Event::Line { id, line }).is_err() {
                        return;
                    }
                }
                if buf.len() > MAX_PENDING_LINE {
                    tracing::trace!(client = %id, "discarding oversized partial line");
                    buf.clear();
                }
            }
            Err(e) => {
                tracing::debug!(client = %id, error = %e, "read error");
                break;
            }
        }
    }
    let _ = events.send(Event::Closed { id });
}
