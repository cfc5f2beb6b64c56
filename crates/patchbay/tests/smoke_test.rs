//! Smoke tests for the patchbay server
//!
//! These tests run the real serve loop on an ephemeral port and drive it
//! with actual TCP clients, verifying the record-route-forward path end
//! to end.

use std::time::Duration;

use patchbay::server;
use patchbay_config::Config;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

/// A connected test client with buffered line reads
struct TestClient {
    id: u32,
    reader: BufReader<OwnedReadHalf>,
    writer: tokio::net::tcp::OwnedWriteHalf,
}

impl TestClient {
    /// Connect and consume the greeting to learn the assigned id
    async fn connect(addr: std::net::SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect failed");
        let (read_half, writer) = stream.into_split();
        let mut reader = BufReader::new(read_half);

        let greeting = read_line(&mut reader).await;
        let id = greeting
            .split("client_id=")
            .nth(1)
            .and_then(|rest| rest.split(',').next())
            .and_then(|digits| digits.parse().ok())
            .unwrap_or_else(|| panic!("unexpected greeting: {greeting}"));
        Self { id, reader, writer }
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("write failed");
    }

    async fn recv(&mut self) -> String {
        read_line(&mut self.reader).await
    }
}

async fn read_line(reader: &mut BufReader<OwnedReadHalf>) -> String {
    let mut line = String::new();
    timeout(Duration::from_secs(5), reader.read_line(&mut line))
        .await
        .expect("timed out waiting for a line")
        .expect("read failed");
    line.trim_end().to_string()
}

/// Start the serve loop on an ephemeral port
async fn start_server(config: Config) -> (std::net::SocketAddr, CancellationToken) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().expect("no local addr");
    let cancel = CancellationToken::new();

    let server_cancel = cancel.clone();
    tokio::spawn(async move {
        let _ = server::serve(listener, config, server_cancel).await;
    });
    (addr, cancel)
}

fn config_with_routes(contents: &str) -> (Config, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let route_file = dir.path().join("route.rt");
    std::fs::write(&route_file, contents).expect("write route file failed");

    let mut config = Config::default();
    config.routes.file = route_file;
    config.monitor.logs_dir = dir.path().join("logs");
    (config, dir)
}

#[tokio::test]
async fn test_preconfigured_route_forwards_between_clients() {
    let (config, _dir) = config_with_routes("route 1 0 2 0\n");
    let (addr, cancel) = start_server(config).await;

    let first = TestClient::connect(addr).await;
    let second = TestClient::connect(addr).await;

    // Accept order decides ids; pick sender and receiver accordingly
    let (mut sender, mut receiver) = if first.id == 1 {
        (first, second)
    } else {
        (second, first)
    };
    assert_eq!(sender.id, 1);
    assert_eq!(receiver.id, 2);

    sender.send("out0:hello").await;
    assert_eq!(receiver.recv().await, "in0 from client1: hello");

    cancel.cancel();
}

#[tokio::test]
async fn test_wildcard_route_wires_parallel_channels() {
    let (config, _dir) = config_with_routes("route 1 all 2 all\n");
    let (addr, cancel) = start_server(config).await;

    let first = TestClient::connect(addr).await;
    let second = TestClient::connect(addr).await;
    let (mut sender, mut receiver) = if first.id == 1 {
        (first, second)
    } else {
        (second, first)
    };

    for ch in 0..5 {
        sender.send(&format!("out{ch}:m{ch}")).await;
        assert_eq!(receiver.recv().await, format!("in{ch} from client1: m{ch}"));
    }

    cancel.cancel();
}

#[tokio::test]
async fn test_non_routable_and_dead_route_lines_are_silent() {
    let (config, _dir) = config_with_routes("route 1 0 2 0\nroute 1 1 9 0\n");
    let (addr, cancel) = start_server(config).await;

    let first = TestClient::connect(addr).await;
    let second = TestClient::connect(addr).await;
    let (mut sender, mut receiver) = if first.id == 1 {
        (first, second)
    } else {
        (second, first)
    };

    // Ignored chatter, then a routed line to a never-connected client,
    // then a real routed line. Only the last one is delivered.
    sender.send("just chatting").await;
    sender.send("out1:into the void").await;
    sender.send("out0:made it").await;
    assert_eq!(receiver.recv().await, "in0 from client1: made it");

    cancel.cancel();
}

#[tokio::test]
async fn test_partial_lines_are_reassembled_across_writes() {
    let (config, _dir) = config_with_routes("route 1 0 2 0\n");
    let (addr, cancel) = start_server(config).await;

    let first = TestClient::connect(addr).await;
    let second = TestClient::connect(addr).await;
    let (mut sender, mut receiver) = if first.id == 1 {
        (first, second)
    } else {
        (second, first)
    };

    sender.writer.write_all(b"out0:split ").await.unwrap();
    sender.writer.flush().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    sender.writer.write_all(b"in two\n").await.unwrap();

    assert_eq!(receiver.recv().await, "in0 from client1: split in two");

    cancel.cancel();
}

#[tokio::test]
async fn test_server_full_rejects_with_notice() {
    let (mut config, _dir) = config_with_routes("route 1 0 2 0\n");
    config.server.max_clients = 1;
    let (addr, cancel) = start_server(config).await;

    let _occupant = TestClient::connect(addr).await;

    let stream = TcpStream::connect(addr).await.expect("connect failed");
    let (read_half, _writer) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    assert_eq!(read_line(&mut reader).await, "Server full.");

    cancel.cancel();
}

#[tokio::test]
async fn test_disconnect_makes_route_dead_then_traffic_still_flows_elsewhere() {
    let (config, _dir) = config_with_routes("route 1 0 2 0\nroute 1 1 3 0\n");
    let (addr, cancel) = start_server(config).await;

    let first = TestClient::connect(addr).await;
    let second = TestClient::connect(addr).await;
    let third = TestClient::connect(addr).await;

    let mut by_id = [Some(first), Some(second), Some(third)];
    by_id.sort_by_key(|c| c.as_ref().unwrap().id);
    let [mut sender, dropped, mut survivor] = by_id.map(Option::unwrap);
    assert_eq!((sender.id, dropped.id, survivor.id), (1, 2, 3));

    // Take client 2 down; its route goes dead silently
    drop(dropped);
    tokio::time::sleep(Duration::from_millis(100)).await;

    sender.send("out0:nobody hears this").await;
    sender.send("out1:but this arrives").await;
    assert_eq!(survivor.recv().await, "in1 from client1: but this arrives");

    cancel.cancel();
}
