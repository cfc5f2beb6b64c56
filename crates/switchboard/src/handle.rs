//! Client handle for outbound delivery
//!
//! `ClientHandle` wraps the sending side of a per-client line queue,
//! letting the engine deliver to a client without knowing anything about
//! its socket. A writer task owned by the server drains the other end.

use tokio::sync::mpsc;

/// Handle to a connected client's outbound line queue
///
/// # Design
///
/// - Unbounded: the engine never blocks on a slow consumer; disconnect
///   tears the whole queue down rather than applying backpressure
/// - `send` reports closure instead of erroring; an undeliverable line
///   is a silent drop at the switchboard level
#[derive(Debug, Clone)]
pub struct ClientHandle {
    sender: mpsc::UnboundedSender<String>,
}

impl ClientHandle {
    /// Create a handle around an existing sender
    #[inline]
    pub fn new(sender: mpsc::UnboundedSender<String>) -> Self {
        Self { sender }
    }

    /// Create a connected handle/receiver pair
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Queue a line for delivery
    ///
    /// Returns `false` if the writer side is gone (client mid-teardown).
    #[inline]
    pub fn send(&self, line: String) -> bool {
        self.sender.send(line).is_ok()
    }

    /// Check if the queue's receiving side has been dropped
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_reaches_receiver() {
        let (handle, mut rx) = ClientHandle::channel();
        assert!(handle.send("hello\n".into()));
        assert_eq!(rx.try_recv().unwrap(), "hello\n");
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (handle, rx) = ClientHandle::channel();
        drop(rx);
        assert!(handle.is_closed());
        assert!(!handle.send("lost\n".into()));
    }
}
