use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::{mpsc, Mutex};

use crate::error::{BackendError, BackendResult};

/// Messaging transport between the backend and the key-value store.
///
/// One call carries one complete message: `send` never fragments and `recv`
/// returns whole messages only. Connection and session state belong to the
/// implementation.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Dispatch an encoded envelope to the named store.
    async fn send(&self, destination: &str, message: Bytes) -> BackendResult<()>;

    /// Wait for the next inbound message. `Ok(None)` once the transport is closed.
    async fn recv(&self) -> BackendResult<Option<Bytes>>;
}

/// A message as seen by the receiving end of a [`ChannelTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub destination: String,
    pub message: Bytes,
}

/// In-process transport built on unbounded tokio channels.
///
/// Created in connected pairs; what one end sends, the other receives.
#[derive(Debug)]
pub struct ChannelTransport {
    outbound: mpsc::UnboundedSender<Delivery>,
    inbound: Mutex<mpsc::UnboundedReceiver<Delivery>>,
    dispatched: AtomicUsize,
}

impl ChannelTransport {
    pub fn pair() -> (Self, Self) {
        let (a_tx, a_rx) = mpsc::unbounded_channel();
        let (b_tx, b_rx) = mpsc::unbounded_channel();
        let a = Self {
            outbound: a_tx,
            inbound: Mutex::new(b_rx),
            dispatched: AtomicUsize::new(0),
        };
        let b = Self {
            outbound: b_tx,
            inbound: Mutex::new(a_rx),
            dispatched: AtomicUsize::new(0),
        };
        (a, b)
    }

    /// Number of messages successfully sent from this end.
    pub fn dispatched(&self) -> usize {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Receive the next message together with the destination it was sent to.
    pub async fn recv_delivery(&self) -> Option<Delivery> {
        self.inbound.lock().await.recv().await
    }
}

#[async_trait]
impl MessageTransport for ChannelTransport {
    async fn send(&self, destination: &str, message: Bytes) -> BackendResult<()> {
        self.outbound
            .send(Delivery {
                destination: destination.to_string(),
                message,
            })
            .map_err(|_| BackendError::Transport("peer closed".into()))?;
        self.dispatched.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn recv(&self) -> BackendResult<Option<Bytes>> {
        Ok(self.recv_delivery().await.map(|d| d.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pair_delivers_both_ways() {
        let (a, b) = ChannelTransport::pair();
        a.send("Riak", Bytes::from_static(b"ping")).await.unwrap();
        b.send("client", Bytes::from_static(b"pong")).await.unwrap();

        let d = b.recv_delivery().await.unwrap();
        assert_eq!(d.destination, "Riak");
        assert_eq!(d.message, Bytes::from_static(b"ping"));
        assert_eq!(a.recv().await.unwrap(), Some(Bytes::from_static(b"pong")));
        assert_eq!(a.dispatched(), 1);
        assert_eq!(b.dispatched(), 1);
    }

    #[tokio::test]
    async fn messages_arrive_in_order() {
        let (a, b) = ChannelTransport::pair();
        for i in 0..5u8 {
            a.send("Riak", Bytes::from(vec![i])).await.unwrap();
        }
        for i in 0..5u8 {
            assert_eq!(b.recv().await.unwrap(), Some(Bytes::from(vec![i])));
        }
    }

    #[tokio::test]
    async fn recv_after_peer_dropped_is_none() {
        let (a, b) = ChannelTransport::pair();
        drop(a);
        assert_eq!(b.recv().await.unwrap(), None);
    }

    #[tokio::test]
    async fn send_to_dropped_peer_fails() {
        let (a, b) = ChannelTransport::pair();
        drop(b);
        let err = a.send("Riak", Bytes::new()).await.unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
        assert_eq!(a.dispatched(), 0);
    }
}
