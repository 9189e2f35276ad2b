use std::io::ErrorKind;

use async_trait::async_trait;
use bytes::Bytes;
use ccdb_protocol::{FrameCodec, ProtocolError, FRAME_HEADER_LEN};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::sync::Mutex;
use tracing::trace;

use crate::error::{BackendError, BackendResult};
use crate::transport::MessageTransport;

/// Transport over a byte stream connected to a single store.
///
/// Each message is length-prefixed with [`FrameCodec`]. Sends addressed to
/// any store other than `peer` are refused.
pub struct StreamTransport<S> {
    peer: String,
    reader: Mutex<ReadHalf<S>>,
    writer: Mutex<WriteHalf<S>>,
}

impl<S> StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    pub fn new(peer: impl Into<String>, stream: S) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self {
            peer: peer.into(),
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
        }
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }
}

#[async_trait]
impl<S> MessageTransport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    async fn send(&self, destination: &str, message: Bytes) -> BackendResult<()> {
        if destination != self.peer {
            return Err(BackendError::Transport(format!(
                "stream is connected to {:?}, not {:?}",
                self.peer, destination
            )));
        }
        let frame = FrameCodec::encode(&message)?;
        let mut writer = self.writer.lock().await;
        writer.write_all(&frame).await?;
        writer.flush().await?;
        trace!(peer = %self.peer, len = message.len(), "sent frame");
        Ok(())
    }

    async fn recv(&self) -> BackendResult<Option<Bytes>> {
        let mut reader = self.reader.lock().await;
        let mut header = [0u8; FRAME_HEADER_LEN];
        // Only EOF at a frame boundary is a clean close.
        if reader.read(&mut header[..1]).await? == 0 {
            return Ok(None);
        }
        reader
            .read_exact(&mut header[1..])
            .await
            .map_err(|e| truncated(e, "header"))?;
        let len = FrameCodec::parse_header(&header)?;
        let mut payload = vec![0u8; len];
        reader
            .read_exact(&mut payload)
            .await
            .map_err(|e| truncated(e, "payload"))?;
        trace!(peer = %self.peer, len, "received frame");
        Ok(Some(Bytes::from(payload)))
    }
}

fn truncated(err: std::io::Error, part: &str) -> BackendError {
    if err.kind() == ErrorKind::UnexpectedEof {
        ProtocolError::Framing(format!("stream closed inside frame {part}")).into()
    } else {
        err.into()
    }
}
