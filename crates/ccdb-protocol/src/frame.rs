use crate::error::{ProtocolError, ProtocolResult};
use crate::message::MAX_MESSAGE_SIZE;

/// Length prefix (4 bytes) plus frame tag (1 byte).
pub const FRAME_HEADER_LEN: usize = 5;

/// Frame tag for protobuf request envelopes.
pub const ENVELOPE_V1: u8 = 1;

/// Length-prefixed framing for byte-stream transports.
///
/// Layout: `[4 bytes BE len][1 byte tag][payload]`, where `len` counts the
/// tag byte plus the payload.
pub struct FrameCodec;

impl FrameCodec {
    /// Frame an encoded envelope.
    pub fn encode(payload: &[u8]) -> ProtocolResult<Vec<u8>> {
        if payload.len() > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: payload.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
        let len = (payload.len() + 1) as u32;
        let mut buf = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
        buf.extend_from_slice(&len.to_be_bytes());
        buf.push(ENVELOPE_V1);
        buf.extend_from_slice(payload);
        Ok(buf)
    }

    /// Validate a frame header and return the payload length that follows it.
    pub fn parse_header(header: &[u8; FRAME_HEADER_LEN]) -> ProtocolResult<usize> {
        let len = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
        if len < 1 {
            return Err(ProtocolError::Framing("zero-length frame".into()));
        }
        if len - 1 > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: len - 1,
                max: MAX_MESSAGE_SIZE,
            });
        }
        if header[4] != ENVELOPE_V1 {
            return Err(ProtocolError::UnsupportedFrame(header[4]));
        }
        Ok(len - 1)
    }

    /// Decode one frame from the front of `data`. Returns (payload, bytes_consumed).
    pub fn decode(data: &[u8]) -> ProtocolResult<(&[u8], usize)> {
        let header: &[u8; FRAME_HEADER_LEN] = data
            .get(..FRAME_HEADER_LEN)
            .and_then(|h| h.try_into().ok())
            .ok_or_else(|| ProtocolError::Framing("too short".into()))?;
        let payload_len = Self::parse_header(header)?;
        let total = FRAME_HEADER_LEN + payload_len;
        if data.len() < total {
            return Err(ProtocolError::Framing(format!(
                "incomplete: have {}, need {}",
                data.len(),
                total
            )));
        }
        Ok((&data[FRAME_HEADER_LEN..total], total))
    }
}
