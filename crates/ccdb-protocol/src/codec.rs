use prost::Message;
use tracing::trace;

use crate::error::{ProtocolError, ProtocolResult};
use crate::message::{Envelope, Operation, RequestMessage, MAX_MESSAGE_SIZE};

/// Codec for encoding/decoding request envelopes.
pub struct EnvelopeCodec;

impl EnvelopeCodec {
    /// Encode an envelope to protobuf bytes. `value` is written as-is.
    pub fn encode(envelope: Envelope) -> ProtocolResult<Vec<u8>> {
        let msg = RequestMessage::from(envelope);
        let size = msg.encoded_len();
        if size > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size,
                max: MAX_MESSAGE_SIZE,
            });
        }
        Ok(msg.encode_to_vec())
    }

    /// Decode and validate an envelope.
    ///
    /// Unknown fields are skipped. Either every required field is present
    /// and well-formed or the call fails; no partial envelope is returned.
    pub fn decode(data: &[u8]) -> ProtocolResult<Envelope> {
        if data.len() > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: data.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
        let msg = RequestMessage::decode(data)
            .map_err(|e| ProtocolError::MalformedEnvelope(e.to_string()))?;
        let envelope = Envelope::try_from(msg)?;
        trace!(
            operation = envelope.operation.name(),
            key = %envelope.key,
            value_len = envelope.value.len(),
            "decoded envelope"
        );
        Ok(envelope)
    }
}

/// Encode the four envelope fields directly.
pub fn encode(
    key: &str,
    operation: Operation,
    destination_store: &str,
    value: Vec<u8>,
) -> ProtocolResult<Vec<u8>> {
    EnvelopeCodec::encode(Envelope::new(operation, destination_store, key, value))
}

pub fn decode(buffer: &[u8]) -> ProtocolResult<Envelope> {
    EnvelopeCodec::decode(buffer)
}
