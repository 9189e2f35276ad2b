use std::sync::Arc;

use bytes::Bytes;
use ccdb_codec::CompressionCodec;
use ccdb_protocol::{Envelope, EnvelopeCodec, ProtocolError};
use ccdb_types::{CalibrationObject, ObjectDigest, ObjectPath};
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::error::BackendResult;
use crate::provider::ObjectProvider;
use crate::transport::MessageTransport;

/// Packs calibration objects into store requests and unpacks inbound
/// messages back into objects.
///
/// The backend holds only its configuration and the injected provider; each
/// call owns its buffers, so one backend can serve concurrent callers.
pub struct Backend {
    config: BackendConfig,
    codec: CompressionCodec,
    provider: Arc<dyn ObjectProvider>,
}

impl Backend {
    /// Create a backend. Fails with a configuration error if `config` is invalid.
    pub fn new(config: BackendConfig, provider: Arc<dyn ObjectProvider>) -> BackendResult<Self> {
        config.validate()?;
        let codec = CompressionCodec::new(config.compression.clone());
        Ok(Self {
            config,
            codec,
            provider,
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Identifier of the destination store.
    pub fn store(&self) -> &str {
        &self.config.store
    }

    /// Build the PUT request for the object at `path`.
    ///
    /// Reads the object from the provider, compresses it and encodes it under
    /// `key`. The same provider content always yields the same bytes.
    pub fn pack(&self, path: &str, key: &str) -> BackendResult<Vec<u8>> {
        self.pack_object(path, key).map(|(_, message)| message)
    }

    /// Like [`pack`](Self::pack), also returning the object that was read.
    pub fn pack_object(
        &self,
        path: &str,
        key: &str,
    ) -> BackendResult<(CalibrationObject, Vec<u8>)> {
        let path = ObjectPath::new(path)?;
        let data = self.provider.get_object(&path)?;
        let digest = ObjectDigest::of(&data);

        let compressed = self.codec.compress(&data)?;
        let compressed_len = compressed.len();

        let envelope = Envelope::put(self.store(), key, compressed).with_path(path.as_str());
        let message = EnvelopeCodec::encode(envelope)?;

        debug!(
            path = %path,
            key,
            digest = %digest.short_hex(),
            object_len = data.len(),
            compressed_len,
            message_len = message.len(),
            "packed object"
        );
        Ok((CalibrationObject::new(Some(path), key, data), message))
    }

    /// Rebuild the calibration object carried by an inbound message.
    pub fn unpack(&self, message: &[u8]) -> BackendResult<CalibrationObject> {
        let envelope = EnvelopeCodec::decode(message)?;
        if envelope.value.is_empty() && !envelope.operation.requires_value() {
            return Err(ProtocolError::MalformedEnvelope(format!(
                "{} message for key {:?} carries no object",
                envelope.operation.name(),
                envelope.key
            ))
            .into());
        }

        let data = self.codec.decompress(&envelope.value)?;
        let path = envelope
            .path
            .map(|p| ObjectPath::new(p).map_err(|e| ProtocolError::MalformedEnvelope(e.to_string())))
            .transpose()?;

        let object = CalibrationObject::new(path, envelope.key, data);
        debug!(
            key = object.key(),
            path = ?object.path().map(ObjectPath::as_str),
            store = %envelope.destination_store,
            digest = %object.digest().short_hex(),
            object_len = object.size(),
            "unpacked object"
        );
        Ok(object)
    }

    /// Build a GET request for `key`.
    pub fn get_request(&self, key: &str) -> BackendResult<Vec<u8>> {
        Ok(EnvelopeCodec::encode(Envelope::get(self.store(), key))?)
    }

    /// Pack the object at `path` and send it to the configured store.
    ///
    /// Returns the size of the dispatched message. Nothing is sent if packing fails.
    pub async fn dispatch(
        &self,
        transport: &dyn MessageTransport,
        path: &str,
        key: &str,
    ) -> BackendResult<usize> {
        let message = self.pack(path, key)?;
        let len = message.len();
        transport.send(self.store(), Bytes::from(message)).await?;
        Ok(len)
    }

    /// Receive one inbound message and unpack it.
    ///
    /// Returns `Ok(None)` when the transport is closed. A message that fails
    /// to unpack is dropped and its error returned.
    pub async fn receive(
        &self,
        transport: &dyn MessageTransport,
    ) -> BackendResult<Option<CalibrationObject>> {
        let Some(message) = transport.recv().await? else {
            return Ok(None);
        };
        match self.unpack(&message) {
            Ok(object) => Ok(Some(object)),
            Err(e) => {
                warn!(error = %e, len = message.len(), "dropping inbound message");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
