use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, ProtocolResult};

pub const MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024;

/// Request operation understood by the key-value store.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[repr(i32)]
pub enum Operation {
    Put = 1,
    Get = 2,
    Delete = 3,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Put => "PUT",
            Self::Get => "GET",
            Self::Delete => "DELETE",
        }
    }

    /// Whether requests of this kind must carry a value.
    pub fn requires_value(&self) -> bool {
        matches!(self, Self::Put)
    }
}

/// Protobuf wire form of a request.
///
/// All fields are optional on the wire so that a missing field can be told
/// apart from an empty one; [`Envelope`] enforces which are required.
/// Field numbers are part of the wire contract and must never be reused.
#[derive(Clone, PartialEq, prost::Message)]
pub struct RequestMessage {
    #[prost(enumeration = "Operation", optional, tag = "1")]
    pub operation: Option<i32>,
    #[prost(string, optional, tag = "2")]
    pub destination_store: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub key: Option<String>,
    #[prost(bytes = "vec", optional, tag = "4")]
    pub value: Option<Vec<u8>>,
    /// Source path of the object, echoed so the receiver can rebuild it.
    ///
    /// Optional and encoded last: a buffer cut exactly before this field
    /// decodes as an envelope without a path. Framing catches such cuts on
    /// stream transports.
    #[prost(string, optional, tag = "5")]
    pub path: Option<String>,
}

/// A validated request envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub operation: Operation,
    pub destination_store: String,
    pub key: String,
    /// Compressed object bytes. Empty for requests that carry no payload.
    pub value: Vec<u8>,
    pub path: Option<String>,
}

impl Envelope {
    pub fn new(
        operation: Operation,
        destination_store: impl Into<String>,
        key: impl Into<String>,
        value: Vec<u8>,
    ) -> Self {
        Self {
            operation,
            destination_store: destination_store.into(),
            key: key.into(),
            value,
            path: None,
        }
    }

    pub fn put(destination_store: impl Into<String>, key: impl Into<String>, value: Vec<u8>) -> Self {
        Self::new(Operation::Put, destination_store, key, value)
    }

    pub fn get(destination_store: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(Operation::Get, destination_store, key, Vec::new())
    }

    pub fn delete(destination_store: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(Operation::Delete, destination_store, key, Vec::new())
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl From<Envelope> for RequestMessage {
    fn from(env: Envelope) -> Self {
        let value = if env.operation.requires_value() || !env.value.is_empty() {
            Some(env.value)
        } else {
            None
        };
        Self {
            operation: Some(env.operation as i32),
            destination_store: Some(env.destination_store),
            key: Some(env.key),
            value,
            path: env.path,
        }
    }
}

impl TryFrom<RequestMessage> for Envelope {
    type Error = ProtocolError;

    fn try_from(msg: RequestMessage) -> ProtocolResult<Self> {
        let tag = msg.operation.ok_or_else(|| missing("operation"))?;
        let operation = Operation::try_from(tag)
            .map_err(|_| ProtocolError::MalformedEnvelope(format!("unknown operation tag {tag}")))?;
        let destination_store = msg.destination_store.ok_or_else(|| missing("destination_store"))?;
        let key = msg.key.ok_or_else(|| missing("key"))?;
        let value = match msg.value {
            Some(v) => v,
            None if operation.requires_value() => {
                return Err(ProtocolError::MalformedEnvelope(format!(
                    "{} request without value",
                    operation.name()
                )))
            }
            None => Vec::new(),
        };
        Ok(Self {
            operation,
            destination_store,
            key,
            value,
            path: msg.path,
        })
    }
}

fn missing(field: &str) -> ProtocolError {
    ProtocolError::MalformedEnvelope(format!("missing required field `{field}`"))
}
