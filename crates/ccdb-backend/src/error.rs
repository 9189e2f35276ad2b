use ccdb_codec::CodecError;
use ccdb_protocol::ProtocolError;
use ccdb_types::TypeError;

/// Errors from backend operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The object provider has no object at this path.
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("invalid object: {0}")]
    Type(#[from] TypeError),

    /// The messaging transport refused or lost a message.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
