use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("compression engine initialisation failed: {0}")]
    CompressInit(String),

    #[error("compression stream error: {0}")]
    CompressStream(String),

    #[error("decompression engine initialisation failed: {0}")]
    DecompressInit(String),

    #[error("decompression stream error: {0}")]
    DecompressStream(String),

    #[error("decompressed output exceeds limit of {limit} bytes")]
    OutputLimitExceeded { limit: usize },
}

pub type CodecResult<T> = Result<T, CodecError>;
