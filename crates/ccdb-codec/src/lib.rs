//! Streaming compression codec for CCDB calibration objects.
//!
//! Objects are compressed before they are framed into a wire envelope and
//! decompressed after an envelope is received. Both directions feed the
//! engine at most [`CHUNK_SIZE`] input bytes at a time and drain output
//! through a fixed scratch buffer of the same size, so working memory does
//! not depend on object size.
//!
//! # Algorithms
//!
//! - [`CompressionAlgorithm::Zlib`] -- DEFLATE with zlib framing (default)
//! - [`CompressionAlgorithm::Zstd`] -- Zstandard frames
//!
//! # Failure model
//!
//! A stream that ends without its end marker, or an engine that cannot be
//! initialised, is reported as a [`CodecError`]. Partial output is never
//! returned.

pub mod codec;
pub mod config;
mod deflate;
pub mod error;
mod zstandard;

pub use codec::{CompressionCodec, CHUNK_SIZE};
pub use config::{CompressionAlgorithm, CompressionConfig};
pub use error::{CodecError, CodecResult};
