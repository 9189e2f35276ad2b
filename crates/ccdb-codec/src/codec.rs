use tracing::debug;

use crate::config::{CompressionAlgorithm, CompressionConfig};
use crate::error::{CodecError, CodecResult};
use crate::{deflate, zstandard};

/// Size of the input slices fed to the engine and of the output scratch
/// buffer (32 KiB).
pub const CHUNK_SIZE: usize = 32 * 1024;

/// Stateless compressor/decompressor for object payloads.
///
/// Holds only its configuration; every call builds a fresh engine, so a
/// single codec can be shared across threads.
#[derive(Clone, Debug, Default)]
pub struct CompressionCodec {
    config: CompressionConfig,
}

impl CompressionCodec {
    pub fn new(config: CompressionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    pub fn algorithm(&self) -> CompressionAlgorithm {
        self.config.algorithm
    }

    /// Check that the configured level is accepted by the engine.
    pub fn validate(&self) -> CodecResult<()> {
        match self.config.algorithm {
            CompressionAlgorithm::Zlib => deflate::check_level(self.config.level).map(|_| ()),
            CompressionAlgorithm::Zstd => zstandard::check_level(self.config.level),
        }
    }

    /// Compress `input` into a complete stream.
    ///
    /// Deterministic for a given configuration: the same input always yields
    /// the same bytes.
    pub fn compress(&self, input: &[u8]) -> CodecResult<Vec<u8>> {
        let out = match self.config.algorithm {
            CompressionAlgorithm::Zlib => deflate::compress(input, self.config.level)?,
            CompressionAlgorithm::Zstd => zstandard::compress(input, self.config.level)?,
        };
        debug!(
            algorithm = self.config.algorithm.name(),
            input_len = input.len(),
            output_len = out.len(),
            "compressed payload"
        );
        Ok(out)
    }

    /// Decompress a complete stream produced by [`compress`](Self::compress).
    pub fn decompress(&self, input: &[u8]) -> CodecResult<Vec<u8>> {
        let mut sink = OutputSink::new(self.config.max_output_size);
        match self.config.algorithm {
            CompressionAlgorithm::Zlib => deflate::decompress(input, &mut sink)?,
            CompressionAlgorithm::Zstd => zstandard::decompress(input, &mut sink)?,
        }
        let out = sink.into_inner();
        debug!(
            algorithm = self.config.algorithm.name(),
            input_len = input.len(),
            output_len = out.len(),
            "decompressed payload"
        );
        Ok(out)
    }
}

/// Decompression output buffer with an optional size cap.
pub(crate) struct OutputSink {
    buf: Vec<u8>,
    limit: Option<usize>,
}

impl OutputSink {
    pub(crate) fn new(limit: Option<usize>) -> Self {
        Self {
            buf: Vec::new(),
            limit,
        }
    }

    pub(crate) fn push(&mut self, bytes: &[u8]) -> CodecResult<()> {
        if let Some(limit) = self.limit {
            if self.buf.len() + bytes.len() > limit {
                return Err(CodecError::OutputLimitExceeded { limit });
            }
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    pub(crate) fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    fn zlib() -> CompressionCodec {
        CompressionCodec::default()
    }

    fn zstd() -> CompressionCodec {
        CompressionCodec::new(CompressionConfig::for_algorithm(CompressionAlgorithm::Zstd))
    }

    fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
        let mut data = vec![0u8; len];
        StdRng::seed_from_u64(seed).fill_bytes(&mut data);
        data
    }

    #[test]
    fn empty_input_roundtrip() {
        for codec in [zlib(), zstd()] {
            let compressed = codec.compress(&[]).unwrap();
            assert!(!compressed.is_empty(), "{:?} stream must not be empty", codec.algorithm());
            assert!(codec.decompress(&compressed).unwrap().is_empty());
        }
    }

    #[test]
    fn small_input_roundtrip() {
        let data = b"TPC pedestal calibration, run 245231";
        for codec in [zlib(), zstd()] {
            let compressed = codec.compress(data).unwrap();
            assert_eq!(codec.decompress(&compressed).unwrap(), data);
        }
    }

    #[test]
    fn random_input_larger_than_chunk_roundtrip() {
        let data = random_bytes(100_000, 7);
        assert!(data.len() > CHUNK_SIZE);
        for codec in [zlib(), zstd()] {
            let compressed = codec.compress(&data).unwrap();
            assert_eq!(codec.decompress(&compressed).unwrap(), data);
        }
    }

    #[test]
    fn compressible_input_spanning_many_chunks() {
        let data: Vec<u8> = (0..1_000_000u32).map(|i| (i % 251) as u8).collect();
        for codec in [zlib(), zstd()] {
            let compressed = codec.compress(&data).unwrap();
            assert!(compressed.len() < data.len() / 10);
            assert_eq!(codec.decompress(&compressed).unwrap(), data);
        }
    }

    #[test]
    fn compression_is_deterministic() {
        let data = random_bytes(50_000, 11);
        for codec in [zlib(), zstd()] {
            assert_eq!(codec.compress(&data).unwrap(), codec.compress(&data).unwrap());
        }
    }

    #[test]
    fn zlib_stream_has_zlib_header() {
        let compressed = zlib().compress(b"abc").unwrap();
        assert_eq!(compressed[0], 0x78);
    }

    #[test]
    fn zlib_output_decodes_with_flate2_reader() {
        use std::io::Read;
        let data = random_bytes(40_000, 3);
        let compressed = zlib().compress(&data).unwrap();
        let mut out = Vec::new();
        flate2::read::ZlibDecoder::new(compressed.as_slice())
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn zstd_output_decodes_with_decode_all() {
        let data = random_bytes(40_000, 5);
        let compressed = zstd().compress(&data).unwrap();
        assert_eq!(::zstd::decode_all(compressed.as_slice()).unwrap(), data);
    }

    #[test]
    fn truncated_stream_is_an_error() {
        let data = random_bytes(70_000, 13);
        for codec in [zlib(), zstd()] {
            let compressed = codec.compress(&data).unwrap();
            let truncated = &compressed[..compressed.len() / 2];
            let err = codec.decompress(truncated).unwrap_err();
            assert!(matches!(err, CodecError::DecompressStream(_)), "got {err:?}");
        }
    }

    #[test]
    fn empty_compressed_input_is_an_error() {
        for codec in [zlib(), zstd()] {
            let err = codec.decompress(&[]).unwrap_err();
            assert!(matches!(err, CodecError::DecompressStream(_)));
        }
    }

    #[test]
    fn garbage_input_is_an_error() {
        let garbage = [0xFFu8; 64];
        for codec in [zlib(), zstd()] {
            let err = codec.decompress(&garbage).unwrap_err();
            assert!(matches!(err, CodecError::DecompressStream(_)));
        }
    }

    #[test]
    fn invalid_level_fails_init() {
        let codec = CompressionCodec::new(CompressionConfig {
            level: 12,
            ..CompressionConfig::default()
        });
        assert!(matches!(codec.validate(), Err(CodecError::CompressInit(_))));
        assert!(matches!(codec.compress(b"x"), Err(CodecError::CompressInit(_))));

        let codec = CompressionCodec::new(CompressionConfig {
            algorithm: CompressionAlgorithm::Zstd,
            level: 1_000,
            ..CompressionConfig::default()
        });
        assert!(matches!(codec.compress(b"x"), Err(CodecError::CompressInit(_))));
    }

    #[test]
    fn negative_zlib_level_fails_init() {
        let codec = CompressionCodec::new(CompressionConfig {
            level: -1,
            ..CompressionConfig::default()
        });
        assert!(matches!(codec.validate(), Err(CodecError::CompressInit(_))));
    }

    #[test]
    fn output_limit_is_enforced() {
        let data = vec![0u8; 200_000];
        for algorithm in [CompressionAlgorithm::Zlib, CompressionAlgorithm::Zstd] {
            let unlimited = CompressionCodec::new(CompressionConfig::for_algorithm(algorithm));
            let compressed = unlimited.compress(&data).unwrap();

            let limited = CompressionCodec::new(CompressionConfig {
                max_output_size: Some(100_000),
                ..CompressionConfig::for_algorithm(algorithm)
            });
            let err = limited.decompress(&compressed).unwrap_err();
            assert!(matches!(err, CodecError::OutputLimitExceeded { limit: 100_000 }));
        }
    }

    #[test]
    fn no_limit_means_unbounded() {
        let codec = CompressionCodec::new(CompressionConfig {
            max_output_size: None,
            ..CompressionConfig::default()
        });
        let data = vec![1u8; 300_000];
        let compressed = codec.compress(&data).unwrap();
        assert_eq!(codec.decompress(&compressed).unwrap().len(), 300_000);
    }

    #[test]
    fn every_zlib_level_roundtrips() {
        let data = random_bytes(5_000, 17);
        for level in 0..=9 {
            let codec = CompressionCodec::new(CompressionConfig {
                level,
                ..CompressionConfig::default()
            });
            let compressed = codec.compress(&data).unwrap();
            assert_eq!(codec.decompress(&compressed).unwrap(), data, "level {level}");
        }
    }

    proptest! {
        #[test]
        fn arbitrary_bytes_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let codec = zlib();
            let compressed = codec.compress(&data).unwrap();
            prop_assert_eq!(codec.decompress(&compressed).unwrap(), data);
        }
    }
}
