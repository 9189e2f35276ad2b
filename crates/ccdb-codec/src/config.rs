use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Default decompression limit: 256 MiB.
pub const DEFAULT_MAX_OUTPUT_SIZE: usize = 256 * 1024 * 1024;

/// Compression algorithm used for object payloads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    /// DEFLATE with zlib header and Adler-32 trailer.
    #[default]
    Zlib,
    Zstd,
}

impl CompressionAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Zlib => "zlib",
            Self::Zstd => "zstd",
        }
    }

    pub fn default_level(&self) -> i32 {
        match self {
            Self::Zlib => 6,
            Self::Zstd => 3,
        }
    }
}

/// Codec settings, usually read from the `[compression]` table.
///
/// When `level` is absent it follows the algorithm's default. An absent
/// `max_output_size` means [`DEFAULT_MAX_OUTPUT_SIZE`]; `0` disables the limit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompressionConfig {
    pub algorithm: CompressionAlgorithm,
    pub level: i32,
    /// Upper bound on decompressed size. `None` disables the check.
    #[serde(serialize_with = "serialize_output_limit")]
    pub max_output_size: Option<usize>,
}

impl CompressionConfig {
    /// Config for `algorithm` at its default level.
    pub fn for_algorithm(algorithm: CompressionAlgorithm) -> Self {
        Self {
            algorithm,
            level: algorithm.default_level(),
            ..Self::default()
        }
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            algorithm: CompressionAlgorithm::Zlib,
            level: CompressionAlgorithm::Zlib.default_level(),
            max_output_size: Some(DEFAULT_MAX_OUTPUT_SIZE),
        }
    }
}

fn serialize_output_limit<S>(limit: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(limit.unwrap_or(0) as u64)
}

#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawCompressionConfig {
    algorithm: CompressionAlgorithm,
    level: Option<i32>,
    max_output_size: Option<usize>,
}

impl<'de> Deserialize<'de> for CompressionConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawCompressionConfig::deserialize(deserializer)?;
        Ok(Self {
            algorithm: raw.algorithm,
            level: raw.level.unwrap_or_else(|| raw.algorithm.default_level()),
            max_output_size: match raw.max_output_size {
                None => Some(DEFAULT_MAX_OUTPUT_SIZE),
                Some(0) => None,
                Some(limit) => Some(limit),
            },
        })
    }
}
