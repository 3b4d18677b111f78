//! Error types for `aether`.

/// Errors raised by fingerprinting primitives and their boundary helpers.
///
/// Degenerate inputs (text shorter than `k`, empty token streams, empty sets)
/// are not errors; they have defined results.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A tunable is out of range (non-positive `k`, `w`, `num_bits` or modulus).
    #[error("invalid parameter: {0}")]
    InvalidParam(&'static str),
    /// A hash algorithm name did not match any supported algorithm.
    #[error("unknown hash algorithm: {0:?} (expected md5, sha1 or sha256)")]
    UnknownAlgorithm(String),
    /// Input bytes are not valid UTF-8.
    #[error("input is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    /// A configuration file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// True for parameter-domain faults, including bad configuration files.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidParam(_) | Error::UnknownAlgorithm(_) | Error::Config(_)
        )
    }

    /// True when the input text could not be decoded.
    pub fn is_encoding(&self) -> bool {
        matches!(self, Error::Encoding(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
