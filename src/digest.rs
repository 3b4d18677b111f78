//! Digest primitives: cryptographic hex digests and the Adler-32 checksum.
//!
//! All functions hash the UTF-8 bytes of their input. The checksum is a fast,
//! non-cryptographic hash used for k-gram fingerprinting; never use it where
//! collision resistance matters.

use std::fmt;
use std::str::FromStr;

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::error::Error;

/// Cryptographic digest algorithms available to [`digest_hex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// MD5 (128-bit).
    Md5,
    /// SHA-1 (160-bit).
    Sha1,
    /// SHA-256 (256-bit).
    #[default]
    Sha256,
}

impl HashAlgorithm {
    /// Lower-case hex digest of `text` under this algorithm.
    pub fn digest_hex(self, text: &str) -> String {
        let bytes = text.as_bytes();
        match self {
            HashAlgorithm::Md5 => hex_digest::<Md5>(bytes),
            HashAlgorithm::Sha1 => hex_digest::<Sha1>(bytes),
            HashAlgorithm::Sha256 => hex_digest::<Sha256>(bytes),
        }
    }

    /// Canonical lower-case name.
    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha1" | "sha-1" => Ok(HashAlgorithm::Sha1),
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

fn hex_digest<D: Digest>(bytes: &[u8]) -> String {
    hex::encode(D::digest(bytes))
}

/// Lower-case hex digest of `text` under `algorithm`.
pub fn digest_hex(text: &str, algorithm: HashAlgorithm) -> String {
    algorithm.digest_hex(text)
}

/// MD5 hex digest.
pub fn md5_hex(text: &str) -> String {
    hex_digest::<Md5>(text.as_bytes())
}

/// SHA-1 hex digest.
pub fn sha1_hex(text: &str) -> String {
    hex_digest::<Sha1>(text.as_bytes())
}

/// SHA-256 hex digest.
pub fn sha256_hex(text: &str) -> String {
    hex_digest::<Sha256>(text.as_bytes())
}

/// Raw SHA-256 digest bytes (big-endian when read as an integer).
pub fn sha256_bytes(text: &str) -> [u8; 32] {
    Sha256::digest(text.as_bytes()).into()
}

/// Adler-32 checksum of `text`.
pub fn checksum(text: &str) -> u32 {
    adler::adler32_slice(text.as_bytes())
}

/// Adler-32 checksum as hex, without zero padding (`""` gives `"1"`).
pub fn checksum_hex(text: &str) -> String {
    format!("{:x}", checksum(text))
}
