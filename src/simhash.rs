//! SimHash: fixed-width token-bag signatures for near-duplicate detection.
//!
//! SimHash (Charikar, 2002) maps a bag of tokens to a bitstring such that
//! documents with overlapping token multisets have small Hamming distance.
//!
//! Each token is hashed with SHA-256 and read as a 256-bit big-endian
//! integer. Bit `i` of that integer adds `+1` (set) or `-1` (clear) to
//! accumulator `i`; the signature sets bit `i` iff accumulator `i` is strictly
//! positive. Bits at or above 256 are clear in every token hash, so those
//! signature bits are always 0.
//!
//! Token order never matters.

use std::fmt;

use crate::digest::sha256_bytes;
use crate::error::{Error, Result};
use crate::text::split_tokens;

/// Default signature width.
pub const DEFAULT_NUM_BITS: usize = 64;

const DIGEST_BITS: usize = 256;

/// A `num_bits`-wide SimHash signature.
///
/// Stored as little-endian 64-bit words: bit `i` lives in word `i / 64`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimHashSignature {
    num_bits: usize,
    words: Vec<u64>,
}

impl SimHashSignature {
    fn zero(num_bits: usize) -> Self {
        Self {
            num_bits,
            words: vec![0; num_bits.div_ceil(64)],
        }
    }

    /// Build a signature from a 64-bit value. Bits above `num_bits` are dropped.
    pub fn from_u64(value: u64, num_bits: usize) -> Self {
        let mut sig = Self::zero(num_bits);
        for i in 0..num_bits.min(64) {
            if (value >> i) & 1 == 1 {
                sig.set(i);
            }
        }
        sig
    }

    fn set(&mut self, i: usize) {
        self.words[i / 64] |= 1u64 << (i % 64);
    }

    /// Signature width in bits.
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Whether bit `i` is set (`false` past the width).
    pub fn bit(&self, i: usize) -> bool {
        i < self.num_bits && (self.words[i / 64] >> (i % 64)) & 1 == 1
    }

    /// Little-endian 64-bit words.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// The signature as a `u64`, if it is at most 64 bits wide.
    pub fn as_u64(&self) -> Option<u64> {
        (self.num_bits <= 64).then(|| self.words.first().copied().unwrap_or(0))
    }

    /// The signature as a `u128`, if it is at most 128 bits wide.
    pub fn as_u128(&self) -> Option<u128> {
        if self.num_bits > 128 {
            return None;
        }
        let lo = u128::from(self.words.first().copied().unwrap_or(0));
        let hi = u128::from(self.words.get(1).copied().unwrap_or(0));
        Some(lo | (hi << 64))
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// True if no bit is set.
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }
}

impl fmt::LowerHex for SimHashSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words = self.words.iter().rev().skip_while(|&&w| w == 0);
        match words.next() {
            None => f.write_str("0"),
            Some(top) => {
                write!(f, "{top:x}")?;
                for w in words {
                    write!(f, "{w:016x}")?;
                }
                Ok(())
            }
        }
    }
}

/// SimHash generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimHash {
    num_bits: usize,
}

impl Default for SimHash {
    fn default() -> Self {
        Self {
            num_bits: DEFAULT_NUM_BITS,
        }
    }
}

impl SimHash {
    /// Create a generator for `num_bits`-wide signatures.
    pub fn new(num_bits: usize) -> Result<Self> {
        if num_bits == 0 {
            return Err(Error::InvalidParam("num_bits must be >= 1"));
        }
        Ok(Self { num_bits })
    }

    /// Signature width in bits.
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Signature of whitespace-delimited tokens in `text`.
    ///
    /// Separators are [`text::is_separator`](crate::text::is_separator) chars.
    pub fn signature(&self, text: &str) -> SimHashSignature {
        self.signature_from_tokens(split_tokens(text))
    }

    /// Signature of an arbitrary token stream.
    pub fn signature_from_tokens<I, S>(&self, tokens: I) -> SimHashSignature
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut acc = vec![0i64; self.num_bits];
        let mut n_tokens = 0usize;
        for token in tokens {
            let digest = sha256_bytes(token.as_ref());
            for (i, a) in acc.iter_mut().enumerate() {
                if digest_bit(&digest, i) {
                    *a += 1;
                } else {
                    *a -= 1;
                }
            }
            n_tokens += 1;
        }

        let mut sig = SimHashSignature::zero(self.num_bits);
        for (i, &a) in acc.iter().enumerate() {
            if a > 0 {
                sig.set(i);
            }
        }
        tracing::trace!(num_bits = self.num_bits, tokens = n_tokens, "computed simhash");
        sig
    }
}

/// Bit `i` of the digest read as a big-endian integer.
fn digest_bit(digest: &[u8; 32], i: usize) -> bool {
    if i >= DIGEST_BITS {
        return false;
    }
    (digest[31 - i / 8] >> (i % 8)) & 1 == 1
}

/// SimHash of the whitespace-delimited tokens of `text`.
pub fn simhash(text: &str, num_bits: usize) -> Result<SimHashSignature> {
    Ok(SimHash::new(num_bits)?.signature(text))
}
