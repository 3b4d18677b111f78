//! Polynomial rolling hash (Rabin-Karp prefix table).
//!
//! `h[0] = 0` and `h[i+1] = (h[i] * base + codepoint(text[i])) mod modulus`,
//! where `text[i]` is the i-th Unicode scalar value. Keeping the whole prefix
//! table lets any substring hash be derived in O(1):
//!
//! ```text
//! hash(text[i..j]) = (h[j] - h[i] * base^(j - i)) mod modulus
//! ```
//!
//! # Choosing a modulus
//!
//! Two distinct substrings collide with probability roughly `1 / modulus`.
//! The default (`101`) keeps fixtures small and readable but collides
//! constantly on real inputs; for deduplication-scale workloads use a large
//! prime such as `2^61 - 1`.

use crate::error::{Error, Result};

/// Default polynomial base.
pub const DEFAULT_BASE: u64 = 256;
/// Default modulus. Demonstration-scale, see the module docs.
pub const DEFAULT_MODULUS: u64 = 101;

/// Rolling hash parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingHash {
    base: u64,
    modulus: u64,
}

impl Default for RollingHash {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE,
            modulus: DEFAULT_MODULUS,
        }
    }
}

impl RollingHash {
    /// Create a rolling hash with an explicit base and modulus.
    pub fn new(base: u64, modulus: u64) -> Result<Self> {
        if modulus == 0 {
            return Err(Error::InvalidParam("rolling hash modulus must be >= 1"));
        }
        Ok(Self { base, modulus })
    }

    /// Polynomial base.
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Modulus.
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Compute the prefix table for `text` (`chars().count() + 1` entries).
    pub fn prefix_table(&self, text: &str) -> RollingHashTable {
        let (lower, _) = text.chars().size_hint();
        let mut prefixes = Vec::with_capacity(lower + 1);
        let mut h = 0u64;
        prefixes.push(h);
        for c in text.chars() {
            h = self.push(h, u64::from(u32::from(c)));
            prefixes.push(h);
        }
        RollingHashTable {
            base: self.base,
            modulus: self.modulus,
            prefixes,
        }
    }

    fn push(&self, h: u64, value: u64) -> u64 {
        let m = u128::from(self.modulus);
        ((u128::from(h) * u128::from(self.base) + u128::from(value)) % m) as u64
    }
}

/// Prefix hashes of a text under a fixed [`RollingHash`].
///
/// Entry `i` is the hash of the first `i` chars; entry 0 is always 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollingHashTable {
    base: u64,
    modulus: u64,
    prefixes: Vec<u64>,
}

impl RollingHashTable {
    /// The prefix hashes.
    pub fn as_slice(&self) -> &[u64] {
        &self.prefixes
    }

    /// Consume the table, returning the prefix hashes.
    pub fn into_vec(self) -> Vec<u64> {
        self.prefixes
    }

    /// Number of chars in the hashed text (one less than the table length).
    pub fn text_len(&self) -> usize {
        self.prefixes.len() - 1
    }

    /// Hash of the whole text.
    pub fn full_hash(&self) -> u64 {
        self.prefixes[self.prefixes.len() - 1]
    }

    /// Hash of chars `start..end`, equal to the last prefix hash of that
    /// substring hashed on its own.
    ///
    /// Returns `None` when `start > end` or `end` is past the text.
    pub fn substring_hash(&self, start: usize, end: usize) -> Option<u64> {
        if start > end || end > self.text_len() {
            return None;
        }
        let m = u128::from(self.modulus);
        let shift = mod_pow(self.base, (end - start) as u64, self.modulus);
        let head = u128::from(self.prefixes[start]) * u128::from(shift) % m;
        let tail = u128::from(self.prefixes[end]);
        Some(((tail + m - head) % m) as u64)
    }
}

fn mod_pow(base: u64, mut exp: u64, modulus: u64) -> u64 {
    let m = u128::from(modulus);
    let mut result = 1u128 % m;
    let mut b = u128::from(base) % m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * b % m;
        }
        b = b * b % m;
        exp >>= 1;
    }
    result as u64
}

/// Prefix table of `text` as a plain vector of `len + 1` hashes.
pub fn rolling_hash(text: &str, base: u64, modulus: u64) -> Result<Vec<u64>> {
    Ok(RollingHash::new(base, modulus)?.prefix_table(text).into_vec())
}
