//! Winnowing: sparse, position-tagged document fingerprints.
//!
//! Schleimer, Wilkerson and Aiken (2003). Every k-gram of the text (over
//! Unicode scalar values) is hashed with Adler-32; a window of `w` consecutive
//! k-gram hashes slides across the sequence and each window selects its
//! minimum hash.
//!
//! # Compatibility contract
//!
//! - Ties inside a window resolve to the **leftmost** minimum.
//! - A maximal run of consecutive windows whose selected minimum hash is the
//!   same contributes exactly one fingerprint, at the position the first
//!   window of the run selected. So `"aaaaaaaaaa"` with `k = 2, w = 2`
//!   produces a single fingerprint at position 0.
//!
//! Changing either rule changes which k-grams survive, so both are locked in
//! by tests.
//!
//! Any shared substring of at least `w + k - 1` chars between two documents
//! yields at least one shared fingerprint hash.

use std::collections::{HashSet, VecDeque};

use crate::digest::checksum;
use crate::error::{Error, Result};

/// Default k-gram size.
pub const DEFAULT_K: usize = 5;
/// Default window size.
pub const DEFAULT_W: usize = 4;

/// One retained k-gram hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint {
    /// Offset of the k-gram in chars.
    pub position: usize,
    /// Adler-32 of the k-gram's UTF-8 bytes.
    pub hash: u32,
}

/// Winnowing fingerprinter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Winnower {
    k: usize,
    w: usize,
}

impl Default for Winnower {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            w: DEFAULT_W,
        }
    }
}

impl Winnower {
    /// Create a winnower with k-gram size `k` and window size `w`.
    pub fn new(k: usize, w: usize) -> Result<Self> {
        if k == 0 {
            return Err(Error::InvalidParam("k-gram size must be >= 1"));
        }
        if w == 0 {
            return Err(Error::InvalidParam("window size must be >= 1"));
        }
        Ok(Self { k, w })
    }

    /// K-gram size.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Window size.
    pub fn w(&self) -> usize {
        self.w
    }

    /// Minimum shared-substring length guaranteed to be detected.
    ///
    /// Saturates at `usize::MAX - 1` for extreme parameters.
    pub fn guarantee_threshold(&self) -> usize {
        self.w.saturating_add(self.k) - 1
    }

    /// Hash every k-gram of `text`, in order.
    pub fn kgram_hashes(&self, text: &str) -> Vec<u32> {
        // Byte offset of every char boundary, including the end of the text.
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let n = bounds.len() - 1;
        if n < self.k {
            return Vec::new();
        }
        (0..=n - self.k)
            .map(|i| checksum(&text[bounds[i]..bounds[i + self.k]]))
            .collect()
    }

    /// Fingerprint `text`.
    pub fn fingerprint(&self, text: &str) -> Vec<Fingerprint> {
        let hashes = self.kgram_hashes(text);
        let fingerprints = select(&hashes, self.w);
        tracing::trace!(
            k = self.k,
            w = self.w,
            kgrams = hashes.len(),
            fingerprints = fingerprints.len(),
            "winnowed text"
        );
        fingerprints
    }

    /// Distinct fingerprint hashes of `text`, ready for Jaccard scoring.
    pub fn fingerprint_hashes(&self, text: &str) -> HashSet<u32> {
        hash_set(&self.fingerprint(text))
    }
}

/// Window selection over precomputed k-gram hashes.
///
/// The monotonic deque holds candidate indices with non-decreasing hashes;
/// equal hashes are kept, so the front is always the leftmost minimum of the
/// current window.
fn select(hashes: &[u32], w: usize) -> Vec<Fingerprint> {
    let mut out: Vec<Fingerprint> = Vec::new();
    if hashes.len() < w {
        return out;
    }

    let mut deque: VecDeque<usize> = VecDeque::with_capacity(w);
    for (i, &h) in hashes.iter().enumerate() {
        while deque.back().is_some_and(|&j| hashes[j] > h) {
            deque.pop_back();
        }
        deque.push_back(i);

        if i + 1 < w {
            continue;
        }
        let start = i + 1 - w;
        while deque.front().is_some_and(|&j| j < start) {
            deque.pop_front();
        }
        let Some(&pos) = deque.front() else {
            continue;
        };
        let min = hashes[pos];
        if out.last().map_or(true, |prev| prev.hash != min) {
            out.push(Fingerprint {
                position: pos,
                hash: min,
            });
        }
    }
    out
}

/// Fingerprint `text` with k-gram size `k` and window size `w`.
pub fn winnow(text: &str, k: usize, w: usize) -> Result<Vec<Fingerprint>> {
    Ok(Winnower::new(k, w)?.fingerprint(text))
}

/// Distinct hashes of a fingerprint list.
pub fn hash_set(fingerprints: &[Fingerprint]) -> HashSet<u32> {
    fingerprints.iter().map(|f| f.hash).collect()
}
