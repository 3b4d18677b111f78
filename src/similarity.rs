//! Similarity scores over fingerprints and signatures.
//!
//! - Hamming distance: differing bits between two signatures.
//! - Jaccard similarity: \(|A ∩ B| / |A ∪ B|\), defined as 1.0 for two empty sets.

use std::collections::HashSet;
use std::hash::{BuildHasher, Hash};

use crate::simhash::SimHashSignature;

/// Bitwise Hamming distance.
pub trait HammingDistance {
    /// Number of bit positions in which `self` and `other` differ.
    fn hamming_distance(&self, other: &Self) -> u32;
}

impl HammingDistance for u64 {
    fn hamming_distance(&self, other: &Self) -> u32 {
        (self ^ other).count_ones()
    }
}

impl HammingDistance for u128 {
    fn hamming_distance(&self, other: &Self) -> u32 {
        (self ^ other).count_ones()
    }
}

impl HammingDistance for SimHashSignature {
    /// Compares the signatures as integers: a narrower signature's missing
    /// high words count as zero.
    fn hamming_distance(&self, other: &Self) -> u32 {
        let (a, b) = (self.words(), other.words());
        (0..a.len().max(b.len()))
            .map(|i| {
                let x = a.get(i).copied().unwrap_or(0);
                let y = b.get(i).copied().unwrap_or(0);
                (x ^ y).count_ones()
            })
            .sum()
    }
}

/// Hamming distance between two values.
pub fn hamming_distance<T: HammingDistance + ?Sized>(a: &T, b: &T) -> u32 {
    a.hamming_distance(b)
}

/// Jaccard similarity of two sets; 1.0 when both are empty.
pub fn jaccard_similarity<T, S>(a: &HashSet<T, S>, b: &HashSet<T, S>) -> f64
where
    T: Eq + Hash,
    S: BuildHasher,
{
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let intersection = small.iter().filter(|x| large.contains(x)).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 1.0;
    }
    intersection as f64 / union as f64
}

/// Jaccard similarity of two collections after deduplicating each.
pub fn jaccard_similarity_of<T, A, B>(a: A, b: B) -> f64
where
    T: Eq + Hash,
    A: IntoIterator<Item = T>,
    B: IntoIterator<Item = T>,
{
    let a: HashSet<T> = a.into_iter().collect();
    let b: HashSet<T> = b.into_iter().collect();
    jaccard_similarity(&a, &b)
}
