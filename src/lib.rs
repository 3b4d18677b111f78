//! `aether`: content-fingerprinting primitives for source-code similarity.
//!
//! This crate holds the pure, stateless core of a similarity detector:
//! - digests (MD5 / SHA-1 / SHA-256, Adler-32 checksum)
//! - Rabin-Karp prefix tables (rolling hash)
//! - winnowing fingerprints (position-tagged k-gram hashes)
//! - SimHash signatures (token-bag, arbitrary width)
//! - Hamming distance and Jaccard similarity
//!
//! Scope here is *primitives*: fingerprints, signatures and scores with
//! deterministic behavior. How scores combine into a verdict, file discovery,
//! and reporting belong in the caller.
//!
//! # Example
//!
//! ```rust
//! use aether::{jaccard_similarity, simhash, winnow, HammingDistance};
//!
//! let a = "def add(a, b):\n    return a + b\n";
//! let b = "def add(x, y):\n    return x + y\n";
//!
//! let fa = aether::winnow::hash_set(&winnow(a, 5, 4).unwrap());
//! let fb = aether::winnow::hash_set(&winnow(b, 5, 4).unwrap());
//! let score = jaccard_similarity(&fa, &fb);
//! assert!((0.0..=1.0).contains(&score));
//!
//! let sa = simhash(a, 64).unwrap();
//! let sb = simhash(b, 64).unwrap();
//! assert!(sa.hamming_distance(&sb) <= 64);
//! ```
//!
//! All functions are safe to call concurrently; nothing keeps global state.

#![warn(missing_docs)]

pub mod config;
pub mod digest;
pub mod error;
pub mod rolling;
pub mod similarity;
pub mod simhash;
pub mod text;
pub mod winnow;

pub use config::FingerprintConfig;
pub use digest::{checksum, checksum_hex, digest_hex, HashAlgorithm};
pub use error::{Error, Result};
pub use rolling::{rolling_hash, RollingHash, RollingHashTable};
pub use similarity::{
    hamming_distance, jaccard_similarity, jaccard_similarity_of, HammingDistance,
};
pub use simhash::{simhash, SimHash, SimHashSignature};
pub use winnow::{winnow, Fingerprint, Winnower};
