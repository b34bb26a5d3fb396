//! Fingerprint types and the algorithm trait.

use crate::error::HashError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Bits in a fingerprint produced with the default 8x8 grid
pub const FINGERPRINT_BITS: u32 = 64;

/// Available hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashAlgorithmKind {
    /// Average Hash (aHash) - Fast, good for exact duplicates
    Average,
    /// Difference Hash (dHash) - Good balance of speed and accuracy
    #[default]
    Difference,
    /// Perceptual Hash (pHash) - DCT based, most robust
    Perceptual,
}

impl HashAlgorithmKind {
    /// Get a human-readable description of the algorithm
    pub fn description(&self) -> &'static str {
        match self {
            HashAlgorithmKind::Average => {
                "Average Hash (aHash) - Fast comparison based on average brightness"
            }
            HashAlgorithmKind::Difference => {
                "Difference Hash (dHash) - Compares brightness gradients between pixels"
            }
            HashAlgorithmKind::Perceptual => {
                "Perceptual Hash (pHash) - DCT-based, robust to edits and transformations"
            }
        }
    }
}

impl std::fmt::Display for HashAlgorithmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithmKind::Average => write!(f, "aHash"),
            HashAlgorithmKind::Difference => write!(f, "dHash"),
            HashAlgorithmKind::Perceptual => write!(f, "pHash"),
        }
    }
}

/// Compact perceptual fingerprint of an image.
///
/// Two fingerprints are only comparable when they come from the same
/// algorithm and have the same length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    bytes: Vec<u8>,
    algorithm: HashAlgorithmKind,
}

impl Fingerprint {
    pub fn new(bytes: Vec<u8>, algorithm: HashAlgorithmKind) -> Self {
        Self { bytes, algorithm }
    }

    /// Get the algorithm that produced this fingerprint
    pub fn algorithm(&self) -> HashAlgorithmKind {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Total number of bits
    pub fn bit_count(&self) -> u32 {
        (self.bytes.len() * 8) as u32
    }

    /// Hex rendering for logs
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Hamming distance: the number of differing bits.
    ///
    /// Fails when the fingerprints come from different algorithms or
    /// differ in length.
    pub fn distance(&self, other: &Fingerprint) -> Result<u32, HashError> {
        if self.algorithm != other.algorithm || self.bytes.len() != other.bytes.len() {
            return Err(HashError::IncompatibleFingerprints {
                left: format!("{} ({} bits)", self.algorithm, self.bit_count()),
                right: format!("{} ({} bits)", other.algorithm, other.bit_count()),
            });
        }

        Ok(self
            .bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum())
    }
}

/// A successfully fingerprinted file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashRecord {
    pub path: PathBuf,
    pub fingerprint: Fingerprint,
}

/// Trait for fingerprint algorithm implementations
pub trait FingerprintAlgorithm: Send + Sync {
    /// Compute a fingerprint from an already-decoded image.
    ///
    /// Errors carry an empty path; the caller knows which file it was.
    fn fingerprint(&self, image: &DynamicImage) -> Result<Fingerprint, HashError>;

    /// Get the algorithm kind
    fn kind(&self) -> HashAlgorithmKind;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprint(bytes: &[u8]) -> Fingerprint {
        Fingerprint::new(bytes.to_vec(), HashAlgorithmKind::Difference)
    }

    #[test]
    fn distance_to_self_is_zero() {
        let hash = fingerprint(&[0xFF, 0x00, 0xAA, 0x55]);
        assert_eq!(hash.distance(&hash).unwrap(), 0);
    }

    #[test]
    fn distance_is_symmetric() {
        let hash_a = fingerprint(&[0xFF, 0x00]);
        let hash_b = fingerprint(&[0x0F, 0xF0]);

        assert_eq!(
            hash_a.distance(&hash_b).unwrap(),
            hash_b.distance(&hash_a).unwrap()
        );
    }

    #[test]
    fn distance_counts_differing_bits() {
        let hash_a = fingerprint(&[0b1111_0000]);
        let hash_b = fingerprint(&[0b1010_0101]);

        assert_eq!(hash_a.distance(&hash_b).unwrap(), 4);
    }

    #[test]
    fn different_lengths_are_incompatible() {
        let short = fingerprint(&[0x00]);
        let long = fingerprint(&[0x00, 0x00]);

        assert!(matches!(
            short.distance(&long),
            Err(HashError::IncompatibleFingerprints { .. })
        ));
    }

    #[test]
    fn different_algorithms_are_incompatible() {
        let dhash = fingerprint(&[0x00]);
        let ahash = Fingerprint::new(vec![0x00], HashAlgorithmKind::Average);

        assert!(dhash.distance(&ahash).is_err());
    }

    #[test]
    fn to_hex_formats_bytes() {
        assert_eq!(fingerprint(&[0xAB, 0x01]).to_hex(), "ab01");
        assert_eq!(fingerprint(&[0xAB, 0x01]).bit_count(), 16);
    }

    #[test]
    fn kind_serializes_kebab_case() {
        let json = serde_json::to_string(&HashAlgorithmKind::Perceptual).unwrap();
        assert_eq!(json, "\"perceptual\"");
    }
}
