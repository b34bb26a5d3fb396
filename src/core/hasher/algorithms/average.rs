//! Average Hash (aHash) implementation.
//!
//! aHash works by:
//! 1. Resizing the image to hash_size x hash_size
//! 2. Converting to grayscale
//! 3. Computing the average brightness
//! 4. For each pixel: if brighter than average, set bit to 1, else 0
//!
//! This is the fastest hash but less robust to edits.

use super::super::traits::{Fingerprint, FingerprintAlgorithm, HashAlgorithmKind};
use super::{ensure_not_empty, pack_bits};
use crate::error::HashError;
use image::imageops::FilterType;
use image::DynamicImage;

/// Average Hash (aHash) implementation
pub struct AverageHasher {
    /// Size of the hash (width and height)
    hash_size: u32,
}

impl AverageHasher {
    /// Create a new aHash hasher
    pub fn new(hash_size: u32) -> Self {
        Self { hash_size }
    }
}

impl FingerprintAlgorithm for AverageHasher {
    fn fingerprint(&self, image: &DynamicImage) -> Result<Fingerprint, HashError> {
        ensure_not_empty(image)?;

        let gray = image
            .resize_exact(self.hash_size, self.hash_size, FilterType::Lanczos3)
            .to_luma8();

        let total: u64 = gray.pixels().map(|p| p[0] as u64).sum();
        let count = (self.hash_size * self.hash_size).max(1) as u64;
        let average = (total / count) as u8;

        let bits = gray.pixels().map(|p| p[0] > average);

        Ok(Fingerprint::new(pack_bits(bits), HashAlgorithmKind::Average))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Average
    }
}
