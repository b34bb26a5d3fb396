//! Perceptual Hash (pHash) implementation.
//!
//! pHash uses the Discrete Cosine Transform (DCT) to extract
//! frequency information from the image. This makes it more
//! robust to scaling, small brightness changes and compression artifacts.
//!
//! The DCT and bit extraction come from the image_hasher crate.

use super::super::traits::{Fingerprint, FingerprintAlgorithm, HashAlgorithmKind};
use super::ensure_not_empty;
use crate::error::HashError;
use image::DynamicImage;
use image_hasher::{HashAlg, HasherConfig as ImageHasherConfig};

/// Perceptual Hash (pHash) implementation using DCT
pub struct DctHasher {
    /// Internal hasher from image_hasher crate
    hasher: image_hasher::Hasher,
}

impl DctHasher {
    /// Create a new pHash hasher
    pub fn new(hash_size: u32) -> Self {
        let hasher = ImageHasherConfig::new()
            .hash_size(hash_size, hash_size)
            .hash_alg(HashAlg::Mean)
            .preproc_dct()
            .to_hasher();

        Self { hasher }
    }
}

impl FingerprintAlgorithm for DctHasher {
    fn fingerprint(&self, image: &DynamicImage) -> Result<Fingerprint, HashError> {
        ensure_not_empty(image)?;

        let hash = self.hasher.hash_image(image);
        Ok(Fingerprint::new(
            hash.as_bytes().to_vec(),
            HashAlgorithmKind::Perceptual,
        ))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Perceptual
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn create_checker_image(cell: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(128, 128, |x, y| {
            let v = if (x / cell + y / cell) % 2 == 0 { 240 } else { 15 };
            Rgb([v, v, v])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn identical_images_produce_identical_hash() {
        let hasher = DctHasher::new(8);
        let image = create_checker_image(16);

        let hash1 = hasher.fingerprint(&image).unwrap();
        let hash2 = hasher.fingerprint(&image).unwrap();

        assert_eq!(hash1.distance(&hash2).unwrap(), 0);
    }

    #[test]
    fn hash_is_64_bits_for_size_8() {
        let hash = DctHasher::new(8)
            .fingerprint(&create_checker_image(16))
            .unwrap();
        assert_eq!(hash.bit_count(), 64);
    }

    #[test]
    fn kind_returns_perceptual() {
        assert_eq!(DctHasher::new(8).kind(), HashAlgorithmKind::Perceptual);
    }
}
