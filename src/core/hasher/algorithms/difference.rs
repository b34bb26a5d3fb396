//! Difference Hash (dHash) implementation.
//!
//! dHash works by:
//! 1. Resizing the image to (hash_size+1) x hash_size
//! 2. Converting to grayscale
//! 3. Comparing each pixel to the one to its right
//! 4. If left pixel is brighter, set bit to 1, else 0
//!
//! This captures the relative gradient of brightness changes.

use super::super::traits::{Fingerprint, FingerprintAlgorithm, HashAlgorithmKind};
use super::{ensure_not_empty, pack_bits};
use crate::error::HashError;
use image::imageops::FilterType;
use image::DynamicImage;

/// Difference Hash (dHash) implementation
pub struct DifferenceHasher {
    /// Size of the hash (width and height of comparison grid)
    hash_size: u32,
}

impl DifferenceHasher {
    /// Create a new dHash hasher
    pub fn new(hash_size: u32) -> Self {
        Self { hash_size }
    }
}

impl FingerprintAlgorithm for DifferenceHasher {
    fn fingerprint(&self, image: &DynamicImage) -> Result<Fingerprint, HashError> {
        ensure_not_empty(image)?;

        // One extra column so every cell has a right-hand neighbour
        let gray = image
            .resize_exact(self.hash_size + 1, self.hash_size, FilterType::Triangle)
            .to_luma8();

        let size = self.hash_size;
        let mut bits = Vec::with_capacity((size * size) as usize);
        for y in 0..size {
            for x in 0..size {
                // Set bit if left is brighter than right
                bits.push(gray.get_pixel(x, y)[0] > gray.get_pixel(x + 1, y)[0]);
            }
        }

        Ok(Fingerprint::new(pack_bits(bits), HashAlgorithmKind::Difference))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Difference
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn create_solid_image(r: u8, g: u8, b: u8) -> DynamicImage {
        let img = ImageBuffer::from_fn(100, 100, |_, _| Rgb([r, g, b]));
        DynamicImage::ImageRgb8(img)
    }

    fn create_left_to_right_gradient() -> DynamicImage {
        let img = ImageBuffer::from_fn(100, 100, |x, _| {
            let brightness = (x * 255 / 99) as u8;
            Rgb([brightness, brightness, brightness])
        });
        DynamicImage::ImageRgb8(img)
    }

    fn create_right_to_left_gradient() -> DynamicImage {
        let img = ImageBuffer::from_fn(100, 100, |x, _| {
            let brightness = ((99 - x) * 255 / 99) as u8;
            Rgb([brightness, brightness, brightness])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn identical_images_produce_identical_hash() {
        let hasher = DifferenceHasher::new(8);
        let image = create_solid_image(128, 128, 128);

        let hash1 = hasher.fingerprint(&image).unwrap();
        let hash2 = hasher.fingerprint(&image).unwrap();

        assert_eq!(hash1.distance(&hash2).unwrap(), 0);
    }

    #[test]
    fn opposite_gradients_are_far_apart() {
        let hasher = DifferenceHasher::new(8);

        // Left-to-right: every left < right (bits = 0); right-to-left: all bits = 1
        let hash1 = hasher.fingerprint(&create_left_to_right_gradient()).unwrap();
        let hash2 = hasher.fingerprint(&create_right_to_left_gradient()).unwrap();

        let distance = hash1.distance(&hash2).unwrap();
        assert!(
            distance > 32,
            "Expected opposite gradients to differ in most bits, got {}",
            distance
        );
    }

    #[test]
    fn hash_size_affects_output_length() {
        let image = create_solid_image(128, 128, 128);

        let hash_8 = DifferenceHasher::new(8).fingerprint(&image).unwrap();
        let hash_16 = DifferenceHasher::new(16).fingerprint(&image).unwrap();

        assert_eq!(hash_8.as_bytes().len(), 8);
        assert_eq!(hash_16.as_bytes().len(), 32);
    }

    #[test]
    fn kind_returns_difference() {
        assert_eq!(DifferenceHasher::new(8).kind(), HashAlgorithmKind::Difference);
    }
}
