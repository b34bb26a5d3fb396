//! Hash algorithm implementations.

mod average;
mod difference;
mod perceptual;

pub use average::AverageHasher;
pub use difference::DifferenceHasher;
pub use perceptual::DctHasher;

use crate::error::HashError;
use image::DynamicImage;
use std::path::PathBuf;

/// Reject images with no pixels before any resizing happens
fn ensure_not_empty(image: &DynamicImage) -> Result<(), HashError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(HashError::EmptyImage {
            path: PathBuf::new(),
        });
    }
    Ok(())
}

/// Pack bits MSB-first into bytes
fn pack_bits(bits: impl IntoIterator<Item = bool>) -> Vec<u8> {
    let mut hash_bytes = Vec::new();
    let mut current_byte: u8 = 0;
    let mut bit_position = 0;

    for bit in bits {
        if bit {
            current_byte |= 1 << (7 - bit_position);
        }
        bit_position += 1;

        if bit_position == 8 {
            hash_bytes.push(current_byte);
            current_byte = 0;
            bit_position = 0;
        }
    }

    // Don't forget the last partial byte
    if bit_position > 0 {
        hash_bytes.push(current_byte);
    }

    hash_bytes
}
