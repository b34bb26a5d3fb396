//! Image decoding from in-memory bytes.
//!
//! The format is sniffed from the file contents rather than its extension.
//! JPEG goes through zune-jpeg first, everything else (and any JPEG zune
//! rejects) through the image crate.

use crate::error::HashError;
use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, Rgb, Rgba};
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// Decodes raw file bytes into an image
pub struct FastDecoder;

impl FastDecoder {
    /// Decode `bytes` read from `path`. The path is only used in errors.
    pub fn decode(path: &Path, bytes: Vec<u8>) -> Result<DynamicImage, HashError> {
        let format = image::guess_format(&bytes).map_err(|e| HashError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let image = match format {
            ImageFormat::Jpeg => {
                Self::decode_jpeg(path, &bytes).or_else(|_| Self::decode_fallback(path, &bytes))?
            }
            _ => Self::decode_fallback(path, &bytes)?,
        };

        if image.width() == 0 || image.height() == 0 {
            return Err(HashError::EmptyImage {
                path: path.to_path_buf(),
            });
        }

        Ok(image)
    }

    /// Fast JPEG decoding using zune-jpeg
    #[allow(clippy::ptr_arg)]
    fn decode_jpeg(path: &Path, file_bytes: &Vec<u8>) -> Result<DynamicImage, HashError> {
        let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
        let mut decoder = JpegDecoder::new_with_options(file_bytes, options);

        let pixels = decoder.decode().map_err(|e| HashError::Decode {
            path: path.to_path_buf(),
            reason: format!("zune-jpeg decode failed: {:?}", e),
        })?;

        let info = decoder.info().ok_or_else(|| HashError::Decode {
            path: path.to_path_buf(),
            reason: "Failed to get image info".to_string(),
        })?;

        let width = info.width as u32;
        let height = info.height as u32;

        // The decoder may ignore the requested colorspace
        let out_colorspace = decoder.get_output_colorspace().unwrap_or(ColorSpace::RGB);

        let buffer_error = |kind: &str| HashError::Decode {
            path: path.to_path_buf(),
            reason: format!("Failed to create {} buffer", kind),
        };

        let image = match out_colorspace {
            ColorSpace::RGB => {
                let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| buffer_error("RGB"))?;
                DynamicImage::ImageRgb8(buffer)
            }
            ColorSpace::RGBA => {
                let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| buffer_error("RGBA"))?;
                DynamicImage::ImageRgba8(buffer)
            }
            ColorSpace::Luma => {
                let buffer: ImageBuffer<Luma<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| buffer_error("Luma"))?;
                DynamicImage::ImageLuma8(buffer)
            }
            _ => return Self::decode_fallback(path, file_bytes),
        };

        Ok(image)
    }

    /// Fallback to image crate for non-JPEG formats
    fn decode_fallback(path: &Path, bytes: &[u8]) -> Result<DynamicImage, HashError> {
        image::load_from_memory(bytes).map_err(|e| HashError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
