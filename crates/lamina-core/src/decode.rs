//! Image decoding into flat sample buffers.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces an
//! [`ImageSample`] ready for accumulation. Grayscale sources decode to
//! one channel; everything else (including alpha formats) flattens to
//! three RGB channels, so decoded samples always carry a channel count
//! the encoder can serialize.

use image::DynamicImage;

use crate::types::{ImageSample, Shape, StackError};

/// Decode raw image bytes into a flat, channel-interleaved sample.
///
/// Supports whatever formats the `image` crate features enable (PNG,
/// JPEG, BMP, WebP). Grayscale and grayscale-alpha sources become
/// 1-channel samples; all other color types become 3-channel RGB.
///
/// # Errors
///
/// Returns [`StackError::EmptyInput`] if `bytes` is empty.
/// Returns [`StackError::ImageDecode`] if the format is unrecognized or
/// the data is corrupt.
pub fn decode_sample(bytes: &[u8]) -> Result<ImageSample, StackError> {
    if bytes.is_empty() {
        return Err(StackError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    match img {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_) => {
            let gray = img.to_luma8();
            let shape = Shape::new(gray.width(), gray.height(), 1);
            ImageSample::from_raw(shape, gray.into_raw())
        }
        _ => {
            let rgb = img.to_rgb8();
            let shape = Shape::new(rgb.width(), rgb.height(), 3);
            ImageSample::from_raw(shape, rgb.into_raw())
        }
    }
}
