//! Image normalization
//!
//! Every image entering the system (user upload or camera frame) is decoded,
//! downscaled, and re-encoded as JPEG before it reaches the object store.
//! Undecodable input is rejected as a validation error before any side
//! effect.

use std::io::Cursor;

use crate::utils::AppError;

/// Longest edge after downscaling
const MAX_IMAGE_DIM: u32 = 1024;

/// JPEG quality (keeps scene detail legible for the classifier while
/// controlling file size)
const JPEG_QUALITY: u8 = 85;

/// Decode, downscale, and re-encode an image as JPEG
pub fn normalize_jpeg(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image: {}", e)))?;

    let img = if img.width().max(img.height()) > MAX_IMAGE_DIM {
        img.resize(MAX_IMAGE_DIM, MAX_IMAGE_DIM, image::imageops::FilterType::Lanczos3)
    } else {
        img
    };

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(|e| AppError::internal(format!("Failed to encode image: {}", e)))?;
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_garbage_bytes() {
        assert!(normalize_jpeg(b"definitely not an image").is_err());
    }

    #[test]
    fn re_encodes_valid_png() {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(8, 8));
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let jpeg = normalize_jpeg(&png).expect("normalization failed");
        assert!(!jpeg.is_empty());
        let round = image::load_from_memory(&jpeg).expect("output not decodable");
        assert_eq!(round.width(), 8);
    }
}
