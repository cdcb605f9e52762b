//! Receipt image preprocessing.
//!
//! Uploaded photos are sniffed, decoded and bounded in size before they are
//! handed to the vision model. The output is always a JPEG.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use tracing::{debug, info};

use crate::config::ImageConfig;
use crate::error::{EngineError, EngineResult};

/// Formats accepted from uploads.
pub const SUPPORTED_FORMATS: [ImageFormat; 3] =
    [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::WebP];

/// An image ready for the vision model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedImage {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`.
    pub media_type: &'static str,
    /// Width in pixels after downscaling.
    pub width: u32,
    /// Height in pixels after downscaling.
    pub height: u32,
}

fn load_error(message: impl Into<String>) -> EngineError {
    EngineError::ImageLoadError {
        message: message.into(),
    }
}

/// Validates, decodes and downscales an uploaded receipt image.
///
/// # Errors
///
/// Returns [`EngineError::ImageLoadError`] if the upload is empty, larger
/// than `limits.max_bytes`, not a PNG/JPEG/WebP image, or fails to decode.
pub fn preprocess_image(bytes: &[u8], limits: &ImageConfig) -> EngineResult<PreparedImage> {
    if bytes.is_empty() {
        return Err(load_error("image is empty"));
    }
    if bytes.len() > limits.max_bytes {
        return Err(load_error(format!(
            "image is {} bytes, limit is {} bytes",
            bytes.len(),
            limits.max_bytes
        )));
    }

    let format = image::guess_format(bytes)
        .map_err(|e| load_error(format!("unrecognised image format: {}", e)))?;
    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(load_error(format!("unsupported image format: {:?}", format)));
    }

    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| load_error(format!("failed to decode {:?} image: {}", format, e)))?;
    let (original_width, original_height) = (decoded.width(), decoded.height());

    let bounded = if original_width.max(original_height) > limits.max_dimension {
        debug!(
            original_width,
            original_height,
            max_dimension = limits.max_dimension,
            "Downscaling receipt image"
        );
        decoded.resize(limits.max_dimension, limits.max_dimension, FilterType::Triangle)
    } else {
        decoded
    };

    let rgb = DynamicImage::ImageRgb8(bounded.to_rgb8());
    let mut encoded = Cursor::new(Vec::new());
    rgb.write_to(&mut encoded, ImageFormat::Jpeg)
        .map_err(|e| load_error(format!("failed to encode image: {}", e)))?;

    let prepared = PreparedImage {
        bytes: encoded.into_inner(),
        media_type: "image/jpeg",
        width: rgb.width(),
        height: rgb.height(),
    };

    info!(
        source_format = ?format,
        source_bytes = bytes.len(),
        prepared_bytes = prepared.bytes.len(),
        width = prepared.width,
        height = prepared.height,
        "Prepared receipt image"
    );

    Ok(prepared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([240, 240, 235]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, format)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_small_png_is_reencoded_as_jpeg() {
        let png = encode(40, 60, ImageFormat::Png);
        let prepared = preprocess_image(&png, &ImageConfig::default()).unwrap();
        assert_eq!(prepared.media_type, "image/jpeg");
        assert_eq!((prepared.width, prepared.height), (40, 60));
        assert_eq!(
            image::guess_format(&prepared.bytes).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_large_image_is_downscaled_preserving_aspect() {
        let png = encode(300, 100, ImageFormat::Png);
        let limits = ImageConfig {
            max_bytes: 10 * 1024 * 1024,
            max_dimension: 150,
        };
        let prepared = preprocess_image(&png, &limits).unwrap();
        assert_eq!((prepared.width, prepared.height), (150, 50));
    }

    #[test]
    fn test_empty_upload_rejected() {
        let result = preprocess_image(&[], &ImageConfig::default());
        assert!(matches!(result, Err(EngineError::ImageLoadError { .. })));
    }

    #[test]
    fn test_oversized_upload_rejected() {
        let png = encode(20, 20, ImageFormat::Png);
        let limits = ImageConfig {
            max_bytes: 8,
            max_dimension: 2048,
        };
        match preprocess_image(&png, &limits) {
            Err(EngineError::ImageLoadError { message }) => assert!(message.contains("limit")),
            other => panic!("expected ImageLoadError, got {other:?}"),
        }
    }

    #[test]
    fn test_unrecognised_bytes_rejected() {
        let result = preprocess_image(b"definitely not an image", &ImageConfig::default());
        assert!(matches!(result, Err(EngineError::ImageLoadError { .. })));
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let gif_header = b"GIF89a\x01\x00\x01\x00\x00\x00\x00";
        match preprocess_image(gif_header, &ImageConfig::default()) {
            Err(EngineError::ImageLoadError { message }) => {
                assert!(message.contains("unsupported"))
            }
            other => panic!("expected ImageLoadError, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_png_fails_to_decode() {
        let png = encode(20, 20, ImageFormat::Png);
        let truncated = &png[..png.len() / 2];
        match preprocess_image(truncated, &ImageConfig::default()) {
            Err(EngineError::ImageLoadError { message }) => assert!(message.contains("decode")),
            other => panic!("expected ImageLoadError, got {other:?}"),
        }
    }
}
