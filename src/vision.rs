//! Image decoding and data-URL encoding for vision input.

use crate::error::{DishscoutError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::DynamicImage;
use std::io::Cursor;

/// Decode uploaded image bytes and re-encode them as a PNG data URL.
///
/// Accepts any container the `image` crate understands (JPEG, PNG, WebP, ...).
/// The bitmap is converted to RGB before re-encoding so downstream behavior
/// does not depend on the source color model.
pub fn encode_image(bytes: &[u8]) -> Result<String> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| DishscoutError::Image(e.to_string()))?;
    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());

    let mut png = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| DishscoutError::Image(e.to_string()))?;

    Ok(format!("data:image/png;base64,{}", BASE64.encode(&png)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn tiny_png() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_encode_valid_image() {
        let url = encode_image(&tiny_png()).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert!(url.len() > "data:image/png;base64,".len());
    }

    #[test]
    fn test_encode_invalid_bytes() {
        let err = encode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, DishscoutError::Image(_)));
    }
}
