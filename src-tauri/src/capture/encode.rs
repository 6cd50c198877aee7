//! PNG encoding for shipping captures to the webview.
//!
//! Pure functions: pixels in, bytes out.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

/// Encodes an RGBA image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, EncodeError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(EncodeError::ZeroDimension);
    }

    let mut png_bytes: Vec<u8> = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(png_bytes)
}

/// Encodes an RGBA image as a base64 PNG, ready for a `data:` URL.
pub fn encode_png_base64(image: &RgbaImage) -> Result<String, EncodeError> {
    let start = std::time::Instant::now();
    let png_bytes = encode_png(image)?;
    let encoded = STANDARD.encode(&png_bytes);

    log::info!(
        "[CAPTURE] PNG encoded in {}ms ({} bytes)",
        start.elapsed().as_millis(),
        png_bytes.len()
    );

    Ok(encoded)
}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Image has zero width or height")]
    ZeroDimension,

    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_png_magic() {
        let img = RgbaImage::new(16, 8);
        let bytes = encode_png(&img).unwrap();
        assert_eq!(&bytes[..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn zero_dimension_fails() {
        let img = RgbaImage::new(0, 10);
        assert!(matches!(encode_png(&img), Err(EncodeError::ZeroDimension)));
    }

    #[test]
    fn base64_decodes_back_to_same_pixels() {
        let mut img = RgbaImage::new(4, 4);
        img.put_pixel(1, 2, image::Rgba([10, 20, 30, 255]));
        let encoded = encode_png_base64(&img).unwrap();
        let bytes = STANDARD.decode(encoded).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, img);
    }
}
