//! DCTDecode (JPEG) implementation.
//!
//! JPEG data is decoded with the `image` crate. Grayscale JPEGs produce one
//! byte per pixel; everything else is converted to 8-bit RGB.

use crate::decoders::StreamDecoder;
use crate::error::Result;
use image::{DynamicImage, ImageFormat};

/// DCTDecode filter implementation.
pub struct DctDecoder;

impl StreamDecoder for DctDecoder {
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let samples = match decode_jpeg(input)? {
            DynamicImage::ImageLuma8(gray) => gray.into_raw(),
            other => other.to_rgb8().into_raw(),
        };
        Ok(samples)
    }

    fn name(&self) -> &str {
        "DCTDecode"
    }
}

/// Decode a JPEG into an image buffer.
pub fn decode_jpeg(input: &[u8]) -> Result<DynamicImage> {
    let image = image::load_from_memory_with_format(input, ImageFormat::Jpeg)?;
    log::trace!("Decoded JPEG {}x{} {:?}", image.width(), image.height(), image.color());
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    fn jpeg_fixture() -> Vec<u8> {
        let image = RgbImage::from_pixel(8, 8, Rgb([200, 40, 40]));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Jpeg).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_decode_to_rgb_samples() {
        let samples = DctDecoder.decode(&jpeg_fixture()).unwrap();
        assert_eq!(samples.len(), 8 * 8 * 3);
        // lossy, but a flat color stays close
        assert!((samples[0] as i32 - 200).abs() < 8);
    }

    #[test]
    fn test_not_a_jpeg() {
        let result = DctDecoder.decode(b"\x89PNG");
        assert!(matches!(result, Err(crate::error::Error::Image(_))));
    }

    #[test]
    fn test_decoder_name() {
        assert_eq!(DctDecoder.name(), "DCTDecode");
    }
}
