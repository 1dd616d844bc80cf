//! Alpha compositing of image masks.
//!
//! A soft mask (`/SMask`) carries opacity directly: alpha is the mask's gray
//! value. An explicit mask (`/Mask` stream) is a stencil whose high values
//! mark the area that is *not* painted, so alpha is `255 - v`. A color-key
//! mask (`/Mask` array) makes pixels transparent whose raw components all
//! fall inside the given ranges.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbImage, RgbaImage};

/// Composite `mask` onto `image` as its alpha channel.
///
/// Without a mask the image is returned as RGB. A mask of a different size
/// is resampled to the image's size with bilinear filtering first.
pub fn apply_mask(image: &RgbImage, mask: Option<&DynamicImage>, is_soft: bool) -> DynamicImage {
    let Some(mask) = mask else {
        return DynamicImage::ImageRgb8(image.clone());
    };

    let (width, height) = image.dimensions();
    let mut gray = mask.to_luma8();
    if gray.dimensions() != (width, height) {
        log::debug!(
            "Resampling mask from {:?} to {}x{}",
            gray.dimensions(),
            width,
            height
        );
        gray = imageops::resize(&gray, width, height, FilterType::Triangle);
    }

    let composed = RgbaImage::from_fn(width, height, |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        let v = gray.get_pixel(x, y).0[0];
        let alpha = if is_soft { v } else { 255 - v };
        Rgba([r, g, b, alpha])
    });
    DynamicImage::ImageRgba8(composed)
}

/// Apply a color-key mask given the raw samples behind `image`.
///
/// `ranges` holds one inclusive `[min, max]` pair per component.
pub fn apply_color_key(
    image: &RgbImage,
    samples: &[u16],
    components: usize,
    ranges: &[[u32; 2]],
) -> DynamicImage {
    let keyed = |raw: &[u16]| {
        raw.iter()
            .zip(ranges)
            .all(|(&v, &[min, max])| (min..=max).contains(&(v as u32)))
    };

    let mut composed = RgbaImage::new(image.width(), image.height());
    for ((out, px), raw) in composed
        .pixels_mut()
        .zip(image.pixels())
        .zip(samples.chunks_exact(components.max(1)))
    {
        let [r, g, b] = px.0;
        let alpha = if keyed(raw) { 0 } else { 255 };
        *out = Rgba([r, g, b, alpha]);
    }
    DynamicImage::ImageRgba8(composed)
}
