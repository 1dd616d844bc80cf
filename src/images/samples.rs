//! Sample unpacking and color conversion to 8-bit RGB.

use crate::color::ColorSpace;
use crate::config::DecodeOptions;
use crate::error::{Error, Result};
use image::{Rgb, RgbImage};

/// Layout of the sample data of one image.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SampleLayout {
    pub width: u32,
    pub height: u32,
    pub components: usize,
    pub bits_per_component: u8,
}

impl SampleLayout {
    /// Bytes per row; rows start on byte boundaries.
    pub fn row_bytes(&self) -> Result<usize> {
        self.samples_per_row()?
            .checked_mul(self.bits_per_component as usize)
            .map(|bits| bits.div_ceil(8))
            .ok_or_else(|| self.too_large())
    }

    /// Bytes needed for the whole image.
    pub fn total_bytes(&self) -> Result<usize> {
        self.row_bytes()?
            .checked_mul(self.height as usize)
            .ok_or_else(|| self.too_large())
    }

    fn samples_per_row(&self) -> Result<usize> {
        (self.width as usize)
            .checked_mul(self.components)
            .ok_or_else(|| self.too_large())
    }

    /// Reject layouts whose buffers cannot be allocated or exceed the size
    /// limit in `options`. Returns the packed size in bytes.
    pub fn check_size(&self, options: &DecodeOptions) -> Result<usize> {
        let packed = self.total_bytes()?;
        let pixels = (self.width as usize).checked_mul(self.height as usize);
        let samples = pixels.and_then(|p| p.checked_mul(self.components));
        let unpacked = samples.and_then(|s| s.checked_mul(2));
        let rgb = pixels.and_then(|p| p.checked_mul(4));
        match unpacked.zip(rgb) {
            Some((unpacked, rgb)) if unpacked.max(rgb) <= isize::MAX as usize => {},
            _ => return Err(self.too_large()),
        }

        let max_size = options.max_decompressed_size;
        if max_size > 0 && packed > max_size {
            return Err(Error::Decode(format!(
                "Decompression bomb detected: {}x{} image needs {} bytes, limit is {} bytes",
                self.width, self.height, packed, max_size
            )));
        }
        Ok(packed)
    }

    fn too_large(&self) -> Error {
        Error::Format(format!(
            "image of {}x{} with {} components at {} bpc is too large",
            self.width, self.height, self.components, self.bits_per_component
        ))
    }

    /// Largest raw sample value.
    pub fn max_value(&self) -> u32 {
        (1u32 << self.bits_per_component) - 1
    }
}

/// Split packed sample data into one value per component.
///
/// Short data is zero-padded with a warning; extra data is ignored. The
/// padded size is held to the size limit in `options`.
pub(crate) fn unpack(data: &[u8], layout: &SampleLayout, options: &DecodeOptions) -> Result<Vec<u16>> {
    let bpc = layout.bits_per_component;
    if !matches!(bpc, 1 | 2 | 4 | 8 | 16) {
        return Err(Error::Format(format!("unsupported bits per component: {}", bpc)));
    }

    let expected = layout.check_size(options)?;
    let row_bytes = layout.row_bytes()?;
    let padded;
    let data = if data.len() < expected {
        log::warn!(
            "Image data is short: {} of {} bytes, padding with zeros",
            data.len(),
            expected
        );
        let mut buf = data.to_vec();
        buf.resize(expected, 0);
        padded = buf;
        &padded[..]
    } else {
        &data[..expected]
    };

    let per_row = layout.samples_per_row()?;
    let mut samples = Vec::with_capacity(per_row * layout.height as usize);
    for row in data.chunks_exact(row_bytes.max(1)) {
        match bpc {
            8 => samples.extend(row[..per_row].iter().map(|&b| b as u16)),
            16 => samples.extend(
                row.chunks_exact(2)
                    .take(per_row)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]])),
            ),
            _ => {
                let per_byte = 8 / bpc as usize;
                let mask = (1u16 << bpc) - 1;
                samples.extend((0..per_row).map(|i| {
                    let byte = row[i / per_byte] as u16;
                    let shift = 8 - bpc as usize * (i % per_byte + 1);
                    (byte >> shift) & mask
                }));
            },
        }
    }
    Ok(samples)
}

/// Convert raw samples to RGB through `cs` and the decode ranges.
///
/// `decode` holds one `(min, max)` pair per component.
pub(crate) fn to_rgb(
    samples: &[u16],
    layout: &SampleLayout,
    cs: &ColorSpace,
    decode: &[(f32, f32)],
) -> Result<RgbImage> {
    if let ColorSpace::Pattern { .. } = cs {
        return Err(Error::Format("Pattern color space cannot be used for image samples".to_string()));
    }

    let components = layout.components;
    let max = layout.max_value() as f32;
    let mut image = RgbImage::new(layout.width, layout.height);
    let mut values = vec![0f32; components];

    for (pixel, raw) in image.pixels_mut().zip(samples.chunks_exact(components)) {
        for ((value, &sample), &(dmin, dmax)) in values.iter_mut().zip(raw).zip(decode) {
            *value = dmin + sample as f32 * (dmax - dmin) / max;
        }
        *pixel = Rgb(color_to_rgb(cs, &values)?);
    }
    Ok(image)
}

/// Convert one color, components already mapped through the decode array.
pub(crate) fn color_to_rgb(cs: &ColorSpace, values: &[f32]) -> Result<[u8; 3]> {
    let component = |i: usize| values.get(i).copied().unwrap_or(0.0).clamp(0.0, 1.0);
    let rgb = match cs {
        ColorSpace::DeviceGray => {
            let g = component(0);
            [g, g, g]
        },
        ColorSpace::DeviceRgb => [component(0), component(1), component(2)],
        ColorSpace::DeviceCmyk => {
            let (r, g, b) = cmyk_to_rgb(component(0), component(1), component(2), component(3));
            [r, g, b]
        },
        ColorSpace::Indexed { base, hival, lookup } => {
            let index = values.first().copied().unwrap_or(0.0).round().clamp(0.0, *hival as f32)
                as usize;
            let n = base.components();
            let entry = lookup.get(index * n..(index + 1) * n).ok_or_else(|| {
                Error::Format(format!("Indexed lookup table has no entry {}", index))
            })?;
            let base_values: Vec<f32> = entry.iter().map(|&b| b as f32 / 255.0).collect();
            return color_to_rgb(base, &base_values);
        },
        ColorSpace::IccBased {
            components,
            alternate,
            ..
        } => {
            return match alternate {
                Some(alternate) => color_to_rgb(alternate, values),
                None => color_to_rgb(&device_space_for(*components)?, values),
            };
        },
        ColorSpace::Separation { .. } => {
            let gray = 1.0 - component(0);
            [gray, gray, gray]
        },
        ColorSpace::DeviceN { names, .. } => {
            let tint = (0..names.len()).map(component).sum::<f32>() / names.len().max(1) as f32;
            let gray = 1.0 - tint;
            [gray, gray, gray]
        },
        ColorSpace::Pattern { .. } => {
            return Err(Error::Format("Pattern color space has no color values".to_string()))
        },
    };
    Ok(rgb.map(|c| (c * 255.0).round() as u8))
}

/// Device space matching an ICC profile's component count.
fn device_space_for(components: u8) -> Result<ColorSpace> {
    match components {
        1 => Ok(ColorSpace::DeviceGray),
        3 => Ok(ColorSpace::DeviceRgb),
        4 => Ok(ColorSpace::DeviceCmyk),
        n => Err(Error::Format(format!("ICCBased profile with {} components", n))),
    }
}

fn cmyk_to_rgb(c: f32, m: f32, y: f32, k: f32) -> (f32, f32, f32) {
    let r = (1.0 - c) * (1.0 - k);
    let g = (1.0 - m) * (1.0 - k);
    let b = (1.0 - y) * (1.0 - k);
    (r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(width: u32, height: u32, components: usize, bpc: u8) -> SampleLayout {
        SampleLayout {
            width,
            height,
            components,
            bits_per_component: bpc,
        }
    }

    fn limits() -> DecodeOptions {
        DecodeOptions::default()
    }

    #[test]
    fn test_unpack_one_bit_rows_are_byte_aligned() {
        // 3 pixels per row, two rows: 101 / 010
        let data = [0b1010_0000, 0b0100_0000];
        let samples = unpack(&data, &layout(3, 2, 1, 1), &limits()).unwrap();
        assert_eq!(samples, vec![1, 0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_unpack_four_bit() {
        let samples = unpack(&[0xAB, 0xC0], &layout(3, 1, 1, 4), &limits()).unwrap();
        assert_eq!(samples, vec![0xA, 0xB, 0xC]);
    }

    #[test]
    fn test_unpack_sixteen_bit() {
        let samples = unpack(&[0x01, 0x02, 0xFF, 0xFF], &layout(2, 1, 1, 16), &limits()).unwrap();
        assert_eq!(samples, vec![0x0102, 0xFFFF]);
    }

    #[test]
    fn test_unpack_short_data_is_padded() {
        let samples = unpack(&[7], &layout(2, 2, 1, 8), &limits()).unwrap();
        assert_eq!(samples, vec![7, 0, 0, 0]);
    }

    #[test]
    fn test_overflowing_layout_is_an_error() {
        let huge = layout(u32::MAX, u32::MAX, 4, 16);
        assert!(matches!(huge.total_bytes(), Err(Error::Format(_))));
        assert!(matches!(unpack(&[], &huge, &DecodeOptions::unlimited()), Err(Error::Format(_))));
    }

    #[test]
    fn test_padding_respects_size_limit() {
        let options = DecodeOptions::default().with_max_size(1024);
        let result = unpack(&[1], &layout(1000, 1000, 3, 8), &options);
        assert!(matches!(result, Err(Error::Decode(_))));
        // within the limit short data is still padded
        assert_eq!(unpack(&[1], &layout(4, 4, 3, 8), &options).unwrap().len(), 48);
    }

    #[test]
    fn test_unpack_rejects_odd_depth() {
        assert!(matches!(unpack(&[0], &layout(1, 1, 1, 3), &limits()), Err(Error::Format(_))));
    }

    #[test]
    fn test_cmyk_conversion() {
        assert_eq!(color_to_rgb(&ColorSpace::DeviceCmyk, &[0.0, 0.0, 0.0, 0.0]).unwrap(), [255, 255, 255]);
        assert_eq!(color_to_rgb(&ColorSpace::DeviceCmyk, &[0.0, 0.0, 0.0, 1.0]).unwrap(), [0, 0, 0]);
        assert_eq!(color_to_rgb(&ColorSpace::DeviceCmyk, &[1.0, 0.0, 0.0, 0.0]).unwrap(), [0, 255, 255]);
    }

    #[test]
    fn test_indexed_conversion() {
        let cs = ColorSpace::Indexed {
            base: Box::new(ColorSpace::DeviceRgb),
            hival: 1,
            lookup: vec![255, 0, 0, 0, 0, 255],
        };
        assert_eq!(color_to_rgb(&cs, &[1.0]).unwrap(), [0, 0, 255]);
        // out-of-range indices clamp to hival
        assert_eq!(color_to_rgb(&cs, &[9.0]).unwrap(), [0, 0, 255]);
    }

    #[test]
    fn test_icc_without_alternate_uses_component_count() {
        let cs = ColorSpace::IccBased {
            components: 1,
            alternate: None,
            profile: None,
        };
        assert_eq!(color_to_rgb(&cs, &[0.5]).unwrap(), [128, 128, 128]);
    }

    #[test]
    fn test_separation_is_subtractive_gray() {
        let cs = ColorSpace::Separation {
            name: "Spot".to_string(),
            alternate: Box::new(ColorSpace::DeviceCmyk),
            tint_transform: crate::object::Object::Null,
        };
        assert_eq!(color_to_rgb(&cs, &[1.0]).unwrap(), [0, 0, 0]);
        assert_eq!(color_to_rgb(&cs, &[0.0]).unwrap(), [255, 255, 255]);
    }

    #[test]
    fn test_to_rgb_with_decode_inversion() {
        let samples = [0u16, 255];
        let image = to_rgb(&samples, &layout(2, 1, 1, 8), &ColorSpace::DeviceGray, &[(1.0, 0.0)])
            .unwrap();
        assert_eq!(image.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(image.get_pixel(1, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_pattern_rejected() {
        let cs = ColorSpace::Pattern { underlying: None };
        assert!(to_rgb(&[0], &layout(1, 1, 1, 8), &cs, &[(0.0, 1.0)]).is_err());
    }
}
