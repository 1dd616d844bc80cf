//! Image XObjects: decoding samples to pixels and compositing masks.
//!
//! [`ImageXObject`] wraps an image stream. The resolved color space and the
//! composited pixels are computed once and cached for the lifetime of the
//! object; the caches are never invalidated, since the stream is immutable
//! after construction.
//!
//! The caches use [`OnceCell`], so an `ImageXObject` is not `Sync`. Share it
//! across threads by cloning or by decoding before handing the pixels over.

mod mask;
mod samples;

pub use mask::{apply_color_key, apply_mask};

use crate::color::ColorSpace;
use crate::config::DecodeOptions;
use crate::decoders::{decode_jpeg, decode_stream_with_options, DecodeParams, Filter};
use crate::error::{Error, Result};
use crate::object::{Object, ObjectRef, PdfStream};
use crate::writer::{Resource, ResourceKind};
use image::{DynamicImage, RgbImage};
use samples::SampleLayout;
use std::cell::OnceCell;

/// An image XObject.
#[derive(Debug, Clone)]
pub struct ImageXObject {
    stream: PdfStream,
    object_ref: Option<ObjectRef>,
    width: u32,
    height: u32,
    bits_per_component: u8,
    stencil: bool,
    interpolate: bool,
    decode_array: Option<Vec<f32>>,
    soft_mask: Option<Box<ImageXObject>>,
    mask: Option<Box<ImageXObject>>,
    color_key: Option<Vec<[u32; 2]>>,
    options: DecodeOptions,
    color_space: OnceCell<ColorSpace>,
    decoded: OnceCell<DynamicImage>,
}

impl ImageXObject {
    /// Read an image from its stream.
    ///
    /// `/SMask` and `/Mask` streams embedded directly are loaded as masks.
    /// Masks given as unresolved references are skipped with a warning;
    /// attach them with [`ImageXObject::with_soft_mask`] and
    /// [`ImageXObject::with_mask`] instead.
    pub fn from_stream(stream: PdfStream) -> Result<Self> {
        let width = positive_dimension(&stream, &["Width", "W"])?;
        let height = positive_dimension(&stream, &["Height", "H"])?;
        let stencil = stream
            .get_any(&["ImageMask", "IM"])
            .and_then(Object::as_bool)
            .unwrap_or(false);
        let bits_per_component = if stencil {
            1
        } else {
            stream
                .get_any(&["BitsPerComponent", "BPC"])
                .and_then(Object::as_integer)
                .unwrap_or(8)
                .clamp(1, 16) as u8
        };
        let interpolate = stream
            .get_any(&["Interpolate", "I"])
            .and_then(Object::as_bool)
            .unwrap_or(false);
        let decode_array = stream.get_any(&["Decode", "D"]).and_then(Object::as_array).map(|items| {
            items
                .iter()
                .filter_map(Object::as_number)
                .map(|v| v as f32)
                .collect::<Vec<_>>()
        });

        let soft_mask = match stream.get("SMask") {
            Some(object) => load_mask(object, "SMask")?,
            None => None,
        };
        let (mask, color_key) = match stream.get("Mask") {
            Some(Object::Array(items)) => (None, Some(color_key_ranges(items)?)),
            Some(object) => (load_mask(object, "Mask")?, None),
            None => (None, None),
        };

        Ok(Self {
            stream,
            object_ref: None,
            width,
            height,
            bits_per_component,
            stencil,
            interpolate,
            decode_array,
            soft_mask,
            mask,
            color_key,
            options: DecodeOptions::default(),
            color_space: OnceCell::new(),
            decoded: OnceCell::new(),
        })
    }

    /// Identify the image by its indirect object, used when binding it as a resource.
    pub fn with_object_ref(mut self, object_ref: ObjectRef) -> Self {
        self.object_ref = Some(object_ref);
        self
    }

    /// Attach a soft mask.
    pub fn with_soft_mask(mut self, soft_mask: ImageXObject) -> Self {
        self.soft_mask = Some(Box::new(soft_mask));
        self.decoded = OnceCell::new();
        self
    }

    /// Attach an explicit (stencil) mask.
    pub fn with_mask(mut self, mask: ImageXObject) -> Self {
        self.mask = Some(Box::new(mask));
        self.color_key = None;
        self.decoded = OnceCell::new();
        self
    }

    /// Limits used when decoding the stream filters and sizing the samples.
    pub fn with_decode_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Width in samples.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in samples.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bits per color component; always 1 for stencil masks.
    pub fn bits_per_component(&self) -> u8 {
        self.bits_per_component
    }

    /// Whether this is a stencil mask (`/ImageMask true`).
    pub fn is_stencil(&self) -> bool {
        self.stencil
    }

    /// Whether smoothing was requested (`/Interpolate`).
    pub fn interpolate(&self) -> bool {
        self.interpolate
    }

    /// The `/Decode` array, if present.
    pub fn decode_array(&self) -> Option<&[f32]> {
        self.decode_array.as_deref()
    }

    /// The indirect object this image was loaded from, if known.
    pub fn object_ref(&self) -> Option<ObjectRef> {
        self.object_ref
    }

    /// The `/Metadata` stream or reference, if present.
    pub fn metadata(&self) -> Option<&Object> {
        self.stream.get("Metadata")
    }

    /// The `/StructParent` key into the structural parent tree.
    pub fn struct_parent(&self) -> Option<i64> {
        self.stream.get("StructParent").and_then(Object::as_integer)
    }

    /// The underlying stream.
    pub fn stream(&self) -> &PdfStream {
        &self.stream
    }

    /// Filter names applied to the stream.
    pub fn filters(&self) -> Vec<String> {
        self.stream.filters()
    }

    /// The soft mask (`/SMask`).
    pub fn soft_mask(&self) -> Option<&ImageXObject> {
        self.soft_mask.as_deref()
    }

    /// The explicit stencil mask (`/Mask` stream).
    pub fn mask(&self) -> Option<&ImageXObject> {
        self.mask.as_deref()
    }

    /// The color-key ranges (`/Mask` array), one `[min, max]` per component.
    pub fn color_key_mask(&self) -> Option<&[[u32; 2]]> {
        self.color_key.as_deref()
    }

    /// The image's color space.
    ///
    /// Stencil masks without an explicit space are DeviceGray.
    pub fn color_space(&self) -> Result<&ColorSpace> {
        if let Some(cs) = self.color_space.get() {
            return Ok(cs);
        }
        let cs = match self.stream.get_any(&["ColorSpace", "CS"]) {
            Some(object) => ColorSpace::from_object(object)?,
            None if self.stencil => ColorSpace::DeviceGray,
            None => return Err(Error::Format("color space undetermined".to_string())),
        };
        Ok(self.color_space.get_or_init(|| cs))
    }

    /// File suffix matching the stream's encoding.
    ///
    /// `None` (with a warning) when the filter chain has no natural file format.
    pub fn suffix(&self) -> Option<&'static str> {
        let filters = self.filters();
        let has = |names: &[&str]| filters.iter().any(|f| names.contains(&f.as_str()));

        if has(&["DCTDecode", "DCT"]) {
            Some("jpg")
        } else if has(&["JPXDecode"]) {
            Some("jpx")
        } else if has(&["CCITTFaxDecode", "CCF"]) {
            Some("tiff")
        } else if filters.is_empty()
            || has(&["FlateDecode", "Fl", "LZWDecode", "LZW", "RunLengthDecode", "RL"])
        {
            Some("png")
        } else {
            log::warn!("No file suffix for image filters {:?}", filters);
            None
        }
    }

    /// Pixels with any mask composited as alpha.
    ///
    /// A soft mask takes precedence over an explicit mask, which takes
    /// precedence over a color key. Unmasked images come back as RGB.
    pub fn decode(&self) -> Result<&DynamicImage> {
        if let Some(image) = self.decoded.get() {
            return Ok(image);
        }

        let image = if let Some(soft_mask) = &self.soft_mask {
            log::debug!("Compositing soft mask onto {}x{} image", self.width, self.height);
            apply_mask(&self.opaque_image()?, Some(&soft_mask.opaque_dynamic()?), true)
        } else if let Some(mask) = &self.mask {
            log::debug!("Compositing stencil mask onto {}x{} image", self.width, self.height);
            apply_mask(&self.opaque_image()?, Some(&mask.opaque_dynamic()?), false)
        } else if let Some(ranges) = &self.color_key {
            self.apply_color_key(ranges)?
        } else {
            DynamicImage::ImageRgb8(self.opaque_image()?)
        };

        Ok(self.decoded.get_or_init(|| image))
    }

    /// Pixels converted to RGB without applying any mask.
    pub fn opaque_image(&self) -> Result<RgbImage> {
        if self.is_jpeg() {
            return Ok(self.decode_jpeg()?.to_rgb8());
        }
        let (samples, layout) = self.raw_samples()?;
        samples::to_rgb(&samples, &layout, self.color_space()?, &self.decode_ranges()?)
    }

    fn opaque_dynamic(&self) -> Result<DynamicImage> {
        self.opaque_image().map(DynamicImage::ImageRgb8)
    }

    fn apply_color_key(&self, ranges: &[[u32; 2]]) -> Result<DynamicImage> {
        if self.is_jpeg() {
            log::warn!("Color key mask ignored on a DCT encoded image");
            return self.opaque_dynamic();
        }
        let (samples, layout) = self.raw_samples()?;
        let rgb = samples::to_rgb(&samples, &layout, self.color_space()?, &self.decode_ranges()?)?;
        Ok(apply_color_key(&rgb, &samples, layout.components, ranges))
    }

    fn is_jpeg(&self) -> bool {
        self.filters()
            .last()
            .is_some_and(|f| Filter::from_name(f) == Some(Filter::DCTDecode))
    }

    /// Data with every filter removed, except a trailing DCTDecode.
    fn filtered_data(&self, skip_last: bool) -> Result<Vec<u8>> {
        let mut filters = self.filters();
        if skip_last {
            filters.pop();
        }
        let params = self.decode_params();
        decode_stream_with_options(&self.stream.data, &filters, params.as_ref(), &self.options)
    }

    fn decode_jpeg(&self) -> Result<DynamicImage> {
        let data = self.filtered_data(true)?;
        decode_jpeg(&data)
    }

    fn raw_samples(&self) -> Result<(Vec<u16>, SampleLayout)> {
        let cs = self.color_space()?;
        let layout = SampleLayout {
            width: self.width,
            height: self.height,
            components: cs.components().max(1),
            bits_per_component: self.bits_per_component,
        };
        log::debug!(
            "Decoding {}x{} {} image, {} bpc",
            self.width,
            self.height,
            cs.name(),
            self.bits_per_component
        );
        layout.check_size(&self.options)?;
        let data = self.filtered_data(false)?;
        Ok((samples::unpack(&data, &layout, &self.options)?, layout))
    }

    /// `/DecodeParms` for the Flate or LZW filter in the chain.
    fn decode_params(&self) -> Option<DecodeParams> {
        match self.stream.get_any(&["DecodeParms", "DP"])? {
            Object::Array(items) => items
                .iter()
                .find(|item| item.as_dict().is_some())
                .map(DecodeParams::from_object),
            object @ Object::Dictionary(_) => Some(DecodeParams::from_object(object)),
            _ => None,
        }
    }

    /// One `(min, max)` pair per component.
    fn decode_ranges(&self) -> Result<Vec<(f32, f32)>> {
        let cs = self.color_space()?;
        let components = cs.components().max(1);
        match &self.decode_array {
            Some(values) if values.len() == components * 2 => {
                Ok(values.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect())
            },
            Some(values) => {
                log::warn!(
                    "Ignoring /Decode with {} values for {} components",
                    values.len(),
                    components
                );
                Ok(vec![cs.default_decode(self.bits_per_component); components])
            },
            None => Ok(vec![cs.default_decode(self.bits_per_component); components]),
        }
    }
}

impl Resource for ImageXObject {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Image
    }

    fn resource_object(&self) -> Object {
        match self.object_ref {
            Some(object_ref) => Object::Reference(object_ref),
            None => self.stream.clone().into_object(),
        }
    }
}

fn positive_dimension(stream: &PdfStream, keys: &[&str]) -> Result<u32> {
    let value = stream
        .get_any(keys)
        .and_then(Object::as_integer)
        .ok_or_else(|| Error::Format(format!("image without /{}", keys[0])))?;
    u32::try_from(value)
        .ok()
        .filter(|&v| v > 0)
        .ok_or_else(|| Error::Format(format!("invalid image /{}: {}", keys[0], value)))
}

fn load_mask(object: &Object, key: &str) -> Result<Option<Box<ImageXObject>>> {
    match object {
        Object::Stream { .. } => match PdfStream::from_object(object) {
            Some(stream) => Ok(Some(Box::new(ImageXObject::from_stream(stream)?))),
            None => Ok(None),
        },
        Object::Reference(r) => {
            log::warn!("/{} {} is an unresolved reference; mask skipped", key, r);
            Ok(None)
        },
        Object::Null => Ok(None),
        other => Err(Error::Format(format!("invalid /{}: {}", key, other.type_name()))),
    }
}

fn color_key_ranges(items: &[Object]) -> Result<Vec<[u32; 2]>> {
    let values = items
        .iter()
        .map(|item| {
            item.as_integer()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| Error::Format("color key mask entries must be non-negative integers".to_string()))
        })
        .collect::<Result<Vec<_>>>()?;
    if values.len() % 2 != 0 {
        return Err(Error::Format(format!(
            "color key mask needs min/max pairs, got {} values",
            values.len()
        )));
    }
    Ok(values.chunks_exact(2).map(|pair| [pair[0], pair[1]]).collect())
}
