//! Color spaces and colors.
//!
//! [`ColorSpace`] covers the families a content stream can select and an
//! image can declare. DeviceGray and DeviceRGB are referenced by their
//! predefined names; every other space is bound through the page's
//! resource dictionary when selected with `CS`/`cs`.

use crate::error::{Error, Result};
use crate::object::{Object, ObjectRef};
use crate::writer::resources::{Resource, ResourceKind};

/// A PDF color space.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSpace {
    /// Single gray component
    DeviceGray,
    /// Red, green and blue components
    DeviceRgb,
    /// Cyan, magenta, yellow and black components
    DeviceCmyk,
    /// Palette lookup into a base space
    Indexed {
        /// Space the palette entries are expressed in
        base: Box<ColorSpace>,
        /// Highest valid index
        hival: u8,
        /// Palette bytes, `(hival + 1) * base.components()` long
        lookup: Vec<u8>,
    },
    /// ICC profile based space
    IccBased {
        /// Number of components (`/N`)
        components: u8,
        /// Alternate space used when the profile is not interpreted
        alternate: Option<Box<ColorSpace>>,
        /// Profile stream, when the profile lives in an indirect object
        profile: Option<ObjectRef>,
    },
    /// Single named colorant
    Separation {
        /// Colorant name
        name: String,
        /// Alternate space
        alternate: Box<ColorSpace>,
        /// Tint transform function
        tint_transform: Object,
    },
    /// Multiple named colorants
    DeviceN {
        /// Colorant names
        names: Vec<String>,
        /// Alternate space
        alternate: Box<ColorSpace>,
        /// Tint transform function
        tint_transform: Object,
    },
    /// Pattern space, optionally with an underlying space for uncolored patterns
    Pattern {
        /// Underlying space
        underlying: Option<Box<ColorSpace>>,
    },
}

impl ColorSpace {
    /// Family name as used in PDF (`DeviceRGB`, `Indexed`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRgb => "DeviceRGB",
            ColorSpace::DeviceCmyk => "DeviceCMYK",
            ColorSpace::Indexed { .. } => "Indexed",
            ColorSpace::IccBased { .. } => "ICCBased",
            ColorSpace::Separation { .. } => "Separation",
            ColorSpace::DeviceN { .. } => "DeviceN",
            ColorSpace::Pattern { .. } => "Pattern",
        }
    }

    /// Number of color components per sample.
    pub fn components(&self) -> usize {
        match self {
            ColorSpace::DeviceGray => 1,
            ColorSpace::DeviceRgb => 3,
            ColorSpace::DeviceCmyk => 4,
            ColorSpace::Indexed { .. } => 1,
            ColorSpace::IccBased { components, .. } => *components as usize,
            ColorSpace::Separation { .. } => 1,
            ColorSpace::DeviceN { names, .. } => names.len(),
            ColorSpace::Pattern { underlying } => {
                underlying.as_ref().map(|cs| cs.components()).unwrap_or(0)
            },
        }
    }

    /// Whether this space is referenced by a predefined name rather than
    /// through the resource dictionary.
    pub fn has_fixed_name(&self) -> bool {
        matches!(self, ColorSpace::DeviceGray | ColorSpace::DeviceRgb)
    }

    /// Default decode range for one component at the given bit depth.
    ///
    /// Indexed samples decode to palette indices, everything else to `0..=1`.
    pub fn default_decode(&self, bits_per_component: u8) -> (f32, f32) {
        match self {
            ColorSpace::Indexed { .. } => {
                let max = ((1u32 << bits_per_component.min(16)) - 1) as f32;
                (0.0, max)
            },
            _ => (0.0, 1.0),
        }
    }

    /// Object representation for a resource dictionary entry.
    pub fn to_object(&self) -> Object {
        match self {
            ColorSpace::DeviceGray | ColorSpace::DeviceRgb | ColorSpace::DeviceCmyk => {
                Object::name(self.name())
            },
            ColorSpace::Indexed {
                base,
                hival,
                lookup,
            } => Object::Array(vec![
                Object::name("Indexed"),
                base.to_object(),
                Object::Integer(*hival as i64),
                Object::String(lookup.clone()),
            ]),
            ColorSpace::IccBased {
                components,
                alternate,
                profile,
            } => {
                let stream = match profile {
                    Some(r) => Object::Reference(*r),
                    None => {
                        let mut dict = std::collections::HashMap::new();
                        dict.insert("N".to_string(), Object::Integer(*components as i64));
                        if let Some(alt) = alternate {
                            dict.insert("Alternate".to_string(), alt.to_object());
                        }
                        Object::Dictionary(dict)
                    },
                };
                Object::Array(vec![Object::name("ICCBased"), stream])
            },
            ColorSpace::Separation {
                name,
                alternate,
                tint_transform,
            } => Object::Array(vec![
                Object::name("Separation"),
                Object::name(name.clone()),
                alternate.to_object(),
                tint_transform.clone(),
            ]),
            ColorSpace::DeviceN {
                names,
                alternate,
                tint_transform,
            } => Object::Array(vec![
                Object::name("DeviceN"),
                Object::Array(names.iter().cloned().map(Object::Name).collect()),
                alternate.to_object(),
                tint_transform.clone(),
            ]),
            ColorSpace::Pattern { underlying } => match underlying {
                Some(cs) => Object::Array(vec![Object::name("Pattern"), cs.to_object()]),
                None => Object::name("Pattern"),
            },
        }
    }

    /// Build a color space from its object form (a name or an array).
    ///
    /// References inside the array must already be resolved; an unresolved
    /// reference fails with [`Error::Format`].
    pub fn from_object(object: &Object) -> Result<Self> {
        match object {
            Object::Name(name) => Self::from_name(name),
            Object::Array(items) => Self::from_array(items),
            Object::Reference(r) => Err(Error::Format(format!(
                "color space reference {} must be resolved first",
                r
            ))),
            other => Err(Error::Format(format!(
                "invalid color space object: {}",
                other.type_name()
            ))),
        }
    }

    fn from_name(name: &str) -> Result<Self> {
        match name {
            "DeviceGray" | "G" | "CalGray" => Ok(ColorSpace::DeviceGray),
            "DeviceRGB" | "RGB" | "CalRGB" => Ok(ColorSpace::DeviceRgb),
            "DeviceCMYK" | "CMYK" => Ok(ColorSpace::DeviceCmyk),
            "Pattern" => Ok(ColorSpace::Pattern { underlying: None }),
            other => Err(Error::Format(format!("unsupported color space: {}", other))),
        }
    }

    fn from_array(items: &[Object]) -> Result<Self> {
        let family = items
            .first()
            .and_then(Object::as_name)
            .ok_or_else(|| Error::Format("color space array without family name".to_string()))?;

        match family {
            "DeviceGray" | "DeviceRGB" | "DeviceCMYK" | "G" | "RGB" | "CMYK" | "Pattern"
                if items.len() == 1 =>
            {
                Self::from_name(family)
            },
            "CalGray" => Ok(ColorSpace::DeviceGray),
            "CalRGB" => Ok(ColorSpace::DeviceRgb),
            "Indexed" | "I" => {
                let base = Self::from_object(array_item(items, 1, family)?)?;
                let hival = array_item(items, 2, family)?
                    .as_integer()
                    .ok_or_else(|| Error::Format("Indexed hival is not an integer".to_string()))?
                    .clamp(0, 255) as u8;
                let lookup = match array_item(items, 3, family)? {
                    Object::String(bytes) => bytes.clone(),
                    Object::Stream { data, .. } => data.to_vec(),
                    other => {
                        return Err(Error::Format(format!(
                            "Indexed lookup must be a string or stream, found {}",
                            other.type_name()
                        )))
                    },
                };
                Ok(ColorSpace::Indexed {
                    base: Box::new(base),
                    hival,
                    lookup,
                })
            },
            "ICCBased" => match array_item(items, 1, family)? {
                stream @ (Object::Stream { .. } | Object::Dictionary(_)) => {
                    let dict = stream.as_dict().ok_or_else(|| {
                        Error::Format("ICCBased profile is not a stream".to_string())
                    })?;
                    let components = dict
                        .get("N")
                        .and_then(Object::as_integer)
                        .ok_or_else(|| Error::Format("ICCBased profile without /N".to_string()))?;
                    let alternate = match dict.get("Alternate") {
                        Some(alt) => Some(Box::new(Self::from_object(alt)?)),
                        None => None,
                    };
                    Ok(ColorSpace::IccBased {
                        components: components.clamp(1, 4) as u8,
                        alternate,
                        profile: None,
                    })
                },
                Object::Reference(r) => Err(Error::Format(format!(
                    "ICCBased profile reference {} must be resolved first",
                    r
                ))),
                other => Err(Error::Format(format!(
                    "invalid ICCBased profile: {}",
                    other.type_name()
                ))),
            },
            "Separation" => {
                let name = array_item(items, 1, family)?
                    .as_name()
                    .ok_or_else(|| Error::Format("Separation colorant is not a name".to_string()))?
                    .to_string();
                let alternate = Self::from_object(array_item(items, 2, family)?)?;
                Ok(ColorSpace::Separation {
                    name,
                    alternate: Box::new(alternate),
                    tint_transform: items.get(3).cloned().unwrap_or(Object::Null),
                })
            },
            "DeviceN" => {
                let names = array_item(items, 1, family)?
                    .as_array()
                    .ok_or_else(|| Error::Format("DeviceN names is not an array".to_string()))?
                    .iter()
                    .filter_map(|n| n.as_name().map(str::to_string))
                    .collect::<Vec<_>>();
                if names.is_empty() {
                    return Err(Error::Format("DeviceN without colorants".to_string()));
                }
                let alternate = Self::from_object(array_item(items, 2, family)?)?;
                Ok(ColorSpace::DeviceN {
                    names,
                    alternate: Box::new(alternate),
                    tint_transform: items.get(3).cloned().unwrap_or(Object::Null),
                })
            },
            "Pattern" => {
                let underlying = Self::from_object(array_item(items, 1, family)?)?;
                Ok(ColorSpace::Pattern {
                    underlying: Some(Box::new(underlying)),
                })
            },
            other => Err(Error::Format(format!("unsupported color space: {}", other))),
        }
    }
}

impl Resource for ColorSpace {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ColorSpace
    }

    fn resource_object(&self) -> Object {
        self.to_object()
    }
}

fn array_item<'a>(items: &'a [Object], index: usize, family: &str) -> Result<&'a Object> {
    items.get(index).ok_or_else(|| {
        Error::Format(format!("{} color space array is missing entry {}", family, index))
    })
}

/// A color value expressed in a specific color space.
#[derive(Debug, Clone, PartialEq)]
pub struct PdColor {
    components: Vec<f32>,
    color_space: ColorSpace,
}

impl PdColor {
    /// Create a color from raw components.
    pub fn new(components: Vec<f32>, color_space: ColorSpace) -> Self {
        Self {
            components,
            color_space,
        }
    }

    /// DeviceGray color.
    pub fn gray(value: f32) -> Self {
        Self::new(vec![value], ColorSpace::DeviceGray)
    }

    /// DeviceRGB color.
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(vec![r, g, b], ColorSpace::DeviceRgb)
    }

    /// DeviceCMYK color.
    pub fn cmyk(c: f32, m: f32, y: f32, k: f32) -> Self {
        Self::new(vec![c, m, y, k], ColorSpace::DeviceCmyk)
    }

    /// Component values.
    pub fn components(&self) -> &[f32] {
        &self.components
    }

    /// The space the components are expressed in.
    pub fn color_space(&self) -> &ColorSpace {
        &self.color_space
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_components() {
        assert_eq!(ColorSpace::DeviceGray.components(), 1);
        assert_eq!(ColorSpace::DeviceRgb.components(), 3);
        assert_eq!(ColorSpace::DeviceCmyk.components(), 4);
    }

    #[test]
    fn test_fixed_names() {
        assert!(ColorSpace::DeviceGray.has_fixed_name());
        assert!(ColorSpace::DeviceRgb.has_fixed_name());
        assert!(!ColorSpace::DeviceCmyk.has_fixed_name());
        assert!(!ColorSpace::Pattern { underlying: None }.has_fixed_name());
    }

    #[test]
    fn test_parse_device_names() {
        assert_eq!(
            ColorSpace::from_object(&Object::name("DeviceRGB")).unwrap(),
            ColorSpace::DeviceRgb
        );
        assert_eq!(ColorSpace::from_object(&Object::name("G")).unwrap(), ColorSpace::DeviceGray);
        assert!(ColorSpace::from_object(&Object::name("Lab")).is_err());
    }

    #[test]
    fn test_parse_indexed() {
        let object = Object::Array(vec![
            Object::name("Indexed"),
            Object::name("DeviceRGB"),
            Object::Integer(1),
            Object::String(vec![255, 0, 0, 0, 0, 255]),
        ]);
        let cs = ColorSpace::from_object(&object).unwrap();
        match &cs {
            ColorSpace::Indexed { base, hival, lookup } => {
                assert_eq!(**base, ColorSpace::DeviceRgb);
                assert_eq!(*hival, 1);
                assert_eq!(lookup.len(), 6);
            },
            other => panic!("expected Indexed, got {:?}", other),
        }
        assert_eq!(cs.components(), 1);
        assert_eq!(cs.default_decode(4), (0.0, 15.0));
        assert_eq!(cs.to_object(), object);
    }

    #[test]
    fn test_parse_icc_inline_profile() {
        let mut dict = std::collections::HashMap::new();
        dict.insert("N".to_string(), Object::Integer(4));
        let object = Object::Array(vec![
            Object::name("ICCBased"),
            Object::Stream {
                dict,
                data: bytes::Bytes::new(),
            },
        ]);
        let cs = ColorSpace::from_object(&object).unwrap();
        assert_eq!(cs.components(), 4);
        assert_eq!(cs.name(), "ICCBased");
    }

    #[test]
    fn test_unresolved_reference_rejected() {
        let object = Object::Array(vec![
            Object::name("ICCBased"),
            Object::Reference(ObjectRef::new(7, 0)),
        ]);
        let err = ColorSpace::from_object(&object).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn test_parse_separation() {
        let object = Object::Array(vec![
            Object::name("Separation"),
            Object::name("Spot"),
            Object::name("DeviceCMYK"),
            Object::Reference(ObjectRef::new(9, 0)),
        ]);
        let cs = ColorSpace::from_object(&object).unwrap();
        assert_eq!(cs.name(), "Separation");
        assert_eq!(cs.components(), 1);
    }

    #[test]
    fn test_color_constructors() {
        let color = PdColor::rgb(1.0, 0.5, 0.0);
        assert_eq!(color.components(), &[1.0, 0.5, 0.0]);
        assert_eq!(color.color_space(), &ColorSpace::DeviceRgb);
        assert_eq!(PdColor::cmyk(0.0, 0.0, 0.0, 1.0).components().len(), 4);
    }
}
