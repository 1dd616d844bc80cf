//! Fonts as seen by the content stream encoder.

use super::encoding::FontEncoding;
use crate::error::Result;
use crate::object::{Object, ObjectRef};
use crate::writer::resources::{Resource, ResourceKind};

/// A font that has been (or will be) written to the document as an indirect object.
///
/// Identity is the object reference: two `Font` values with the same
/// reference are the same resource, whatever their other fields say.
#[derive(Debug, Clone)]
pub struct Font {
    object_ref: ObjectRef,
    base_font: String,
    encoding: FontEncoding,
    will_be_subset: bool,
}

impl Font {
    /// Create a font backed by the indirect object `object_ref`.
    pub fn new(object_ref: ObjectRef, base_font: impl Into<String>, encoding: FontEncoding) -> Self {
        Self {
            object_ref,
            base_font: base_font.into(),
            encoding,
            will_be_subset: false,
        }
    }

    /// Mark the font as embedded-with-subsetting, so used code points get collected.
    pub fn with_subsetting(mut self, subset: bool) -> Self {
        self.will_be_subset = subset;
        self
    }

    /// The font dictionary reference.
    pub fn object_ref(&self) -> ObjectRef {
        self.object_ref
    }

    /// PostScript name (`/BaseFont`).
    pub fn base_font(&self) -> &str {
        &self.base_font
    }

    /// Character encoding.
    pub fn encoding(&self) -> &FontEncoding {
        &self.encoding
    }

    /// Whether the font is subset when the document is saved.
    pub fn will_be_subset(&self) -> bool {
        self.will_be_subset
    }

    /// Encode text into this font's character codes.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        self.encoding.encode(text)
    }
}

impl PartialEq for Font {
    fn eq(&self, other: &Self) -> bool {
        self.object_ref == other.object_ref
    }
}

impl Eq for Font {}

impl Resource for Font {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Font
    }

    fn resource_object(&self) -> Object {
        Object::Reference(self.object_ref)
    }
}
