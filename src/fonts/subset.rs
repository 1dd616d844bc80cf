//! Collection of code points used per subset font.
//!
//! A document owns one [`FontSubsetCollector`] and lends it to every content
//! stream it opens. When the document is saved, each registered font is
//! subset down to the code points recorded here and renamed with a tag
//! such as `ABCDEF+FontName`.

use super::font::Font;
use crate::object::ObjectRef;
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Document-wide record of fonts awaiting subsetting and the characters they must keep.
#[derive(Debug, Default)]
pub struct FontSubsetCollector {
    fonts: IndexMap<ObjectRef, SubsetEntry>,
}

#[derive(Debug)]
struct SubsetEntry {
    base_font: String,
    code_points: BTreeSet<u32>,
}

impl FontSubsetCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a font for subsetting.
    ///
    /// Returns `true` if the font was not registered before.
    pub fn register(&mut self, font: &Font) -> bool {
        if self.fonts.contains_key(&font.object_ref()) {
            return false;
        }
        log::debug!(
            "Registering {} ({}) for subsetting",
            font.base_font(),
            font.object_ref()
        );
        self.fonts.insert(
            font.object_ref(),
            SubsetEntry {
                base_font: font.base_font().to_string(),
                code_points: BTreeSet::new(),
            },
        );
        true
    }

    /// Whether `font` has been registered.
    pub fn is_registered(&self, font: &Font) -> bool {
        self.fonts.contains_key(&font.object_ref())
    }

    /// Record a code point as used by `font`, registering the font if needed.
    pub fn add_code_point(&mut self, font: &Font, code_point: u32) {
        if !self.is_registered(font) {
            self.register(font);
        }
        if let Some(entry) = self.fonts.get_mut(&font.object_ref()) {
            entry.code_points.insert(code_point);
        }
    }

    /// Code points recorded for `font`, if it is registered.
    pub fn code_points(&self, font: &Font) -> Option<&BTreeSet<u32>> {
        self.fonts.get(&font.object_ref()).map(|e| &e.code_points)
    }

    /// References of all registered fonts, in registration order.
    pub fn fonts(&self) -> impl Iterator<Item = ObjectRef> + '_ {
        self.fonts.keys().copied()
    }

    /// Number of registered fonts.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Whether no font has been registered.
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Subset font name (`ABCDEF+BaseFont`) for a registered font.
    ///
    /// The tag is derived from the recorded code points, so the same subset
    /// always gets the same name.
    pub fn subset_name(&self, font: &Font) -> Option<String> {
        let entry = self.fonts.get(&font.object_ref())?;
        Some(format!(
            "{}+{}",
            subset_tag(&entry.code_points),
            entry.base_font
        ))
    }
}

/// Six uppercase letters derived from a hash of the code point set.
fn subset_tag(code_points: &BTreeSet<u32>) -> String {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for cp in code_points {
        cp.hash(&mut hasher);
    }
    let mut h = hasher.finish();
    let mut tag = String::with_capacity(6);
    for _ in 0..6 {
        tag.push((b'A' + (h % 26) as u8) as char);
        h /= 26;
    }
    tag
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontEncoding;

    fn font(id: u32) -> Font {
        Font::new(ObjectRef::new(id, 0), "Arial", FontEncoding::WinAnsi).with_subsetting(true)
    }

    #[test]
    fn test_register_once() {
        let mut collector = FontSubsetCollector::new();
        assert!(collector.register(&font(1)));
        assert!(!collector.register(&font(1)));
        assert!(collector.register(&font(2)));
        assert_eq!(collector.len(), 2);
        assert_eq!(collector.fonts().collect::<Vec<_>>(), vec![ObjectRef::new(1, 0), ObjectRef::new(2, 0)]);
    }

    #[test]
    fn test_add_code_point() {
        let mut collector = FontSubsetCollector::new();
        let f = font(3);
        collector.add_code_point(&f, 'b' as u32);
        collector.add_code_point(&f, 'a' as u32);
        collector.add_code_point(&f, 'a' as u32);

        assert!(collector.is_registered(&f));
        let points: Vec<u32> = collector.code_points(&f).unwrap().iter().copied().collect();
        assert_eq!(points, vec!['a' as u32, 'b' as u32]);
    }

    #[test]
    fn test_subset_name_is_stable() {
        let mut collector = FontSubsetCollector::new();
        let f = font(4);
        collector.add_code_point(&f, 0x41);
        let first = collector.subset_name(&f).unwrap();
        let second = collector.subset_name(&f).unwrap();
        assert_eq!(first, second);
        assert!(first.ends_with("+Arial"));
        assert_eq!(first.find('+'), Some(6));
        assert!(first[..6].chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_unregistered_font() {
        let collector = FontSubsetCollector::new();
        assert!(collector.is_empty());
        assert!(collector.code_points(&font(9)).is_none());
        assert!(collector.subset_name(&font(9)).is_none());
    }
}
