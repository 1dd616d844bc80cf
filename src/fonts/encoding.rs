//! Text encodings used when showing text with a font.
//!
//! Two encodings cover the fonts a content stream can select:
//!
//! - **WinAnsiEncoding**: one byte per character, for simple (Type1/TrueType) fonts.
//! - **Identity-H**: two bytes per character, the big-endian glyph ID, for
//!   composite fonts whose CIDs equal their glyph IDs.
//!
//! ```text
//! (Hello) Tj          % WinAnsi
//! <0001002300A4> Tj   % Identity-H
//! ```

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Character encoding of a font.
#[derive(Debug, Clone, PartialEq)]
pub enum FontEncoding {
    /// Windows-1252 single-byte encoding
    WinAnsi,
    /// Identity-H with a Unicode to glyph ID map
    IdentityH(Arc<HashMap<char, u16>>),
}

impl FontEncoding {
    /// Identity-H encoding built from a character to glyph map.
    pub fn identity_h(glyphs: HashMap<char, u16>) -> Self {
        FontEncoding::IdentityH(Arc::new(glyphs))
    }

    /// PDF name of the encoding.
    pub fn name(&self) -> &'static str {
        match self {
            FontEncoding::WinAnsi => "WinAnsiEncoding",
            FontEncoding::IdentityH(_) => "Identity-H",
        }
    }

    /// Encode `text` into character codes.
    ///
    /// Fails with [`Error::Font`] on the first character the encoding cannot represent.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            FontEncoding::WinAnsi => text
                .chars()
                .map(|ch| {
                    unicode_to_winansi(ch as u32).ok_or_else(|| {
                        Error::Font(format!(
                            "U+{:04X} ('{}') is not available in WinAnsiEncoding",
                            ch as u32, ch
                        ))
                    })
                })
                .collect(),
            FontEncoding::IdentityH(glyphs) => {
                let mut codes = Vec::with_capacity(text.len() * 2);
                for ch in text.chars() {
                    let gid = glyphs.get(&ch).ok_or_else(|| {
                        Error::Font(format!("no glyph for U+{:04X} ('{}')", ch as u32, ch))
                    })?;
                    codes.extend_from_slice(&gid.to_be_bytes());
                }
                Ok(codes)
            },
        }
    }
}

/// Map a Unicode code point to its WinAnsi byte.
///
/// 0x00-0x7F and 0xA0-0xFF map directly; the 0x80-0x9F block holds the
/// Windows-1252 punctuation that differs from Latin-1.
pub fn unicode_to_winansi(codepoint: u32) -> Option<u8> {
    if codepoint < 0x80 || (0xA0..=0xFF).contains(&codepoint) {
        return Some(codepoint as u8);
    }

    let byte = match codepoint {
        0x20AC => 0x80, // Euro sign
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85, // Horizontal ellipsis
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91, // Curly quotes
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95, // Bullet
        0x2013 => 0x96, // Dashes
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99, // Trade mark sign
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => return None,
    };
    Some(byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winansi_ascii() {
        let codes = FontEncoding::WinAnsi.encode("Hello").unwrap();
        assert_eq!(codes, b"Hello");
    }

    #[test]
    fn test_winansi_special_block() {
        let codes = FontEncoding::WinAnsi.encode("\u{20AC}\u{2022}é").unwrap();
        assert_eq!(codes, vec![0x80, 0x95, 0xE9]);
    }

    #[test]
    fn test_winansi_unmappable() {
        let err = FontEncoding::WinAnsi.encode("Ω").unwrap_err();
        assert!(matches!(err, Error::Font(_)));
        assert!(format!("{}", err).contains("U+03A9"));
    }

    #[test]
    fn test_identity_h() {
        let mut glyphs = HashMap::new();
        glyphs.insert('A', 0x0024);
        glyphs.insert('€', 0x01A3);
        let encoding = FontEncoding::identity_h(glyphs);
        assert_eq!(encoding.encode("A€").unwrap(), vec![0x00, 0x24, 0x01, 0xA3]);
        assert_eq!(encoding.name(), "Identity-H");
    }

    #[test]
    fn test_identity_h_missing_glyph() {
        let encoding = FontEncoding::identity_h(HashMap::new());
        assert!(encoding.encode("x").is_err());
    }
}
