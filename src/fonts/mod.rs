//! Fonts, text encodings and subset collection.

pub mod encoding;
pub mod font;
pub mod subset;

pub use encoding::{FontEncoding, unicode_to_winansi};
pub use font::Font;
pub use subset::FontSubsetCollector;
