// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::many_single_char_names)]

//! # PDF Scribe
//!
//! Write PDF page content streams and decode image XObjects to pixels.
//!
//! ## Core Features
//!
//! ### Content Streams
//! - **Drawing API**: paths, painting, clipping, text, images, forms, shadings, marked content
//! - **State Checking**: operators are rejected inside or outside `BT`/`ET` per ISO 32000-1:2008 §9.4
//! - **Resource Binding**: fonts, color spaces, XObjects and friends get stable `/F1`-style names
//! - **Page Assembly**: overwrite or append, optional FlateDecode, optional `q`/`Q` context reset
//! - **Font Subsetting Support**: code points shown with subset fonts are collected per document
//!
//! ### Images
//! - **Sample Decoding**: 1/2/4/8/16 bits per component, decode arrays, predictors
//! - **Color Spaces**: Gray, RGB, CMYK, Indexed, ICCBased, Separation, DeviceN
//! - **Masks**: soft masks, stencil masks and color-key masks composited as alpha
//!
//! ## Quick Start
//!
//! ```
//! use pdf_scribe::config::ContentStreamOptions;
//! use pdf_scribe::fonts::{Font, FontEncoding, FontSubsetCollector};
//! use pdf_scribe::object::ObjectRef;
//! use pdf_scribe::writer::{Page, PageContentStream};
//!
//! let mut page = Page::new();
//! let mut subsets = FontSubsetCollector::new();
//! let font = Font::new(ObjectRef::new(5, 0), "Helvetica", FontEncoding::WinAnsi);
//!
//! let mut content = PageContentStream::open(&mut page, &mut subsets, ContentStreamOptions::default())?;
//! content
//!     .begin_text()?
//!     .set_font(&font, 24.0)?
//!     .new_line_at_offset(72.0, 700.0)?
//!     .show_text("Hello, World!")?
//!     .end_text()?;
//! content.close()?;
//!
//! assert!(page.has_contents());
//! # Ok::<(), pdf_scribe::Error>(())
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Object model
pub mod color;
pub mod object;

// Configuration
pub mod config;

// Stream decoders
pub mod decoders;

// Fonts and subsetting
pub mod fonts;

// Image decoding
pub mod images;

// Content stream writing
pub mod writer;

// Re-exports
pub use color::{ColorSpace, PdColor};
pub use error::{Error, Result};
pub use images::ImageXObject;
pub use writer::{ContentStream, Page, PageContentStream, Resources};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
