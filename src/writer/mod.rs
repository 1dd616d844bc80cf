//! Content stream authoring.
//!
//! ## Architecture
//!
//! ```text
//! drawing calls
//!     ↓
//! [ContentStream] (validates against GraphicsStateTracker, binds Resources)
//!     ↓
//! [OperatorWriter] (operands + operator tokens)
//!     ↓
//! sink (Vec<u8>, File, ...)
//!     ↓
//! [PageContentStream] (stores the bytes in the page's /Contents)
//! ```
//!
//! ## Example
//!
//! ```
//! use pdf_scribe::config::ContentStreamOptions;
//! use pdf_scribe::fonts::FontSubsetCollector;
//! use pdf_scribe::writer::{Page, PageContentStream};
//!
//! let mut page = Page::new();
//! let mut subsets = FontSubsetCollector::new();
//!
//! let mut stream = PageContentStream::open(&mut page, &mut subsets, ContentStreamOptions::overwrite())?;
//! stream.set_non_stroking_rgb(255, 0, 0)?.add_rect(72.0, 72.0, 100.0, 50.0)?.fill()?;
//! stream.close()?;
//!
//! assert_eq!(page.content_stream_count(), 1);
//! # Ok::<(), pdf_scribe::Error>(())
//! ```

mod content_stream;
mod graphics_state;
mod operators;
mod page;
pub(crate) mod resources;

pub use content_stream::{ContentStream, LineCap, LineJoin, WindingRule};
pub use graphics_state::GraphicsStateTracker;
pub use operators::{escape_name, format_real, OperatorWriter};
pub use page::{Page, PageContentStream, PageContents};
pub use resources::{
    ExtGState, FormXObject, Pattern, PropertyList, Resource, ResourceKind, Resources, Shading,
};
