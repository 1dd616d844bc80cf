//! Page content assembly.
//!
//! A page's `/Contents` is either one stream or an array of streams that a
//! reader concatenates. [`PageContentStream`] opens a new stream on a page in
//! overwrite or append mode, optionally wrapping the existing content in
//! `q`/`Q` so it cannot leak graphics state into the appended content.

use crate::config::{ContentStreamOptions, NumberFormat};
use crate::decoders::{decode_stream, encode_flate};
use crate::error::{Error, Result};
use crate::fonts::FontSubsetCollector;
use crate::object::{Object, PdfStream};
use crate::writer::content_stream::ContentStream;
use crate::writer::operators::OperatorWriter;
use crate::writer::resources::Resources;
use std::ops::{Deref, DerefMut};

/// The `/Contents` entry of a page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageContents {
    /// A single content stream
    Single(PdfStream),
    /// An array of content streams, drawn in order
    Array(Vec<PdfStream>),
}

impl PageContents {
    /// The content streams in drawing order.
    pub fn streams(&self) -> &[PdfStream] {
        match self {
            PageContents::Single(stream) => std::slice::from_ref(stream),
            PageContents::Array(streams) => streams,
        }
    }

    /// Mutable access to the content streams.
    pub fn streams_mut(&mut self) -> &mut [PdfStream] {
        match self {
            PageContents::Single(stream) => std::slice::from_mut(stream),
            PageContents::Array(streams) => streams,
        }
    }

    /// Take the streams out, dropping the single/array distinction.
    pub fn into_streams(self) -> Vec<PdfStream> {
        match self {
            PageContents::Single(stream) => vec![stream],
            PageContents::Array(streams) => streams,
        }
    }

    /// Whether there is no content stream at all.
    pub fn is_empty(&self) -> bool {
        self.streams().is_empty()
    }
}

/// The parts of a page a content stream touches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// `/Contents`, absent for a blank page
    pub contents: Option<PageContents>,
    /// `/Resources`, absent until something is bound
    pub resources: Option<Resources>,
}

impl Page {
    /// A blank page.
    pub fn new() -> Self {
        Self::default()
    }

    /// A page with the given contents and no resources.
    pub fn with_contents(contents: PageContents) -> Self {
        Self {
            contents: Some(contents),
            resources: None,
        }
    }

    /// Whether the page has any content stream.
    pub fn has_contents(&self) -> bool {
        self.contents.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Number of content streams.
    pub fn content_stream_count(&self) -> usize {
        self.contents.as_ref().map_or(0, |c| c.streams().len())
    }

    /// Content streams with their filters removed, in drawing order.
    pub fn decoded_streams(&self) -> Result<Vec<Vec<u8>>> {
        let Some(contents) = &self.contents else {
            return Ok(Vec::new());
        };
        contents
            .streams()
            .iter()
            .map(|stream| decode_stream(&stream.data, &stream.filters()))
            .collect()
    }
}

/// A content stream being written onto a page.
///
/// Dereferences to [`ContentStream`] for the drawing operations. The page
/// only sees the new bytes after [`PageContentStream::close`].
pub struct PageContentStream<'a> {
    stream: ContentStream<'a, Vec<u8>>,
    target: &'a mut PdfStream,
    compress: bool,
}

impl<'a> PageContentStream<'a> {
    /// Open a content stream on `page`.
    pub fn open(
        page: &'a mut Page,
        subsets: &'a mut FontSubsetCollector,
        options: ContentStreamOptions,
    ) -> Result<Self> {
        Self::open_with_format(page, subsets, options, NumberFormat::default())
    }

    /// Open a content stream on `page` with an explicit number format.
    ///
    /// - Append mode on a page with content adds a new stream after the
    ///   existing ones. With `reset_context` a stream holding `q` is put in
    ///   front and the new stream starts with `Q`.
    /// - Otherwise the page gets a single fresh stream, replacing any content.
    ///
    /// The page's resource dictionary is created when missing.
    pub fn open_with_format(
        page: &'a mut Page,
        subsets: &'a mut FontSubsetCollector,
        options: ContentStreamOptions,
        format: NumberFormat,
    ) -> Result<Self> {
        let has_contents = page.has_contents();
        log::debug!(
            "Opening page content stream (append={}, compress={}, reset_context={})",
            options.append,
            options.compress,
            options.reset_context
        );
        let Page {
            contents,
            resources,
        } = page;

        let mut restore_first = false;
        let target = if options.append && has_contents {
            let mut streams = contents.take().map(PageContents::into_streams).unwrap_or_default();
            if options.reset_context {
                let mut writer = OperatorWriter::with_format(Vec::new(), format);
                writer.write_operator("q")?;
                let mut leading = PdfStream::new();
                finish_stream(&mut leading, writer.into_inner(), options.compress)?;
                streams.insert(0, leading);
                restore_first = true;
            }
            streams.push(PdfStream::new());
            log::debug!("Appending content stream {} to page", streams.len());

            contents
                .insert(PageContents::Array(streams))
                .streams_mut()
                .last_mut()
                .ok_or_else(|| Error::Format("page contents array is empty".to_string()))?
        } else {
            if has_contents {
                log::warn!("Overwriting existing page content; use append mode to keep it");
            }
            contents
                .insert(PageContents::Single(PdfStream::new()))
                .streams_mut()
                .first_mut()
                .ok_or_else(|| Error::Format("page contents array is empty".to_string()))?
        };

        let resources = resources.get_or_insert_with(Resources::new);
        let mut stream = ContentStream::with_format(Vec::new(), resources, subsets, format);
        if restore_first {
            stream.restore_graphics_state()?;
        }

        Ok(Self {
            stream,
            target,
            compress: options.compress,
        })
    }

    /// Finish the stream and store its bytes in the page.
    pub fn close(self) -> Result<()> {
        let bytes = self.stream.close()?;
        finish_stream(self.target, bytes, self.compress)
    }
}

impl<'a> Deref for PageContentStream<'a> {
    type Target = ContentStream<'a, Vec<u8>>;

    fn deref(&self) -> &Self::Target {
        &self.stream
    }
}

impl DerefMut for PageContentStream<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.stream
    }
}

fn finish_stream(stream: &mut PdfStream, bytes: Vec<u8>, compress: bool) -> Result<()> {
    if compress {
        let compressed = encode_flate(&bytes)?;
        log::debug!("Compressed content stream {} -> {} bytes", bytes.len(), compressed.len());
        stream.set("Filter", Object::name("FlateDecode"));
        stream.set_data(compressed);
    } else {
        stream.set_data(bytes);
    }
    Ok(())
}
