//! Configuration for content stream authoring and stream decoding.

/// How a page content stream is opened.
///
/// # Example
///
/// ```
/// use pdf_scribe::config::ContentStreamOptions;
///
/// // Append compressed content after whatever the page already draws,
/// // starting from an untouched graphics state.
/// let options = ContentStreamOptions::append()
///     .with_compress(true)
///     .with_reset_context(true);
/// assert!(options.append);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentStreamOptions {
    /// Keep existing page content and add a new stream after it.
    /// When false, existing content is replaced.
    pub append: bool,

    /// Attach a FlateDecode filter to newly created streams.
    pub compress: bool,

    /// Wrap the existing content in `q`/`Q` so appended operators start
    /// from the initial graphics state. Only meaningful with `append`.
    pub reset_context: bool,
}

impl Default for ContentStreamOptions {
    fn default() -> Self {
        Self::overwrite()
    }
}

impl ContentStreamOptions {
    /// Replace the page content (uncompressed, no context reset).
    pub fn overwrite() -> Self {
        Self {
            append: false,
            compress: false,
            reset_context: false,
        }
    }

    /// Append to the page content (uncompressed, no context reset).
    pub fn append() -> Self {
        Self {
            append: true,
            ..Self::overwrite()
        }
    }

    /// Enable or disable appending.
    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    /// Enable or disable Flate compression of new streams.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Enable or disable graphics context reset for appended content.
    pub fn with_reset_context(mut self, reset_context: bool) -> Self {
        self.reset_context = reset_context;
        self
    }
}

/// Formatting of real-number operands.
///
/// Fixed when an operator writer is created. Output never uses digit
/// grouping or exponent notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    /// Maximum number of digits after the decimal point
    pub max_fraction_digits: usize,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            max_fraction_digits: 10,
        }
    }
}

impl NumberFormat {
    /// Create a format with the given fractional precision.
    pub fn new(max_fraction_digits: usize) -> Self {
        Self {
            max_fraction_digits,
        }
    }
}

/// Limits applied while decoding filtered streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum decompression ratio (decoded:encoded)
    ///
    /// Default: 100 (100:1 ratio). Set to 0 to disable check.
    pub max_decompression_ratio: u32,

    /// Maximum decoded stream size in bytes
    ///
    /// Default: 100 MB. Set to 0 to disable check.
    pub max_decompressed_size: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_decompression_ratio: 100,
            max_decompressed_size: 100 * 1024 * 1024,
        }
    }
}

impl DecodeOptions {
    /// No ratio or size limits.
    pub fn unlimited() -> Self {
        Self {
            max_decompression_ratio: 0,
            max_decompressed_size: 0,
        }
    }

    /// Set the maximum decompression ratio.
    pub fn with_max_ratio(mut self, ratio: u32) -> Self {
        self.max_decompression_ratio = ratio;
        self
    }

    /// Set the maximum decoded size.
    pub fn with_max_size(mut self, size: usize) -> Self {
        self.max_decompressed_size = size;
        self
    }
}
