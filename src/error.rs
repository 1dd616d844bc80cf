//! Error types for content stream authoring and image decoding.
//!
//! Every fallible operation in the crate returns [`Result`]. None of the
//! variants are recoverable inside the component that raised them; the
//! caller decides whether to discard the page or image being processed.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while writing content streams or decoding images.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Text-mode or graphics-protocol misuse (e.g. nested `BT`, `Tj` outside a text object)
    #[error("Sequence error: {0}")]
    Sequence(String),

    /// Invalid enumerated or out-of-range parameter, rejected before anything is written
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    /// Structurally invalid input (undeterminable color space, mismatched coordinate arrays)
    #[error("Format error: {0}")]
    Format(String),

    /// The underlying sink rejected a write
    #[error("Write failure: {0}")]
    Write(#[from] std::io::Error),

    /// Text cannot be encoded with the selected font
    #[error("Font error: {0}")]
    Font(String),

    /// Stream or sample decoding error
    #[error("Stream decoding error: {0}")]
    Decode(String),

    /// Unsupported stream filter
    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),

    /// Pixel buffer construction failed
    #[error("Image error: {0}")]
    Image(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_error() {
        let err = Error::Sequence("nested beginText".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("Sequence error"));
        assert!(msg.contains("nested beginText"));
    }

    #[test]
    fn test_unsupported_value_error() {
        let err = Error::UnsupportedValue("line join style 3".to_string());
        assert!(format!("{}", err).contains("line join style 3"));
    }

    #[test]
    fn test_format_error() {
        let err = Error::Format("color space undetermined".to_string());
        let msg = format!("{}", err);
        assert!(msg.starts_with("Format error"));
        assert!(msg.contains("color space undetermined"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "sink closed");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Write(_)));
        assert!(format!("{}", err).contains("sink closed"));
    }

    #[test]
    fn test_unsupported_filter_error() {
        let err = Error::UnsupportedFilter("JBIG2Decode".to_string());
        assert!(format!("{}", err).contains("JBIG2Decode"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
