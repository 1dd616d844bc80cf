//! Stream decoder implementations for PDF filters.
//!
//! Image samples arrive wrapped in one or more filters:
//! - FlateDecode (zlib/deflate), most common
//! - LZWDecode
//! - RunLengthDecode
//! - ASCIIHexDecode
//! - DCTDecode (JPEG, decoded to raw samples)
//!
//! CCITTFaxDecode, JBIG2Decode and JPXDecode are recognized but not decoded.
//! Flate and LZW streams may carry a PNG or TIFF predictor.

use crate::config::DecodeOptions;
use crate::error::{Error, Result};

mod ascii_hex;
mod dct;
mod flate;
mod lzw;
mod predictor;
mod runlength;

pub use ascii_hex::AsciiHexDecoder;
pub use dct::{decode_jpeg, DctDecoder};
pub use flate::{encode_flate, FlateDecoder};
pub use lzw::LzwDecoder;
pub use predictor::{decode_predictor, DecodeParams};
pub use runlength::RunLengthDecoder;

/// PDF stream filter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    /// FlateDecode (deflate/zlib compression)
    FlateDecode,
    /// LZWDecode (Lempel-Ziv-Welch compression)
    LZWDecode,
    /// RunLengthDecode (run-length encoding)
    RunLengthDecode,
    /// ASCIIHexDecode (hexadecimal encoding)
    ASCIIHexDecode,
    /// DCTDecode (JPEG compression)
    DCTDecode,
    /// JPXDecode (JPEG 2000 compression)
    JPXDecode,
    /// CCITTFaxDecode (CCITT Group 3/4 fax compression)
    CCITTFaxDecode,
    /// JBIG2Decode (JBIG2 compression)
    JBIG2Decode,
}

impl Filter {
    /// Parse a filter name, including the inline-image abbreviations.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "FlateDecode" | "Fl" => Some(Filter::FlateDecode),
            "LZWDecode" | "LZW" => Some(Filter::LZWDecode),
            "RunLengthDecode" | "RL" => Some(Filter::RunLengthDecode),
            "ASCIIHexDecode" | "AHx" => Some(Filter::ASCIIHexDecode),
            "DCTDecode" | "DCT" => Some(Filter::DCTDecode),
            "JPXDecode" => Some(Filter::JPXDecode),
            "CCITTFaxDecode" | "CCF" => Some(Filter::CCITTFaxDecode),
            "JBIG2Decode" => Some(Filter::JBIG2Decode),
            _ => None,
        }
    }

    /// Full PDF name of the filter.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::FlateDecode => "FlateDecode",
            Filter::LZWDecode => "LZWDecode",
            Filter::RunLengthDecode => "RunLengthDecode",
            Filter::ASCIIHexDecode => "ASCIIHexDecode",
            Filter::DCTDecode => "DCTDecode",
            Filter::JPXDecode => "JPXDecode",
            Filter::CCITTFaxDecode => "CCITTFaxDecode",
            Filter::JBIG2Decode => "JBIG2Decode",
        }
    }

    /// Whether a predictor from `/DecodeParms` applies after this filter.
    pub fn uses_predictor(&self) -> bool {
        matches!(self, Filter::FlateDecode | Filter::LZWDecode)
    }
}

/// Trait for PDF stream decoders.
pub trait StreamDecoder {
    /// Decode the input data.
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Get the name of this decoder (e.g., "FlateDecode").
    fn name(&self) -> &str;
}

fn decoder_for(filter: Filter, params: Option<&DecodeParams>) -> Result<Box<dyn StreamDecoder>> {
    let decoder: Box<dyn StreamDecoder> = match filter {
        Filter::FlateDecode => Box::new(FlateDecoder),
        Filter::LZWDecode => Box::new(LzwDecoder::new(params.map_or(true, |p| p.early_change))),
        Filter::RunLengthDecode => Box::new(RunLengthDecoder),
        Filter::ASCIIHexDecode => Box::new(AsciiHexDecoder),
        Filter::DCTDecode => Box::new(DctDecoder),
        Filter::JPXDecode | Filter::CCITTFaxDecode | Filter::JBIG2Decode => {
            return Err(Error::UnsupportedFilter(filter.name().to_string()))
        },
    };
    Ok(decoder)
}

/// Decode stream data through a filter chain with default limits.
///
/// ```
/// use pdf_scribe::decoders::decode_stream;
///
/// let decoded = decode_stream(b"48656C6C6F>", &["ASCIIHexDecode".to_string()])?;
/// assert_eq!(decoded, b"Hello");
/// # Ok::<(), pdf_scribe::Error>(())
/// ```
pub fn decode_stream(data: &[u8], filters: &[String]) -> Result<Vec<u8>> {
    decode_stream_with_options(data, filters, None, &DecodeOptions::default())
}

/// Decode stream data through a filter chain.
///
/// Filters are applied in order. `params` supplies the predictor applied
/// after Flate and LZW and the LZW code width switch.
///
/// # Security
///
/// After each filter the output is checked against the decompression
/// ratio and size limits in `options`.
pub fn decode_stream_with_options(
    data: &[u8],
    filters: &[String],
    params: Option<&DecodeParams>,
    options: &DecodeOptions,
) -> Result<Vec<u8>> {
    let compressed_size = data.len();
    let mut current = data.to_vec();

    for name in filters {
        let filter = Filter::from_name(name).ok_or_else(|| Error::UnsupportedFilter(name.clone()))?;
        current = decoder_for(filter, params)?.decode(&current)?;

        if filter.uses_predictor() {
            if let Some(params) = params.filter(|p| p.predictor != 1) {
                current = decode_predictor(&current, params)?;
            }
        }

        check_limits(compressed_size, current.len(), options)?;
    }

    Ok(current)
}

fn check_limits(compressed_size: usize, decoded_size: usize, options: &DecodeOptions) -> Result<()> {
    let max_ratio = options.max_decompression_ratio;
    if max_ratio > 0 && compressed_size > 0 {
        let ratio = decoded_size as u64 / compressed_size as u64;
        if ratio > max_ratio as u64 {
            return Err(Error::Decode(format!(
                "Decompression bomb detected: ratio {}:1 exceeds limit {}:1 (compressed: {} bytes, decompressed: {} bytes)",
                ratio, max_ratio, compressed_size, decoded_size
            )));
        }
    }

    let max_size = options.max_decompressed_size;
    if max_size > 0 && decoded_size > max_size {
        return Err(Error::Decode(format!(
            "Decompression bomb detected: decompressed size {} bytes exceeds limit {} bytes",
            decoded_size, max_size
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_stream_no_filters() {
        let data = b"Hello, World!";
        assert_eq!(decode_stream(data, &[]).unwrap(), data);
    }

    #[test]
    fn test_unknown_filter() {
        match decode_stream(b"test", &["Bogus".to_string()]) {
            Err(Error::UnsupportedFilter(name)) => assert_eq!(name, "Bogus"),
            other => panic!("Expected UnsupportedFilter error, got {:?}", other),
        }
    }

    #[test]
    fn test_external_filters_unsupported() {
        for name in ["CCITTFaxDecode", "JBIG2Decode", "JPXDecode"] {
            let result = decode_stream(b"x", &[name.to_string()]);
            assert!(matches!(result, Err(Error::UnsupportedFilter(_))), "{}", name);
        }
    }

    #[test]
    fn test_abbreviations() {
        assert_eq!(Filter::from_name("Fl"), Some(Filter::FlateDecode));
        assert_eq!(Filter::from_name("AHx"), Some(Filter::ASCIIHexDecode));
        assert_eq!(Filter::from_name("CCF"), Some(Filter::CCITTFaxDecode));
        assert_eq!(Filter::from_name("A85"), None);
    }

    #[test]
    fn test_chain() {
        let compressed = encode_flate(b"chained").unwrap();
        let hex: String = compressed.iter().map(|b| format!("{:02X}", b)).collect();
        let filters = vec!["ASCIIHexDecode".to_string(), "FlateDecode".to_string()];
        assert_eq!(decode_stream(hex.as_bytes(), &filters).unwrap(), b"chained");
    }

    #[test]
    fn test_flate_with_predictor() {
        let rows = [2u8, 1, 2, 2, 1, 1];
        let compressed = encode_flate(&rows).unwrap();
        let params = DecodeParams {
            predictor: 12,
            columns: 2,
            ..Default::default()
        };
        let decoded = decode_stream_with_options(
            &compressed,
            &["FlateDecode".to_string()],
            Some(&params),
            &DecodeOptions::default(),
        )
        .unwrap();
        assert_eq!(decoded, vec![1, 2, 2, 3]);
    }

    #[test]
    fn test_size_limit() {
        let compressed = encode_flate(&[0u8; 4096]).unwrap();
        let options = DecodeOptions::unlimited().with_max_size(1024);
        let result =
            decode_stream_with_options(&compressed, &["FlateDecode".to_string()], None, &options);
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_ratio_limit() {
        let compressed = encode_flate(&[0u8; 64 * 1024]).unwrap();
        let strict = DecodeOptions::unlimited().with_max_ratio(10);
        let result =
            decode_stream_with_options(&compressed, &["FlateDecode".to_string()], None, &strict);
        assert!(matches!(result, Err(Error::Decode(_))));

        let relaxed = DecodeOptions::unlimited();
        let decoded =
            decode_stream_with_options(&compressed, &["FlateDecode".to_string()], None, &relaxed)
                .unwrap();
        assert_eq!(decoded.len(), 64 * 1024);
    }
}
