//! FlateDecode (zlib/deflate) implementation.
//!
//! Uses the flate2 crate for both directions: decoding image and content
//! streams, and compressing freshly written page content.

use crate::decoders::StreamDecoder;
use crate::error::{Error, Result};
use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// FlateDecode filter implementation.
pub struct FlateDecoder;

impl StreamDecoder for FlateDecoder {
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        let zlib_err = match ZlibDecoder::new(input).read_to_end(&mut output) {
            Ok(_) => return Ok(output),
            Err(e) => e,
        };

        // Partial recovery: keep whatever inflated before the corruption
        if !output.is_empty() {
            log::warn!(
                "FlateDecode partial recovery: extracted {} bytes before corruption: {}",
                output.len(),
                zlib_err
            );
            return Ok(output);
        }

        // Some writers omit the zlib wrapper
        log::debug!("Zlib decode failed ({}), trying raw deflate", zlib_err);
        output.clear();
        match DeflateDecoder::new(input).read_to_end(&mut output) {
            Ok(_) => Ok(output),
            Err(_) if !output.is_empty() => {
                log::warn!("Raw deflate partial recovery: extracted {} bytes", output.len());
                Ok(output)
            },
            Err(deflate_err) => Err(Error::Decode(format!(
                "FlateDecode failed: zlib: {}, deflate: {}",
                zlib_err, deflate_err
            ))),
        }
    }

    fn name(&self) -> &str {
        "FlateDecode"
    }
}

/// Compress data with zlib, suitable for a `/FlateDecode` stream.
pub fn encode_flate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
