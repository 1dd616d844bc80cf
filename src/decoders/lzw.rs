//! LZWDecode implementation.
//!
//! PDF's LZW (Section 7.4.4) uses MSB-first bit order, 9 to 12 bit codes,
//! clear code 256 and EOD code 257. With `/EarlyChange 1`, the default, the
//! code width grows one code earlier than plain LZW, which is the TIFF
//! variant weezl calls "size switch".

use crate::decoders::StreamDecoder;
use crate::error::{Error, Result};
use weezl::{decode::Decoder as WeezlDecoder, BitOrder, LzwError};

/// LZWDecode filter implementation.
#[derive(Debug, Clone, Copy)]
pub struct LzwDecoder {
    early_change: bool,
}

impl LzwDecoder {
    /// Decoder for the given `/EarlyChange` setting.
    pub fn new(early_change: bool) -> Self {
        Self { early_change }
    }
}

impl Default for LzwDecoder {
    fn default() -> Self {
        Self::new(true)
    }
}

impl StreamDecoder for LzwDecoder {
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>> {
        match decode_lzw(input, self.early_change) {
            Ok(data) => Ok(data),
            Err(first) => {
                // Writers disagree on EarlyChange; retry with the other variant
                log::warn!(
                    "LZWDecode with EarlyChange={} failed ({:?}), retrying with EarlyChange={}",
                    self.early_change as u8,
                    first,
                    (!self.early_change) as u8
                );
                decode_lzw(input, !self.early_change)
                    .map_err(|e| Error::Decode(format!("LZWDecode error: {:?}", e)))
            },
        }
    }

    fn name(&self) -> &str {
        "LZWDecode"
    }
}

fn decode_lzw(input: &[u8], early_change: bool) -> std::result::Result<Vec<u8>, LzwError> {
    let mut decoder = if early_change {
        WeezlDecoder::with_tiff_size_switch(BitOrder::Msb, 8)
    } else {
        WeezlDecoder::new(BitOrder::Msb, 8)
    };
    decoder.decode(input)
}
