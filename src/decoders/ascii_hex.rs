//! ASCIIHexDecode implementation.
//!
//! Whitespace is ignored, `>` ends the data and an odd trailing digit is
//! padded with `0`.

use crate::decoders::StreamDecoder;
use crate::error::{Error, Result};

/// ASCIIHexDecode filter implementation.
pub struct AsciiHexDecoder;

impl StreamDecoder for AsciiHexDecoder {
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut digits = input
            .iter()
            .copied()
            .take_while(|&c| c != b'>')
            .filter(|c| !c.is_ascii_whitespace());

        let mut output = Vec::with_capacity(input.len() / 2);
        while let Some(high) = digits.next() {
            let low = digits.next().unwrap_or(b'0');
            output.push((hex_value(high)? << 4) | hex_value(low)?);
        }
        Ok(output)
    }

    fn name(&self) -> &str {
        "ASCIIHexDecode"
    }
}

fn hex_value(digit: u8) -> Result<u8> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        _ => Err(Error::Decode(format!(
            "ASCIIHexDecode: invalid hex digit '{}'",
            digit as char
        ))),
    }
}
