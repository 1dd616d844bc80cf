//! RunLengthDecode implementation.
//!
//! - Length byte 0-127: copy the next N+1 bytes literally
//! - Length byte 128: end of data
//! - Length byte 129-255: repeat the next byte 257-N times

use crate::decoders::StreamDecoder;
use crate::error::{Error, Result};

/// RunLengthDecode filter implementation.
pub struct RunLengthDecoder;

impl StreamDecoder for RunLengthDecoder {
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        let mut rest = input;

        while let Some((&length, tail)) = rest.split_first() {
            rest = tail;
            match length {
                0..=127 => {
                    let count = length as usize + 1;
                    if rest.len() < count {
                        return Err(Error::Decode(format!(
                            "RunLengthDecode: literal run needs {} bytes, {} left",
                            count,
                            rest.len()
                        )));
                    }
                    let (literal, tail) = rest.split_at(count);
                    output.extend_from_slice(literal);
                    rest = tail;
                },
                128 => break,
                129..=255 => {
                    let (&byte, tail) = rest.split_first().ok_or_else(|| {
                        Error::Decode("RunLengthDecode: missing byte for run".to_string())
                    })?;
                    output.resize(output.len() + 257 - length as usize, byte);
                    rest = tail;
                },
            }
        }

        Ok(output)
    }

    fn name(&self) -> &str {
        "RunLengthDecode"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_and_repeat() {
        let input = [2, b'a', b'b', b'c', 254, b'x', 128, b'z'];
        assert_eq!(RunLengthDecoder.decode(&input).unwrap(), b"abcxxx");
    }

    #[test]
    fn test_truncated_literal() {
        assert!(RunLengthDecoder.decode(&[5, b'a']).is_err());
    }

    #[test]
    fn test_missing_repeat_byte() {
        assert!(RunLengthDecoder.decode(&[200]).is_err());
    }

    #[test]
    fn test_empty() {
        assert!(RunLengthDecoder.decode(&[]).unwrap().is_empty());
    }
}
