//! Operand and operator serialization.
//!
//! Every content stream token goes through [`OperatorWriter`]: operands are
//! followed by a single space, operators by a single newline. Real numbers
//! never use exponent notation or digit grouping and carry at most
//! [`NumberFormat::max_fraction_digits`] fractional digits.

use crate::config::NumberFormat;
use crate::error::{Error, Result};
use std::io::Write;

/// Writes content stream tokens to a byte sink.
#[derive(Debug)]
pub struct OperatorWriter<W: Write> {
    sink: W,
    format: NumberFormat,
}

impl<W: Write> OperatorWriter<W> {
    /// Create a writer with the default number format.
    pub fn new(sink: W) -> Self {
        Self::with_format(sink, NumberFormat::default())
    }

    /// Create a writer with an explicit number format.
    pub fn with_format(sink: W, format: NumberFormat) -> Self {
        Self { sink, format }
    }

    /// The number format in use.
    pub fn number_format(&self) -> NumberFormat {
        self.format
    }

    /// Write a real operand followed by a space.
    ///
    /// NaN and infinities have no PDF representation and are rejected
    /// before anything is written.
    pub fn write_real(&mut self, value: f32) -> Result<()> {
        self.write_reals(&[value])
    }

    /// Write real operands, each followed by a space.
    ///
    /// Nothing is written unless every value is finite.
    pub fn write_reals(&mut self, values: &[f32]) -> Result<()> {
        let mut text = String::new();
        for &value in values {
            let formatted = format_real(value, self.format.max_fraction_digits)
                .ok_or_else(|| non_finite(value))?;
            text.push_str(&formatted);
            text.push(' ');
        }
        self.sink.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Write an integer operand followed by a space.
    pub fn write_integer(&mut self, value: i64) -> Result<()> {
        write!(self.sink, "{} ", value)?;
        Ok(())
    }

    /// Write a name operand (`/Name`) followed by a space.
    pub fn write_name(&mut self, name: &str) -> Result<()> {
        self.sink.write_all(escape_name(name).as_bytes())?;
        self.sink.write_all(b" ")?;
        Ok(())
    }

    /// Write a string operand followed by a space.
    ///
    /// Plain ASCII without line breaks is written as a literal `( )` string,
    /// anything else as a hex `< >` string.
    pub fn write_string(&mut self, bytes: &[u8]) -> Result<()> {
        let literal = bytes.iter().all(|&b| b < 0x80 && b != b'\r' && b != b'\n');
        if literal {
            self.sink.write_all(b"(")?;
            for &byte in bytes {
                match byte {
                    b'(' | b')' | b'\\' => self.sink.write_all(&[b'\\', byte])?,
                    _ => self.sink.write_all(&[byte])?,
                }
            }
            self.sink.write_all(b")")?;
        } else {
            self.sink.write_all(b"<")?;
            for byte in bytes {
                write!(self.sink, "{:02X}", byte)?;
            }
            self.sink.write_all(b">")?;
        }
        self.sink.write_all(b" ")?;
        Ok(())
    }

    /// Write an operator followed by a newline.
    pub fn write_operator(&mut self, operator: &str) -> Result<()> {
        self.sink.write_all(operator.as_bytes())?;
        self.sink.write_all(b"\n")?;
        Ok(())
    }

    /// Write ASCII text verbatim.
    pub fn write_raw(&mut self, text: &str) -> Result<()> {
        self.sink.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Write bytes verbatim.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.sink.write_all(bytes)?;
        Ok(())
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Unwrap the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Format a real number for a content stream.
///
/// Uses the shortest representation that round-trips the `f32`, rounded to
/// `max_fraction_digits` when longer, with trailing zeros removed.
/// Returns `None` for NaN and infinities.
pub fn format_real(value: f32, max_fraction_digits: usize) -> Option<String> {
    if !value.is_finite() {
        return None;
    }

    // f32's Display never switches to exponent notation
    let shortest = value.to_string();
    let formatted = match shortest.split_once('.') {
        Some((_, fraction)) if fraction.len() > max_fraction_digits => {
            trim_fraction(format!("{:.*}", max_fraction_digits, value as f64))
        },
        _ => shortest,
    };

    if formatted == "-0" {
        Some("0".to_string())
    } else {
        Some(formatted)
    }
}

/// Reject NaN and infinities, which have no content stream representation.
pub fn check_finite(values: &[f32]) -> Result<()> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(non_finite(value)),
        None => Ok(()),
    }
}

fn non_finite(value: f32) -> Error {
    Error::UnsupportedValue(format!("non-finite operand {}", value))
}

fn trim_fraction(mut text: String) -> String {
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    text
}

/// Escape a name per PDF name syntax, including the leading slash.
///
/// Bytes outside `!`..=`~`, delimiters and `#` are written as `#XX`.
pub fn escape_name(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len() + 1);
    escaped.push('/');
    for &byte in name.as_bytes() {
        let regular = (0x21..=0x7E).contains(&byte)
            && !matches!(
                byte,
                b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' | b'#'
            );
        if regular {
            escaped.push(byte as char);
        } else {
            escaped.push_str(&format!("#{:02X}", byte));
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(f: impl FnOnce(&mut OperatorWriter<Vec<u8>>) -> Result<()>) -> String {
        let mut writer = OperatorWriter::new(Vec::new());
        f(&mut writer).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_format_integral_real() {
        assert_eq!(format_real(72.0, 10).unwrap(), "72");
        assert_eq!(format_real(-3.0, 10).unwrap(), "-3");
        assert_eq!(format_real(0.0, 10).unwrap(), "0");
        assert_eq!(format_real(-0.0, 10).unwrap(), "0");
    }

    #[test]
    fn test_format_fraction() {
        assert_eq!(format_real(0.5, 10).unwrap(), "0.5");
        assert_eq!(format_real(0.1, 10).unwrap(), "0.1");
        assert_eq!(format_real(12.25, 10).unwrap(), "12.25");
    }

    #[test]
    fn test_format_limits_fraction_digits() {
        assert_eq!(format_real(1.0 / 3.0, 4).unwrap(), "0.3333");
        assert_eq!(format_real(2.0 / 3.0, 2).unwrap(), "0.67");
        assert_eq!(format_real(0.000_01, 3).unwrap(), "0");
    }

    #[test]
    fn test_format_large_without_grouping_or_exponent() {
        assert_eq!(format_real(1_000_000.0, 10).unwrap(), "1000000");
        assert_eq!(format_real(1e20, 10).unwrap(), "100000000000000000000");
    }

    #[test]
    fn test_format_small_without_exponent() {
        let text = format_real(1e-7, 10).unwrap();
        assert!(!text.contains('e'));
        assert!(text.starts_with("0.0000001"));
    }

    #[test]
    fn test_format_non_finite() {
        assert!(format_real(f32::NAN, 10).is_none());
        assert!(format_real(f32::INFINITY, 10).is_none());
    }

    #[test]
    fn test_write_real_rejects_nan() {
        let mut writer = OperatorWriter::new(Vec::new());
        let err = writer.write_real(f32::NAN).unwrap_err();
        assert!(matches!(err, Error::UnsupportedValue(_)));
        assert!(writer.get_ref().is_empty());
    }

    #[test]
    fn test_write_reals_is_all_or_nothing() {
        let mut writer = OperatorWriter::new(Vec::new());
        let result = writer.write_reals(&[1.0, 2.0, f32::INFINITY]);
        assert!(matches!(result, Err(Error::UnsupportedValue(_))));
        assert!(writer.get_ref().is_empty());

        writer.write_reals(&[1.0, 2.5]).unwrap();
        assert_eq!(writer.into_inner(), b"1 2.5 ");
    }

    #[test]
    fn test_check_finite() {
        assert!(check_finite(&[0.0, -1.5, f32::MAX]).is_ok());
        assert!(matches!(check_finite(&[0.0, f32::NAN]), Err(Error::UnsupportedValue(_))));
    }

    #[test]
    fn test_operand_and_operator() {
        let out = written(|w| {
            w.write_real(1.5)?;
            w.write_integer(2)?;
            w.write_operator("re")
        });
        assert_eq!(out, "1.5 2 re\n");
    }

    #[test]
    fn test_escape_name() {
        assert_eq!(escape_name("F1"), "/F1");
        assert_eq!(escape_name("A B"), "/A#20B");
        assert_eq!(escape_name("a#b/c"), "/a#23b#2Fc");
        assert_eq!(escape_name("Café"), "/Caf#C3#A9");
    }

    #[test]
    fn test_write_name() {
        let out = written(|w| w.write_name("DeviceRGB"));
        assert_eq!(out, "/DeviceRGB ");
    }

    #[test]
    fn test_literal_string_escaping() {
        let out = written(|w| w.write_string(b"a(b)c\\"));
        assert_eq!(out, "(a\\(b\\)c\\\\) ");
    }

    #[test]
    fn test_non_ascii_string_is_hex() {
        let out = written(|w| w.write_string(&[0x00, 0x24, 0xE9]));
        assert_eq!(out, "<0024E9> ");

        let out = written(|w| w.write_string(b"line\n"));
        assert_eq!(out, "<6C696E650A> ");
    }

    #[test]
    fn test_raw_output() {
        let out = written(|w| {
            w.write_raw("W\n")?;
            w.write_bytes(b"n\n")
        });
        assert_eq!(out, "W\nn\n");
    }

    #[test]
    fn test_custom_format() {
        let mut writer = OperatorWriter::with_format(Vec::new(), NumberFormat::new(2));
        writer.write_real(3.14159).unwrap();
        assert_eq!(writer.number_format().max_fraction_digits, 2);
        assert_eq!(writer.into_inner(), b"3.14 ");
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_propagates() {
        let mut writer = OperatorWriter::new(FailingSink);
        let err = writer.write_operator("q").unwrap_err();
        assert!(matches!(err, Error::Write(_)));
    }
}
