//! Predictor functions for Flate and LZW streams (`/DecodeParms`).
//!
//! Predictor 2 is TIFF horizontal differencing, 10 to 15 are the PNG row
//! filters. PNG rows carry a leading filter-type byte; with predictor 15
//! the type may change per row, with 10 to 14 the byte is still present
//! but writers are not trusted to fill it, so the predictor value wins.

use crate::error::{Error, Result};
use crate::object::Object;

/// Decode parameters for Flate and LZW streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeParams {
    /// Predictor algorithm (1 = none, 2 = TIFF, 10-15 = PNG)
    pub predictor: i64,
    /// Samples per row
    pub columns: usize,
    /// Color components per sample
    pub colors: usize,
    /// Bits per color component
    pub bits_per_component: usize,
    /// LZW code width switch (`/EarlyChange`)
    pub early_change: bool,
}

impl Default for DecodeParams {
    fn default() -> Self {
        Self {
            predictor: 1,
            columns: 1,
            colors: 1,
            bits_per_component: 8,
            early_change: true,
        }
    }
}

impl DecodeParams {
    /// Read parameters from a `/DecodeParms` dictionary. Missing entries keep their defaults.
    pub fn from_object(object: &Object) -> Self {
        let mut params = Self::default();
        let Some(dict) = object.as_dict() else {
            return params;
        };
        let int = |key: &str| dict.get(key).and_then(Object::as_integer);

        if let Some(predictor) = int("Predictor") {
            params.predictor = predictor;
        }
        if let Some(columns) = int("Columns") {
            params.columns = columns.max(1) as usize;
        }
        if let Some(colors) = int("Colors") {
            params.colors = colors.max(1) as usize;
        }
        if let Some(bpc) = int("BitsPerComponent") {
            params.bits_per_component = bpc.max(1) as usize;
        }
        if let Some(early_change) = int("EarlyChange") {
            params.early_change = early_change != 0;
        }
        params
    }

    /// Bytes of sample data per row.
    pub fn row_bytes(&self) -> Result<usize> {
        self.pixel_bits()?
            .checked_mul(self.columns)
            .map(|bits| bits.div_ceil(8))
            .ok_or_else(|| self.too_large())
    }

    /// Bytes per complete pixel, at least one.
    pub fn pixel_bytes(&self) -> Result<usize> {
        Ok(self.pixel_bits()?.div_ceil(8).max(1))
    }

    fn pixel_bits(&self) -> Result<usize> {
        self.colors
            .checked_mul(self.bits_per_component)
            .ok_or_else(|| self.too_large())
    }

    fn too_large(&self) -> Error {
        Error::Decode(format!(
            "Predictor row of {} columns, {} colors at {} bits does not fit in memory",
            self.columns, self.colors, self.bits_per_component
        ))
    }
}

/// Undo the predictor described by `params`.
pub fn decode_predictor(data: &[u8], params: &DecodeParams) -> Result<Vec<u8>> {
    match params.predictor {
        1 => Ok(data.to_vec()),
        2 => decode_tiff(data, params),
        10..=15 => decode_png(data, params),
        other => Err(Error::Decode(format!("Unsupported predictor: {}", other))),
    }
}

fn decode_tiff(data: &[u8], params: &DecodeParams) -> Result<Vec<u8>> {
    if params.bits_per_component != 8 {
        return Err(Error::Decode(format!(
            "TIFF predictor with {} bits per component is not supported",
            params.bits_per_component
        )));
    }
    let row_bytes = params.row_bytes()?;
    let colors = params.colors;
    let mut output = data.to_vec();

    for row in output.chunks_mut(row_bytes) {
        for i in colors..row.len() {
            row[i] = row[i].wrapping_add(row[i - colors]);
        }
    }
    Ok(output)
}

fn decode_png(data: &[u8], params: &DecodeParams) -> Result<Vec<u8>> {
    let row_bytes = params.row_bytes()?;
    let bpp = params.pixel_bytes()?;
    let stride = row_bytes
        .checked_add(1)
        .filter(|&stride| stride <= data.len())
        .unwrap_or(0);
    if stride == 0 {
        log::warn!(
            "PNG predictor: {} bytes do not hold one row of {} bytes",
            data.len(),
            row_bytes
        );
        return Ok(Vec::new());
    }

    let rows = data.chunks_exact(stride);
    if !rows.remainder().is_empty() {
        log::warn!(
            "PNG predictor: ignoring {} trailing bytes of an incomplete row",
            rows.remainder().len()
        );
    }

    let mut output = Vec::with_capacity(data.len() / stride * row_bytes);
    let mut previous = vec![0u8; row_bytes];
    let mut current = vec![0u8; row_bytes];

    for row in rows {
        let filter = if params.predictor == 15 {
            row[0]
        } else {
            (params.predictor - 10) as u8
        };
        let encoded = &row[1..];

        for i in 0..row_bytes {
            let left = if i >= bpp { current[i - bpp] } else { 0 };
            let up = previous[i];
            let up_left = if i >= bpp { previous[i - bpp] } else { 0 };
            let predicted = match filter {
                0 => 0,
                1 => left,
                2 => up,
                3 => ((left as u16 + up as u16) / 2) as u8,
                4 => paeth(left, up, up_left),
                other => {
                    return Err(Error::Decode(format!("Invalid PNG predictor tag: {}", other)))
                },
            };
            current[i] = encoded[i].wrapping_add(predicted);
        }

        output.extend_from_slice(&current);
        std::mem::swap(&mut previous, &mut current);
    }

    Ok(output)
}

fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i16 + b as i16 - c as i16;
    let pa = (p - a as i16).abs();
    let pb = (p - b as i16).abs();
    let pc = (p - c as i16).abs();
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}
