//! Decoder for the encoded polyline format returned by the routing service.
//!
//! Each value is a zig-zag delta from the previous coordinate, split into
//! 5-bit groups offset by 63 into printable ASCII. Bit 0x20 of a group marks
//! that more groups follow. Latitude and longitude alternate.

use crate::error::PolylineError;
use crate::models::Coordinate;

/// Precision used by `polyline` geometries (1e-5 degrees).
pub const DEFAULT_PRECISION: u32 = 5;

const CHUNK_OFFSET: u8 = 63;
const CONTINUATION_BIT: i64 = 0x20;
const CHUNK_MASK: i64 = 0x1f;
const MAX_SHIFT: u32 = 60;

/// Decode a precision-5 polyline into coordinates.
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
    decode_with_precision(encoded, DEFAULT_PRECISION)
}

/// Decode a polyline encoded with `precision` decimal places (5 or 6 in practice).
pub fn decode_with_precision(encoded: &str, precision: u32) -> Result<Vec<Coordinate>, PolylineError> {
    let factor = 10f64.powi(precision as i32);
    let bytes = encoded.as_bytes();
    let mut coordinates = Vec::with_capacity(bytes.len() / 4);
    let mut offset = 0usize;
    let mut lat = 0i64;
    let mut lng = 0i64;

    while offset < bytes.len() {
        let start = offset;
        let dlat = next_value(bytes, &mut offset)?;
        if offset >= bytes.len() {
            return Err(PolylineError::DanglingLatitude);
        }
        let dlng = next_value(bytes, &mut offset)?;
        lat = lat
            .checked_add(dlat)
            .ok_or(PolylineError::Overflow { offset: start })?;
        lng = lng
            .checked_add(dlng)
            .ok_or(PolylineError::Overflow { offset: start })?;
        coordinates.push(Coordinate::new(lat as f64 / factor, lng as f64 / factor));
    }

    Ok(coordinates)
}

fn next_value(bytes: &[u8], offset: &mut usize) -> Result<i64, PolylineError> {
    let start = *offset;
    let mut result = 0i64;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = bytes.get(*offset) else {
            return Err(PolylineError::Truncated { offset: start });
        };
        if !(CHUNK_OFFSET..=126).contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                byte,
                offset: *offset,
            });
        }
        if shift > MAX_SHIFT {
            return Err(PolylineError::Overflow { offset: start });
        }
        *offset += 1;

        let chunk = i64::from(byte - CHUNK_OFFSET);
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;

        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }

    // Low bit carries the sign; negative values are stored inverted.
    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}
