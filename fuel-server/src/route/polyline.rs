//! Encoded polyline decoding (precision 1e5).
//!
//! Each coordinate is stored as a zig-zag encoded delta from the previous
//! point, split into 5-bit groups. Every character carries one group plus
//! 63; bit 0x20 marks that another group follows.

use crate::domain::GeoPoint;

/// Fixed-point scale of the encoding.
const PRECISION: f64 = 1e5;

/// Offset added to every encoded group to make it printable.
const CHAR_OFFSET: u8 = 63;

/// Continuation bit of a group.
const CONTINUATION: u64 = 0x20;

/// Error returned when decoding a malformed polyline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolylineError {
    /// The input ended in the middle of a coordinate.
    #[error("polyline truncated at byte {position}")]
    Truncated { position: usize },

    /// A byte outside the printable range used by the encoding.
    #[error("invalid polyline character {ch:?} at byte {position}")]
    InvalidCharacter { position: usize, ch: char },

    /// A group sequence too long to fit a 64-bit value.
    #[error("polyline value overflows at byte {position}")]
    Overflow { position: usize },
}

/// Decode an encoded polyline into points.
///
/// The empty string decodes to no points.
///
/// # Examples
///
/// ```
/// use fuel_server::route::decode_polyline;
///
/// let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
/// assert_eq!(points.len(), 3);
/// assert!((points[0].lat - 38.5).abs() < 1e-9);
/// assert!((points[2].lon + 126.453).abs() < 1e-9);
/// ```
pub fn decode_polyline(encoded: &str) -> Result<Vec<GeoPoint>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        let dlat = next_value(bytes, &mut index)?;
        // A latitude must always be followed by its longitude.
        if index >= bytes.len() {
            return Err(PolylineError::Truncated { position: index });
        }
        let dlon = next_value(bytes, &mut index)?;

        lat = lat
            .checked_add(dlat)
            .ok_or(PolylineError::Overflow { position: index })?;
        lon = lon
            .checked_add(dlon)
            .ok_or(PolylineError::Overflow { position: index })?;

        points.push(GeoPoint::new(lat as f64 / PRECISION, lon as f64 / PRECISION));
    }

    Ok(points)
}

/// Read one zig-zag encoded value starting at `*index`, advancing past it.
fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    loop {
        let position = *index;
        let &byte = bytes
            .get(position)
            .ok_or(PolylineError::Truncated { position })?;

        if !(CHAR_OFFSET..=b'~').contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                position,
                ch: char::from(byte),
            });
        }
        // A group at shift 60 would lose its top bit.
        if shift > u64::BITS - 5 {
            return Err(PolylineError::Overflow { position });
        }

        let group = u64::from(byte - CHAR_OFFSET);
        result |= (group & 0x1f) << shift;
        shift += 5;
        *index += 1;

        if group < CONTINUATION {
            break;
        }
    }

    let magnitude = (result >> 1) as i64;
    Ok(if result & 1 == 1 { !magnitude } else { magnitude })
}

/// Encode points as a polyline (precision 1e5), for test fixtures.
#[cfg(test)]
pub(crate) fn encode_polyline(points: &[GeoPoint]) -> String {
    fn push_value(out: &mut String, value: i64) {
        let mut v = (if value < 0 { !(value << 1) } else { value << 1 }) as u64;
        while v >= 0x20 {
            out.push(char::from((0x20 | (v & 0x1f)) as u8 + 63));
            v >>= 5;
        }
        out.push(char::from(v as u8 + 63));
    }

    let mut out = String::new();
    let (mut prev_lat, mut prev_lon) = (0i64, 0i64);
    for p in points {
        let lat = (p.lat * 1e5).round() as i64;
        let lon = (p.lon * 1e5).round() as i64;
        push_value(&mut out, lat - prev_lat);
        push_value(&mut out, lon - prev_lon);
        prev_lat = lat;
        prev_lon = lon;
    }
    out
}
