use anyhow::{bail, Context, Result};

use crate::model::Place;

use super::{scaled, SCALE};

/// Packed variant: per record an i32 little-endian latitude delta, an
/// i32 longitude delta, then `name` and `openingHours` as
/// null-terminated UTF-8. NUL bytes inside the source text are
/// stripped so the terminators stay unambiguous.
pub fn encode_bytes(places: &[Place]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut prev_lat = 0i64;
    let mut prev_lng = 0i64;

    for place in places {
        let lat = scaled(place.lat());
        let lng = scaled(place.lng());
        let d_lat = i32::try_from(lat - prev_lat).context("latitude delta out of range")?;
        let d_lng = i32::try_from(lng - prev_lng).context("longitude delta out of range")?;
        prev_lat = lat;
        prev_lng = lng;

        out.extend_from_slice(&d_lat.to_le_bytes());
        out.extend_from_slice(&d_lng.to_le_bytes());
        push_str(&mut out, &place.name);
        push_str(&mut out, &place.opening_hours);
    }
    Ok(out)
}

fn push_str(out: &mut Vec<u8>, text: &str) {
    out.extend(text.bytes().filter(|x| *x != 0));
    out.push(0);
}

/// Inverse of [`encode_bytes`]. A record that stops mid-coordinate or
/// never hits its terminator is a corrupt file and fails the whole
/// decode; there are no silently dropped records.
pub fn decode_bytes(data: &[u8]) -> Result<Vec<Place>> {
    let mut offset = 0;
    let mut lat = 0i64;
    let mut lng = 0i64;

    let mut places = Vec::new();
    while offset < data.len() {
        lat += i64::from(read_i32(data, &mut offset)?);
        lng += i64::from(read_i32(data, &mut offset)?);
        let name = read_str(data, &mut offset)?;
        let opening_hours = read_str(data, &mut offset)?;
        places.push(Place::new(
            lat as f64 / SCALE,
            lng as f64 / SCALE,
            name,
            opening_hours,
        ));
    }
    Ok(places)
}

fn read_i32(data: &[u8], offset: &mut usize) -> Result<i32> {
    let end = *offset + 4;
    if end > data.len() {
        bail!("truncated record at byte {offset}");
    }
    let value = i32::from_le_bytes(data[*offset..end].try_into().expect("hardcoded"));
    *offset = end;
    Ok(value)
}

fn read_str<'a>(data: &'a [u8], offset: &mut usize) -> Result<&'a str> {
    let start = *offset;
    let Some(length) = data[start..].iter().position(|x| *x == 0) else {
        bail!("unterminated string at byte {start}")
    };
    let text = std::str::from_utf8(&data[start..start + length])
        .with_context(|| format!("invalid utf-8 at byte {start}"))?;
    *offset = start + length + 1;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_deltas_then_terminated_strings() {
        let places = vec![
            Place::new(51.0, 12.0, "A", ""),
            Place::new(51.00001, 12.00001, "B", ""),
        ];
        let encoded = encode_bytes(&places).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(&5_100_000i32.to_le_bytes());
        expected.extend_from_slice(&1_200_000i32.to_le_bytes());
        expected.extend_from_slice(b"A\0\0");
        expected.extend_from_slice(&1i32.to_le_bytes());
        expected.extend_from_slice(&1i32.to_le_bytes());
        expected.extend_from_slice(b"B\0\0");
        assert_eq!(encoded, expected);
    }

    #[test]
    fn round_trips_umlauts_and_hours() {
        let places = vec![
            Place::new(52.52, 13.405, "Südfriedhof", "Mo-Su 08:00-18:00"),
            Place::new(48.137, 11.575, "Bäckerei Müller", ""),
        ];
        let decoded = decode_bytes(&encode_bytes(&places).unwrap()).unwrap();
        assert_eq!(decoded.len(), 2);
        for (a, b) in decoded.iter().zip(&places) {
            assert!((a.lat() - b.lat()).abs() < 1e-5);
            assert!((a.lng() - b.lng()).abs() < 1e-5);
            assert_eq!(a.name, b.name);
            assert_eq!(a.opening_hours, b.opening_hours);
        }
    }

    #[test]
    fn embedded_nuls_are_stripped() {
        let places = vec![Place::new(51.0, 12.0, "A\0B", "")];
        let decoded = decode_bytes(&encode_bytes(&places).unwrap()).unwrap();
        assert_eq!(decoded[0].name, "AB");
    }

    #[test]
    fn truncation_is_a_fatal_error() {
        let encoded = encode_bytes(&[Place::new(51.0, 12.0, "A", "24/7")]).unwrap();

        // mid-coordinate
        assert!(decode_bytes(&encoded[..6]).is_err());
        // string without its terminator
        assert!(decode_bytes(&encoded[..encoded.len() - 1]).is_err());
        // a stray byte after a full record
        let mut trailing = encoded.clone();
        trailing.push(7);
        assert!(decode_bytes(&trailing).is_err());
    }

    #[test]
    fn empty_input_decodes_to_nothing() {
        assert!(decode_bytes(&[]).unwrap().is_empty());
    }
}
