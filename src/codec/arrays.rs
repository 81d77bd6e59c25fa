use anyhow::{bail, Result};
use serde_json::{json, Value};

use crate::model::Place;

use super::{scaled, SCALE};

/// JSON variant: one row of `[dLat, dLng, name?, openingHours?]` per
/// place. The first row's deltas are against zero. Empty trailing
/// strings are left off a row to keep the files small.
pub fn encode_arrays(places: &[Place]) -> Value {
    let mut prev_lat = 0;
    let mut prev_lng = 0;

    let mut rows = Vec::with_capacity(places.len());
    for place in places {
        let lat = scaled(place.lat());
        let lng = scaled(place.lng());
        let mut row = vec![json!(lat - prev_lat), json!(lng - prev_lng)];
        prev_lat = lat;
        prev_lng = lng;

        if !place.opening_hours.is_empty() {
            row.push(json!(place.name));
            row.push(json!(place.opening_hours));
        } else if !place.name.is_empty() {
            row.push(json!(place.name));
        }
        rows.push(Value::Array(row));
    }
    Value::Array(rows)
}

/// Inverse of [`encode_arrays`]: a running sum over the deltas in
/// strict row order. Any malformed row fails the whole decode; a file
/// that parses halfway is corrupt, not half-usable.
pub fn decode_arrays(data: &Value) -> Result<Vec<Place>> {
    let Some(rows) = data.as_array() else {
        bail!("expected a top-level array")
    };

    let mut lat = 0i64;
    let mut lng = 0i64;
    let mut places = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let Some(row) = row.as_array() else {
            bail!("row {index}: expected an array")
        };
        if row.len() < 2 || row.len() > 4 {
            bail!("row {index}: expected 2 to 4 values, got {}", row.len());
        }

        let Some(d_lat) = row[0].as_i64() else {
            bail!("row {index}: latitude offset is not an integer")
        };
        let Some(d_lng) = row[1].as_i64() else {
            bail!("row {index}: longitude offset is not an integer")
        };
        lat += d_lat;
        lng += d_lng;

        let name = match row.get(2) {
            None => "",
            Some(x) => match x.as_str() {
                Some(x) => x,
                None => bail!("row {index}: name is not a string"),
            },
        };
        let opening_hours = match row.get(3) {
            None => "",
            Some(x) => match x.as_str() {
                Some(x) => x,
                None => bail!("row {index}: opening hours are not a string"),
            },
        };

        places.push(Place::new(
            lat as f64 / SCALE,
            lng as f64 / SCALE,
            name,
            opening_hours,
        ));
    }
    Ok(places)
}
