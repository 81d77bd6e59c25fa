use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::model::Place;

mod arrays;
mod bytes;

pub use arrays::{decode_arrays, encode_arrays};
pub use bytes::{decode_bytes, encode_bytes};

/// Coordinates are persisted at 1e-5 degree (~1.1 m) precision. The
/// encoder and decoder must agree on this exactly; deltas are computed
/// between consecutive scaled, rounded coordinates.
pub const SCALE: f64 = 1e5;

pub(crate) fn scaled(coordinate: f64) -> i64 {
    (coordinate * SCALE).round() as i64
}

/// Persisted representation of a place list. One pipeline, two output
/// shapes; the choice is configuration, not a separate code path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    Json,
    Bytes,
}

impl Encoding {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Bytes => "bin",
        }
    }

    pub fn encode(&self, places: &[Place]) -> Result<Vec<u8>> {
        match self {
            Self::Json => Ok(serde_json::to_vec(&encode_arrays(places))?),
            Self::Bytes => encode_bytes(places),
        }
    }

    pub fn decode(&self, data: &[u8]) -> Result<Vec<Place>> {
        match self {
            Self::Json => decode_arrays(&serde_json::from_slice(data)?),
            Self::Bytes => decode_bytes(data),
        }
    }
}

/// The decoded list as GeoJSON point features, the shape the map client
/// renders. Empty names and hours are left off the properties.
pub fn to_geojson(places: &[Place]) -> Value {
    let features: Vec<Value> = places
        .iter()
        .map(|place| {
            let mut properties = Map::new();
            if !place.name.is_empty() {
                properties.insert("name".to_string(), json!(place.name));
            }
            if !place.opening_hours.is_empty() {
                properties.insert("openingHours".to_string(), json!(place.opening_hours));
            }
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [place.lng(), place.lat()],
                },
                "properties": properties,
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}
