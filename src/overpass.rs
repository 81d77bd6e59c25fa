use std::{collections::BTreeMap, fmt::Write};

use anyhow::Result;
use geo::Point;
use serde::Deserialize;
use ureq::{Agent, AgentBuilder};

use crate::model::{OsmId, RawPlace};

pub const ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Countries the map ships data for, by ISO 3166-1 code.
pub const COUNTRIES: &[&str] = &[
    "DE", "PL", "CZ", "AT", "IT", "CH", "FR", "ES", "BE", "NL", "LU",
];

pub fn agent() -> Agent {
    AgentBuilder::new().user_agent("places-pipeline/0.1").build()
}

/// One area clause per country, the selectors unioned, centers only.
/// `out center qt` keeps the response order stable enough to diff; the
/// caller still sorts by id before persisting.
pub fn build_query(countries: &[&str], selectors: &[&str]) -> String {
    let mut q = String::from("[out:json][timeout:600];\n(");
    for country in countries {
        let _ = write!(q, "area[\"ISO3166-1\"=\"{country}\"][admin_level=2];");
    }
    q.push_str(");\n");
    for (index, selector) in selectors.iter().enumerate() {
        let _ = writeln!(q, "{selector} -> .q{index};");
    }
    q.push('(');
    for index in 0..selectors.len() {
        let _ = write!(q, ".q{index};");
    }
    q.push_str(");\nout center qt;");
    q
}

pub fn query(agent: &Agent, countries: &[&str], selectors: &[&str]) -> Result<Vec<RawPlace>> {
    let payload = build_query(countries, selectors);
    let response: OverpassResponse = agent
        .post(ENDPOINT)
        .send_form(&[("data", &payload)])?
        .into_json()?;

    Ok(response
        .elements
        .into_iter()
        .filter_map(|x| x.simplify())
        .collect())
}

#[derive(Deserialize)]
struct OverpassResponse {
    elements: Vec<RawElement>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum RawElement {
    Node {
        id: u64,
        #[serde(flatten)]
        center: RawPosition,
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
    Way {
        id: u64,
        center: RawPosition,
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
    Relation {
        id: u64,
        center: RawPosition,
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
}

impl RawElement {
    /// Untagged elements carry nothing worth rendering.
    fn simplify(self) -> Option<RawPlace> {
        let (id, center, tags) = match self {
            Self::Node { id, center, tags } => (OsmId::Node(id), center, tags),
            Self::Way { id, center, tags } => (OsmId::Way(id), center, tags),
            Self::Relation { id, center, tags } => (OsmId::Relation(id), center, tags),
        };
        if tags.is_empty() {
            return None;
        }
        Some(RawPlace {
            id,
            point: center.simplify(),
            tags,
        })
    }
}

#[derive(Deserialize)]
struct RawPosition {
    lat: f64,
    lon: f64,
}

impl RawPosition {
    fn simplify(self) -> Point {
        Point::new(self.lon, self.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_template_unions_selectors() {
        let q = build_query(&["DE", "AT"], &["nwr[amenity=fuel](area)"]);
        assert!(q.starts_with("[out:json][timeout:600];"));
        assert!(q.contains("area[\"ISO3166-1\"=\"DE\"][admin_level=2];"));
        assert!(q.contains("area[\"ISO3166-1\"=\"AT\"][admin_level=2];"));
        assert!(q.contains("nwr[amenity=fuel](area) -> .q0;"));
        assert!(q.ends_with("(.q0;);\nout center qt;"));
    }

    #[test]
    fn elements_parse_with_and_without_center() {
        let payload = r#"{"elements": [
            {"type": "node", "id": 1, "lat": 51.0, "lon": 12.0,
             "tags": {"name": "A"}},
            {"type": "way", "id": 2, "center": {"lat": 50.0, "lon": 11.0},
             "tags": {"brand": "B"}},
            {"type": "node", "id": 3, "lat": 49.0, "lon": 10.0}
        ]}"#;
        let response: OverpassResponse = serde_json::from_str(payload).unwrap();
        let places: Vec<RawPlace> = response
            .elements
            .into_iter()
            .filter_map(|x| x.simplify())
            .collect();

        // the untagged node is discarded
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].id, OsmId::Node(1));
        assert_eq!(places[0].point.y(), 51.0);
        assert_eq!(places[1].id, OsmId::Way(2));
        assert_eq!(places[1].display_name(), "B");
    }
}
