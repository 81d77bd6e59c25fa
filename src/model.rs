use std::collections::BTreeMap;

use geo::Point;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OsmId {
    Node(u64),
    Way(u64),
    Relation(u64),
}

/// A tagged point of interest as fetched, before any merging.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawPlace {
    pub id: OsmId,
    #[serde(flatten)]
    pub point: Point,
    pub tags: BTreeMap<String, String>,
}

impl RawPlace {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(|x| &**x)
    }

    /// Label for rendering: `name`, falling back to `brand`, then
    /// `operator`.
    pub fn display_name(&self) -> &str {
        self.tag("name")
            .or_else(|| self.tag("brand"))
            .or_else(|| self.tag("operator"))
            .unwrap_or("")
    }

    pub fn opening_hours(&self) -> &str {
        self.tag("opening_hours").unwrap_or("")
    }
}

/// One deduplicated real-world place and the source records merged into
/// it. Sources keep their input order; the point is the group centroid.
#[derive(Clone, Debug)]
pub struct CanonicalPlace {
    pub name: String,
    pub point: Point,
    pub sources: Vec<RawPlace>,
}

impl CanonicalPlace {
    pub fn single(place: RawPlace) -> Self {
        Self {
            name: place.display_name().to_string(),
            point: place.point,
            sources: vec![place],
        }
    }

    pub fn brand(&self) -> Option<&str> {
        self.sources.first().and_then(|x| x.tag("brand"))
    }

    pub fn opening_hours(&self) -> &str {
        self.sources.first().map(|x| x.opening_hours()).unwrap_or("")
    }
}

/// The record shape the codec persists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(flatten)]
    pub point: Point,
    pub name: String,
    pub opening_hours: String,
}

impl Place {
    pub fn new(lat: f64, lng: f64, name: &str, opening_hours: &str) -> Self {
        Self {
            point: Point::new(lng, lat),
            name: name.to_string(),
            opening_hours: opening_hours.to_string(),
        }
    }

    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    pub fn lng(&self) -> f64 {
        self.point.x()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: u64, tags: &[(&str, &str)]) -> RawPlace {
        RawPlace {
            id: OsmId::Node(id),
            point: Point::new(12.0, 51.0),
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn display_name_fallback() {
        assert_eq!(raw(1, &[("name", "Aral Leipzig")]).display_name(), "Aral Leipzig");
        assert_eq!(raw(2, &[("brand", "Aral")]).display_name(), "Aral");
        assert_eq!(
            raw(3, &[("operator", "Aral AG"), ("brand", "Aral")]).display_name(),
            "Aral"
        );
        assert_eq!(raw(4, &[]).display_name(), "");
    }

    #[test]
    fn osm_id_order_is_stable() {
        let mut ids = vec![OsmId::Way(1), OsmId::Node(7), OsmId::Node(2)];
        ids.sort();
        assert_eq!(ids, vec![OsmId::Node(2), OsmId::Node(7), OsmId::Way(1)]);
    }
}
