use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Result;
use geo::Point;
use itertools::Itertools;

use crate::{
    codec::Encoding,
    dedup::dedup_by_id,
    group::group_nearby,
    model::{CanonicalPlace, Place, RawPlace},
    rank::KeywordRanker,
    Category,
};

/// Runs one category's records through dedup, merging, naming and brand
/// filtering, producing the ordered list the codec persists.
pub fn pipeline(category: Category, raw: Vec<RawPlace>) -> Vec<Place> {
    let places = dedup_by_id(raw);

    let canonical = match category.merge_radius_km() {
        Some(radius_km) => {
            let ranker = KeywordRanker::new(category.name_keywords().iter().copied());
            merge_nearby(places, radius_km, &ranker)
        }
        None => places.into_iter().map(CanonicalPlace::single).collect(),
    };

    let mut output = Vec::with_capacity(canonical.len());
    for place in canonical {
        let name = match category.brands() {
            Some(vocabulary) => {
                // unbranded stations aren't rendered on the map
                match vocabulary.normalize_place(place.brand(), Some(place.name.as_str())) {
                    Some(x) => x.to_string(),
                    None => continue,
                }
            }
            None => place.name.clone(),
        };
        output.push(Place {
            point: place.point,
            name,
            opening_hours: place.opening_hours().to_string(),
        });
    }
    output
}

/// Collapses transitive near-duplicates into canonical places. Each
/// group keeps all its sources in input order, takes the centroid as
/// its location and the best-ranked name variant as its label.
fn merge_nearby(
    places: Vec<RawPlace>,
    radius_km: f64,
    ranker: &KeywordRanker,
) -> Vec<CanonicalPlace> {
    let points: Vec<Point> = places.iter().map(|x| x.point).collect();
    let groups = group_nearby(&points, radius_km);

    let mut canonical = Vec::with_capacity(groups.len());
    for group in groups {
        let sources: Vec<RawPlace> = group.iter().map(|x| places[*x].clone()).collect();
        let name = ranker
            .best(sources.iter().map(|x| x.display_name()))
            .unwrap_or("")
            .to_string();
        let point = centroid(&sources);
        canonical.push(CanonicalPlace {
            name,
            point,
            sources,
        });
    }
    canonical
}

fn centroid(places: &[RawPlace]) -> Point {
    let (x, y) = places.iter().fold((0.0, 0.0), |acc, place| {
        (acc.0 + place.point.x(), acc.1 + place.point.y())
    });
    Point::new(x / places.len() as f64, y / places.len() as f64)
}

pub fn read_raw(path: &Path) -> Result<Vec<RawPlace>> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

pub fn write_raw(path: &Path, places: &[RawPlace]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut json = serde_json::to_string_pretty(places)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}

/// Encodes and writes one category file, `<out>/<slug>.<ext>`.
pub fn write_category(
    out: &Path,
    category: Category,
    encoding: Encoding,
    places: &[Place],
) -> Result<PathBuf> {
    fs::create_dir_all(out)?;
    let path = out.join(format!("{}.{}", category.slug(), encoding.extension()));
    fs::write(&path, encoding.encode(places)?)?;
    Ok(path)
}

/// One-line summary for the update log.
pub fn summarize(places: &[Place]) -> String {
    let names = places
        .iter()
        .map(|x| x.name.as_str())
        .filter(|x| !x.is_empty())
        .unique()
        .count();
    format!("{} places, {names} distinct names", places.len())
}
