use geo::{HaversineDistance, Point};
use rstar::{RTree, RTreeObject, AABB};

// one degree of latitude in kilometres, lower bound
const KM_PER_DEG: f64 = 110.574;

#[derive(Clone, Debug)]
struct IndexedPoint {
    position: usize,
    point: Point,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.point.x(), self.point.y()])
    }
}

/// Immutable neighbour index over a point set. Queries answer in
/// positions into the slice the index was built from.
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
}

impl SpatialIndex {
    pub fn build(points: &[Point]) -> Self {
        let entries = points
            .iter()
            .enumerate()
            .map(|(position, point)| IndexedPoint {
                position,
                point: *point,
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// All indexed points within `radius_km` great-circle distance of
    /// `point`, in unspecified order. A degree-envelope prefilter keeps
    /// the candidate set small; the haversine check makes it exact.
    pub fn query_radius(&self, point: Point, radius_km: f64) -> Vec<usize> {
        let d_lat = radius_km / KM_PER_DEG;
        let d_lng = d_lat / point.y().to_radians().cos().abs().max(1e-6);
        let envelope = AABB::from_corners(
            [point.x() - d_lng, point.y() - d_lat],
            [point.x() + d_lng, point.y() + d_lat],
        );

        let radius_m = radius_km * 1000.0;
        self.tree
            .locate_in_envelope(&envelope)
            .filter(|x| x.point.haversine_distance(&point) <= radius_m)
            .map(|x| x.position)
            .collect()
    }
}
