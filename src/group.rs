use geo::Point;

use crate::spatial::SpatialIndex;

/// Partitions `points` into maximal sets connected transitively by
/// "within `radius_km` of each other": if A is near B and B is near C,
/// all three land in one group even when A and C are far apart.
///
/// Membership is deterministic for a given input order and radius.
/// Groups appear in first-occurrence order of their earliest point and
/// list members in ascending input position. A radius of 0 only groups
/// identical coordinates. A radius wide enough to span the whole input
/// collapses it into one group; callers get no protection against that
/// beyond the finiteness check.
pub fn group_nearby(points: &[Point], radius_km: f64) -> Vec<Vec<usize>> {
    debug_assert!(radius_km.is_finite());

    let index = SpatialIndex::build(points);
    let mut processed = vec![false; points.len()];
    let mut groups = Vec::new();

    for start in 0..points.len() {
        if processed[start] {
            continue;
        }

        // flood fill over the index; explicit stack so country-sized
        // inputs can't blow the call stack
        let mut members = Vec::new();
        let mut stack = vec![start];
        processed[start] = true;
        while let Some(current) = stack.pop() {
            members.push(current);
            for next in index.query_radius(points[current], radius_km) {
                if !processed[next] {
                    processed[next] = true;
                    stack.push(next);
                }
            }
        }

        members.sort_unstable();
        groups.push(members);
    }

    // every input point lands in exactly one group
    debug_assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), points.len());
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_far_points_into_separate_groups() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.001),
            Point::new(10.0, 10.0),
        ];
        assert_eq!(
            group_nearby(&points, 0.5),
            vec![vec![0, 1], vec![2]]
        );
    }

    #[test]
    fn chains_merge_transitively() {
        // a-b and b-c within 0.5km, a-c roughly 800m apart
        let points = vec![
            Point::new(12.0, 51.0),
            Point::new(12.0, 51.0036),
            Point::new(12.0, 51.0072),
        ];
        assert_eq!(group_nearby(&points, 0.5), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn zero_radius_groups_identical_coordinates_only() {
        let points = vec![
            Point::new(12.0, 51.0),
            Point::new(12.0, 51.0),
            Point::new(12.0, 51.00001),
        ];
        assert_eq!(group_nearby(&points, 0.0), vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn output_partitions_the_input() {
        let points: Vec<Point> = (0..50)
            .map(|i| Point::new(12.0 + f64::from(i) * 0.01, 51.0 + f64::from(i % 7) * 0.02))
            .collect();

        let groups = group_nearby(&points, 1.5);
        let mut seen: Vec<usize> = groups.iter().flatten().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn regrouping_disjoint_centroids_is_a_fixpoint() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.001),
            Point::new(10.0, 10.0),
        ];
        let groups = group_nearby(&points, 0.5);

        let centroids: Vec<Point> = groups
            .iter()
            .map(|group| {
                let (x, y) = group.iter().fold((0.0, 0.0), |acc, i| {
                    (acc.0 + points[*i].x(), acc.1 + points[*i].y())
                });
                Point::new(x / group.len() as f64, y / group.len() as f64)
            })
            .collect();

        let regrouped = group_nearby(&centroids, 0.5);
        assert_eq!(regrouped.len(), groups.len());
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_nearby(&[], 0.5).is_empty());
    }
}
