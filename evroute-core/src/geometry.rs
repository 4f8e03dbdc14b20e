//! Geometric utilities for corridor construction.
//!
//! Everything here works on `geo` primitives in lon/lat degrees with
//! haversine metrics, which is accurate enough for corridor filtering at
//! the tens-of-kilometres scale used by the pruner.

use geo::{
    Closest, Distance, Haversine, HaversineClosestPoint, InterpolatePoint, Length, LineString,
    Point, Simplify,
};

/// Ramer-Douglas-Peucker tolerance in coordinate degrees. Baseline routes
/// carry far more vertices than corridor filtering needs.
pub const SIMPLIFY_TOLERANCE_DEG: f64 = 0.0005;

/// Great-circle distance between two points in kilometres.
pub fn haversine_km(a: Point<f64>, b: Point<f64>) -> f64 {
    Haversine.distance(a, b) / 1000.0
}

/// Haversine length of a line in kilometres.
pub fn line_length_km(line: &LineString<f64>) -> f64 {
    Haversine.length(line) / 1000.0
}

/// Lossy simplification of a baseline route before buffering and slicing.
pub fn simplify_line(line: &LineString<f64>) -> LineString<f64> {
    line.simplify(SIMPLIFY_TOLERANCE_DEG)
}

/// Whether `point` lies within `radius_km` of the polyline. This is the
/// membership test for a round-capped corridor of that radius around the
/// line.
pub fn within_distance_of_line(point: Point<f64>, line: &LineString<f64>, radius_km: f64) -> bool {
    match line.haversine_closest_point(&point) {
        Closest::Intersection(closest) | Closest::SinglePoint(closest) => {
            Haversine.distance(point, closest) <= radius_km * 1000.0
        }
        Closest::Indeterminate => false,
    }
}

/// Point at `distance_km` along the line from its start, clamped to the
/// line's endpoints.
pub fn point_along_km(line: &LineString<f64>, distance_km: f64) -> Point<f64> {
    let mut remaining = distance_km.max(0.0) * 1000.0;
    let mut points = line.points();
    let Some(mut previous) = points.next() else {
        return Point::new(f64::NAN, f64::NAN);
    };

    for current in points {
        let segment = Haversine.distance(previous, current);
        if remaining <= segment {
            return Haversine.point_at_distance_between(previous, current, remaining);
        }
        remaining -= segment;
        previous = current;
    }

    previous
}

/// Slice of the line between two distances along it, in kilometres.
/// Bounds are clamped to the line length; a degenerate range yields a
/// two-point line at the clamped position.
pub fn slice_along_km(line: &LineString<f64>, start_km: f64, end_km: f64) -> LineString<f64> {
    let total_km = line_length_km(line);
    let start_m = start_km.clamp(0.0, total_km) * 1000.0;
    let end_m = end_km.clamp(0.0, total_km) * 1000.0;

    let mut coords = vec![point_along_km(line, start_m / 1000.0).into()];

    let mut travelled = 0.0;
    let mut points = line.points();
    if let Some(mut previous) = points.next() {
        for current in points {
            travelled += Haversine.distance(previous, current);
            if travelled > start_m && travelled < end_m {
                coords.push(current.into());
            }
            previous = current;
        }
    }

    coords.push(point_along_km(line, end_m / 1000.0).into());
    LineString::new(coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    fn equator_line() -> LineString<f64> {
        line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 2.0, y: 0.0)]
    }

    #[test]
    fn haversine_degree_at_equator() {
        let km = haversine_km(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        assert!((km - 111.2).abs() < 1.0, "got {km}");
    }

    #[test]
    fn line_length_sums_segments() {
        let km = line_length_km(&equator_line());
        assert!((km - 222.4).abs() < 2.0, "got {km}");
    }

    #[test]
    fn point_along_interpolates_and_clamps() {
        let line = equator_line();
        let half = point_along_km(&line, line_length_km(&line) / 2.0);
        assert!((half.x() - 1.0).abs() < 0.01);
        assert!(half.y().abs() < 0.01);

        let past_end = point_along_km(&line, 10_000.0);
        assert!((past_end.x() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn slice_covers_requested_range() {
        let line = equator_line();
        let slice = slice_along_km(&line, 50.0, 150.0);
        let km = line_length_km(&slice);
        assert!((km - 100.0).abs() < 1.0, "got {km}");
        // Interior vertex at x=1.0 falls inside the range and is kept.
        assert!(slice.0.len() >= 3);
    }

    #[test]
    fn corridor_membership() {
        let line = equator_line();
        // ~55 km north of the line.
        assert!(within_distance_of_line(
            Point::new(1.0, 0.5),
            &line,
            60.0
        ));
        assert!(!within_distance_of_line(
            Point::new(1.0, 0.5),
            &line,
            50.0
        ));
    }

    #[test]
    fn simplify_keeps_endpoints() {
        let line = line_string![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.00001),
            (x: 2.0, y: 0.0)
        ];
        let simplified = simplify_line(&line);
        assert_eq!(simplified.0.len(), 2);
        assert_eq!(simplified.0.first(), line.0.first());
        assert_eq!(simplified.0.last(), line.0.last());
    }
}
