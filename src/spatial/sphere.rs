//! Conversions between geographic coordinates and unit-sphere vectors.
//!
//! The R-trees in this crate index points on the unit sphere rather than raw
//! (lat, lon) pairs. Straight-line (chord) distance between two unit vectors
//! grows monotonically with great-circle distance, so the Euclidean nearest
//! neighbour is also the geodesic one, with no seam at the antimeridian and no
//! stretching near the poles.

pub type Vec3 = [f64; 3];

/// Unit vector for a latitude/longitude pair in degrees.
pub fn to_unit_vector(lat: f64, lon: f64) -> Vec3 {
    let phi = lat.to_radians();
    let lambda = lon.to_radians();
    [
        phi.cos() * lambda.cos(),
        phi.cos() * lambda.sin(),
        phi.sin(),
    ]
}

/// Latitude/longitude in degrees for a (not necessarily unit) vector.
///
/// Returns `None` for the zero vector.
pub fn to_lat_lon(v: Vec3) -> Option<(f64, f64)> {
    let norm = length(v);
    if norm <= f64::EPSILON {
        return None;
    }
    let lat = (v[2] / norm).clamp(-1.0, 1.0).asin().to_degrees();
    let lon = v[1].atan2(v[0]).to_degrees();
    Some((lat, lon))
}

pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn length(v: Vec3) -> f64 {
    dot(v, v).sqrt()
}

/// Closest point to `p` on the straight segment `a`–`b`.
pub fn closest_on_segment(p: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let ab = sub(b, a);
    let len_2 = dot(ab, ab);
    if len_2 <= f64::EPSILON * f64::EPSILON {
        return a;
    }
    let t = (dot(sub(p, a), ab) / len_2).clamp(0.0, 1.0);
    [a[0] + t * ab[0], a[1] + t * ab[1], a[2] + t * ab[2]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_round_trip_preserves_coordinates() {
        for &(lat, lon) in &[(0.0, 0.0), (31.5, 35.2), (-45.0, -170.0), (60.0, 179.5)] {
            let (lat2, lon2) = to_lat_lon(to_unit_vector(lat, lon)).unwrap();
            assert_abs_diff_eq!(lat, lat2, epsilon = 1e-9);
            assert_abs_diff_eq!(lon, lon2, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_zero_vector_has_no_coordinates() {
        assert!(to_lat_lon([0.0, 0.0, 0.0]).is_none());
    }

    #[test]
    fn test_closest_on_segment_clamps_to_endpoints() {
        let a = [0.0, 0.0, 0.0];
        let b = [1.0, 0.0, 0.0];
        assert_eq!(closest_on_segment([-1.0, 1.0, 0.0], a, b), a);
        assert_eq!(closest_on_segment([2.0, 1.0, 0.0], a, b), b);
        assert_eq!(closest_on_segment([0.5, 1.0, 0.0], a, b), [0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_antimeridian_neighbours_are_close() {
        let west = to_unit_vector(10.0, 179.9);
        let east = to_unit_vector(10.0, -179.9);
        assert!(length(sub(west, east)) < 0.01);
    }
}
