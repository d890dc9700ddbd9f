//! Spherical distance and bearing helpers.
//!
//! Everything here works on a spherical earth with the IUGG mean radius.
//! Inputs are degrees, outputs are kilometres or degrees.

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

const COMPASS_8: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

const COMPASS_16: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Number of labels on the compass rose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompassResolution {
    /// N, NE, E, ...
    Eight,
    /// N, NNE, NE, ENE, ...
    Sixteen,
}

impl CompassResolution {
    fn labels(&self) -> &'static [&'static str] {
        match self {
            CompassResolution::Eight => &COMPASS_8,
            CompassResolution::Sixteen => &COMPASS_16,
        }
    }
}

/// Great-circle distance between two points in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push `a` marginally past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Forward azimuth from point 1 towards point 2, in `[0, 360)`.
pub fn initial_bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let x = d_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();

    normalize_bearing(x.atan2(y).to_degrees())
}

/// Map a bearing onto a compass label.
///
/// Sectors are `360 / n` degrees wide and centred on their label, so with
/// sixteen labels "N" covers `[348.75, 11.25)`.
pub fn bearing_to_compass(bearing: f64, resolution: CompassResolution) -> &'static str {
    let labels = resolution.labels();
    let sector = 360.0 / labels.len() as f64;
    let bearing = normalize_bearing(bearing);
    let ix = ((bearing + sector / 2.0) / sector).floor() as usize % labels.len();
    labels[ix]
}

fn normalize_bearing(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_haversine_identical_points() {
        assert_eq!(haversine_km(31.77, 35.21, 31.77, 35.21), 0.0);
        assert_eq!(haversine_km(-89.9, 179.9, -89.9, 179.9), 0.0);
    }

    #[test]
    fn test_haversine_symmetric() {
        let ab = haversine_km(32.08, 34.78, 33.89, 35.50);
        let ba = haversine_km(33.89, 35.50, 32.08, 34.78);
        assert_abs_diff_eq!(ab, ba, epsilon = 1e-9);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Tel Aviv to Beirut is roughly 210 km
        let d = haversine_km(32.0853, 34.7818, 33.8938, 35.5018);
        assert!((d - 212.0).abs() < 5.0, "got {d}");

        // One degree of latitude
        let d = haversine_km(0.0, 0.0, 1.0, 0.0);
        assert_abs_diff_eq!(d, 111.195, epsilon = 0.01);
    }

    #[test]
    fn test_haversine_triangle_inequality() {
        let a = (29.5, 34.9);
        let b = (36.2, 36.1);
        let c = (35.1, 33.3);
        let ab = haversine_km(a.0, a.1, b.0, b.1);
        let ac = haversine_km(a.0, a.1, c.0, c.1);
        let cb = haversine_km(c.0, c.1, b.0, b.1);
        assert!(ab <= ac + cb + 1e-9);
    }

    #[test]
    fn test_haversine_antipodal() {
        let d = haversine_km(0.0, 0.0, 0.0, 180.0);
        assert_abs_diff_eq!(d, std::f64::consts::PI * EARTH_RADIUS_KM, epsilon = 1e-6);
    }

    #[test]
    fn test_bearing_due_north() {
        let b = initial_bearing_deg(10.0, 20.0, 11.0, 20.0);
        assert!(b < 1e-9 || b > 360.0 - 1e-9, "got {b}");
        assert_eq!(bearing_to_compass(b, CompassResolution::Sixteen), "N");
    }

    #[test]
    fn test_bearing_cardinals() {
        assert_abs_diff_eq!(initial_bearing_deg(0.0, 0.0, 0.0, 1.0), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(initial_bearing_deg(1.0, 0.0, 0.0, 0.0), 180.0, epsilon = 1e-9);
        assert_abs_diff_eq!(initial_bearing_deg(0.0, 1.0, 0.0, 0.0), 270.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bearing_range() {
        let points = [
            (0.0, 0.0),
            (45.0, -120.0),
            (-33.9, 151.2),
            (89.0, 10.0),
            (-60.0, -179.5),
            (12.0, 179.9),
        ];
        for &(lat1, lon1) in &points {
            for &(lat2, lon2) in &points {
                let b = initial_bearing_deg(lat1, lon1, lat2, lon2);
                assert!((0.0..360.0).contains(&b), "bearing {b} out of range");
            }
        }
    }

    #[test]
    fn test_compass_sixteen() {
        assert_eq!(bearing_to_compass(0.0, CompassResolution::Sixteen), "N");
        assert_eq!(bearing_to_compass(11.24, CompassResolution::Sixteen), "N");
        assert_eq!(bearing_to_compass(11.25, CompassResolution::Sixteen), "NNE");
        assert_eq!(bearing_to_compass(202.0, CompassResolution::Sixteen), "SSW");
        assert_eq!(bearing_to_compass(348.75, CompassResolution::Sixteen), "N");
        assert_eq!(bearing_to_compass(359.9, CompassResolution::Sixteen), "N");
    }

    #[test]
    fn test_compass_eight() {
        assert_eq!(bearing_to_compass(22.4, CompassResolution::Eight), "N");
        assert_eq!(bearing_to_compass(22.5, CompassResolution::Eight), "NE");
        assert_eq!(bearing_to_compass(180.0, CompassResolution::Eight), "S");
        assert_eq!(bearing_to_compass(315.0, CompassResolution::Eight), "NW");
    }

    #[test]
    fn test_compass_wraps_out_of_range_input() {
        assert_eq!(bearing_to_compass(360.0, CompassResolution::Sixteen), "N");
        assert_eq!(bearing_to_compass(-90.0, CompassResolution::Sixteen), "W");
    }
}
