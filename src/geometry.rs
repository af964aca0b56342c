use std::f64::consts::PI;

pub const EARTH_RADIUS_KM: f64 = 6378.137;

const INCLINATION_LOW_DEG: f64 = 1.0;
const INCLINATION_HIGH_DEG: f64 = 89.0;
const BRACKET_TOLERANCE_DEG: f64 = 0.01;
const MAX_ITERATIONS: usize = 1000;

/// Maximum Earth central angle (half-angle of the visibility cone) at apogee, in degrees.
pub fn max_earth_central_angle(
    semi_major_axis_km: f64,
    eccentricity: f64,
    visibility_threshold_deg: f64,
) -> f64 {
    let apogee_altitude = (1.0 + eccentricity) * semi_major_axis_km - EARTH_RADIUS_KM;
    let eta_max = (EARTH_RADIUS_KM * visibility_threshold_deg.to_radians().cos()
        / (EARTH_RADIUS_KM + apogee_altitude))
        .asin();
    90.0 - visibility_threshold_deg - eta_max.to_degrees()
}

/// Inclination at which the fraction of time a point at `max_latitude_deg` is
/// covered equals the fraction at the equator.
///
/// Bisection over (1°, 89°). Either coverage formula can leave the domain of
/// `acos`; a NaN equatorial fraction counts as full coverage, otherwise a NaN
/// max-latitude fraction counts as none. When the difference is still NaN the
/// bracket does not move and the midpoint is returned once the iteration cap
/// is hit.
pub fn min_inclination_for_equal_coverage(
    semi_major_axis_km: f64,
    eccentricity: f64,
    visibility_threshold_deg: f64,
    max_latitude_deg: f64,
) -> f64 {
    let lambda = max_earth_central_angle(semi_major_axis_km, eccentricity, visibility_threshold_deg)
        .to_radians();
    let lat = max_latitude_deg.to_radians();

    let mut low = INCLINATION_LOW_DEG;
    let mut high = INCLINATION_HIGH_DEG;
    let mut midpoint = 55.0;
    let mut iterations = 0;

    while (low - high).abs() >= BRACKET_TOLERANCE_DEG {
        midpoint = (low + high) / 2.0;
        let (at_max_lat, at_equator) = coverage_fractions(lambda, midpoint.to_radians(), lat);

        let diff = at_max_lat - at_equator;
        if diff == 0.0 {
            break;
        }
        // A NaN difference moves neither bound.
        if diff < 0.0 {
            low = midpoint;
        } else if diff > 0.0 {
            high = midpoint;
        }

        iterations += 1;
        if iterations > MAX_ITERATIONS {
            log::debug!(
                "Inclination bisection stopped after {} iterations at {:.4} deg",
                iterations,
                midpoint
            );
            break;
        }
    }

    midpoint
}

/// Coverage fractions `(at max latitude, at equator)` for a given inclination, radians in.
fn coverage_fractions(lambda: f64, inclination: f64, lat: f64) -> (f64, f64) {
    let mut at_max_lat = ((-lambda.sin() + inclination.cos() * lat.sin())
        / (inclination.sin() * lat.cos()))
    .acos()
        / PI;
    let mut at_equator = 1.0 - (2.0 / PI) * (lambda.sin() / inclination.sin()).acos();

    if at_equator.is_nan() {
        at_equator = 1.0;
    } else if at_max_lat.is_nan() {
        at_max_lat = 0.0;
    }

    (at_max_lat, at_equator)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SEMI_MAJOR_AXIS_KM: f64 = 7078.137;
    const ECCENTRICITY: f64 = 0.0;
    const THRESHOLD_DEG: f64 = 10.0;
    const MAX_LAT_DEG: f64 = 60.0;

    #[test]
    fn central_angle_is_finite_and_positive_for_leo() {
        for threshold in [0.0, 5.0, 10.0, 30.0, 60.0] {
            for e in [0.0, 0.01, 0.1] {
                let lambda = max_earth_central_angle(SEMI_MAJOR_AXIS_KM, e, threshold);
                assert!(lambda.is_finite());
                assert!(lambda >= 0.0, "lambda {} for threshold {}", lambda, threshold);
            }
        }
    }

    #[test]
    fn central_angle_matches_horizon_geometry() {
        // With a zero threshold the cone reaches the horizon: lambda = acos(R / (R + h)).
        let lambda = max_earth_central_angle(SEMI_MAJOR_AXIS_KM, 0.0, 0.0);
        let expected = (EARTH_RADIUS_KM / SEMI_MAJOR_AXIS_KM).acos().to_degrees();
        assert_relative_eq!(lambda, expected, epsilon = 1e-9);
    }

    #[test]
    fn central_angle_grows_with_altitude() {
        let low = max_earth_central_angle(7000.0, 0.0, THRESHOLD_DEG);
        let high = max_earth_central_angle(8000.0, 0.0, THRESHOLD_DEG);
        assert!(high > low);
    }

    #[test]
    fn min_inclination_is_inside_bracket() {
        let inc = min_inclination_for_equal_coverage(
            SEMI_MAJOR_AXIS_KM,
            ECCENTRICITY,
            THRESHOLD_DEG,
            MAX_LAT_DEG,
        );
        assert!(inc > 1.0 && inc < 89.0, "inclination {}", inc);
    }

    #[test]
    fn min_inclination_is_deterministic() {
        let first = min_inclination_for_equal_coverage(
            SEMI_MAJOR_AXIS_KM,
            ECCENTRICITY,
            THRESHOLD_DEG,
            MAX_LAT_DEG,
        );
        for _ in 0..5 {
            let again = min_inclination_for_equal_coverage(
                SEMI_MAJOR_AXIS_KM,
                ECCENTRICITY,
                THRESHOLD_DEG,
                MAX_LAT_DEG,
            );
            assert_eq!(first.to_bits(), again.to_bits());
        }
    }

    #[test]
    fn equatorial_nan_counts_as_full_coverage() {
        // sin(lambda) > sin(i) puts the equatorial acos argument out of range.
        let lambda = 30f64.to_radians();
        let (_, at_equator) = coverage_fractions(lambda, 10f64.to_radians(), 0.5);
        assert_eq!(at_equator, 1.0);
    }

    #[test]
    fn max_latitude_nan_counts_as_no_coverage() {
        // Narrow cone at a latitude well above the inclination.
        let lambda = 1f64.to_radians();
        let (at_max_lat, at_equator) =
            coverage_fractions(lambda, 30f64.to_radians(), 80f64.to_radians());
        assert!(!at_equator.is_nan());
        assert_eq!(at_max_lat, 0.0);
    }

    #[test]
    fn both_fractions_out_of_domain_leave_a_nan_difference() {
        let lambda = max_earth_central_angle(20000.0, 0.0, 0.0).to_radians();
        let (at_max_lat, at_equator) =
            coverage_fractions(lambda, 45f64.to_radians(), 10f64.to_radians());
        assert_eq!(at_equator, 1.0);
        assert!(at_max_lat.is_nan());
    }

    #[test]
    fn nan_difference_keeps_bracket_until_iteration_cap() {
        let inc = min_inclination_for_equal_coverage(20000.0, 0.0, 0.0, 10.0);
        assert_eq!(inc, 45.0);
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(55.123), 55.12);
        assert_eq!(round2(55.125_1), 55.13);
        assert_eq!(round2(0.1 + 0.2), 0.3);
    }
}
