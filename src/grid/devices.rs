use crate::grid::types::DeviceSample;

/// Number of complexity levels a shape goes through (0..=4).
pub const LEVEL_COUNT: usize = 5;

/// Longitude spacing of the device grid, derived from the coverage-gap target in minutes.
pub fn longitude_resolution(max_mcg_minutes: f64) -> f64 {
    max_mcg_minutes * 0.25
}

/// Lay out `round(360 / resolution)` devices along every latitude, latitude-major.
///
/// A zero, negative or non-finite resolution (a zero MCG target) leaves a single
/// device at 0° longitude on each latitude.
pub fn generate_device_grid(
    latitudes: &[f64],
    longitude_resolution_deg: f64,
    start_id: u32,
) -> Vec<DeviceSample> {
    let (n_facilities, step) =
        if longitude_resolution_deg > 0.0 && longitude_resolution_deg.is_finite() {
            ((360.0 / longitude_resolution_deg).round() as u32, longitude_resolution_deg)
        } else {
            (1, 0.0)
        };
    let mut devices = Vec::with_capacity(latitudes.len() * n_facilities as usize);
    let mut id = start_id;

    for &lat in latitudes {
        for fac in 0..n_facilities {
            devices.push(DeviceSample {
                id,
                latitude_deg: lat,
                longitude_deg: fac as f64 * step,
                altitude_m: 0.0,
            });
            id += 1;
        }
    }

    devices
}

/// Latitudes sampled at a complexity level, before filtering explored ones.
///
/// Level 0 is the equator, half band and band edge. Level 1 walks the whole band
/// at `max / 2`; deeper levels walk `step..=max - step` with `step = max / 2^k`.
/// Values come from repeated addition, so they match across levels only where
/// the float sums line up exactly.
pub fn level_latitudes(max_latitude_deg: f64, level: usize) -> Vec<f64> {
    if level == 0 {
        return vec![0.0, max_latitude_deg / 2.0, max_latitude_deg];
    }

    let step = max_latitude_deg / 2f64.powi(level as i32);
    let (first, last) = if level == 1 {
        (0.0, max_latitude_deg)
    } else {
        (step, max_latitude_deg - step)
    };

    // Zero-width band: stepping would never advance.
    if step <= 0.0 || !step.is_finite() {
        return if first <= last { vec![first] } else { Vec::new() };
    }

    let mut latitudes = Vec::new();
    let mut lat = first;
    while lat <= last {
        latitudes.push(lat);
        lat += step;
    }
    latitudes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_idempotent() {
        let a = generate_device_grid(&[0.0, 30.0, 60.0], 15.0, 7);
        let b = generate_device_grid(&[0.0, 30.0, 60.0], 15.0, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn grid_counts_and_ids() {
        let devices = generate_device_grid(&[0.0, 45.0], 90.0, 10);
        assert_eq!(devices.len(), 8);
        let ids: Vec<u32> = devices.iter().map(|d| d.id).collect();
        assert_eq!(ids, (10..18).collect::<Vec<_>>());
        assert_eq!(devices[0].longitude_deg, 0.0);
        assert_eq!(devices[3].longitude_deg, 270.0);
        assert_eq!(devices[4].latitude_deg, 45.0);
        assert!(devices.iter().all(|d| d.altitude_m == 0.0));
    }

    #[test]
    fn grid_rounds_facility_count() {
        // 360 / 7 = 51.4 -> 51 facilities
        let devices = generate_device_grid(&[10.0], 7.0, 0);
        assert_eq!(devices.len(), 51);
    }

    #[test]
    fn zero_resolution_keeps_one_device_per_latitude() {
        let latitudes = level_latitudes(60.0, 0);
        let devices = generate_device_grid(&latitudes, longitude_resolution(0.0), 0);
        assert_eq!(devices.len(), 3);
        assert!(devices.iter().all(|d| d.longitude_deg == 0.0));

        assert_eq!(generate_device_grid(&[10.0], -5.0, 0).len(), 1);
        let nan = generate_device_grid(&[10.0], f64::NAN, 0);
        assert_eq!(nan.len(), 1);
        assert_eq!(nan[0].longitude_deg, 0.0);
    }

    #[test]
    fn resolution_is_quarter_of_target() {
        assert_eq!(longitude_resolution(60.0), 15.0);
    }

    #[test]
    fn level_zero_and_one_cover_band_edges() {
        assert_eq!(level_latitudes(60.0, 0), vec![0.0, 30.0, 60.0]);
        assert_eq!(level_latitudes(60.0, 1), vec![0.0, 30.0, 60.0]);
    }

    #[test]
    fn deeper_levels_skip_band_edges() {
        assert_eq!(level_latitudes(60.0, 2), vec![15.0, 30.0, 45.0]);
        assert_eq!(
            level_latitudes(60.0, 3),
            vec![7.5, 15.0, 22.5, 30.0, 37.5, 45.0, 52.5]
        );
        assert_eq!(level_latitudes(60.0, 4).len(), 15);
    }

    #[test]
    fn zero_band_does_not_loop() {
        assert_eq!(level_latitudes(0.0, 0), vec![0.0, 0.0, 0.0]);
        for level in 1..LEVEL_COUNT {
            assert_eq!(level_latitudes(0.0, level), vec![0.0]);
        }
    }
}
