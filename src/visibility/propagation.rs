use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use sgp4::{Constants, MinutesSinceEpoch, Orbit};

use crate::grid::{DeviceSample, SatelliteOrbit};
use crate::visibility::error::VisibilityError;

pub const EARTH_MU_KM3_S2: f64 = 398_600.4418;

// WGS-84
const WGS84_A_KM: f64 = 6378.137;
const WGS84_E2: f64 = 0.00669437999014;

/// SGP4 propagator for one constellation member, seeded from Keplerian elements.
pub struct SatelliteTrack {
    pub id: u32,
    epoch: DateTime<Utc>,
    constants: Constants,
}

impl SatelliteTrack {
    pub fn new(orbit: &SatelliteOrbit) -> Result<Self, VisibilityError> {
        let invalid = |message: String| VisibilityError::InvalidOrbit {
            id: orbit.id,
            message,
        };

        if !(0.0..1.0).contains(&orbit.eccentricity) {
            return Err(invalid(format!("eccentricity {}", orbit.eccentricity)));
        }
        if orbit.semi_major_axis_km <= WGS84_A_KM {
            return Err(invalid(format!(
                "semi-major axis {} km is below the surface",
                orbit.semi_major_axis_km
            )));
        }

        let mean_anomaly = true_to_mean_anomaly(orbit.true_anomaly_deg.to_radians(), orbit.eccentricity);
        let mean_motion_rad_min =
            (EARTH_MU_KM3_S2 / orbit.semi_major_axis_km.powi(3)).sqrt() * 60.0;

        let orbit_0 = Orbit::from_kozai_elements(
            &sgp4::WGS84,
            orbit.inclination_deg.to_radians(),
            orbit.raan_deg.to_radians(),
            orbit.eccentricity,
            orbit.arg_perigee_deg.to_radians(),
            mean_anomaly,
            mean_motion_rad_min,
        )
        .map_err(|e| invalid(e.to_string()))?;

        let constants = Constants::new(
            sgp4::WGS84,
            sgp4::iau_epoch_to_sidereal_time,
            sgp4::julian_years_since_j2000(&orbit.epoch.naive_utc()),
            0.0,
            orbit_0,
        )
        .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            id: orbit.id,
            epoch: orbit.epoch,
            constants,
        })
    }

    /// Earth-fixed position in km.
    pub fn position_ecef_km(&self, timestamp: DateTime<Utc>) -> Result<[f64; 3], VisibilityError> {
        let minutes = (timestamp - self.epoch).num_milliseconds() as f64 / 60_000.0;
        let prediction = self
            .constants
            .propagate(MinutesSinceEpoch(minutes))
            .map_err(|e| VisibilityError::Propagation(e.to_string()))?;

        let sidereal =
            sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp.naive_utc()));
        Ok(teme_to_ecef_position(prediction.position, sidereal))
    }
}

pub fn true_to_mean_anomaly(true_anomaly: f64, eccentricity: f64) -> f64 {
    let eccentric = 2.0
        * (((1.0 - eccentricity) / (1.0 + eccentricity)).sqrt() * (true_anomaly / 2.0).tan()).atan();
    (eccentric - eccentricity * eccentric.sin()).rem_euclid(2.0 * PI)
}

pub fn device_position_ecef_km(device: &DeviceSample) -> [f64; 3] {
    let lat = device.lat_rad();
    let lon = device.lon_rad();
    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let alt_km = device.altitude_m / 1000.0;
    [
        (n + alt_km) * cos_lat * lon.cos(),
        (n + alt_km) * cos_lat * lon.sin(),
        (n * (1.0 - WGS84_E2) + alt_km) * sin_lat,
    ]
}

/// Elevation of a satellite above a device's local horizon, in degrees.
pub fn elevation_deg(device: &DeviceSample, device_ecef: [f64; 3], sat_ecef: [f64; 3]) -> f64 {
    let dr = [
        sat_ecef[0] - device_ecef[0],
        sat_ecef[1] - device_ecef[1],
        sat_ecef[2] - device_ecef[2],
    ];
    let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();
    if range_km <= 0.0 {
        return 90.0;
    }
    let (_, _, up) = ecef_to_enu(dr, device.lat_rad(), device.lon_rad());
    (up / range_km).asin().to_degrees()
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}
