use chrono::{DateTime, Utc};
use serde::Serialize;

/// One point of the design space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConstellationShape {
    pub plane_count: u32,
    pub sats_per_plane: u32,
    pub inclination_deg: f64,
}

impl ConstellationShape {
    pub fn satellite_count(&self) -> usize {
        self.plane_count as usize * self.sats_per_plane as usize
    }
}

/// Ground observation point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeviceSample {
    pub id: u32,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

impl DeviceSample {
    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }
}

/// Keplerian elements of one constellation member. Angles in degrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatelliteOrbit {
    pub id: u32,
    pub epoch: DateTime<Utc>,
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub arg_perigee_deg: f64,
    pub true_anomaly_deg: f64,
}
