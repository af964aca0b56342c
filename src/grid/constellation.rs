use chrono::{DateTime, Utc};

use crate::grid::types::{ConstellationShape, SatelliteOrbit};

/// Shared orbital elements of every constellation member.
#[derive(Debug, Clone, Copy)]
pub struct OrbitTemplate {
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
    pub arg_perigee_deg: f64,
    pub epoch: DateTime<Utc>,
}

/// Evenly spread planes in RAAN and satellites in true anomaly, plane-major order.
pub fn generate_constellation(
    shape: &ConstellationShape,
    template: &OrbitTemplate,
) -> Vec<SatelliteOrbit> {
    let plane_phase = 360.0 / shape.plane_count as f64;
    let sat_phase = 360.0 / shape.sats_per_plane as f64;

    let mut satellites = Vec::with_capacity(shape.satellite_count());
    let mut id = 0;
    for plane in 0..shape.plane_count {
        for slot in 0..shape.sats_per_plane {
            satellites.push(SatelliteOrbit {
                id,
                epoch: template.epoch,
                semi_major_axis_km: template.semi_major_axis_km,
                eccentricity: template.eccentricity,
                inclination_deg: shape.inclination_deg,
                raan_deg: plane as f64 * plane_phase,
                arg_perigee_deg: template.arg_perigee_deg,
                true_anomaly_deg: slot as f64 * sat_phase,
            });
            id += 1;
        }
    }

    satellites
}
