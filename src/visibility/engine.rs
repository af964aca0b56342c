use std::time::Instant;

use crate::grid::{DeviceSample, SatelliteOrbit};
use crate::visibility::access::{find_accesses, Ephemeris};
use crate::visibility::error::VisibilityError;
use crate::visibility::gaps::max_coverage_gap;
use crate::visibility::propagation::{device_position_ecef_km, SatelliteTrack};
use crate::visibility::types::{AccessInterval, ScenarioParams};
use crate::visibility::VisibilityEngine;

/// Visibility engine backed by SGP4 propagation and a line-of-sight elevation mask.
///
/// Satellite ephemerides are cached across `set_devices` calls and dropped
/// whenever the scenario window or the satellite set changes.
pub struct Sgp4Engine {
    scenario: Option<ScenarioParams>,
    include_coverage_gaps: bool,
    devices: Vec<DeviceSample>,
    satellites: Vec<SatelliteOrbit>,
    tracks: Option<Vec<SatelliteTrack>>,
    ephemeris: Option<Ephemeris>,
    accesses: Option<Vec<Vec<AccessInterval>>>,
    max_mcg_minutes: f64,
    last_sim_time_ms: f64,
}

impl Sgp4Engine {
    pub fn new() -> Self {
        Self {
            scenario: None,
            include_coverage_gaps: false,
            devices: Vec::new(),
            satellites: Vec::new(),
            tracks: None,
            ephemeris: None,
            accesses: None,
            max_mcg_minutes: 0.0,
            last_sim_time_ms: 0.0,
        }
    }

    /// Access intervals of the last `compute_devices_pov`, one list per device.
    #[cfg(test)]
    pub fn accesses(&self) -> Option<&[Vec<AccessInterval>]> {
        self.accesses.as_deref()
    }

    fn tracks(&mut self) -> Result<&[SatelliteTrack], VisibilityError> {
        if self.tracks.is_none() {
            let tracks = self
                .satellites
                .iter()
                .map(SatelliteTrack::new)
                .collect::<Result<Vec<_>, _>>()?;
            self.tracks = Some(tracks);
        }
        Ok(self.tracks.as_deref().unwrap_or_default())
    }
}

impl Default for Sgp4Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilityEngine for Sgp4Engine {
    fn set_scenario_params(&mut self, scenario: ScenarioParams) {
        if self.scenario != Some(scenario) {
            self.ephemeris = None;
        }
        self.scenario = Some(scenario);
        self.accesses = None;
    }

    fn set_include_coverage_gaps(&mut self, include: bool) {
        self.include_coverage_gaps = include;
    }

    fn set_assets(&mut self, devices: &[DeviceSample], satellites: &[SatelliteOrbit]) {
        self.devices = devices.to_vec();
        self.satellites = satellites.to_vec();
        self.tracks = None;
        self.ephemeris = None;
        self.accesses = None;
    }

    fn set_devices(&mut self, devices: &[DeviceSample]) {
        self.devices = devices.to_vec();
        self.accesses = None;
    }

    fn compute_devices_pov(&mut self) -> Result<(), VisibilityError> {
        let started = Instant::now();
        let scenario = self.scenario.ok_or(VisibilityError::ScenarioNotSet)?;

        if self.ephemeris.is_none() {
            let ephemeris = Ephemeris::build(self.tracks()?, &scenario)?;
            log::debug!(
                "Sampled {} satellites over {} epochs",
                ephemeris.positions.len(),
                ephemeris.times.len()
            );
            self.ephemeris = Some(ephemeris);
        }

        let tracks = self.tracks.as_deref().unwrap_or_default();
        let ephemeris = self
            .ephemeris
            .as_ref()
            .ok_or(VisibilityError::ScenarioNotSet)?;

        let mut accesses = Vec::with_capacity(self.devices.len());
        for device in &self.devices {
            let device_ecef = device_position_ecef_km(device);
            let mut device_accesses = Vec::new();
            for (track, samples) in tracks.iter().zip(&ephemeris.positions) {
                device_accesses.extend(find_accesses(
                    device,
                    device_ecef,
                    track,
                    samples,
                    &ephemeris.times,
                    scenario.visibility_threshold_deg,
                )?);
            }
            accesses.push(device_accesses);
        }

        self.accesses = Some(accesses);
        self.last_sim_time_ms = started.elapsed().as_secs_f64() * 1000.0;
        Ok(())
    }

    fn compute_max_mcg(&mut self) -> Result<(), VisibilityError> {
        let started = Instant::now();
        let scenario = self.scenario.ok_or(VisibilityError::ScenarioNotSet)?;
        let accesses = self
            .accesses
            .as_ref()
            .ok_or(VisibilityError::AccessesNotComputed)?;

        let max_gap = accesses
            .iter()
            .map(|device_accesses| {
                max_coverage_gap(
                    device_accesses,
                    scenario.start,
                    scenario.end,
                    self.include_coverage_gaps,
                )
            })
            .max()
            .unwrap_or_else(chrono::Duration::zero);

        self.max_mcg_minutes = max_gap.num_milliseconds() as f64 / 60_000.0;
        self.last_sim_time_ms += started.elapsed().as_secs_f64() * 1000.0;
        Ok(())
    }

    fn max_mcg_minutes(&self) -> f64 {
        self.max_mcg_minutes
    }

    fn last_sim_time_ms(&self) -> f64 {
        self.last_sim_time_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    use crate::grid::{generate_constellation, generate_device_grid, ConstellationShape, OrbitTemplate};

    fn scenario(hours: i64) -> ScenarioParams {
        let start = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        ScenarioParams {
            start,
            end: start + Duration::hours(hours),
            time_step: Duration::seconds(60),
            visibility_threshold_deg: 10.0,
        }
    }

    fn satellites(planes: u32, sats: u32) -> Vec<SatelliteOrbit> {
        let shape = ConstellationShape {
            plane_count: planes,
            sats_per_plane: sats,
            inclination_deg: 53.0,
        };
        generate_constellation(
            &shape,
            &OrbitTemplate {
                semi_major_axis_km: 7078.137,
                eccentricity: 0.0001,
                arg_perigee_deg: 0.0,
                epoch: scenario(1).start,
            },
        )
    }

    #[test]
    fn compute_requires_scenario() {
        let mut engine = Sgp4Engine::new();
        engine.set_assets(&generate_device_grid(&[0.0], 90.0, 0), &satellites(1, 1));
        assert!(matches!(
            engine.compute_devices_pov(),
            Err(VisibilityError::ScenarioNotSet)
        ));
    }

    #[test]
    fn mcg_requires_accesses() {
        let mut engine = Sgp4Engine::new();
        engine.set_scenario_params(scenario(1));
        assert!(matches!(
            engine.compute_max_mcg(),
            Err(VisibilityError::AccessesNotComputed)
        ));
    }

    #[test]
    fn mcg_is_bounded_by_window() {
        let mut engine = Sgp4Engine::new();
        engine.set_include_coverage_gaps(true);
        engine.set_scenario_params(scenario(3));
        engine.set_assets(&generate_device_grid(&[0.0, 40.0], 45.0, 0), &satellites(2, 3));
        engine.compute_devices_pov().unwrap();
        engine.compute_max_mcg().unwrap();

        let mcg = engine.max_mcg_minutes();
        assert!(mcg > 0.0 && mcg <= 180.0, "mcg {}", mcg);
        assert!(engine.last_sim_time_ms() >= 0.0);
        assert_eq!(engine.accesses().map(|a| a.len()), Some(16));
    }

    #[test]
    fn replacing_devices_recomputes_for_new_set() {
        let mut engine = Sgp4Engine::new();
        engine.set_include_coverage_gaps(true);
        engine.set_scenario_params(scenario(2));
        engine.set_assets(&generate_device_grid(&[0.0], 90.0, 0), &satellites(1, 2));
        engine.compute_devices_pov().unwrap();

        engine.set_devices(&generate_device_grid(&[10.0, 20.0], 90.0, 0));
        assert!(engine.accesses().is_none());
        engine.compute_devices_pov().unwrap();
        assert_eq!(engine.accesses().map(|a| a.len()), Some(8));
    }

    #[test]
    fn empty_device_set_has_no_gap() {
        let mut engine = Sgp4Engine::new();
        engine.set_scenario_params(scenario(1));
        engine.set_assets(&[], &satellites(1, 1));
        engine.compute_devices_pov().unwrap();
        engine.compute_max_mcg().unwrap();
        assert_eq!(engine.max_mcg_minutes(), 0.0);
    }
}
