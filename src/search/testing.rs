use chrono::{Duration, TimeZone, Utc};

use crate::grid::{DeviceSample, OrbitTemplate, SatelliteOrbit};
use crate::search::{SearchSettings, SweepBounds};
use crate::visibility::{ScenarioParams, VisibilityEngine, VisibilityError};

/// Inputs the fake engine hands to its MCG rule.
pub struct EngineView<'a> {
    pub scenario: ScenarioParams,
    pub devices: &'a [DeviceSample],
    pub satellites: &'a [SatelliteOrbit],
}

/// In-memory engine whose MCG is computed by a closure over the current assets.
pub struct FakeEngine {
    rule: Box<dyn Fn(&EngineView) -> f64>,
    pub scenario: Option<ScenarioParams>,
    pub include_coverage_gaps: bool,
    pub devices: Vec<DeviceSample>,
    pub satellites: Vec<SatelliteOrbit>,
    pub scenario_history: Vec<ScenarioParams>,
    pub device_history: Vec<Vec<DeviceSample>>,
    pub asset_resets: usize,
    pov_ready: bool,
    mcg: f64,
}

impl FakeEngine {
    pub fn new(rule: impl Fn(&EngineView) -> f64 + 'static) -> Self {
        Self {
            rule: Box::new(rule),
            scenario: None,
            include_coverage_gaps: false,
            devices: Vec::new(),
            satellites: Vec::new(),
            scenario_history: Vec::new(),
            device_history: Vec::new(),
            asset_resets: 0,
            pov_ready: false,
            mcg: 0.0,
        }
    }

    pub fn constant(mcg: f64) -> Self {
        Self::new(move |_| mcg)
    }
}

impl VisibilityEngine for FakeEngine {
    fn set_scenario_params(&mut self, scenario: ScenarioParams) {
        self.scenario = Some(scenario);
        self.scenario_history.push(scenario);
    }

    fn set_include_coverage_gaps(&mut self, include: bool) {
        self.include_coverage_gaps = include;
    }

    fn set_assets(&mut self, devices: &[DeviceSample], satellites: &[SatelliteOrbit]) {
        self.devices = devices.to_vec();
        self.satellites = satellites.to_vec();
        self.asset_resets += 1;
        self.pov_ready = false;
    }

    fn set_devices(&mut self, devices: &[DeviceSample]) {
        self.devices = devices.to_vec();
        self.pov_ready = false;
    }

    fn compute_devices_pov(&mut self) -> Result<(), VisibilityError> {
        if self.scenario.is_none() {
            return Err(VisibilityError::ScenarioNotSet);
        }
        self.device_history.push(self.devices.clone());
        self.pov_ready = true;
        Ok(())
    }

    fn compute_max_mcg(&mut self) -> Result<(), VisibilityError> {
        if !self.pov_ready {
            return Err(VisibilityError::AccessesNotComputed);
        }
        let scenario = self.scenario.ok_or(VisibilityError::ScenarioNotSet)?;
        self.mcg = (self.rule)(&EngineView {
            scenario,
            devices: &self.devices,
            satellites: &self.satellites,
        });
        Ok(())
    }

    fn max_mcg_minutes(&self) -> f64 {
        self.mcg
    }

    fn last_sim_time_ms(&self) -> f64 {
        1.0
    }
}

pub fn settings(max_mcg: f64, max_lat: f64, bounds: SweepBounds) -> SearchSettings {
    let start = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
    SearchSettings {
        start,
        search_end: start + Duration::hours(6),
        end: start + Duration::days(1),
        time_step: Duration::seconds(60),
        visibility_threshold_deg: 10.0,
        max_mcg_minutes: max_mcg,
        max_latitude_deg: max_lat,
        longitude_resolution_deg: 90.0,
        orbit: OrbitTemplate {
            semi_major_axis_km: 7078.137,
            eccentricity: 0.0,
            arg_perigee_deg: 0.0,
            epoch: start,
        },
        bounds,
    }
}

pub fn bounds(planes: (u32, u32), sats: (u32, u32), inclination: (f64, f64, f64)) -> SweepBounds {
    SweepBounds {
        min_planes: planes.0,
        max_planes: planes.1,
        min_sats_per_plane: sats.0,
        max_sats_per_plane: sats.1,
        min_inclination_deg: inclination.0,
        max_inclination_deg: inclination.1,
        inclination_step_deg: inclination.2,
    }
}
