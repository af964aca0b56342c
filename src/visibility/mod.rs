mod access;
mod engine;
mod error;
mod gaps;
mod propagation;
mod types;

pub use engine::Sgp4Engine;
pub use error::VisibilityError;
pub use types::ScenarioParams;

use crate::grid::{DeviceSample, SatelliteOrbit};

/// Turns a device set and a constellation into access intervals and a maximum coverage gap.
///
/// Setters take effect on the next `compute_*` call. `compute_devices_pov` must
/// run before `compute_max_mcg`; the query methods report the last results.
pub trait VisibilityEngine {
    fn set_scenario_params(&mut self, scenario: ScenarioParams);
    fn set_include_coverage_gaps(&mut self, include: bool);
    fn set_assets(&mut self, devices: &[DeviceSample], satellites: &[SatelliteOrbit]);
    fn set_devices(&mut self, devices: &[DeviceSample]);
    fn compute_devices_pov(&mut self) -> Result<(), VisibilityError>;
    fn compute_max_mcg(&mut self) -> Result<(), VisibilityError>;
    fn max_mcg_minutes(&self) -> f64;
    /// Wall time of the last computation, in milliseconds.
    fn last_sim_time_ms(&self) -> f64;
}
