pub mod refinement;
pub mod sweep;

#[cfg(test)]
mod testing;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::config::Config;
use crate::geometry::{min_inclination_for_equal_coverage, round2};
use crate::grid::{longitude_resolution, OrbitTemplate};
use crate::report::ReportError;
use crate::visibility::{ScenarioParams, VisibilityError};

pub use sweep::{run_sweep, SweepBounds};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("visibility engine: {0}")]
    Visibility(#[from] VisibilityError),
    #[error("report: {0}")]
    Report(#[from] ReportError),
}

/// Everything the sweep and the refinement engine need, resolved once per run.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub start: DateTime<Utc>,
    pub search_end: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub time_step: Duration,
    pub visibility_threshold_deg: f64,
    pub max_mcg_minutes: f64,
    pub max_latitude_deg: f64,
    pub longitude_resolution_deg: f64,
    pub orbit: OrbitTemplate,
    pub bounds: SweepBounds,
}

impl SearchSettings {
    pub fn from_config(config: &Config) -> Self {
        let min_inclination = round2(min_inclination_for_equal_coverage(
            config.semi_major_axis,
            config.eccentricity,
            config.visibility_threshold,
            config.max_lat,
        ));

        Self {
            start: config.start_date,
            search_end: config.search_date,
            end: config.end_date,
            time_step: config.time_step,
            visibility_threshold_deg: config.visibility_threshold,
            max_mcg_minutes: config.max_mcg,
            max_latitude_deg: config.max_lat,
            longitude_resolution_deg: longitude_resolution(config.max_mcg),
            orbit: OrbitTemplate {
                semi_major_axis_km: config.semi_major_axis,
                eccentricity: config.eccentricity,
                arg_perigee_deg: config.perigee_argument,
                epoch: config.start_date,
            },
            bounds: SweepBounds {
                min_planes: config.min_planes,
                max_planes: config.max_planes,
                min_sats_per_plane: config.min_sats_in_plane,
                max_sats_per_plane: config.max_sats_in_plane,
                min_inclination_deg: min_inclination,
                max_inclination_deg: config.max_inclination,
                inclination_step_deg: config.inclination_step,
            },
        }
    }

    /// Short window used for the level 0 check.
    pub fn first_look_window(&self) -> ScenarioParams {
        ScenarioParams {
            start: self.start,
            end: self.search_end,
            time_step: self.time_step,
            visibility_threshold_deg: self.visibility_threshold_deg,
        }
    }

    pub fn full_window(&self) -> ScenarioParams {
        ScenarioParams {
            end: self.end,
            ..self.first_look_window()
        }
    }
}
