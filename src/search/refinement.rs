use strum_macros::Display;

use crate::grid::{
    generate_constellation, generate_device_grid, level_latitudes, ConstellationShape,
    DeviceSample, SatelliteOrbit, LEVEL_COUNT,
};
use crate::report::RunLog;
use crate::search::SearchSettings;
use crate::visibility::{VisibilityEngine, VisibilityError};

const LAST_LEVEL: usize = LEVEL_COUNT - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Outcome {
    Accepted,
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Level(usize),
    Accepted,
    Discarded(usize),
}

/// Latitudes already handed to the engine while refining one shape.
///
/// Membership is exact float equality on the values produced by
/// [`level_latitudes`], so a latitude is only skipped when repeated addition
/// lands on the very same bits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExploredLatitudes(Vec<f64>);

impl ExploredLatitudes {
    /// Returns `true` if the latitude was not explored before.
    pub fn insert(&mut self, latitude: f64) -> bool {
        if self.contains(latitude) {
            return false;
        }
        self.0.push(latitude);
        true
    }

    pub fn contains(&self, latitude: f64) -> bool {
        self.0.iter().any(|&l| l == latitude)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// One engine run inside a refinement.
#[derive(Debug, Clone)]
pub struct LevelRecord {
    pub level: usize,
    pub latitudes: Vec<f64>,
    pub device_count: usize,
    pub mcg_minutes: f64,
    pub sim_time_ms: f64,
}

/// Result of refining one shape.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub shape: ConstellationShape,
    pub outcome: Outcome,
    /// Level at which the outcome was decided.
    pub level: usize,
    pub mcg_minutes: f64,
    /// Devices of the last level evaluated.
    pub devices: Vec<DeviceSample>,
    pub satellites: Vec<SatelliteOrbit>,
    pub explored: ExploredLatitudes,
    pub levels: Vec<LevelRecord>,
}

/// Run the coarse-to-fine coverage check for one constellation shape.
///
/// Level 0 looks at three latitudes over the short first-look window. Passing it
/// widens the engine to the full window once, then levels 1 to 4 each add only
/// the latitudes not explored yet. The first level whose coverage gap exceeds
/// the target discards the shape; passing level 4 accepts it.
pub fn refine<E: VisibilityEngine>(
    engine: &mut E,
    settings: &SearchSettings,
    shape: ConstellationShape,
    log: &mut RunLog,
) -> Result<Evaluation, VisibilityError> {
    let satellites = generate_constellation(&shape, &settings.orbit);
    let mut explored = ExploredLatitudes::default();
    let mut devices = Vec::new();
    let mut levels = Vec::with_capacity(LEVEL_COUNT);
    let mut mcg = 0.0;

    let mut state = State::Level(0);
    let (outcome, level) = loop {
        state = match state {
            State::Level(0) => {
                engine.set_scenario_params(settings.first_look_window());
                let latitudes = level_latitudes(settings.max_latitude_deg, 0);
                devices = generate_device_grid(&latitudes, settings.longitude_resolution_deg, 0);
                engine.set_assets(&devices, &satellites);

                mcg = evaluate(engine, &shape, 0, latitudes, devices.len(), &mut levels, log)?;
                if mcg <= settings.max_mcg_minutes {
                    engine.set_scenario_params(settings.full_window());
                    State::Level(1)
                } else {
                    State::Discarded(0)
                }
            }
            State::Level(level) => {
                let latitudes: Vec<f64> = level_latitudes(settings.max_latitude_deg, level)
                    .into_iter()
                    .filter(|&lat| explored.insert(lat))
                    .collect();
                devices = generate_device_grid(&latitudes, settings.longitude_resolution_deg, 0);
                engine.set_devices(&devices);

                mcg = evaluate(engine, &shape, level, latitudes, devices.len(), &mut levels, log)?;
                if mcg > settings.max_mcg_minutes {
                    State::Discarded(level)
                } else if level == LAST_LEVEL {
                    State::Accepted
                } else {
                    State::Level(level + 1)
                }
            }
            State::Accepted => break (Outcome::Accepted, LAST_LEVEL),
            State::Discarded(level) => break (Outcome::Discarded, level),
        };
    };

    Ok(Evaluation {
        shape,
        outcome,
        level,
        mcg_minutes: mcg,
        devices,
        satellites,
        explored,
        levels,
    })
}

fn evaluate<E: VisibilityEngine>(
    engine: &mut E,
    shape: &ConstellationShape,
    level: usize,
    latitudes: Vec<f64>,
    device_count: usize,
    levels: &mut Vec<LevelRecord>,
    log: &mut RunLog,
) -> Result<f64, VisibilityError> {
    engine.compute_devices_pov()?;
    engine.compute_max_mcg()?;

    let mcg = engine.max_mcg_minutes();
    let sim_time_ms = engine.last_sim_time_ms();
    log.entry(format!(
        "Analyzing: {} planes with {} satellites at {} degrees. Complexity level: {} > MCG: {} - computation time: {} ms.",
        shape.plane_count, shape.sats_per_plane, shape.inclination_deg, level, mcg, sim_time_ms
    ));
    log::debug!(
        "Level {} with {} devices on {} latitudes: MCG {:.2} min",
        level,
        device_count,
        latitudes.len(),
        mcg
    );

    levels.push(LevelRecord {
        level,
        latitudes,
        device_count,
        mcg_minutes: mcg,
        sim_time_ms,
    });
    Ok(mcg)
}
