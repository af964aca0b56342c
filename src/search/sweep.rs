use std::time::Instant;

use crate::geometry::round2;
use crate::grid::ConstellationShape;
use crate::report::{RunLog, Solution, SweepSummary};
use crate::search::refinement::{refine, Outcome};
use crate::search::SearchSettings;
use crate::visibility::{VisibilityEngine, VisibilityError};

/// Limits of the design space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepBounds {
    pub min_planes: u32,
    pub max_planes: u32,
    pub min_sats_per_plane: u32,
    pub max_sats_per_plane: u32,
    pub min_inclination_deg: f64,
    pub max_inclination_deg: f64,
    pub inclination_step_deg: f64,
}

/// Walks the design space with inclination as the fastest digit and planes as the slowest.
///
/// The starting shape is always visited. An accepted shape rolls the inclination
/// digit over immediately: the first accepted inclination is enough for a
/// (planes, sats) pair.
#[derive(Debug, Clone)]
pub struct Odometer {
    bounds: SweepBounds,
    current: Option<ConstellationShape>,
}

impl Odometer {
    pub fn new(bounds: SweepBounds) -> Self {
        Self {
            bounds,
            current: Some(ConstellationShape {
                plane_count: bounds.min_planes,
                sats_per_plane: bounds.min_sats_per_plane,
                inclination_deg: bounds.min_inclination_deg,
            }),
        }
    }

    pub fn current(&self) -> Option<ConstellationShape> {
        self.current
    }

    pub fn advance(&mut self, outcome: Outcome) {
        let Some(mut shape) = self.current else {
            return;
        };
        let b = &self.bounds;

        shape.inclination_deg = round2(shape.inclination_deg + b.inclination_step_deg);
        if shape.inclination_deg > b.max_inclination_deg || outcome == Outcome::Accepted {
            shape.inclination_deg = b.min_inclination_deg;
            shape.sats_per_plane += 1;

            if shape.sats_per_plane > b.max_sats_per_plane {
                shape.sats_per_plane = b.min_sats_per_plane;
                shape.plane_count += 1;
            }

            if shape.plane_count > b.max_planes {
                self.current = None;
                return;
            }
        }

        self.current = Some(shape);
    }
}

/// Evaluate every shape the odometer visits and collect the outcomes.
pub fn run_sweep<E: VisibilityEngine>(
    engine: &mut E,
    settings: &SearchSettings,
    log: &mut RunLog,
) -> Result<SweepSummary, VisibilityError> {
    engine.set_include_coverage_gaps(true);

    let mut summary = SweepSummary {
        min_inclination_deg: settings.bounds.min_inclination_deg,
        ..Default::default()
    };
    let mut odometer = Odometer::new(settings.bounds);

    while let Some(shape) = odometer.current() {
        log::info!(
            "Performing: {}-{}-{}",
            shape.plane_count,
            shape.sats_per_plane,
            shape.inclination_deg
        );
        let started = Instant::now();

        let evaluation = refine(engine, settings, shape, log)?;
        summary.evaluated += 1;

        match evaluation.outcome {
            Outcome::Accepted => {
                log.entry(format!(
                    "SOLUTION!: {} planes with {} satellites at {} degrees. MCG: {}",
                    shape.plane_count,
                    shape.sats_per_plane,
                    shape.inclination_deg,
                    evaluation.mcg_minutes
                ));
                summary.solutions.push(Solution {
                    plane_count: shape.plane_count,
                    sats_per_plane: shape.sats_per_plane,
                    inclination_deg: shape.inclination_deg,
                    mcg_minutes: evaluation.mcg_minutes,
                    devices: evaluation.devices,
                    satellites: evaluation.satellites,
                    discarded_per_level: summary.discarded,
                });
            }
            Outcome::Discarded => {
                log.entry(format!(
                    "Discarded: {} planes with {} satellites at {} degrees. Complexity level: {} > MCG: {}",
                    shape.plane_count,
                    shape.sats_per_plane,
                    shape.inclination_deg,
                    evaluation.level,
                    evaluation.mcg_minutes
                ));
                summary.discarded.record(evaluation.level);
            }
        }

        let engine_ms: f64 = evaluation.levels.iter().map(|l| l.sim_time_ms).sum();
        log::info!(
            "{} {}-{}-{} at level {} (MCG {:.2} min, engine {:.0} ms, total {} ms)",
            evaluation.outcome,
            shape.plane_count,
            shape.sats_per_plane,
            shape.inclination_deg,
            evaluation.level,
            evaluation.mcg_minutes,
            engine_ms,
            started.elapsed().as_millis()
        );
        log::debug!("{} latitudes explored", evaluation.explored.len());

        odometer.advance(evaluation.outcome);
    }

    log::info!(
        "Sweep finished: {} shapes, {} solutions",
        summary.evaluated,
        summary.solutions.len()
    );
    Ok(summary)
}
