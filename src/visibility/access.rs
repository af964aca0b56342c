use chrono::{DateTime, Duration, Utc};

use crate::grid::DeviceSample;
use crate::visibility::error::VisibilityError;
use crate::visibility::propagation::{elevation_deg, SatelliteTrack};
use crate::visibility::types::{AccessInterval, ScenarioParams};

const FINE_STEP_SECONDS: i64 = 1; // crossing refinement resolution

/// Satellite positions sampled on the scenario time grid.
pub struct Ephemeris {
    pub times: Vec<DateTime<Utc>>,
    /// Indexed `[satellite][sample]`.
    pub positions: Vec<Vec<[f64; 3]>>,
}

impl Ephemeris {
    pub fn build(
        tracks: &[SatelliteTrack],
        scenario: &ScenarioParams,
    ) -> Result<Self, VisibilityError> {
        if scenario.end <= scenario.start {
            return Err(VisibilityError::InvalidWindow(format!(
                "{} is not after {}",
                scenario.end, scenario.start
            )));
        }
        if scenario.time_step <= Duration::zero() {
            return Err(VisibilityError::InvalidWindow(format!(
                "time step {} is not positive",
                scenario.time_step
            )));
        }

        let mut times = Vec::new();
        let mut cursor = scenario.start;
        while cursor <= scenario.end {
            times.push(cursor);
            cursor += scenario.time_step;
        }
        if times.last() != Some(&scenario.end) {
            times.push(scenario.end);
        }

        let positions = tracks
            .iter()
            .map(|track| {
                times
                    .iter()
                    .map(|t| track.position_ecef_km(*t))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { times, positions })
    }
}

/// Access intervals of one satellite over one device.
///
/// Scans the sampled ephemeris and refines every threshold crossing by bisection.
/// An access still open at the end of the window is closed at the window end.
pub fn find_accesses(
    device: &DeviceSample,
    device_ecef: [f64; 3],
    track: &SatelliteTrack,
    samples: &[[f64; 3]],
    times: &[DateTime<Utc>],
    threshold_deg: f64,
) -> Result<Vec<AccessInterval>, VisibilityError> {
    let mut accesses = Vec::new();
    let mut access_start: Option<DateTime<Utc>> = None;

    for (i, (&position, &time)) in samples.iter().zip(times).enumerate() {
        let visible = elevation_deg(device, device_ecef, position) >= threshold_deg;

        match (visible, access_start) {
            (true, None) => {
                let start = if i == 0 {
                    time
                } else {
                    refine_crossing(device, device_ecef, track, times[i - 1], time, true, threshold_deg)?
                };
                access_start = Some(start);
            }
            (false, Some(start)) => {
                let end =
                    refine_crossing(device, device_ecef, track, times[i - 1], time, false, threshold_deg)?;
                accesses.push(AccessInterval {
                    satellite_id: track.id,
                    start,
                    end,
                });
                access_start = None;
            }
            _ => {}
        }
    }

    if let (Some(start), Some(&end)) = (access_start, times.last()) {
        accesses.push(AccessInterval {
            satellite_id: track.id,
            start,
            end,
        });
    }

    Ok(accesses)
}

/// Binary search for the threshold crossing between two samples.
fn refine_crossing(
    device: &DeviceSample,
    device_ecef: [f64; 3],
    track: &SatelliteTrack,
    before: DateTime<Utc>,
    after: DateTime<Utc>,
    rising: bool,
    threshold_deg: f64,
) -> Result<DateTime<Utc>, VisibilityError> {
    let mut low = before;
    let mut high = after;

    while (high - low).num_seconds() > FINE_STEP_SECONDS {
        let mid = low + (high - low) / 2;
        let above = elevation_deg(device, device_ecef, track.position_ecef_km(mid)?) >= threshold_deg;

        if above == rising {
            high = mid;
        } else {
            low = mid;
        }
    }

    Ok(high)
}
