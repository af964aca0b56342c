use serde::Serialize;
use std::fmt;

use crate::grid::{DeviceSample, SatelliteOrbit, LEVEL_COUNT};

/// Shapes discarded at each complexity level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiscardCounters([u32; LEVEL_COUNT]);

impl DiscardCounters {
    pub fn record(&mut self, level: usize) {
        self.0[level] += 1;
    }

    pub fn at(&self, level: usize) -> u32 {
        self.0[level]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn as_array(&self) -> [u32; LEVEL_COUNT] {
        self.0
    }
}

/// An accepted constellation.
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    pub plane_count: u32,
    pub sats_per_plane: u32,
    pub inclination_deg: f64,
    pub mcg_minutes: f64,
    /// Devices of the last (finest) level evaluated.
    pub devices: Vec<DeviceSample>,
    pub satellites: Vec<SatelliteOrbit>,
    /// Discard counters as they stood when this solution was found. Earlier
    /// solutions therefore report smaller counts than the final totals in
    /// [`SweepSummary::discarded`].
    pub discarded_per_level: DiscardCounters,
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.plane_count, self.sats_per_plane, self.inclination_deg, self.mcg_minutes
        )?;
        for count in self.discarded_per_level.as_array() {
            write!(f, ",{}", count)?;
        }
        Ok(())
    }
}

/// Everything the sweep hands to the reporter.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepSummary {
    pub min_inclination_deg: f64,
    pub solutions: Vec<Solution>,
    pub discarded: DiscardCounters,
    pub evaluated: u32,
}
