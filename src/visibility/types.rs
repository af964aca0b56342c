use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Analysis time window and sampling of the visibility computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioParams {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub time_step: Duration,
    pub visibility_threshold_deg: f64,
}

/// Span during which a satellite is above the visibility threshold of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessInterval {
    pub satellite_id: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
