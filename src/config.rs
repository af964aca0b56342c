use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use thiserror::Error;

use crate::geometry::EARTH_RADIUS_KM;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Run parameters of a constellation search.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub output_path: PathBuf,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// End of the short first-look window used at complexity level 0.
    pub search_date: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_time_step")]
    pub time_step: Duration,
    pub visibility_threshold: f64,
    /// Maximum coverage gap target, minutes.
    pub max_mcg: f64,
    pub max_lat: f64,
    pub min_planes: u32,
    pub max_planes: u32,
    pub min_sats_in_plane: u32,
    pub max_sats_in_plane: u32,
    pub max_inclination: f64,
    pub inclination_step: f64,
    /// Kilometres.
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub perigee_argument: f64,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, message: String| Err(ConfigError::Invalid { field, message });

        if self.search_date <= self.start_date {
            return invalid("search_date", "must be after start_date".into());
        }
        if self.end_date < self.search_date {
            return invalid("end_date", "must not be before search_date".into());
        }
        if self.time_step <= Duration::zero() {
            return invalid("time_step", "must be positive".into());
        }
        if !(0.0..90.0).contains(&self.visibility_threshold) {
            return invalid(
                "visibility_threshold",
                format!("{} is outside [0, 90)", self.visibility_threshold),
            );
        }
        if !(self.max_mcg >= 0.0) {
            return invalid("max_mcg", "must be non-negative".into());
        }
        if !(0.0..=90.0).contains(&self.max_lat) {
            return invalid("max_lat", format!("{} is outside [0, 90]", self.max_lat));
        }
        if self.min_planes == 0 || self.min_planes > self.max_planes {
            return invalid(
                "min_planes",
                format!("need 1 <= min_planes <= max_planes ({})", self.max_planes),
            );
        }
        if self.min_sats_in_plane == 0 || self.min_sats_in_plane > self.max_sats_in_plane {
            return invalid(
                "min_sats_in_plane",
                format!(
                    "need 1 <= min_sats_in_plane <= max_sats_in_plane ({})",
                    self.max_sats_in_plane
                ),
            );
        }
        if !(self.inclination_step > 0.0) {
            return invalid("inclination_step", "must be positive".into());
        }
        if !self.max_inclination.is_finite() {
            return invalid("max_inclination", "must be finite".into());
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return invalid("eccentricity", format!("{} is outside [0, 1)", self.eccentricity));
        }
        if self.semi_major_axis * (1.0 - self.eccentricity) <= EARTH_RADIUS_KM {
            return invalid("semi_major_axis", "perigee is below the Earth's surface".into());
        }

        Ok(())
    }
}

/// Accepts plain seconds (`60`, `0.5`) or a humantime string (`"1m 30s"`).
fn deserialize_time_step<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Seconds(seconds) => Ok(Duration::milliseconds((seconds * 1000.0).round() as i64)),
        Raw::Text(text) => humantime::parse_duration(text.trim())
            .map_err(serde::de::Error::custom)
            .and_then(|d| Duration::from_std(d).map_err(serde::de::Error::custom)),
    }
}
