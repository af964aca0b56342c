use chrono::{DateTime, Utc};

use crate::config::Config;

const STAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";
const RULE: &str = "======================================================================";

pub fn timestamp(at: DateTime<Utc>) -> String {
    at.format(STAMP_FORMAT).to_string()
}

/// Chronological run log, owned by the caller and handed to the reporter at the end.
#[derive(Debug, Clone)]
pub struct RunLog {
    started: DateTime<Utc>,
    entries: Vec<String>,
}

impl RunLog {
    pub fn new(started: DateTime<Utc>) -> Self {
        Self {
            started,
            entries: Vec::new(),
        }
    }

    pub fn started(&self) -> DateTime<Utc> {
        self.started
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Untimed line, used for the header and section markers.
    pub fn line(&mut self, line: impl Into<String>) {
        self.entries.push(line.into());
    }

    pub fn section(&mut self, title: &str) {
        self.line(format!("{} {} {}", RULE, title, RULE));
    }

    pub fn entry(&mut self, entry: impl AsRef<str>) {
        self.entry_at(Utc::now(), entry);
    }

    pub fn entry_at(&mut self, at: DateTime<Utc>, entry: impl AsRef<str>) {
        self.entries
            .push(format!("{} >> {}", timestamp(at), entry.as_ref()));
    }

    pub fn header(&mut self, config: &Config, min_inclination_deg: f64) {
        self.line(format!("Starting analysis at {}", timestamp(self.started)));
        self.line(format!(
            "Scenario start: {} - Scenario end: {}",
            config.start_date, config.end_date
        ));
        self.line(format!(
            "Target MCG: {} - Maximum latitude band: {} Degrees - complexity 0 search date {}",
            config.max_mcg, config.max_lat, config.search_date
        ));
        self.line(format!(
            "Minimum number of planes: {} - Maximum number of planes: {}",
            config.min_planes, config.max_planes
        ));
        self.line(format!(
            "Minimum sats per plane: {} - Maximum sats per planes: {}",
            config.min_sats_in_plane, config.max_sats_in_plane
        ));
        self.line(format!(
            "Minimum inclination: {} - Maximum inclination: {}",
            min_inclination_deg, config.max_inclination
        ));
        self.line(format!("Inclination step: {} Degrees", config.inclination_step));
        self.section("PROGRESS");
    }
}
