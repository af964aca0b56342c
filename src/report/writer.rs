use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::report::run_log::{timestamp, RunLog};
use crate::report::types::SweepSummary;

/// The `Rejected*` columns of a row are the discard counters at the moment that
/// solution was accepted, not the totals at the end of the sweep.
pub const CSV_HEADER: &str =
    "Planes,SatsPerPlane,inclination,MCG,Rejected0,Rejected1,Rejected2,Rejected3,Rejected4";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Files written for one run.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub csv: PathBuf,
    pub log: PathBuf,
    pub json: PathBuf,
}

pub struct Reporter {
    base: PathBuf,
}

impl Reporter {
    pub fn new(base: PathBuf) -> Self {
        Reporter { base }
    }

    fn report_path(&self, stem: &str, extension: &str) -> PathBuf {
        self.base.join(format!("{}.{}", stem, extension))
    }

    /// Close the run log with the solution table and write the CSV, log and JSON reports.
    pub fn save(&self, summary: &SweepSummary, log: &mut RunLog) -> Result<ReportPaths, ReportError> {
        log.section("SOLUTIONS");
        log.line(CSV_HEADER);
        for solution in &summary.solutions {
            log.line(solution.to_string());
        }

        fs::create_dir_all(&self.base)?;

        let stem = timestamp(log.started()).replace(':', "-");
        let paths = ReportPaths {
            csv: self.report_path(&stem, "csv"),
            log: self.report_path(&stem, "log"),
            json: self.report_path(&stem, "json"),
        };

        write_lines(&paths.csv, solution_table(summary))?;
        write_lines(&paths.log, log.entries().iter().cloned())?;
        fs::write(&paths.json, serde_json::to_string_pretty(summary)?)?;

        log::info!(
            "Saved {} solutions to {}",
            summary.solutions.len(),
            paths.csv.display()
        );
        Ok(paths)
    }
}

pub fn solution_table(summary: &SweepSummary) -> impl Iterator<Item = String> + '_ {
    std::iter::once(CSV_HEADER.to_string()).chain(summary.solutions.iter().map(|s| s.to_string()))
}

fn write_lines(path: &Path, lines: impl Iterator<Item = String>) -> Result<(), ReportError> {
    let mut content = String::new();
    for line in lines {
        content.push_str(&line);
        content.push('\n');
    }
    fs::write(path, content)?;
    Ok(())
}
