mod run_log;
mod types;
mod writer;

pub use run_log::RunLog;
pub use types::{Solution, SweepSummary};
pub use writer::{ReportError, Reporter};
