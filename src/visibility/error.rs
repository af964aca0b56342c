use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisibilityError {
    #[error("scenario parameters not set")]
    ScenarioNotSet,
    #[error("invalid scenario window: {0}")]
    InvalidWindow(String),
    #[error("invalid orbit for satellite {id}: {message}")]
    InvalidOrbit { id: u32, message: String },
    #[error("propagation error: {0}")]
    Propagation(String),
    #[error("access intervals not computed")]
    AccessesNotComputed,
}
