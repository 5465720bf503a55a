use std::path::PathBuf;

use thiserror::Error;

/// Error taxonomy for the whole application.
///
/// `MissingArtifact` and `SchemaMismatch` are startup/configuration failures
/// and halt the process; `IncompleteInput` and `Prediction` are caught at the
/// scan-page boundary and rendered as messages without ending the session.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Error: file {path:?} could not be loaded: {detail}")]
    MissingArtifact { path: PathBuf, detail: String },
    #[error("Harap mengisi semua data terlebih dahulu!")]
    IncompleteInput,
    #[error("model exposes no expected feature columns")]
    SchemaMismatch,
    #[error("{0}")]
    Prediction(String),
}
