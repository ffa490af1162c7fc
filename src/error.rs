use std::path::PathBuf;

/// Result alias for pipeline stages
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by the pipeline stages. Every variant is fatal to the current stage.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An expected column is absent from a tabular input
    #[error("column '{column}' not found in {}", .path.display())]
    MissingColumn {
        /// The column that was requested
        column: String,

        /// The table it was requested from
        path: PathBuf,
    },

    /// A required configuration artifact (such as the vocabulary) is missing or malformed
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An encoded matrix does not have the shape the classifier expects
    #[error("schema error: {0}")]
    Schema(String),

    /// A persisted model artifact cannot be located
    #[error("artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    /// The training labels contain fewer than two distinct classes
    #[error("at least two distinct labels are required, found {0}")]
    ClassCount(usize),

    /// The annotator could not process a text
    #[error("annotation failed: {0}")]
    Annotation(String),

    /// Model weights could not be written or read back
    #[error("unable to record model weights: {0}")]
    Record(String),

    /// Underlying I/O failure
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Underlying CSV failure
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Underlying JSON failure
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
