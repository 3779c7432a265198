//! Error taxonomy for the pipeline and the artifact store.

use thiserror::Error;

/// Errors raised while fitting or applying the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The training dataset file is absent or unreadable. Fatal to the run.
    #[error("training data error: {0}")]
    UpstreamData(String),

    /// A record cannot be expressed against the pipeline's column layout.
    #[error("invalid input in column '{column}': {reason}")]
    InvalidInput { column: String, reason: String },

    /// The persisted column schema cannot be interpreted.
    #[error("schema error: unknown encoded column '{0}'")]
    Schema(String),

    /// The classifier failed to fit.
    #[error("training failed: {0}")]
    Training(String),
}

/// Errors raised while persisting or loading artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// A required artifact is absent at service start.
    #[error("artifact missing: {0}")]
    Missing(String),

    #[error("artifact unreadable ({name}): {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact corrupt ({name}): {reason}")]
    Corrupt { name: String, reason: String },

    /// Loaded artifacts disagree on the feature dimension.
    #[error("artifact set inconsistent: {0}")]
    Inconsistent(String),
}

impl ArtifactError {
    pub fn io(name: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::Missing(name.to_string())
        } else {
            ArtifactError::Io { name: name.to_string(), source }
        }
    }

    pub fn corrupt(name: &str, reason: impl ToString) -> Self {
        ArtifactError::Corrupt { name: name.to_string(), reason: reason.to_string() }
    }
}
