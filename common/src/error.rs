//! Error taxonomy.
//!
use thiserror::Error;

/// Boxed error source.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Model or metadata resource unreachable or corrupt.
    #[error("failed to load model resource {descriptor}")]
    ModelLoad {
        descriptor: String,
        #[source]
        source: BoxError,
    },

    /// Permission denied, no device or capture setup failure.
    #[error("camera unavailable")]
    Camera(#[source] BoxError),

    /// Malformed or incompatible image passed to the predictor.
    #[error("inference failed")]
    Inference(#[source] BoxError),

    /// Analysis was triggered before a file was selected.
    #[error("no file selected")]
    NoFileSelected,

    /// The predictor returned no classes.
    #[error("prediction list is empty")]
    EmptyPredictions,
}

impl ClassifyError {
    pub fn model_load(descriptor: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ModelLoad {
            descriptor: descriptor.into(),
            source: source.into(),
        }
    }

    pub fn camera(source: impl Into<BoxError>) -> Self {
        Self::Camera(source.into())
    }

    pub fn inference(source: impl Into<BoxError>) -> Self {
        Self::Inference(source.into())
    }

    /// Whether the error comes from something the user did rather than the system.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::NoFileSelected)
    }
}
