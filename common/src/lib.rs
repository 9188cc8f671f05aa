//! Common code shared between `classifier` and `cam_classify`.
pub mod assets;
pub mod display;
pub mod error;
pub mod prediction;

pub use error::{BoxError, ClassifyError};

/// Result type.
pub type Result<T> = std::result::Result<T, ClassifyError>;
