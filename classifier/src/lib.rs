//! Two-class image classification of a webcam stream and of user-selected files.
//!
//! Each inference picks the most probable class, shows its label with a confidence
//! percentage for its context, and swaps the one image both contexts share.
pub mod camera;
pub mod camera_loop;
pub mod config;
pub mod display;
pub mod file_panel;
pub mod inferer;
pub mod metadata;
pub mod meter;
pub mod nn;
pub mod session;
pub mod utils;

pub use common::{
    assets::AssetMap,
    display::{ContextId, DisplayState},
    prediction::{ClassPrediction, PredictionList},
    BoxError, ClassifyError, Result,
};

/// Get the hash of a string.
pub(crate) fn hashed(name: &str) -> u64 {
    use std::hash::{Hash, Hasher};

    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    name.hash(&mut hasher);
    hasher.finish()
}
