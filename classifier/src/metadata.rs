//! Model metadata as exported next to the model file.
//!
use serde::Deserialize;

use crate::BoxError;

const DEFAULT_IMAGE_SIZE: u32 = 224;

/// Subset of `metadata.json` the classifier needs.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    /// Class labels in the order of the model outputs.
    pub labels: Vec<String>,
    /// Side length of the square model input.
    #[serde(default = "default_image_size")]
    pub image_size: u32,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub tm_version: Option<String>,
}

fn default_image_size() -> u32 {
    DEFAULT_IMAGE_SIZE
}

impl ModelMetadata {
    pub fn from_json(json: &str) -> Result<Self, BoxError> {
        let metadata: ModelMetadata = serde_json::from_str(json)?;

        if metadata.labels.is_empty() {
            return Err("metadata lists no class labels".into());
        }
        if metadata.image_size == 0 {
            return Err("metadata image size must be positive".into());
        }

        Ok(metadata)
    }
}
