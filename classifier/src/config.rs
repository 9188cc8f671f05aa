//! Runtime configuration.
//!
use std::time::Duration;

use common::assets::AssetMap;

use crate::camera::CameraConstraints;

pub const DEFAULT_MODEL: &str = "model/model.onnx";
pub const DEFAULT_METADATA: &str = "model/metadata.json";

/// Minimum time between the end of one camera inference and the start of the next.
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(300);

/// Cadence at which camera frames are pulled.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(33);

#[derive(Clone, Debug)]
pub struct Config {
    /// Path or URL of the ONNX model.
    pub model: String,
    /// Path or URL of the model metadata with the class labels.
    pub metadata: String,
    /// Images displayed for the winning class.
    pub assets: AssetMap,
    /// Mirror images before prediction.
    pub predict_flip: bool,
    pub throttle: Duration,
    pub frame_interval: Duration,
    pub camera: CameraConstraints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            metadata: DEFAULT_METADATA.to_owned(),
            assets: AssetMap::default(),
            predict_flip: false,
            throttle: DEFAULT_THROTTLE,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            camera: CameraConstraints::default(),
        }
    }
}
