//! Camera capture interface.
//!
use image::RgbImage;

use crate::Result;

/// Requested capture settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraConstraints {
    /// Video device, e.g. `/dev/video0` for the user-facing camera.
    pub device: String,
    /// Width of the frames handed to the classifier.
    pub width: u32,
    /// Height of the frames handed to the classifier.
    pub height: u32,
    /// Frame interval as `(numerator, denominator)` seconds.
    pub interval: (u32, u32),
    /// FourCC pixel format.
    pub format: String,
    /// Mirror frames horizontally (selfie mode).
    pub flip: bool,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_owned(),
            width: 320,
            height: 240,
            interval: (1, 30),
            format: "MJPG".to_owned(),
            flip: true,
        }
    }
}

/// A live camera that keeps its most recent frame on a drawable surface.
pub trait Camera: Send {
    /// Acquire the device. Fails if permission is denied or no device exists.
    fn setup(&mut self, constraints: &CameraConstraints) -> Result<()>;

    /// Start streaming.
    fn play(&mut self) -> Result<()>;

    /// Pull the latest frame onto the surface.
    fn update(&mut self) -> Result<()>;

    /// Whether `update` waits on the device. Such updates run on the blocking pool.
    fn update_blocks(&self) -> bool {
        false
    }

    /// Current contents of the surface, `None` until the first successful update.
    fn frame(&self) -> Option<RgbImage>;
}
