//! Repeating camera task.
//!
//! Frames are pulled at the display cadence while inference runs at most once per
//! throttle interval, measured from the end of the previous inference. An inference
//! is always awaited before the next tick, so slow inferences never pile up.
//! Cameras whose updates wait on the device are updated on the blocking pool.
use std::{sync::Arc, time::Duration};

use common::display::ContextId;
use tokio::{
    task::JoinHandle,
    time::{interval, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    camera::Camera,
    config::{DEFAULT_FRAME_INTERVAL, DEFAULT_THROTTLE},
    display::DisplayBoard,
    inferer::{InferenceContext, Inferer},
    meter::METER,
};

/// Counters of a finished camera loop.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CameraLoopReport {
    pub frames: u64,
    pub inferences: u64,
    pub failures: u64,
}

pub struct CameraLoop {
    camera: Box<dyn Camera>,
    inferer: Arc<Inferer>,
    context: InferenceContext,
    frame_interval: Duration,
    throttle: Duration,
}

impl CameraLoop {
    /// The camera must be set up and playing.
    pub fn new(camera: Box<dyn Camera>, inferer: Arc<Inferer>, board: Arc<DisplayBoard>) -> Self {
        Self {
            camera,
            inferer,
            context: InferenceContext::new(ContextId::Camera, board),
            frame_interval: DEFAULT_FRAME_INTERVAL,
            throttle: DEFAULT_THROTTLE,
        }
    }

    pub fn frame_interval(mut self, frame_interval: Duration) -> Self {
        self.frame_interval = frame_interval;
        self
    }

    pub fn throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn spawn(self, token: CancellationToken) -> JoinHandle<CameraLoopReport> {
        tokio::spawn(self.run(token))
    }

    /// Run until `token` is cancelled. An inference in flight is finished first.
    pub async fn run(self, token: CancellationToken) -> CameraLoopReport {
        let CameraLoop {
            mut camera,
            inferer,
            context,
            frame_interval,
            throttle,
        } = self;
        let mut report = CameraLoopReport::default();
        let mut last_inference: Option<Instant> = None;

        let mut ticker = interval(frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::info!(
            "Camera loop started (frames every {:?}, inference every {:?})",
            frame_interval,
            throttle
        );

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let updated = if camera.update_blocks() {
                let capture = tokio::task::spawn_blocking(move || {
                    let result = camera.update();
                    (camera, result)
                });
                match capture.await {
                    Ok((returned, result)) => {
                        camera = returned;
                        result
                    }
                    Err(err) => {
                        log::error!("Camera capture task failed: {err}");
                        break;
                    }
                }
            } else {
                camera.update()
            };
            if let Err(err) = updated {
                log::error!("Unable to capture frame, trying again... ({err})");
                continue;
            }
            report.frames += 1;
            METER.tick_frame();

            if matches!(last_inference, Some(at) if at.elapsed() < throttle) {
                continue;
            }
            let Some(frame) = camera.frame() else {
                continue;
            };

            match inferer.infer(&context, frame).await {
                Ok(verdict) => {
                    report.inferences += 1;
                    log::trace!("Camera verdict {:?}", verdict);
                }
                Err(err) => {
                    // Keep polling, the next frame may well be fine
                    report.failures += 1;
                    log::error!("Camera inference failed: {err}");
                }
            }
            last_inference = Some(Instant::now());
        }

        log::info!("Camera loop stopped: {:?}", report);
        report
    }
}
