//! Startup and lifetime of the classifier.
//!
use std::{path::PathBuf, sync::Arc};

use common::display::{ContextId, DisplayState};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    camera::Camera,
    camera_loop::{CameraLoop, CameraLoopReport},
    config::Config,
    display::{DisplayBoard, DisplaySurface},
    file_panel::FilePanel,
    inferer::{InferenceContext, Inferer, Verdict},
    nn::{Predictor, TmModel},
    ClassifyError, Result,
};

struct CameraTask {
    token: CancellationToken,
    handle: JoinHandle<CameraLoopReport>,
}

/// A loaded model with its display and the file and camera pipelines feeding it.
///
/// Model and camera fail independently: a session whose camera could not be
/// started keeps analyzing files.
pub struct Session {
    config: Config,
    inferer: Arc<Inferer>,
    board: Arc<DisplayBoard>,
    files: FilePanel,
    camera: Option<CameraTask>,
}

impl Session {
    /// Load the configured model.
    pub async fn load(config: Config, surface: Arc<dyn DisplaySurface>) -> Result<Self> {
        let model = TmModel::load(&config.model, &config.metadata).await?;
        Ok(Self::with_predictor(Arc::new(model), config, surface))
    }

    pub fn with_predictor(
        predictor: Arc<dyn Predictor>,
        config: Config,
        surface: Arc<dyn DisplaySurface>,
    ) -> Self {
        let inferer = Inferer::new(predictor, config.assets.clone()).with_flip(config.predict_flip);

        Self {
            config,
            inferer: Arc::new(inferer),
            board: Arc::new(DisplayBoard::new(surface)),
            files: FilePanel::new(),
            camera: None,
        }
    }

    pub fn labels(&self) -> &[String] {
        self.inferer.labels()
    }

    pub fn board(&self) -> &Arc<DisplayBoard> {
        &self.board
    }

    pub fn snapshot(&self) -> DisplayState {
        self.board.snapshot()
    }

    pub fn select_file(&self, path: impl Into<PathBuf>) {
        self.files.select_path(path);
    }

    pub fn select_bytes(&self, bytes: Vec<u8>) {
        self.files.select_bytes(bytes);
    }

    /// Classify the selected file once it is decoded.
    pub async fn analyze(&self) -> Result<Verdict> {
        let image = self.files.preview().await?;
        let ctx = InferenceContext::new(ContextId::File, Arc::clone(&self.board));
        self.inferer.infer(&ctx, image.as_ref().clone()).await
    }

    /// Set up the camera and start the camera loop, replacing a running one.
    pub async fn start_camera(&mut self, mut camera: Box<dyn Camera>) -> Result<()> {
        if self.camera.is_some() {
            self.stop_camera().await;
        }

        let constraints = self.config.camera.clone();
        let camera = tokio::task::spawn_blocking(move || {
            camera.setup(&constraints)?;
            camera.play()?;
            Ok::<_, ClassifyError>(camera)
        })
        .await
        .map_err(ClassifyError::camera)??;

        let token = CancellationToken::new();
        let handle = CameraLoop::new(camera, Arc::clone(&self.inferer), Arc::clone(&self.board))
            .frame_interval(self.config.frame_interval)
            .throttle(self.config.throttle)
            .spawn(token.clone());
        self.camera = Some(CameraTask { token, handle });

        Ok(())
    }

    pub fn camera_running(&self) -> bool {
        self.camera
            .as_ref()
            .map_or(false, |task| !task.handle.is_finished())
    }

    /// Stop the camera loop, waiting for an inference in flight.
    pub async fn stop_camera(&mut self) -> Option<CameraLoopReport> {
        let task = self.camera.take()?;
        task.token.cancel();
        match task.handle.await {
            Ok(report) => Some(report),
            Err(err) => {
                log::error!("Camera loop ended abnormally: {err}");
                None
            }
        }
    }

    pub async fn shutdown(mut self) -> Option<CameraLoopReport> {
        self.stop_camera().await
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(task) = &self.camera {
            task.token.cancel();
        }
    }
}
