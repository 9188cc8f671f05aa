//! User-selected image files.
//!
use std::{
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use futures::future::{BoxFuture, FutureExt, Shared};
use image::RgbImage;

use crate::{ClassifyError, Result};

type Preview = Shared<BoxFuture<'static, std::result::Result<Arc<RgbImage>, Arc<String>>>>;

/// Holds the current selection and decodes it in the background.
///
/// Analysis waits on the decode, so a selection can be analyzed right after it is
/// made.
#[derive(Default)]
pub struct FilePanel {
    preview: Mutex<Option<Preview>>,
}

impl FilePanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an image file. It is read and decoded in the background.
    pub fn select_path(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        log::info!("Selected {}", path.display());

        self.set_preview(move || {
            let bytes = std::fs::read(&path).map_err(|err| format!("{}: {err}", path.display()))?;
            decode(&bytes)
        });
    }

    /// Select an in-memory encoded image.
    pub fn select_bytes(&self, bytes: Vec<u8>) {
        log::info!("Selected {} bytes", bytes.len());
        self.set_preview(move || decode(&bytes));
    }

    pub fn has_selection(&self) -> bool {
        self.preview
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn clear(&self) {
        *self.preview.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Wait for the selected image to be decoded.
    pub async fn preview(&self) -> Result<Arc<RgbImage>> {
        let preview = self
            .preview
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(ClassifyError::NoFileSelected)?;

        preview
            .await
            .map_err(|msg| ClassifyError::inference(msg.to_string()))
    }

    fn set_preview<F>(&self, load: F)
    where
        F: FnOnce() -> std::result::Result<RgbImage, String> + Send + 'static,
    {
        let handle = tokio::task::spawn_blocking(load);
        let preview = async move {
            match handle.await {
                Ok(result) => result.map(Arc::new).map_err(Arc::new),
                Err(err) => Err(Arc::new(err.to_string())),
            }
        }
        .boxed()
        .shared();

        *self.preview.lock().unwrap_or_else(PoisonError::into_inner) = Some(preview);
    }
}

fn decode(bytes: &[u8]) -> std::result::Result<RgbImage, String> {
    image::load_from_memory(bytes)
        .map(|image| image.to_rgb8())
        .map_err(|err| format!("unable to decode image: {err}"))
}
