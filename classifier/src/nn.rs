//! Predictor adapter around an exported image classification model.
//!
use std::path::Path;

use futures::future::{BoxFuture, FutureExt};
use image::{imageops::FilterType, RgbImage};
use reqwest::Client;
use tract_onnx::prelude::*;

use crate::{
    metadata::ModelMetadata, utils::resolve_resource, BoxError, ClassPrediction, ClassifyError,
    PredictionList, Result,
};

type NnModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// An image classifier with a fixed, ordered set of class labels.
pub trait Predictor: Send + Sync {
    /// Labels in the order the model reports them.
    fn class_labels(&self) -> &[String];

    /// Score every class for `image`, mirroring it first if `flip` is set.
    ///
    /// Returns one entry per class label, in label order.
    fn predict(&self, image: RgbImage, flip: bool) -> BoxFuture<'_, Result<PredictionList>>;
}

/// Two-class image model: an ONNX graph plus its `metadata.json`.
///
/// The graph takes a `[1, size, size, 3]` tensor scaled to `[-1, 1]` and returns one
/// probability per label.
pub struct TmModel {
    model: Arc<NnModel>,
    labels: Vec<String>,
    image_size: u32,
}

impl TmModel {
    /// Load model and metadata from local paths or URLs.
    pub async fn load(model_descriptor: &str, metadata_descriptor: &str) -> Result<Self> {
        let client = Client::new();

        let metadata_path = resolve_resource(&client, metadata_descriptor)
            .await
            .map_err(|err| ClassifyError::model_load(metadata_descriptor, err))?;
        let metadata = tokio::fs::read_to_string(&metadata_path)
            .await
            .map_err(BoxError::from)
            .and_then(|json| ModelMetadata::from_json(&json))
            .map_err(|err| ClassifyError::model_load(metadata_descriptor, err))?;

        let model_path = resolve_resource(&client, model_descriptor)
            .await
            .map_err(|err| ClassifyError::model_load(model_descriptor, err))?;
        let image_size = metadata.image_size;
        let model = tokio::task::spawn_blocking(move || get_model(&model_path, image_size))
            .await
            .map_err(BoxError::from)
            .and_then(|model| model.map_err(BoxError::from))
            .map_err(|err| ClassifyError::model_load(model_descriptor, err))?;

        log::info!(
            "Model {} loaded. labels = {:?}",
            metadata.model_name.as_deref().unwrap_or(model_descriptor),
            &metadata.labels
        );

        Ok(Self {
            model: Arc::new(model),
            labels: metadata.labels,
            image_size,
        })
    }

    pub fn image_size(&self) -> u32 {
        self.image_size
    }
}

impl Predictor for TmModel {
    fn class_labels(&self) -> &[String] {
        &self.labels
    }

    fn predict(&self, image: RgbImage, flip: bool) -> BoxFuture<'_, Result<PredictionList>> {
        let model = Arc::clone(&self.model);
        let size = self.image_size;

        async move {
            if image.width() == 0 || image.height() == 0 {
                return Err(ClassifyError::inference("image has no pixels"));
            }

            let scores = tokio::task::spawn_blocking(move || -> std::result::Result<_, BoxError> {
                let input = preproc(&image, size, flip);
                let raw_nn_out = model.run(tvec!(input.into()))?;
                postproc(raw_nn_out)
            })
            .await
            .map_err(ClassifyError::inference)?
            .map_err(ClassifyError::inference)?;

            predictions_from_scores(&self.labels, &scores)
        }
        .boxed()
    }
}

fn get_model(path: &Path, image_size: u32) -> TractResult<NnModel> {
    let size = image_size as usize;
    let input_fact = InferenceFact::dt_shape(f32::datum_type(), tvec!(1, size, size, 3));
    tract_onnx::onnx()
        .model_for_path(path)?
        .with_input_fact(0, input_fact)?
        .into_optimized()?
        .into_runnable()
}

/// Center-crop to a square, resize to `size` and scale pixels to `[-1, 1]`.
fn preproc(input: &RgbImage, size: u32, flip: bool) -> Tensor {
    let (width, height) = input.dimensions();
    let side = width.min(height);
    let cropped =
        image::imageops::crop_imm(input, (width - side) / 2, (height - side) / 2, side, side)
            .to_image();

    let mut resized: RgbImage =
        image::imageops::resize(&cropped, size, size, FilterType::Triangle);
    if flip {
        resized = image::imageops::flip_horizontal(&resized);
    }

    tract_ndarray::Array4::from_shape_fn(
        (1, size as usize, size as usize, 3),
        |(_, y, x, c)| resized[(x as _, y as _)][c] as f32 / 127.5 - 1.0,
    )
    .into()
}

fn postproc(raw_nn_out: TVec<TValue>) -> std::result::Result<Vec<f32>, BoxError> {
    let output = raw_nn_out.first().ok_or("model produced no output")?;
    Ok(output.to_array_view::<f32>()?.iter().copied().collect())
}

/// Pair the raw class scores with their labels.
fn predictions_from_scores(labels: &[String], scores: &[f32]) -> Result<PredictionList> {
    if scores.len() != labels.len() {
        return Err(ClassifyError::inference(format!(
            "model returned {} scores for {} labels",
            scores.len(),
            labels.len()
        )));
    }

    Ok(labels
        .iter()
        .zip(scores)
        .map(|(label, score)| ClassPrediction::new(label.as_str(), *score))
        .collect())
}
