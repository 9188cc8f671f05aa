//! One inference cycle: predict, pick the winner, update the display.
//!
use std::sync::Arc;

use common::{
    assets::AssetMap,
    display::ContextId,
    prediction::{confidence_percent, top1},
};
use image::RgbImage;

use crate::{display::DisplayBoard, meter::METER, nn::Predictor, Result};

/// The context an inference runs in and the board its result goes to.
#[derive(Clone)]
pub struct InferenceContext {
    pub id: ContextId,
    pub board: Arc<DisplayBoard>,
}

impl InferenceContext {
    pub fn new(id: ContextId, board: Arc<DisplayBoard>) -> Self {
        Self { id, board }
    }
}

/// Outcome of one inference.
#[derive(Clone, Debug, PartialEq)]
pub struct Verdict {
    pub context: ContextId,
    pub label: String,
    pub probability: f32,
    pub confidence: u8,
    pub asset: String,
    /// `false` if a newer result for the same context was already on display.
    pub applied: bool,
}

pub struct Inferer {
    predictor: Arc<dyn Predictor>,
    assets: AssetMap,
    flip: bool,
}

impl Inferer {
    /// The asset map's fallback uses the predictor's label order.
    pub fn new(predictor: Arc<dyn Predictor>, assets: AssetMap) -> Self {
        let assets = assets.with_labels(predictor.class_labels().iter().cloned());
        Self {
            predictor,
            assets,
            flip: false,
        }
    }

    /// Mirror images before they are passed to the predictor.
    pub fn with_flip(mut self, flip: bool) -> Self {
        self.flip = flip;
        self
    }

    pub fn labels(&self) -> &[String] {
        self.predictor.class_labels()
    }

    pub fn assets(&self) -> &AssetMap {
        &self.assets
    }

    /// Classify `image` and show the result in `ctx`.
    ///
    /// Predictor failures are returned before anything is displayed.
    pub async fn infer(&self, ctx: &InferenceContext, image: RgbImage) -> Result<Verdict> {
        let ticket = ctx.board.begin(ctx.id);

        let predictions = match self.predictor.predict(image, self.flip).await {
            Ok(predictions) => predictions,
            Err(err) => {
                METER.tick_failed();
                return Err(err);
            }
        };
        let top = top1(&predictions)?;

        let confidence = confidence_percent(top.probability);
        let asset = self.assets.resolve(&top.class_name);
        let applied = ctx.board.commit(ticket, &top.class_name, confidence, asset);
        if !applied {
            log::debug!(
                "[{}] Dropping {} result, a newer one is on display",
                ctx.id,
                &top.class_name
            );
        }
        METER.tick_infered();

        Ok(Verdict {
            context: ctx.id,
            label: top.class_name.clone(),
            probability: top.probability,
            confidence,
            asset: asset.to_owned(),
            applied,
        })
    }
}
