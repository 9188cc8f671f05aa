//! Classifier output and top-1 selection.
//!
use crate::{ClassifyError, Result};

/// Score of a single class for one inference.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassPrediction {
    pub class_name: String,
    pub probability: f32,
}

impl ClassPrediction {
    pub fn new(class_name: impl Into<String>, probability: f32) -> Self {
        Self {
            class_name: class_name.into(),
            probability,
        }
    }
}

/// One entry per known class, in the model's class order.
pub type PredictionList = Vec<ClassPrediction>;

/// Select the most probable class.
///
/// Ties go to the entry that comes first in the list.
pub fn top1(predictions: &[ClassPrediction]) -> Result<&ClassPrediction> {
    let (first, rest) = predictions
        .split_first()
        .ok_or(ClassifyError::EmptyPredictions)?;

    Ok(rest.iter().fold(first, |top, candidate| {
        if candidate.probability > top.probability {
            candidate
        } else {
            top
        }
    }))
}

/// Probability as a rounded integer percentage in `[0, 100]`.
pub fn confidence_percent(probability: f32) -> u8 {
    // NaN saturates to 0 on the cast
    (probability * 100.0).round().clamp(0.0, 100.0) as u8
}
