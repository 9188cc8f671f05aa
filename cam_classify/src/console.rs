//! Terminal display surface.
//!
use classifier::{display::DisplaySurface, ContextId};
use common::display::format_confidence;
use serde_json::json;

/// Prints display changes to stdout, as text or as JSON lines.
#[derive(Debug, Default)]
pub struct ConsoleSurface {
    json: bool,
}

impl ConsoleSurface {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn label_line(&self, context: ContextId, label: &str, confidence: u8) -> String {
        match self.json {
            true => json!({
                "event": "label",
                "context": context,
                "label": label,
                "confidence": confidence,
            })
            .to_string(),
            false => format!("[{context}] {label} {}", format_confidence(confidence)),
        }
    }

    pub fn image_line(&self, asset: &str) -> String {
        match self.json {
            true => json!({ "event": "image", "asset": asset }).to_string(),
            false => format!("[image] {asset}"),
        }
    }
}

impl DisplaySurface for ConsoleSurface {
    fn show_label(&self, context: ContextId, label: &str, confidence: u8) {
        println!("{}", self.label_line(context, label, confidence));
    }

    fn show_image(&self, asset: &str) {
        println!("{}", self.image_line(asset));
    }
}
