//! What the user currently sees.
//!
use std::fmt;

use serde::Serialize;

/// One of the two independent inference pipelines.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextId {
    Camera,
    File,
}

impl ContextId {
    pub fn index(self) -> usize {
        match self {
            ContextId::Camera => 0,
            ContextId::File => 1,
        }
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextId::Camera => f.write_str("cam"),
            ContextId::File => f.write_str("file"),
        }
    }
}

/// Text label of one context.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContextDisplay {
    pub label: Option<String>,
    pub confidence: Option<u8>,
}

impl ContextDisplay {
    /// Confidence formatted as shown to the user, e.g. `80%`.
    pub fn confidence_text(&self) -> Option<String> {
        self.confidence.map(format_confidence)
    }
}

/// Per-context labels plus the single image slot both contexts write to.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DisplayState {
    pub camera: ContextDisplay,
    pub file: ContextDisplay,
    pub image: Option<String>,
}

impl DisplayState {
    pub fn context(&self, id: ContextId) -> &ContextDisplay {
        match id {
            ContextId::Camera => &self.camera,
            ContextId::File => &self.file,
        }
    }

    pub fn context_mut(&mut self, id: ContextId) -> &mut ContextDisplay {
        match id {
            ContextId::Camera => &mut self.camera,
            ContextId::File => &mut self.file,
        }
    }
}

pub fn format_confidence(confidence: u8) -> String {
    format!("{confidence}%")
}
