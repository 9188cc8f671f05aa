//! Mapping from a winning class label to the image that should be displayed.
//!

/// Default image shown for "Class 2".
pub const DEFAULT_CLASS0_ASSET: &str = "images/class0.png";
/// Default image shown for "Class 1".
pub const DEFAULT_CLASS1_ASSET: &str = "images/class1.png";

/// Label to asset lookup.
///
/// "Class 2" displays the `class0` asset and "Class 1" the `class1` asset. The
/// crossing is how the labels were authored and must stay as is. Labels outside
/// that vocabulary fall back to their position in the model's label list: the
/// second label displays `class0`, anything else `class1`.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetMap {
    class0: String,
    class1: String,
    labels: Vec<String>,
}

impl Default for AssetMap {
    fn default() -> Self {
        Self::new(DEFAULT_CLASS0_ASSET, DEFAULT_CLASS1_ASSET)
    }
}

impl AssetMap {
    pub fn new(class0: impl Into<String>, class1: impl Into<String>) -> Self {
        Self {
            class0: class0.into(),
            class1: class1.into(),
            labels: Vec::new(),
        }
    }

    /// Attach the ordered label set reported by the model at load time.
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn class0(&self) -> &str {
        &self.class0
    }

    pub fn class1(&self) -> &str {
        &self.class1
    }

    /// Asset path for `label`. Every input maps to one of the two assets.
    pub fn resolve(&self, label: &str) -> &str {
        match normalize(label).as_str() {
            "class 2" => &self.class0,
            "class 1" => &self.class1,
            // Position lookup uses the raw label, not the normalized one
            _ => match self.labels.iter().position(|known| known == label) {
                Some(1) => &self.class0,
                _ => &self.class1,
            },
        }
    }
}

/// Trim surrounding whitespace and lower-case.
pub fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}
