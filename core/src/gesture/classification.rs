use crate::gesture::label::GestureLabel;
use serde::{Deserialize, Serialize};

/// Per-frame output of the external classifier.
///
/// One result arrives per captured frame; the core consumes these in arrival
/// order and never persists them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: GestureLabel,
    pub confidence: f32,
}

impl ClassificationResult {
    pub fn new(label: GestureLabel, confidence: f32) -> Self {
        Self {
            label,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// A frame on which no gesture was observed.
    pub fn empty() -> Self {
        Self::new(GestureLabel::None, 0.0)
    }
}
