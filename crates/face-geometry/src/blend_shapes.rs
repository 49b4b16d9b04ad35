//! Named blend-shape activations

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Blend-shape names emitted by the MediaPipe face landmarker
pub mod names {
    pub const NEUTRAL: &str = "_neutral";
    pub const BROW_DOWN_LEFT: &str = "browDownLeft";
    pub const BROW_DOWN_RIGHT: &str = "browDownRight";
    pub const BROW_INNER_UP: &str = "browInnerUp";
    pub const CHEEK_SQUINT_LEFT: &str = "cheekSquintLeft";
    pub const CHEEK_SQUINT_RIGHT: &str = "cheekSquintRight";
    pub const EYE_LOOK_DOWN_LEFT: &str = "eyeLookDownLeft";
    pub const EYE_LOOK_DOWN_RIGHT: &str = "eyeLookDownRight";
    pub const EYE_LOOK_IN_LEFT: &str = "eyeLookInLeft";
    pub const EYE_LOOK_IN_RIGHT: &str = "eyeLookInRight";
    pub const EYE_LOOK_OUT_LEFT: &str = "eyeLookOutLeft";
    pub const EYE_LOOK_OUT_RIGHT: &str = "eyeLookOutRight";
    pub const EYE_LOOK_UP_LEFT: &str = "eyeLookUpLeft";
    pub const EYE_LOOK_UP_RIGHT: &str = "eyeLookUpRight";
    pub const EYE_SQUINT_LEFT: &str = "eyeSquintLeft";
    pub const EYE_SQUINT_RIGHT: &str = "eyeSquintRight";
    pub const EYE_WIDE_LEFT: &str = "eyeWideLeft";
    pub const EYE_WIDE_RIGHT: &str = "eyeWideRight";
    pub const JAW_FORWARD: &str = "jawForward";
    pub const JAW_OPEN: &str = "jawOpen";
    pub const MOUTH_CLOSE: &str = "mouthClose";
    pub const MOUTH_FROWN_LEFT: &str = "mouthFrownLeft";
    pub const MOUTH_FROWN_RIGHT: &str = "mouthFrownRight";
    pub const MOUTH_FUNNEL: &str = "mouthFunnel";
    pub const MOUTH_PRESS_LEFT: &str = "mouthPressLeft";
    pub const MOUTH_PRESS_RIGHT: &str = "mouthPressRight";
    pub const MOUTH_PUCKER: &str = "mouthPucker";
    pub const MOUTH_SHRUG_UPPER: &str = "mouthShrugUpper";
    pub const MOUTH_SMILE_LEFT: &str = "mouthSmileLeft";
    pub const MOUTH_SMILE_RIGHT: &str = "mouthSmileRight";
    pub const MOUTH_STRETCH_LEFT: &str = "mouthStretchLeft";
    pub const MOUTH_STRETCH_RIGHT: &str = "mouthStretchRight";
    pub const NOSE_SNEER_LEFT: &str = "noseSneerLeft";
    pub const NOSE_SNEER_RIGHT: &str = "noseSneerRight";
}

/// Mapping of blend-shape name to activation score in [0, 1]
///
/// Missing names read as 0.0. Scores inserted through [`BlendShapes::insert`]
/// are clamped to [0, 1] and non-finite scores are dropped; maps that arrive
/// through deserialization are brought into the same shape by
/// [`BlendShapes::sanitized`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlendShapes(HashMap<String, f64>);

impl BlendShapes {
    /// Create an empty blend-shape map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a score, clamping it into [0, 1]
    pub fn insert(&mut self, name: impl Into<String>, score: f64) {
        if score.is_finite() {
            self.0.insert(name.into(), score.clamp(0.0, 1.0));
        }
    }

    /// Score for `name`, or 0.0 when absent
    pub fn score(&self, name: &str) -> f64 {
        self.0.get(name).copied().unwrap_or(0.0)
    }

    /// Score for `name` if the extractor reported it
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the map is empty or every activation is zero
    pub fn all_zero(&self) -> bool {
        self.0.values().all(|&v| v == 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// The `n` strongest activations, highest first
    pub fn top(&self, n: usize) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }

    /// Re-apply the insert invariants to every entry
    pub fn sanitized(self) -> Self {
        self.0.into_iter().collect()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for BlendShapes {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut shapes = Self::new();
        for (name, score) in iter {
            shapes.insert(name, score);
        }
        shapes
    }
}
