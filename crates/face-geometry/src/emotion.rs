//! Emotion scores and the blend-shape fallback

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::blend_shapes::names;
use crate::{BlendShapes, FrameGeometry, GeometryError};

pub const HAPPY: &str = "happy";
pub const SAD: &str = "sad";
pub const ANGRY: &str = "angry";
pub const SURPRISE: &str = "surprise";
pub const NEUTRAL: &str = "neutral";
pub const FEAR: &str = "fear";
pub const DISGUST: &str = "disgust";

/// Mapping of emotion label to score
///
/// Classifiers may report on a 0-100 scale; the fallback always reports 0-1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionScores(HashMap<String, f64>);

impl EmotionScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, score: f64) {
        if score.is_finite() {
            self.0.insert(label.into(), score);
        }
    }

    /// Score for `label` if present
    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.get(label).copied()
    }

    /// Score for `label`, or `default` when absent
    pub fn score_or(&self, label: &str, default: f64) -> f64 {
        self.get(label).unwrap_or(default)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Label with the highest score
    pub fn dominant(&self) -> Option<(&str, f64)> {
        self.0
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(k, &v)| (k.as_str(), v))
    }

    /// Rescale a 0-100 map to 0-1
    ///
    /// A map is treated as percentage-scaled when any score exceeds 1.
    /// Scores are clamped to [0, 1] afterwards and non-finite entries dropped.
    pub fn normalized(self) -> Self {
        let percent = self.0.values().any(|&v| v > 1.0);
        self.0
            .into_iter()
            .filter(|(_, v)| v.is_finite())
            .map(|(k, v)| {
                let v = if percent { v / 100.0 } else { v };
                (k, v.clamp(0.0, 1.0))
            })
            .collect()
    }

    /// Deterministic emotion estimate from blend-shapes
    ///
    /// Used whenever the classifier is unavailable or fails. All outputs are
    /// clamped to [0, 1].
    pub fn from_blend_shapes(bs: &BlendShapes) -> Self {
        let s = |name: &str| bs.score(name);

        let happy = (s(names::MOUTH_SMILE_LEFT)
            + s(names::MOUTH_SMILE_RIGHT)
            + 0.5 * s(names::CHEEK_SQUINT_LEFT)
            + 0.5 * s(names::CHEEK_SQUINT_RIGHT))
            / 2.5;
        let sad = (s(names::MOUTH_FROWN_LEFT)
            + s(names::MOUTH_FROWN_RIGHT)
            + 0.7 * s(names::BROW_DOWN_LEFT)
            + 0.7 * s(names::BROW_DOWN_RIGHT)
            + 0.5 * s(names::BROW_INNER_UP)
            + 0.3 * s(names::MOUTH_PUCKER))
            / 3.2;
        let angry = (s(names::BROW_DOWN_LEFT)
            + s(names::BROW_DOWN_RIGHT)
            + 0.5 * s(names::MOUTH_FUNNEL)
            + 0.25 * (s(names::MOUTH_PRESS_LEFT) + s(names::MOUTH_PRESS_RIGHT))
            + 0.3 * s(names::JAW_FORWARD)
            + 0.2 * s(names::NOSE_SNEER_LEFT)
            + 0.2 * s(names::NOSE_SNEER_RIGHT))
            / 3.4;
        let surprise = (s(names::EYE_WIDE_LEFT)
            + s(names::EYE_WIDE_RIGHT)
            + 0.8 * s(names::JAW_OPEN)
            + 1.2 * s(names::BROW_INNER_UP))
            / 3.0;
        let fear = (0.6 * s(names::EYE_WIDE_LEFT)
            + 0.6 * s(names::EYE_WIDE_RIGHT)
            + 0.4 * s(names::MOUTH_STRETCH_LEFT)
            + 0.4 * s(names::MOUTH_STRETCH_RIGHT)
            + 0.5 * s(names::BROW_INNER_UP))
            / 2.5;
        let disgust =
            (s(names::NOSE_SNEER_LEFT) + s(names::NOSE_SNEER_RIGHT) + 0.5 * s(names::MOUTH_SHRUG_UPPER)) / 2.5;

        let mut neutral = s(names::NEUTRAL);
        if bs.all_zero() {
            neutral = 0.8;
        }
        if happy + sad + angry + surprise < 0.1 && neutral < 0.5 {
            neutral += 0.3;
        }

        [
            (HAPPY, happy),
            (SAD, sad),
            (ANGRY, angry),
            (SURPRISE, surprise),
            (NEUTRAL, neutral),
            (FEAR, fear),
            (DISGUST, disgust),
        ]
        .into_iter()
        .map(|(label, score)| (label.to_string(), score.clamp(0.0, 1.0)))
        .collect()
    }
}

impl FromIterator<(String, f64)> for EmotionScores {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut scores = Self::new();
        for (label, score) in iter {
            scores.insert(label, score);
        }
        scores
    }
}

/// External emotion classifier working on a face crop
pub trait EmotionClassifier {
    type Frame;

    fn classify(
        &mut self,
        frame: &Self::Frame,
        geometry: &FrameGeometry,
    ) -> Result<EmotionScores, GeometryError>;
}
