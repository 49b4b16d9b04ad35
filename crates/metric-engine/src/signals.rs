//! Per-metric signal resolution
//!
//! Each scorer reads a flat struct of plain numbers. Missing inputs are
//! substituted here, once, with that metric's documented default.

use face_geometry::blend_shapes::names;
use face_geometry::emotion;
use face_geometry::{EmotionScores, FrameGeometry};

/// EAR assumed for a missing eye when scoring attention
pub const ATTENTION_DEFAULT_EAR: f64 = 0.15;
/// Neutral emotion assumed when the classifier reports none
pub const ATTENTION_DEFAULT_NEUTRAL: f64 = 0.3;
/// EAR assumed for a missing eye when scoring fatigue
pub const FATIGUE_DEFAULT_EAR: f64 = 0.35;

/// Inputs to the attention score
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttentionSignals {
    pub pitch: f64,
    pub yaw: f64,
    pub average_ear: f64,
    pub blinking: bool,
    /// Strongest gaze activation looking right (out right / in left)
    pub look_right: f64,
    /// Strongest gaze activation looking left (out left / in right)
    pub look_left: f64,
    pub look_up: f64,
    pub look_down: f64,
    pub neutral: f64,
    pub happy: f64,
    pub mouth_close: f64,
    pub mouth_funnel: f64,
    pub mouth_pucker: f64,
    pub jaw_open: f64,
}

impl AttentionSignals {
    pub fn resolve(geometry: &FrameGeometry, emotions: &EmotionScores) -> Self {
        let bs = &geometry.blend_shapes;
        let s = |name: &str| bs.score(name);

        Self {
            pitch: geometry.head_pose.pitch,
            yaw: geometry.head_pose.yaw,
            average_ear: geometry.eye_state.average_ear_or(ATTENTION_DEFAULT_EAR),
            blinking: geometry.eye_state.blinking,
            look_right: s(names::EYE_LOOK_OUT_RIGHT).max(s(names::EYE_LOOK_IN_LEFT)),
            look_left: s(names::EYE_LOOK_OUT_LEFT).max(s(names::EYE_LOOK_IN_RIGHT)),
            look_up: s(names::EYE_LOOK_UP_RIGHT).max(s(names::EYE_LOOK_UP_LEFT)),
            look_down: s(names::EYE_LOOK_DOWN_RIGHT).max(s(names::EYE_LOOK_DOWN_LEFT)),
            neutral: emotions.score_or(emotion::NEUTRAL, ATTENTION_DEFAULT_NEUTRAL),
            happy: emotions.score_or(emotion::HAPPY, 0.0),
            mouth_close: s(names::MOUTH_CLOSE),
            mouth_funnel: s(names::MOUTH_FUNNEL),
            mouth_pucker: s(names::MOUTH_PUCKER),
            jaw_open: s(names::JAW_OPEN),
        }
    }
}

/// Inputs to the fatigue score
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FatigueSignals {
    pub jaw_open: f64,
    pub average_ear: f64,
    pub pitch: f64,
    pub average_squint: f64,
    /// Held sub-score from the blink-rate tracker
    pub blink_rate: f64,
}

impl FatigueSignals {
    pub fn resolve(geometry: &FrameGeometry, blink_rate: f64) -> Self {
        let bs = &geometry.blend_shapes;
        Self {
            jaw_open: bs.score(names::JAW_OPEN),
            average_ear: geometry.eye_state.average_ear_or(FATIGUE_DEFAULT_EAR),
            pitch: geometry.head_pose.pitch,
            average_squint: (bs.score(names::EYE_SQUINT_LEFT) + bs.score(names::EYE_SQUINT_RIGHT))
                / 2.0,
            blink_rate,
        }
    }
}

/// Inputs to the frustration score
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrustrationSignals {
    /// browDownLeft + browDownRight
    pub brow_down: f64,
    /// mouthPressLeft + mouthPressRight
    pub mouth_press: f64,
    pub angry: f64,
}

impl FrustrationSignals {
    pub fn resolve(geometry: &FrameGeometry, emotions: &EmotionScores) -> Self {
        let bs = &geometry.blend_shapes;
        Self {
            brow_down: bs.score(names::BROW_DOWN_LEFT) + bs.score(names::BROW_DOWN_RIGHT),
            mouth_press: bs.score(names::MOUTH_PRESS_LEFT) + bs.score(names::MOUTH_PRESS_RIGHT),
            angry: emotions.score_or(emotion::ANGRY, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use face_geometry::{BlendShapes, EyeState};

    fn geometry_with_eyes(left: Option<f64>, right: Option<f64>) -> FrameGeometry {
        FrameGeometry {
            face_detected: true,
            eye_state: EyeState {
                left_ear: left,
                right_ear: right,
                blinking: false,
            },
            ..FrameGeometry::empty()
        }
    }

    #[test]
    fn test_missing_eyes_use_metric_defaults() {
        let geometry = geometry_with_eyes(Some(0.3), None);
        let attention = AttentionSignals::resolve(&geometry, &EmotionScores::new());
        let fatigue = FatigueSignals::resolve(&geometry, 0.0);

        assert!((attention.average_ear - 0.225).abs() < 1e-12);
        assert!((fatigue.average_ear - 0.325).abs() < 1e-12);
    }

    #[test]
    fn test_missing_emotions() {
        let geometry = geometry_with_eyes(Some(0.3), Some(0.3));
        let attention = AttentionSignals::resolve(&geometry, &EmotionScores::new());
        assert_eq!(attention.neutral, ATTENTION_DEFAULT_NEUTRAL);
        assert_eq!(attention.happy, 0.0);

        let frustration = FrustrationSignals::resolve(&geometry, &EmotionScores::new());
        assert_eq!(frustration.angry, 0.0);
    }

    #[test]
    fn test_gaze_pairs() {
        let mut geometry = geometry_with_eyes(Some(0.3), Some(0.3));
        geometry.blend_shapes = [
            (names::EYE_LOOK_OUT_RIGHT, 0.2),
            (names::EYE_LOOK_IN_LEFT, 0.7),
            (names::EYE_LOOK_DOWN_LEFT, 0.6),
        ]
        .into_iter()
        .collect::<BlendShapes>();

        let attention = AttentionSignals::resolve(&geometry, &EmotionScores::new());
        assert_eq!(attention.look_right, 0.7);
        assert_eq!(attention.look_left, 0.0);
        assert_eq!(attention.look_down, 0.6);
    }
}
