//! Attention score

use crate::signals::AttentionSignals;
use crate::weights::AttentionWeights;

/// Gaze activation above which eye movement is penalised
const GAZE_DEVIATION_THRESHOLD: f64 = 0.4;
/// Up/down gaze is held to a stricter threshold
const VERTICAL_GAZE_THRESHOLD: f64 = 0.5;
const GAZE_PENALTY_SCALE: f64 = 0.4;

const BLINK_PENALTY: f64 = 0.25;
const DEVIATION_PENALTY: f64 = 0.6;
const TALKING_PENALTY: f64 = 0.25;
const DAMPING: f64 = 0.98;

/// Head roughly facing the screen, 1 when frontal
pub fn head_forward(pitch: f64, yaw: f64) -> f64 {
    (1.0 - pitch.abs() / 45.0 - yaw.abs() / 45.0).clamp(0.0, 1.0)
}

/// Eye openness relative to a typical open EAR of 0.28
pub fn eyes_open(average_ear: f64) -> f64 {
    (average_ear / 0.28).clamp(0.0, 1.0)
}

/// Penalty for eyes turned away from the screen
pub fn eye_look_penalty(s: &AttentionSignals) -> f64 {
    let deviated = s.look_right > GAZE_DEVIATION_THRESHOLD
        || s.look_left > GAZE_DEVIATION_THRESHOLD
        || s.look_up > VERTICAL_GAZE_THRESHOLD
        || s.look_down > VERTICAL_GAZE_THRESHOLD;
    if !deviated {
        return 0.0;
    }
    let strongest = s.look_right.max(s.look_left).max(s.look_up).max(s.look_down);
    GAZE_PENALTY_SCALE * strongest
}

pub fn gaze_focus(s: &AttentionSignals) -> f64 {
    (0.5 * head_forward(s.pitch, s.yaw) + 0.5 * eyes_open(s.average_ear))
        * (1.0 - eye_look_penalty(s))
}

pub fn facial_focus(s: &AttentionSignals) -> f64 {
    0.5 * s.neutral + 0.2 * s.happy + 0.3 * s.mouth_close
}

fn is_talking(s: &AttentionSignals) -> bool {
    (s.mouth_funnel > 0.3 || s.mouth_pucker > 0.3) && s.jaw_open > 0.1
}

/// Raw attention in [0, 1]
pub fn score(s: &AttentionSignals, weights: &AttentionWeights) -> f64 {
    let mut raw = weights.gaze_focus * gaze_focus(s) + weights.facial_expression * facial_focus(s);

    if s.blinking {
        raw -= BLINK_PENALTY;
    }
    if s.yaw.abs() > 30.0 || s.pitch.abs() > 20.0 {
        raw -= DEVIATION_PENALTY;
    }
    if is_talking(s) {
        raw -= TALKING_PENALTY;
    }

    (raw * DAMPING).clamp(0.0, 1.0)
}
