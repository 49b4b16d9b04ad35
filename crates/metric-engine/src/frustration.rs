//! Frustration score

use crate::signals::FrustrationSignals;

/// Facial tension below this sum is treated as noise
const NOISE_FLOOR: f64 = 0.05;
const ANGER_WEIGHT: f64 = 0.5;

/// Raw frustration in [0, 1]
pub fn score(s: &FrustrationSignals) -> f64 {
    let tension = s.brow_down + s.mouth_press;
    let mut raw = if tension > NOISE_FLOOR { tension } else { 0.0 };

    let angry = if s.angry > 1.0 { s.angry / 100.0 } else { s.angry };
    raw += ANGER_WEIGHT * angry;

    raw.clamp(0.0, 1.0)
}
