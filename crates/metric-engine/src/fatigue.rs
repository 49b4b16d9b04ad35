//! Fatigue score

use serde::{Deserialize, Serialize};

use crate::signals::FatigueSignals;
use crate::weights::FatigueWeights;

/// Linear ramp from 0 at `start` to 1 at `full`, clamped
fn ramp(value: f64, start: f64, full: f64) -> f64 {
    ((value - start) / (full - start)).clamp(0.0, 1.0)
}

/// Yawn: jawOpen above 0.25, saturating at 0.7
pub fn yawn(jaw_open: f64) -> f64 {
    if jaw_open > 0.25 {
        ramp(jaw_open, 0.25, 0.7)
    } else {
        0.0
    }
}

/// Instantaneous PERCLOS: EAR below 0.26, saturating at 0.05
pub fn perclos(average_ear: f64) -> f64 {
    if average_ear < 0.26 {
        ramp(average_ear, 0.26, 0.05)
    } else {
        0.0
    }
}

/// Head droop: pitch below -5 degrees, saturating at -25
pub fn head_droop(pitch: f64) -> f64 {
    if pitch < -5.0 {
        ramp(pitch, -5.0, -25.0)
    } else {
        0.0
    }
}

/// Eye squint: average squint above 0.25, saturating at 0.6
pub fn eye_squint(average_squint: f64) -> f64 {
    if average_squint > 0.25 {
        ramp(average_squint, 0.25, 0.6)
    } else {
        0.0
    }
}

/// Fatigue sub-scores, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FatigueBreakdown {
    pub yawn: f64,
    pub perclos: f64,
    pub blink_rate: f64,
    pub head_droop: f64,
    pub eye_squint: f64,
}

impl FatigueBreakdown {
    pub fn from_signals(s: &FatigueSignals) -> Self {
        Self {
            yawn: yawn(s.jaw_open),
            perclos: perclos(s.average_ear),
            blink_rate: s.blink_rate.clamp(0.0, 1.0),
            head_droop: head_droop(s.pitch),
            eye_squint: eye_squint(s.average_squint),
        }
    }

    pub fn weighted(&self, w: &FatigueWeights) -> f64 {
        w.yawn * self.yawn
            + w.perclos * self.perclos
            + w.blink_rate * self.blink_rate
            + w.head_droop * self.head_droop
            + w.eye_squint * self.eye_squint
    }

    /// Raw fatigue in [0, 1]
    pub fn score(&self, w: &FatigueWeights) -> f64 {
        self.weighted(w).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(s: &FatigueSignals, weights: &FatigueWeights) -> f64 {
        FatigueBreakdown::from_signals(s).score(weights)
    }

    #[test]
    fn test_sub_score_ramps() {
        assert_eq!(yawn(0.25), 0.0);
        assert!((yawn(0.475) - 0.5).abs() < 1e-12);
        assert_eq!(yawn(0.9), 1.0);

        assert_eq!(perclos(0.3), 0.0);
        assert!((perclos(0.155) - 0.5).abs() < 1e-12);
        assert_eq!(perclos(0.0), 1.0);

        assert_eq!(head_droop(-5.0), 0.0);
        assert!((head_droop(-15.0) - 0.5).abs() < 1e-12);
        assert_eq!(head_droop(-40.0), 1.0);
        assert_eq!(head_droop(10.0), 0.0);

        assert_eq!(eye_squint(0.2), 0.0);
        assert!((eye_squint(0.425) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_alert_face_scores_zero() {
        let s = FatigueSignals {
            average_ear: 0.32,
            ..Default::default()
        };
        assert_eq!(score(&s, &FatigueWeights::default()), 0.0);
    }

    #[test]
    fn test_weighted_sum() {
        let s = FatigueSignals {
            jaw_open: 0.7,
            average_ear: 0.05,
            pitch: -25.0,
            average_squint: 0.6,
            blink_rate: 0.84,
        };
        // All geometric sub-scores saturate
        let expected = 0.25 + 0.30 + 0.25 * 0.84 + 0.15 + 0.05;
        assert!((score(&s, &FatigueWeights::default()) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_heavy_weights_clamp() {
        let weights = FatigueWeights {
            yawn: 2.0,
            ..Default::default()
        };
        let s = FatigueSignals {
            jaw_open: 1.0,
            average_ear: 0.3,
            ..Default::default()
        };
        assert_eq!(score(&s, &weights), 1.0);
    }
}
