//! Wellbeing Metric Engine
//!
//! Fuses per-frame geometry, blend-shapes and emotion scores into four
//! smoothed percentages:
//! - Attention (gaze focus, facial focus, penalties)
//! - Fatigue (yawn, PERCLOS, blink rate, head droop, squint)
//! - Frustration (brow/mouth tension plus anger)
//! - Distraction (complement of attention)

pub mod attention;
pub mod blink_rate;
pub mod config;
pub mod engine;
pub mod fatigue;
pub mod frustration;
pub mod signals;
pub mod weights;

pub use blink_rate::BlinkRateTracker;
pub use config::EngineConfig;
pub use engine::{MetricEngine, MetricsSnapshot};
pub use signals::{AttentionSignals, FatigueSignals, FrustrationSignals};
pub use weights::{AttentionWeights, FatigueWeights};

use thiserror::Error;

/// Weight configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeightError {
    #[error("Weight {key} must be finite and non-negative, got {value}")]
    Invalid { key: String, value: f64 },
}

/// Scale a [0, 1] score to a truncated 0-100 percentage
///
/// Out-of-range input is clamped first; NaN reads as 0.
pub fn to_percentage(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }
    (score.clamp(0.0, 1.0) * 100.0) as u8
}
