//! State Classifier
//!
//! Maps smoothed metrics to one discrete user state through a fixed,
//! ordered rule chain (first match wins):
//! - Critical states (fatigue, frustration, distraction)
//! - Elevated states (same order)
//! - Positive focus states
//! - Neutral fallback

pub mod classifier;
pub mod label;
pub mod thresholds;

pub use classifier::StateClassifier;
pub use label::StateLabel;
pub use thresholds::StateThresholds;
