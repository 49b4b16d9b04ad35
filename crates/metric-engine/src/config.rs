//! Metric engine configuration

use serde::{Deserialize, Serialize};

use crate::blink_rate::DEFAULT_INTERVAL_SECONDS;
use crate::weights::{AttentionWeights, FatigueWeights};

/// Metric engine configuration (canonical, post-migration)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub attention_weights: AttentionWeights,
    pub fatigue_weights: FatigueWeights,

    /// Number of raw values averaged per metric
    pub smoothing_window: usize,

    /// Blink-rate window length (seconds)
    pub blink_interval_seconds: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            attention_weights: AttentionWeights::default(),
            fatigue_weights: FatigueWeights::default(),
            smoothing_window: ring_buffer::DEFAULT_CAPACITY,
            blink_interval_seconds: DEFAULT_INTERVAL_SECONDS,
        }
    }
}
