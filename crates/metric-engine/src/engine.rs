//! Metric engine: scoring, smoothing and no-face handling

use face_geometry::{EmotionScores, FrameGeometry};
use ring_buffer::MetricHistory;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::blink_rate::BlinkRateTracker;
use crate::config::EngineConfig;
use crate::fatigue::FatigueBreakdown;
use crate::signals::{AttentionSignals, FatigueSignals, FrustrationSignals};
use crate::{attention, frustration, to_percentage};

/// Smoothed metrics for one frame, each a percentage in [0, 100]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub attention: u8,
    pub fatigue: u8,
    pub frustration: u8,
    pub distraction: u8,
}

/// Per-session metric engine
///
/// Owns the blink-rate window and the smoothing histories. Must be driven by
/// a single caller, one frame at a time.
pub struct MetricEngine {
    config: EngineConfig,
    blink: BlinkRateTracker,
    attention: MetricHistory,
    fatigue: MetricHistory,
    frustration: MetricHistory,
    last: Option<MetricsSnapshot>,
    last_raw: Option<MetricsSnapshot>,
}

impl MetricEngine {
    pub fn new(config: EngineConfig) -> Self {
        info!(
            smoothing_window = config.smoothing_window,
            blink_interval_seconds = config.blink_interval_seconds,
            "Metric engine initialized"
        );
        let window = config.smoothing_window.max(1);
        Self {
            blink: BlinkRateTracker::new(config.blink_interval_seconds),
            attention: MetricHistory::new(window),
            fatigue: MetricHistory::new(window),
            frustration: MetricHistory::new(window),
            last: None,
            last_raw: None,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Score one frame at time `now` (seconds)
    ///
    /// Without a face, attention is 0 and distraction 100 while fatigue and
    /// frustration hold their last smoothed values; smoothing history is
    /// left untouched and the blink window restarts.
    pub fn update(
        &mut self,
        geometry: &FrameGeometry,
        emotions: &EmotionScores,
        now: f64,
    ) -> MetricsSnapshot {
        if !geometry.face_detected {
            self.blink.reset(now);
            let held = self.last.unwrap_or_default();
            let snapshot = MetricsSnapshot {
                attention: 0,
                fatigue: held.fatigue,
                frustration: held.frustration,
                distraction: 100,
            };
            self.last = Some(snapshot);
            return snapshot;
        }

        let blink_rate = self.blink.update(geometry.eye_state.blinking, now);

        let attention_raw = attention::score(
            &AttentionSignals::resolve(geometry, emotions),
            &self.config.attention_weights,
        );
        let fatigue = FatigueBreakdown::from_signals(&FatigueSignals::resolve(geometry, blink_rate));
        let fatigue_raw = fatigue.score(&self.config.fatigue_weights);
        let frustration_raw = frustration::score(&FrustrationSignals::resolve(geometry, emotions));

        let raw = MetricsSnapshot {
            attention: to_percentage(attention_raw),
            fatigue: to_percentage(fatigue_raw),
            frustration: to_percentage(frustration_raw),
            distraction: 100 - to_percentage(attention_raw),
        };
        debug!(
            attention = raw.attention,
            fatigue = raw.fatigue,
            frustration = raw.frustration,
            yawn = fatigue.yawn,
            perclos = fatigue.perclos,
            blink_rate = fatigue.blink_rate,
            head_droop = fatigue.head_droop,
            eye_squint = fatigue.eye_squint,
            top_blend_shapes = ?geometry.blend_shapes.top(5),
            "raw metrics"
        );

        let attention = smooth(&mut self.attention, raw.attention);
        let snapshot = MetricsSnapshot {
            attention,
            fatigue: smooth(&mut self.fatigue, raw.fatigue),
            frustration: smooth(&mut self.frustration, raw.frustration),
            distraction: 100 - attention,
        };

        self.last_raw = Some(raw);
        self.last = Some(snapshot);
        snapshot
    }

    /// Most recent snapshot returned by [`MetricEngine::update`]
    pub fn last(&self) -> Option<MetricsSnapshot> {
        self.last
    }

    /// Unsmoothed percentages of the most recent face frame
    pub fn last_raw(&self) -> Option<MetricsSnapshot> {
        self.last_raw
    }

    pub fn blink_tracker(&self) -> &BlinkRateTracker {
        &self.blink
    }

    /// Clear smoothing history and blink state, restarting the blink window at `now`
    pub fn reset(&mut self, now: f64) {
        self.blink.reset(now);
        self.attention.clear();
        self.fatigue.clear();
        self.frustration.clear();
        self.last = None;
        self.last_raw = None;
    }
}

impl Default for MetricEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Push a raw percentage and return the rounded window mean
fn smooth(history: &mut MetricHistory, raw: u8) -> u8 {
    history.push(f64::from(raw));
    history
        .mean()
        .map(|mean| mean.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(raw)
}
