//! Tracking session: the per-frame driver loop body

use face_geometry::{
    EmotionClassifier, EmotionScores, FrameGeometry, GeometryAdapter, GeometryExtractor, RawFrame,
};
use metric_engine::{MetricEngine, MetricsSnapshot};
use metrics::{counter, gauge};
use serde::Serialize;
use state_classifier::{StateClassifier, StateLabel};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::TrackerConfig;

/// Where a frame's emotion scores came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionSource {
    Classifier,
    BlendShapeFallback,
    /// No face, no emotions
    None,
}

/// Everything produced for one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub timestamp: f64,
    pub geometry: FrameGeometry,
    pub emotions: EmotionScores,
    pub emotion_source: EmotionSource,
    pub metrics: MetricsSnapshot,
    pub state: StateLabel,
    pub state_changed: bool,
}

/// One user's tracking session
///
/// Owns all cross-frame state (blink edges, blink-rate window, smoothing
/// history, current state). Sessions are independent of each other.
pub struct TrackingSession<C: Clock = SystemClock> {
    adapter: GeometryAdapter,
    engine: MetricEngine,
    classifier: StateClassifier,
    clock: C,
    engagement: Option<u8>,
    current_state: Option<(StateLabel, f64)>,
    frames_processed: u64,
}

impl<C: Clock> TrackingSession<C> {
    pub fn new(config: TrackerConfig, clock: C) -> Self {
        info!("Tracking session started");
        Self {
            adapter: GeometryAdapter::new(config.adapter),
            engine: MetricEngine::new(config.engine),
            classifier: StateClassifier::new(config.state),
            clock,
            engagement: None,
            current_state: None,
            frames_processed: 0,
        }
    }

    /// Process one extractor frame with optional classifier emotions
    ///
    /// Missing or empty emotions are replaced by the blend-shape fallback.
    pub fn process_frame(&mut self, raw: &RawFrame, emotions: Option<EmotionScores>) -> FrameReport {
        let geometry = self.adapter.adapt(raw);
        self.finish(geometry, emotions)
    }

    /// Drive the external collaborators for one captured frame
    ///
    /// A classifier error is logged and replaced by the blend-shape fallback.
    pub fn process_with<E, K>(
        &mut self,
        extractor: &mut E,
        classifier: &mut K,
        frame: &E::Frame,
    ) -> FrameReport
    where
        E: GeometryExtractor,
        K: EmotionClassifier<Frame = E::Frame>,
    {
        let raw = extractor.extract(frame);
        let geometry = self.adapter.adapt(&raw);

        let emotions = if geometry.face_detected {
            match classifier.classify(frame, &geometry) {
                Ok(scores) => Some(scores),
                Err(e) => {
                    warn!("Emotion classifier failed, using blend-shape fallback: {}", e);
                    None
                }
            }
        } else {
            None
        };

        self.finish(geometry, emotions)
    }

    fn finish(&mut self, geometry: FrameGeometry, emotions: Option<EmotionScores>) -> FrameReport {
        let now = self.clock.now_seconds();
        self.frames_processed += 1;
        counter!("wellbeing_frames_total").increment(1);

        let (emotions, emotion_source) = if !geometry.face_detected {
            counter!("wellbeing_no_face_frames_total").increment(1);
            (EmotionScores::new(), EmotionSource::None)
        } else {
            match emotions.map(EmotionScores::normalized).filter(|e| !e.is_empty()) {
                Some(scores) => (scores, EmotionSource::Classifier),
                None => {
                    counter!("wellbeing_emotion_fallback_total").increment(1);
                    (
                        EmotionScores::from_blend_shapes(&geometry.blend_shapes),
                        EmotionSource::BlendShapeFallback,
                    )
                }
            }
        };

        let metrics = self.engine.update(&geometry, &emotions, now);
        let state = match self.engagement {
            Some(engagement) => self.classifier.classify_with_engagement(&metrics, engagement),
            None => self.classifier.classify(Some(&metrics)),
        };
        let state_changed = self.track_transition(state, now);

        gauge!("wellbeing_attention").set(f64::from(metrics.attention));
        gauge!("wellbeing_fatigue").set(f64::from(metrics.fatigue));
        gauge!("wellbeing_frustration").set(f64::from(metrics.frustration));
        gauge!("wellbeing_distraction").set(f64::from(metrics.distraction));

        debug!(
            frame = self.frames_processed,
            face = geometry.face_detected,
            attention = metrics.attention,
            fatigue = metrics.fatigue,
            frustration = metrics.frustration,
            distraction = metrics.distraction,
            dominant_emotion = ?emotions.dominant(),
            state = %state,
            "frame processed"
        );

        FrameReport {
            timestamp: now,
            geometry,
            emotions,
            emotion_source,
            metrics,
            state,
            state_changed,
        }
    }

    fn track_transition(&mut self, state: StateLabel, now: f64) -> bool {
        match self.current_state {
            Some((previous, _)) if previous == state => false,
            Some((previous, since)) => {
                info!(
                    from = %previous,
                    to = %state,
                    dwell_seconds = now - since,
                    negative = state.is_negative(),
                    "State changed"
                );
                counter!("wellbeing_state_transitions_total").increment(1);
                if state.is_negative() && !previous.is_negative() {
                    counter!("wellbeing_negative_state_entries_total").increment(1);
                }
                self.current_state = Some((state, now));
                true
            }
            None => {
                info!(state = %state, "Initial state");
                self.current_state = Some((state, now));
                true
            }
        }
    }

    /// Engagement percentage supplied by an external source, used by the focus rules
    pub fn set_engagement(&mut self, engagement: Option<u8>) {
        self.engagement = engagement.map(|e| e.min(100));
    }

    /// Current state and the time it was entered
    pub fn current_state(&self) -> Option<(StateLabel, f64)> {
        self.current_state
    }

    /// Seconds spent in the current state
    pub fn state_dwell_seconds(&self) -> Option<f64> {
        self.current_state
            .map(|(_, since)| self.clock.now_seconds() - since)
    }

    pub fn last_metrics(&self) -> Option<MetricsSnapshot> {
        self.engine.last()
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Forget all cross-frame state
    pub fn reset(&mut self) {
        let now = self.clock.now_seconds();
        self.adapter.reset();
        self.engine.reset(now);
        self.current_state = None;
        self.frames_processed = 0;
        info!("Tracking session reset");
    }
}

impl TrackingSession<SystemClock> {
    /// Session on the wall clock
    pub fn with_system_clock(config: TrackerConfig) -> Self {
        Self::new(config, SystemClock::new())
    }
}
