//! Ordered rule chain

use metric_engine::MetricsSnapshot;
use tracing::trace;

use crate::{StateLabel, StateThresholds};

/// Stateless metrics-to-state classifier
#[derive(Debug, Clone, Default)]
pub struct StateClassifier {
    thresholds: StateThresholds,
}

impl StateClassifier {
    pub fn new(thresholds: StateThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &StateThresholds {
        &self.thresholds
    }

    /// Classify a snapshot with no engagement signal
    ///
    /// Engagement reads as 0, so the focus states cannot match.
    pub fn classify(&self, metrics: Option<&MetricsSnapshot>) -> StateLabel {
        match metrics {
            Some(m) => self.classify_with_engagement(m, 0),
            None => StateLabel::Unknown,
        }
    }

    /// Classify a snapshot with an externally supplied engagement percentage
    pub fn classify_with_engagement(&self, m: &MetricsSnapshot, engagement: u8) -> StateLabel {
        let label = self.evaluate(m, engagement);
        trace!(?m, engagement, state = %label, "classified");
        label
    }

    fn evaluate(&self, m: &MetricsSnapshot, engagement: u8) -> StateLabel {
        let t = &self.thresholds;

        // Critical
        if m.fatigue >= t.fatigue_critical {
            return StateLabel::HighlyFatigued;
        }
        if m.frustration >= t.frustration_critical {
            return StateLabel::HighlyFrustrated;
        }
        if m.distraction >= t.distraction_critical && m.attention < t.attention_low {
            return StateLabel::HighlyDistracted;
        }

        // Elevated
        if m.fatigue >= t.fatigue_high {
            return StateLabel::SlightlyFatigued;
        }
        if m.frustration >= t.frustration_high {
            return StateLabel::SlightlyFrustrated;
        }
        if m.distraction >= t.distraction_high && m.attention < t.attention_focused {
            return StateLabel::SlightlyDistracted;
        }

        // Positive
        if m.attention >= t.attention_high
            && engagement >= t.engagement_high
            && m.frustration < t.frustration_low_for_focus
            && m.fatigue < t.fatigue_low_for_focus
            && m.distraction < t.distraction_low_for_focus
        {
            return StateLabel::HighlyFocusedEngaged;
        }
        if m.attention >= t.attention_focused
            && engagement >= t.engagement_moderate
            && m.frustration < t.frustration_high
            && m.fatigue < t.fatigue_high
            && m.distraction < t.distraction_high
        {
            return StateLabel::Focused;
        }

        StateLabel::NeutralCalm
    }
}
