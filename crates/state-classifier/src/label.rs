//! User state labels

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete user state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StateLabel {
    #[serde(rename = "Highly Fatigued")]
    HighlyFatigued,
    #[serde(rename = "Highly Frustrated")]
    HighlyFrustrated,
    #[serde(rename = "Highly Distracted")]
    HighlyDistracted,
    #[serde(rename = "Slightly Fatigued")]
    SlightlyFatigued,
    #[serde(rename = "Slightly Frustrated")]
    SlightlyFrustrated,
    #[serde(rename = "Slightly Distracted")]
    SlightlyDistracted,
    #[serde(rename = "Highly Focused & Engaged")]
    HighlyFocusedEngaged,
    #[serde(rename = "Focused")]
    Focused,
    #[serde(rename = "Neutral/Calm")]
    NeutralCalm,
    #[default]
    #[serde(rename = "Unknown")]
    Unknown,
}

impl StateLabel {
    /// Every label, in rule order, `Unknown` last
    pub const ALL: [StateLabel; 10] = [
        StateLabel::HighlyFatigued,
        StateLabel::HighlyFrustrated,
        StateLabel::HighlyDistracted,
        StateLabel::SlightlyFatigued,
        StateLabel::SlightlyFrustrated,
        StateLabel::SlightlyDistracted,
        StateLabel::HighlyFocusedEngaged,
        StateLabel::Focused,
        StateLabel::NeutralCalm,
        StateLabel::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StateLabel::HighlyFatigued => "Highly Fatigued",
            StateLabel::HighlyFrustrated => "Highly Frustrated",
            StateLabel::HighlyDistracted => "Highly Distracted",
            StateLabel::SlightlyFatigued => "Slightly Fatigued",
            StateLabel::SlightlyFrustrated => "Slightly Frustrated",
            StateLabel::SlightlyDistracted => "Slightly Distracted",
            StateLabel::HighlyFocusedEngaged => "Highly Focused & Engaged",
            StateLabel::Focused => "Focused",
            StateLabel::NeutralCalm => "Neutral/Calm",
            StateLabel::Unknown => "Unknown",
        }
    }

    /// True for the states a coaching layer should react to
    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            StateLabel::HighlyFatigued
                | StateLabel::HighlyFrustrated
                | StateLabel::HighlyDistracted
                | StateLabel::SlightlyFatigued
                | StateLabel::SlightlyFrustrated
                | StateLabel::SlightlyDistracted
        )
    }
}

impl fmt::Display for StateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
