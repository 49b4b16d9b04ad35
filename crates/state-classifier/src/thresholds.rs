//! Classification thresholds

use serde::{Deserialize, Serialize};

/// Thresholds of the rule chain, all percentages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateThresholds {
    pub attention_high: u8,
    pub attention_focused: u8,
    pub attention_low: u8,
    pub engagement_high: u8,
    pub engagement_moderate: u8,
    pub frustration_critical: u8,
    pub frustration_high: u8,
    pub fatigue_critical: u8,
    pub fatigue_high: u8,
    pub distraction_critical: u8,
    pub distraction_high: u8,
    pub distraction_low_for_focus: u8,
    pub frustration_low_for_focus: u8,
    pub fatigue_low_for_focus: u8,
}

impl Default for StateThresholds {
    fn default() -> Self {
        Self {
            attention_high: 85,
            attention_focused: 70,
            attention_low: 50,
            engagement_high: 70,
            engagement_moderate: 50,
            frustration_critical: 70,
            frustration_high: 40,
            fatigue_critical: 70,
            fatigue_high: 40,
            distraction_critical: 60,
            distraction_high: 30,
            distraction_low_for_focus: 15,
            frustration_low_for_focus: 25,
            fatigue_low_for_focus: 25,
        }
    }
}
