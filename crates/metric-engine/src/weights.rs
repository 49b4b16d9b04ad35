//! Canonical metric weights and legacy configuration migration
//!
//! Weight maps from configuration are normalised once, at load time, into
//! the structs below. Scoring code only ever sees canonical weights.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::WeightError;

/// Attention fusion weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttentionWeights {
    pub gaze_focus: f64,
    pub facial_expression: f64,
}

impl Default for AttentionWeights {
    fn default() -> Self {
        Self {
            gaze_focus: 0.7,
            facial_expression: 0.3,
        }
    }
}

const ATTENTION_KEYS: [&str; 6] = [
    "gaze_focus",
    "facial_expression",
    "gaze",
    "time_on_screen",
    "head_pose",
    "engagement",
];

impl AttentionWeights {
    /// Build canonical weights from a configuration map
    ///
    /// An empty map yields the defaults. A map lacking either canonical key is
    /// read in the legacy shape: `gaze_focus = gaze + time_on_screen +
    /// head_pose`, `facial_expression = engagement` (legacy defaults 0.4, 0.3,
    /// 0.1 and 0.2).
    pub fn from_map(map: &HashMap<String, f64>) -> Result<Self, WeightError> {
        validate(map, &ATTENTION_KEYS)?;
        if map.is_empty() {
            return Ok(Self::default());
        }

        if let (Some(&gaze_focus), Some(&facial_expression)) =
            (map.get("gaze_focus"), map.get("facial_expression"))
        {
            return Ok(Self {
                gaze_focus,
                facial_expression,
            });
        }

        let get = |key: &str, default: f64| map.get(key).copied().unwrap_or(default);
        let migrated = Self {
            gaze_focus: get("gaze", 0.4) + get("time_on_screen", 0.3) + get("head_pose", 0.1),
            facial_expression: get("engagement", 0.2),
        };
        warn!(
            gaze_focus = migrated.gaze_focus,
            facial_expression = migrated.facial_expression,
            "Migrated legacy attention weights"
        );
        Ok(migrated)
    }
}

/// Fatigue fusion weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FatigueWeights {
    pub yawn: f64,
    pub perclos: f64,
    pub blink_rate: f64,
    pub head_droop: f64,
    pub eye_squint: f64,
}

impl Default for FatigueWeights {
    fn default() -> Self {
        Self {
            yawn: 0.25,
            perclos: 0.30,
            blink_rate: 0.25,
            head_droop: 0.15,
            eye_squint: 0.05,
        }
    }
}

const FATIGUE_KEYS: [&str; 6] = [
    "yawn",
    "perclos",
    "blink_rate",
    "head_droop",
    "eye_squint",
    "eye_closure",
];

impl FatigueWeights {
    /// Build canonical weights from a configuration map
    ///
    /// A complete map is taken as is. Otherwise missing keys take their
    /// defaults, a legacy `eye_closure` weight stands in for a missing
    /// `perclos`, and the result is rescaled to sum to 1.
    pub fn from_map(map: &HashMap<String, f64>) -> Result<Self, WeightError> {
        validate(map, &FATIGUE_KEYS)?;
        if map.is_empty() {
            return Ok(Self::default());
        }

        let defaults = Self::default();
        let get = |key: &str, default: f64| map.get(key).copied().unwrap_or(default);
        let complete = FATIGUE_KEYS[..5].iter().all(|k| map.contains_key(*k));

        let weights = Self {
            yawn: get("yawn", defaults.yawn),
            perclos: map
                .get("perclos")
                .or_else(|| map.get("eye_closure"))
                .copied()
                .unwrap_or(defaults.perclos),
            blink_rate: get("blink_rate", defaults.blink_rate),
            head_droop: get("head_droop", defaults.head_droop),
            eye_squint: get("eye_squint", defaults.eye_squint),
        };
        if complete {
            return Ok(weights);
        }

        let migrated = weights.normalized();
        warn!(?migrated, "Migrated partial fatigue weights");
        Ok(migrated)
    }

    pub fn sum(&self) -> f64 {
        self.yawn + self.perclos + self.blink_rate + self.head_droop + self.eye_squint
    }

    /// Rescale to sum 1, unchanged when the sum is zero
    pub fn normalized(self) -> Self {
        let sum = self.sum();
        if sum <= f64::EPSILON {
            return self;
        }
        Self {
            yawn: self.yawn / sum,
            perclos: self.perclos / sum,
            blink_rate: self.blink_rate / sum,
            head_droop: self.head_droop / sum,
            eye_squint: self.eye_squint / sum,
        }
    }
}

fn validate(map: &HashMap<String, f64>, known: &[&str]) -> Result<(), WeightError> {
    for (key, &value) in map {
        if !value.is_finite() || value < 0.0 {
            return Err(WeightError::Invalid {
                key: key.clone(),
                value,
            });
        }
        if !known.contains(&key.as_str()) {
            warn!(key = %key, "Ignoring unknown weight key");
        }
    }
    Ok(())
}
