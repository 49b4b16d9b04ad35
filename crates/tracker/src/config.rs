//! Layered tracker configuration
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. Default config file (required when set)
//! 3. User override file (optional)
//! 4. Environment, e.g. `WELLBEING__METRICS__SMOOTHING_WINDOW=5`
//!
//! Weight maps are taken whole from the highest layer that sets them and
//! migrated to canonical structs once, here.

use ::config::{Config, Environment, File};
use face_geometry::{AdapterConfig, FrameSize};
use metric_engine::{AttentionWeights, EngineConfig, FatigueWeights};
use serde::{Deserialize, Serialize};
use state_classifier::StateThresholds;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::ConfigError;

pub const DEFAULT_ENV_PREFIX: &str = "WELLBEING";
const ENV_SEPARATOR: &str = "__";

/// `metrics` section as written in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSection {
    pub attention_weights: HashMap<String, f64>,
    pub fatigue_weights: HashMap<String, f64>,
    pub smoothing_window: i64,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            attention_weights: HashMap::new(),
            fatigue_weights: HashMap::new(),
            smoothing_window: 3,
        }
    }
}

/// `blink` section as written in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkSection {
    pub interval_seconds: f64,
    pub ear_threshold: f64,
    pub consecutive_frames: i64,
}

impl Default for BlinkSection {
    fn default() -> Self {
        Self {
            interval_seconds: 10.0,
            ear_threshold: 0.21,
            consecutive_frames: 2,
        }
    }
}

/// `frame` section as written in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSection {
    pub width: u32,
    pub height: u32,
}

impl Default for FrameSection {
    fn default() -> Self {
        let size = FrameSize::default();
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

/// Configuration before migration and validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub metrics: MetricsSection,
    pub blink: BlinkSection,
    pub state: StateThresholds,
    pub frame: FrameSection,
}

/// Canonical tracker configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerConfig {
    pub adapter: AdapterConfig,
    pub engine: EngineConfig,
    pub state: StateThresholds,
}

impl TrackerConfig {
    /// Load from the environment only (no files)
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load()
    }

    /// Migrate weight maps and validate ranges
    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let attention_weights = AttentionWeights::from_map(&raw.metrics.attention_weights)?;
        let fatigue_weights = FatigueWeights::from_map(&raw.metrics.fatigue_weights)?;

        let smoothing_window = at_least_one("metrics.smoothing_window", raw.metrics.smoothing_window)?;
        let consecutive_frames = at_least_one("blink.consecutive_frames", raw.blink.consecutive_frames)?;

        let interval = raw.blink.interval_seconds;
        if !interval.is_finite() || interval <= 0.0 {
            return Err(invalid("blink.interval_seconds", format!("must be > 0, got {interval}")));
        }
        let ear_threshold = raw.blink.ear_threshold;
        if !ear_threshold.is_finite() || ear_threshold <= 0.0 || ear_threshold >= 1.0 {
            return Err(invalid(
                "blink.ear_threshold",
                format!("must be in (0, 1), got {ear_threshold}"),
            ));
        }
        if raw.frame.width == 0 || raw.frame.height == 0 {
            return Err(invalid(
                "frame",
                format!("size must be non-zero, got {}x{}", raw.frame.width, raw.frame.height),
            ));
        }

        Ok(Self {
            adapter: AdapterConfig {
                ear_threshold,
                consecutive_frames: u32::try_from(consecutive_frames).unwrap_or(u32::MAX),
                frame_size: FrameSize {
                    width: raw.frame.width,
                    height: raw.frame.height,
                },
                ..Default::default()
            },
            engine: EngineConfig {
                attention_weights,
                fatigue_weights,
                smoothing_window,
                blink_interval_seconds: interval,
            },
            state: raw.state,
        })
    }
}

fn invalid(key: &str, reason: String) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        reason,
    }
}

fn at_least_one(key: &str, value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value)
        .ok()
        .filter(|&v| v >= 1)
        .ok_or_else(|| invalid(key, format!("must be >= 1, got {value}")))
}

/// Builder for the layered configuration sources
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    default_file: Option<PathBuf>,
    user_file: Option<PathBuf>,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            default_file: None,
            user_file: None,
            env_prefix: Some(DEFAULT_ENV_PREFIX.to_string()),
        }
    }

    /// Default config file; loading fails if it is missing
    pub fn with_default_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_file = Some(path.into());
        self
    }

    /// User override file; skipped if missing
    pub fn with_user_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.user_file = Some(path.into());
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn without_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    pub fn load(&self) -> Result<TrackerConfig, ConfigError> {
        let mut builder = Config::builder();
        let mut layers = Vec::new();

        if let Some(path) = &self.default_file {
            debug!(path = %path.display(), "Adding default config file");
            let file = || File::from(path.as_path()).required(true);
            builder = builder.add_source(file());
            layers.push(Config::builder().add_source(file()).build()?);
        }
        if let Some(path) = &self.user_file {
            debug!(path = %path.display(), "Adding user config file");
            let file = || File::from(path.as_path()).required(false);
            builder = builder.add_source(file());
            layers.push(Config::builder().add_source(file()).build()?);
        }
        if let Some(prefix) = &self.env_prefix {
            let env = || {
                Environment::with_prefix(prefix)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
            };
            builder = builder.add_source(env());
            layers.push(Config::builder().add_source(env()).build()?);
        }

        let mut raw: RawConfig = builder.build()?.try_deserialize()?;

        // Weight maps come whole from one layer so legacy shapes are not
        // mixed with canonical keys from a lower layer
        if let Some(map) = topmost_map(&layers, "metrics.attention_weights")? {
            raw.metrics.attention_weights = map;
        }
        if let Some(map) = topmost_map(&layers, "metrics.fatigue_weights")? {
            raw.metrics.fatigue_weights = map;
        }

        let config = TrackerConfig::from_raw(raw)?;
        info!(
            smoothing_window = config.engine.smoothing_window,
            blink_interval_seconds = config.engine.blink_interval_seconds,
            ear_threshold = config.adapter.ear_threshold,
            "Configuration loaded"
        );
        Ok(config)
    }
}

/// Map at `key` from the highest-precedence layer that defines it
fn topmost_map(layers: &[Config], key: &str) -> Result<Option<HashMap<String, f64>>, ConfigError> {
    for layer in layers.iter().rev() {
        match layer.get::<HashMap<String, f64>>(key) {
            Ok(map) if !map.is_empty() => return Ok(Some(map)),
            Ok(_) | Err(::config::ConfigError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(None)
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_defaults() {
        let config = TrackerConfig::from_raw(RawConfig::default()).unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.engine.smoothing_window, 3);
        assert_eq!(config.adapter.consecutive_frames, 2);
    }

    #[test]
    fn test_rejects_zero_window() {
        let mut raw = RawConfig::default();
        raw.metrics.smoothing_window = 0;
        let err = TrackerConfig::from_raw(raw).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "metrics.smoothing_window"));
    }

    #[test]
    fn test_rejects_bad_blink_settings() {
        let mut raw = RawConfig::default();
        raw.blink.interval_seconds = 0.0;
        assert!(TrackerConfig::from_raw(raw).is_err());

        let mut raw = RawConfig::default();
        raw.blink.consecutive_frames = -1;
        assert!(TrackerConfig::from_raw(raw).is_err());

        let mut raw = RawConfig::default();
        raw.blink.ear_threshold = f64::NAN;
        assert!(TrackerConfig::from_raw(raw).is_err());
    }

    #[test]
    fn test_rejects_negative_weight() {
        let mut raw = RawConfig::default();
        raw.metrics.fatigue_weights.insert("yawn".into(), -1.0);
        let err = TrackerConfig::from_raw(raw).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "yawn"));
    }

    #[test]
    fn test_migrates_legacy_attention() {
        let mut raw = RawConfig::default();
        raw.metrics.attention_weights = [("gaze".to_string(), 0.5), ("engagement".to_string(), 0.1)]
            .into_iter()
            .collect();
        let config = TrackerConfig::from_raw(raw).unwrap();
        // 0.5 + 0.3 + 0.1
        assert!((config.engine.attention_weights.gaze_focus - 0.9).abs() < 1e-9);
        assert!((config.engine.attention_weights.facial_expression - 0.1).abs() < 1e-9);
    }
}
