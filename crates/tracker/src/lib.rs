//! Wellbeing Tracker
//!
//! Session driver tying the pipeline together:
//! - Layered configuration with legacy weight migration
//! - Injected clock for deterministic replay
//! - Per-frame processing: geometry → metrics → state
//! - State transition tracking and runtime counters

pub mod clock;
pub mod config;
pub mod logging;
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigLoader, TrackerConfig};
pub use logging::{init_json_logging, init_logging};
pub use session::{EmotionSource, FrameReport, TrackingSession};

use metric_engine::WeightError;
use thiserror::Error;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl From<WeightError> for ConfigError {
    fn from(e: WeightError) -> Self {
        match e {
            WeightError::Invalid { key, value } => ConfigError::Invalid {
                key,
                reason: format!("weight must be finite and non-negative, got {value}"),
            },
        }
    }
}

/// Tracker error types
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging initialization failed: {0}")]
    Logging(String),
}
