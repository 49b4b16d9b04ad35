//! Logging initialisation

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::TrackerError;

/// Install a human-readable global subscriber
pub fn init_logging(level: Level) -> Result<(), TrackerError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| TrackerError::Logging(e.to_string()))
}

/// Install a JSON-lines global subscriber
pub fn init_json_logging(level: Level) -> Result<(), TrackerError> {
    let subscriber = FmtSubscriber::builder()
        .json()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| TrackerError::Logging(e.to_string()))
}
