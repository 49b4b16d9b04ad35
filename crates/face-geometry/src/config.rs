//! Geometry adapter configuration

use serde::{Deserialize, Serialize};

use crate::FrameSize;

/// Geometry adapter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Average EAR below which the eyes count as closed
    pub ear_threshold: f64,

    /// Consecutive closed frames needed for a blink
    pub consecutive_frames: u32,

    /// Frame size assumed when the extractor does not report one
    pub frame_size: FrameSize,

    /// Iteration cap for the head pose solver
    pub pose_max_iterations: usize,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.21,
            consecutive_frames: 2,
            frame_size: FrameSize::default(),
            pose_max_iterations: 100,
        }
    }
}
