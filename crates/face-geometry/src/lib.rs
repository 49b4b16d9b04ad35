//! Facial Geometry Adapter
//!
//! Turns per-frame output of an external landmark/blend-shape extractor into
//! the geometry signals the metric engine consumes:
//! - Eye aspect ratio (EAR) per eye
//! - Head pose (pitch, yaw, roll) via a perspective-n-point solve
//! - Blink edge events
//! - Emotion scores, with a deterministic blend-shape fallback

pub mod adapter;
pub mod blend_shapes;
pub mod blink;
pub mod config;
pub mod ear;
pub mod emotion;
pub mod frame;
pub mod pose;

pub use adapter::GeometryAdapter;
pub use blend_shapes::BlendShapes;
pub use blink::BlinkEdgeDetector;
pub use config::AdapterConfig;
pub use emotion::{EmotionClassifier, EmotionScores};
pub use frame::{
    EyeState, FrameGeometry, FrameSize, GeometryExtractor, HeadPose, PartialEyeState,
    PartialHeadPose, Point2, RawFrame,
};
pub use pose::{PoseEstimator, PoseSolution};

use thiserror::Error;

/// Geometry error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Head pose solve failed: {0}")]
    PoseSolve(String),

    #[error("Landmarks are degenerate for {0}")]
    DegenerateLandmarks(&'static str),

    #[error("Emotion classifier failed: {0}")]
    Classifier(String),
}
