//! Geometry adapter
//!
//! Converts one [`RawFrame`] into [`FrameGeometry`]. With landmarks, EAR is
//! measured from the mesh and a precomputed pose still wins over the PnP
//! solve. Without landmarks the precomputed pose and eye state are used.

use tracing::{debug, info};

use crate::ear::{self, NEUTRAL_EAR};
use crate::{
    AdapterConfig, BlendShapes, BlinkEdgeDetector, EyeState, FrameGeometry, HeadPose,
    PartialEyeState, Point2, PoseEstimator, RawFrame,
};

/// Per-session geometry adapter
///
/// Holds the blink edge state across frames; everything else is per frame.
pub struct GeometryAdapter {
    config: AdapterConfig,
    blink: BlinkEdgeDetector,
    pose: PoseEstimator,
}

impl GeometryAdapter {
    pub fn new(config: AdapterConfig) -> Self {
        info!(
            ear_threshold = config.ear_threshold,
            consecutive_frames = config.consecutive_frames,
            width = config.frame_size.width,
            height = config.frame_size.height,
            "Geometry adapter initialized"
        );
        Self {
            blink: BlinkEdgeDetector::new(config.ear_threshold, config.consecutive_frames),
            pose: PoseEstimator::new(config.pose_max_iterations),
            config,
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Adapt one extractor frame
    ///
    /// Never fails: missing or malformed pieces resolve to their neutral
    /// defaults (zero pose, 0.3 EAR, empty blend-shapes).
    pub fn adapt(&mut self, raw: &RawFrame) -> FrameGeometry {
        if !raw.face_detected {
            self.blink.reset();
            return FrameGeometry::empty();
        }

        let blend_shapes = raw
            .blend_shapes
            .clone()
            .map(BlendShapes::sanitized)
            .unwrap_or_default();

        let (head_pose, eye_state) = match raw.landmarks_2d.as_deref() {
            Some(landmarks) if !landmarks.is_empty() => (
                self.pose_from(landmarks, raw),
                self.eyes_from_landmarks(landmarks),
            ),
            _ => (
                raw.head_pose.map(|p| p.resolve()).unwrap_or_default(),
                self.eyes_from_partial(raw.eye_state),
            ),
        };

        FrameGeometry {
            face_detected: true,
            landmarks_2d: raw.landmarks_2d.clone(),
            blend_shapes,
            head_pose,
            eye_state,
        }
    }

    /// Forget blink edge state
    pub fn reset(&mut self) {
        self.blink.reset();
    }

    fn pose_from(&self, landmarks: &[Point2], raw: &RawFrame) -> HeadPose {
        if let Some(pose) = raw.head_pose {
            return pose.resolve();
        }
        let frame = raw.frame_size.unwrap_or(self.config.frame_size);
        self.pose.estimate(landmarks, frame)
    }

    fn eyes_from_landmarks(&mut self, landmarks: &[Point2]) -> EyeState {
        if landmarks.len() <= ear::max_eye_index() {
            debug!(count = landmarks.len(), "too few landmarks for EAR");
            self.blink.reset();
            return EyeState::open();
        }
        let left = ear::eye_aspect_ratio(landmarks, &ear::LEFT_EYE);
        let right = ear::eye_aspect_ratio(landmarks, &ear::RIGHT_EYE);
        let blinking = self.blink.update((left + right) / 2.0);

        EyeState {
            left_ear: Some(left),
            right_ear: Some(right),
            blinking,
        }
    }

    fn eyes_from_partial(&mut self, partial: Option<PartialEyeState>) -> EyeState {
        let Some(partial) = partial else {
            self.blink.reset();
            return EyeState::open();
        };

        let finite = |v: Option<f64>| v.filter(|e| e.is_finite());
        let left_ear = finite(partial.left_ear);
        let right_ear = finite(partial.right_ear);

        let detected = self.blink.update(
            (left_ear.unwrap_or(NEUTRAL_EAR) + right_ear.unwrap_or(NEUTRAL_EAR)) / 2.0,
        );

        EyeState {
            left_ear,
            right_ear,
            blinking: partial.blinking.unwrap_or(detected),
        }
    }
}

impl Default for GeometryAdapter {
    fn default() -> Self {
        Self::new(AdapterConfig::default())
    }
}
