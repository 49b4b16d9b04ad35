//! Per-frame geometry types

use serde::{Deserialize, Deserializer, Serialize};

use crate::BlendShapes;

/// 2D landmark in pixel space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`
    pub fn distance(&self, other: &Point2) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Frame dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl Default for FrameSize {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// Head pose (Euler angles)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadPose {
    /// Pitch (up-down tilt) in degrees, negative is head down
    pub pitch: f64,
    /// Yaw (left-right rotation) in degrees
    pub yaw: f64,
    /// Roll (side tilt) in degrees
    pub roll: f64,
}

/// Eye state derived for one frame
///
/// EARs stay optional so each metric can substitute its own documented
/// default when the extractor supplied a partial eye state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EyeState {
    pub left_ear: Option<f64>,
    pub right_ear: Option<f64>,
    /// True on the frame a completed blink is detected
    pub blinking: bool,
}

impl EyeState {
    /// Eye state used when no geometry is available ("assume open")
    pub fn open() -> Self {
        Self {
            left_ear: Some(crate::ear::NEUTRAL_EAR),
            right_ear: Some(crate::ear::NEUTRAL_EAR),
            blinking: false,
        }
    }

    /// Average EAR, substituting `default` for each missing eye
    pub fn average_ear_or(&self, default: f64) -> f64 {
        (self.left_ear.unwrap_or(default) + self.right_ear.unwrap_or(default)) / 2.0
    }
}

/// Head pose as reported by an extractor, any angle may be missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialHeadPose {
    pub pitch: Option<f64>,
    pub yaw: Option<f64>,
    pub roll: Option<f64>,
}

impl PartialHeadPose {
    /// Resolve missing or non-finite angles to 0
    pub fn resolve(&self) -> HeadPose {
        let angle = |v: Option<f64>| v.filter(|a| a.is_finite()).unwrap_or(0.0);
        HeadPose {
            pitch: angle(self.pitch),
            yaw: angle(self.yaw),
            roll: angle(self.roll),
        }
    }
}

/// Eye state as reported by an extractor, any field may be missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialEyeState {
    pub left_ear: Option<f64>,
    pub right_ear: Option<f64>,
    pub blinking: Option<bool>,
}

/// Raw output of the external geometry extractor for one frame
///
/// Every sub-structure is optional. A sub-structure of the wrong shape is
/// read as absent rather than failing the whole frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFrame {
    pub face_detected: bool,
    #[serde(deserialize_with = "lenient")]
    pub landmarks_2d: Option<Vec<Point2>>,
    #[serde(deserialize_with = "lenient")]
    pub blend_shapes: Option<BlendShapes>,
    #[serde(deserialize_with = "lenient")]
    pub head_pose: Option<PartialHeadPose>,
    #[serde(deserialize_with = "lenient")]
    pub eye_state: Option<PartialEyeState>,
    #[serde(deserialize_with = "lenient")]
    pub frame_size: Option<FrameSize>,
}

impl RawFrame {
    /// Frame with no detected face
    pub fn no_face() -> Self {
        Self::default()
    }

    /// Frame with a detected face and the given landmarks
    pub fn with_landmarks(landmarks: Vec<Point2>, frame_size: FrameSize) -> Self {
        Self {
            face_detected: true,
            landmarks_2d: Some(landmarks),
            frame_size: Some(frame_size),
            ..Default::default()
        }
    }
}

/// Coerce a sub-structure of the wrong shape to `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Geometry signals for one processed frame
///
/// Produced by [`crate::GeometryAdapter`], consumed read-only by the metric engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub face_detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmarks_2d: Option<Vec<Point2>>,
    pub blend_shapes: BlendShapes,
    pub head_pose: HeadPose,
    pub eye_state: EyeState,
}

impl FrameGeometry {
    /// Geometry of a frame without a usable face
    pub fn empty() -> Self {
        Self {
            face_detected: false,
            landmarks_2d: None,
            blend_shapes: BlendShapes::new(),
            head_pose: HeadPose::default(),
            eye_state: EyeState::open(),
        }
    }
}

/// External landmark/blend-shape extractor
///
/// Implementations wrap a face landmarker and report [`RawFrame::no_face`]
/// when nothing was found.
pub trait GeometryExtractor {
    type Frame;

    fn extract(&mut self, frame: &Self::Frame) -> RawFrame;
}
