//! Blink edge detection from consecutive low-EAR frames

use tracing::trace;

/// Detects completed blinks from the per-frame average EAR
///
/// A blink completes on the first open frame after at least
/// `min_consecutive_frames` frames below `ear_threshold`.
#[derive(Debug, Clone)]
pub struct BlinkEdgeDetector {
    ear_threshold: f64,
    min_consecutive_frames: u32,
    frames_below_threshold: u32,
}

impl BlinkEdgeDetector {
    pub fn new(ear_threshold: f64, min_consecutive_frames: u32) -> Self {
        Self {
            ear_threshold,
            min_consecutive_frames: min_consecutive_frames.max(1),
            frames_below_threshold: 0,
        }
    }

    /// Feed one frame's average EAR, returns true when a blink just completed
    pub fn update(&mut self, average_ear: f64) -> bool {
        if average_ear < self.ear_threshold {
            self.frames_below_threshold = self.frames_below_threshold.saturating_add(1);
            return false;
        }

        let completed = self.frames_below_threshold >= self.min_consecutive_frames;
        if completed {
            trace!(frames = self.frames_below_threshold, "blink completed");
        }
        self.frames_below_threshold = 0;
        completed
    }

    /// Frames the eyes have currently been below threshold
    pub fn frames_below_threshold(&self) -> u32 {
        self.frames_below_threshold
    }

    pub fn reset(&mut self) {
        self.frames_below_threshold = 0;
    }
}

impl Default for BlinkEdgeDetector {
    fn default() -> Self {
        Self::new(0.21, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blink_fires_on_reopen() {
        let mut detector = BlinkEdgeDetector::default();

        assert!(!detector.update(0.30));
        assert!(!detector.update(0.10));
        assert!(!detector.update(0.10));
        assert_eq!(detector.frames_below_threshold(), 2);
        assert!(detector.update(0.30));
        // Fires once per blink
        assert!(!detector.update(0.30));
    }

    #[test]
    fn test_single_frame_dip_is_not_a_blink() {
        let mut detector = BlinkEdgeDetector::default();
        assert!(!detector.update(0.10));
        assert!(!detector.update(0.30));
        assert_eq!(detector.frames_below_threshold(), 0);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut detector = BlinkEdgeDetector::new(0.21, 1);
        assert!(!detector.update(0.21));
        assert!(!detector.update(0.30));
    }

    #[test]
    fn test_reset_clears_counter() {
        let mut detector = BlinkEdgeDetector::default();
        detector.update(0.05);
        detector.update(0.05);
        detector.reset();
        assert!(!detector.update(0.30));
    }
}
