//! Blink-rate fatigue sub-score over fixed windows

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default blink-rate window (seconds)
pub const DEFAULT_INTERVAL_SECONDS: f64 = 10.0;

/// Window bookkeeping owned by [`BlinkRateTracker`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BlinkWindowState {
    /// Start of the current window, unset until the first update
    pub window_start_time: Option<f64>,
    pub blink_count_in_window: u32,
    pub was_blinking_previous_frame: bool,
    pub last_score: f64,
}

/// Converts blink edges into a fatigue sub-score in [0, 1]
///
/// The score is recomputed only when a window closes and is held between
/// window boundaries.
#[derive(Debug, Clone)]
pub struct BlinkRateTracker {
    interval_seconds: f64,
    state: BlinkWindowState,
}

impl BlinkRateTracker {
    pub fn new(interval_seconds: f64) -> Self {
        let interval_seconds = if interval_seconds.is_finite() && interval_seconds > 0.0 {
            interval_seconds
        } else {
            DEFAULT_INTERVAL_SECONDS
        };
        Self {
            interval_seconds,
            state: BlinkWindowState::default(),
        }
    }

    /// Feed one frame's blink flag at `now` (seconds), returns the current sub-score
    pub fn update(&mut self, is_blinking: bool, now: f64) -> f64 {
        let window_start = *self.state.window_start_time.get_or_insert(now);

        if is_blinking && !self.state.was_blinking_previous_frame {
            self.state.blink_count_in_window += 1;
        }
        self.state.was_blinking_previous_frame = is_blinking;

        if now - window_start >= self.interval_seconds {
            let bpm = self.state.blink_count_in_window as f64 / self.interval_seconds * 60.0;
            self.state.last_score = blink_rate_score(bpm);
            debug!(
                blinks = self.state.blink_count_in_window,
                bpm,
                score = self.state.last_score,
                "blink window closed"
            );
            self.state.blink_count_in_window = 0;
            self.state.window_start_time = Some(now);
        }

        self.state.last_score
    }

    /// Face lost: zero the score and restart the window at `now`
    pub fn reset(&mut self, now: f64) {
        self.state = BlinkWindowState {
            window_start_time: Some(now),
            ..Default::default()
        };
    }

    pub fn score(&self) -> f64 {
        self.state.last_score
    }

    pub fn state(&self) -> &BlinkWindowState {
        &self.state
    }

    pub fn interval_seconds(&self) -> f64 {
        self.interval_seconds
    }
}

impl Default for BlinkRateTracker {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL_SECONDS)
    }
}

/// Map blinks per minute to a fatigue sub-score
///
/// | BPM     | score                 |
/// |---------|-----------------------|
/// | <= 18   | 0                     |
/// | 18-25   | 0.1 + (b-18) * 0.05   |
/// | 25-35   | 0.45 + (b-25) * 0.035 |
/// | > 35    | 0.8 + (b-35) * 0.04   |
pub fn blink_rate_score(bpm: f64) -> f64 {
    let score = if bpm <= 18.0 {
        0.0
    } else if bpm <= 25.0 {
        0.1 + (bpm - 18.0) * 0.05
    } else if bpm <= 35.0 {
        0.45 + (bpm - 25.0) * 0.035
    } else {
        0.8 + (bpm - 35.0) * 0.04
    };
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive 30 fps frames for `seconds`, blinking for 3 frames at each start offset
    fn simulate(tracker: &mut BlinkRateTracker, seconds: f64, blink_starts: &[usize]) -> f64 {
        let frames = (seconds * 30.0) as usize;
        let mut score = 0.0;
        for i in 0..=frames {
            let blinking = blink_starts.iter().any(|&s| i >= s && i < s + 3);
            score = tracker.update(blinking, i as f64 / 30.0);
        }
        score
    }

    #[test]
    fn test_six_blinks_in_window() {
        let mut tracker = BlinkRateTracker::default();
        let starts: Vec<usize> = (0..6).map(|k| k * 50).collect();
        let score = simulate(&mut tracker, 10.0, &starts);
        // 36 BPM
        assert!((score - 0.84).abs() < 1e-9);
    }

    #[test]
    fn test_score_held_between_windows() {
        let mut tracker = BlinkRateTracker::default();
        let starts: Vec<usize> = (0..6).map(|k| k * 50).collect();
        simulate(&mut tracker, 10.0, &starts);

        // No blinks, but the next window has not closed yet
        assert!((tracker.update(false, 12.0) - 0.84).abs() < 1e-9);
        // Window closes with zero blinks
        assert_eq!(tracker.update(false, 20.0), 0.0);
    }

    #[test]
    fn test_held_blink_counts_once() {
        let mut tracker = BlinkRateTracker::default();
        for i in 0..10 {
            tracker.update(true, i as f64 * 0.1);
        }
        assert_eq!(tracker.state().blink_count_in_window, 1);
    }

    #[test]
    fn test_reset_zeroes_state() {
        let mut tracker = BlinkRateTracker::default();
        let starts: Vec<usize> = (0..6).map(|k| k * 50).collect();
        simulate(&mut tracker, 10.0, &starts);
        tracker.update(true, 10.5);

        tracker.reset(11.0);
        assert_eq!(tracker.score(), 0.0);
        assert_eq!(tracker.state().blink_count_in_window, 0);
        assert!(!tracker.state().was_blinking_previous_frame);
        assert_eq!(tracker.state().window_start_time, Some(11.0));
    }

    #[test]
    fn test_blink_rate_tiers() {
        assert_eq!(blink_rate_score(0.0), 0.0);
        assert_eq!(blink_rate_score(18.0), 0.0);
        assert!((blink_rate_score(24.0) - 0.4).abs() < 1e-9);
        assert!((blink_rate_score(25.0) - 0.45).abs() < 1e-9);
        assert!((blink_rate_score(30.0) - 0.625).abs() < 1e-9);
        assert!((blink_rate_score(35.0) - 0.8).abs() < 1e-9);
        assert_eq!(blink_rate_score(60.0), 1.0);
    }

    #[test]
    fn test_invalid_interval_uses_default() {
        assert_eq!(BlinkRateTracker::new(0.0).interval_seconds(), 10.0);
        assert_eq!(BlinkRateTracker::new(f64::NAN).interval_seconds(), 10.0);
        assert_eq!(BlinkRateTracker::new(5.0).interval_seconds(), 5.0);
    }
}
