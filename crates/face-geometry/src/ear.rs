//! Eye aspect ratio (EAR)

use crate::Point2;

/// EAR used when it cannot be measured; above the closed-eye threshold
pub const NEUTRAL_EAR: f64 = 0.3;

/// Horizontal eye width below which the ratio is not computed
const MIN_HORIZONTAL_DISTANCE: f64 = 1e-6;

/// MediaPipe face mesh indices p1..p6 for the left eye
pub const LEFT_EYE: [usize; 6] = [33, 160, 158, 133, 153, 144];

/// MediaPipe face mesh indices p1..p6 for the right eye
pub const RIGHT_EYE: [usize; 6] = [263, 387, 385, 362, 380, 373];

/// EAR = (|p2 - p6| + |p3 - p5|) / (2 |p1 - p4|)
///
/// Returns [`NEUTRAL_EAR`] when an index is out of range, a point is not
/// finite, or the eye corners coincide.
pub fn eye_aspect_ratio(landmarks: &[Point2], indices: &[usize; 6]) -> f64 {
    let mut points = [Point2::default(); 6];
    for (slot, &idx) in points.iter_mut().zip(indices) {
        match landmarks.get(idx) {
            Some(p) if p.x.is_finite() && p.y.is_finite() => *slot = *p,
            _ => return NEUTRAL_EAR,
        }
    }
    let [p1, p2, p3, p4, p5, p6] = points;

    let vertical1 = p2.distance(&p6);
    let vertical2 = p3.distance(&p5);
    let horizontal = p1.distance(&p4);

    if horizontal < MIN_HORIZONTAL_DISTANCE {
        return NEUTRAL_EAR;
    }

    let ear = (vertical1 + vertical2) / (2.0 * horizontal);
    if ear.is_finite() {
        ear
    } else {
        NEUTRAL_EAR
    }
}

/// Highest landmark index either eye needs
pub fn max_eye_index() -> usize {
    LEFT_EYE.iter().chain(RIGHT_EYE.iter()).copied().max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eye(landmarks: &mut [Point2], indices: &[usize; 6], width: f64, height: f64) {
        let [p1, p2, p3, p4, p5, p6] = *indices;
        landmarks[p1] = Point2::new(0.0, 0.0);
        landmarks[p4] = Point2::new(width, 0.0);
        landmarks[p2] = Point2::new(width / 3.0, -height / 2.0);
        landmarks[p3] = Point2::new(2.0 * width / 3.0, -height / 2.0);
        landmarks[p6] = Point2::new(width / 3.0, height / 2.0);
        landmarks[p5] = Point2::new(2.0 * width / 3.0, height / 2.0);
    }

    #[test]
    fn test_open_eye_ratio() {
        let mut landmarks = vec![Point2::default(); 478];
        eye(&mut landmarks, &LEFT_EYE, 30.0, 9.0);
        let ear = eye_aspect_ratio(&landmarks, &LEFT_EYE);
        // (9 + 9) / (2 * 30)
        assert!((ear - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_closed_eye_ratio() {
        let mut landmarks = vec![Point2::default(); 478];
        eye(&mut landmarks, &RIGHT_EYE, 30.0, 1.5);
        let ear = eye_aspect_ratio(&landmarks, &RIGHT_EYE);
        assert!((ear - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_corners_fall_back() {
        // All points coincide: horizontal distance is zero
        let landmarks = vec![Point2::new(5.0, 5.0); 478];
        assert_eq!(eye_aspect_ratio(&landmarks, &LEFT_EYE), NEUTRAL_EAR);
    }

    #[test]
    fn test_missing_index_falls_back() {
        let landmarks = vec![Point2::new(1.0, 1.0); 100];
        assert_eq!(eye_aspect_ratio(&landmarks, &RIGHT_EYE), NEUTRAL_EAR);
    }

    #[test]
    fn test_non_finite_point_falls_back() {
        let mut landmarks = vec![Point2::default(); 478];
        eye(&mut landmarks, &LEFT_EYE, 30.0, 9.0);
        landmarks[LEFT_EYE[1]] = Point2::new(f64::NAN, 0.0);
        assert_eq!(eye_aspect_ratio(&landmarks, &LEFT_EYE), NEUTRAL_EAR);
    }

    #[test]
    fn test_max_eye_index() {
        assert_eq!(max_eye_index(), 387);
    }
}
