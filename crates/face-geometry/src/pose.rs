//! Head pose estimation by perspective-n-point
//!
//! Six detected landmarks are matched against a canonical 3D face model and
//! the rotation/translation minimising reprojection error is found with a
//! Levenberg-Marquardt solve over a Rodrigues rotation vector. The camera is
//! a pinhole with focal length equal to the frame width, principal point at
//! the frame centre and no lens distortion.

use ndarray::{arr2, Array1, Array2};
use tracing::{debug, warn};

use crate::{FrameSize, GeometryError, HeadPose, Point2};

/// Face mesh indices matching [`MODEL_POINTS`] row by row:
/// nose tip, chin, right eye outer corner, left eye outer corner,
/// right mouth corner, left mouth corner
pub const POSE_LANDMARKS: [usize; 6] = [1, 152, 226, 446, 57, 287];

/// Canonical face model in camera convention (x right, y down, z away from camera)
pub const MODEL_POINTS: [[f64; 3]; 6] = [
    [0.0, 0.0, 0.0],
    [0.0, 330.0, 65.0],
    [-225.0, -170.0, 135.0],
    [225.0, -170.0, 135.0],
    [-150.0, 150.0, 125.0],
    [150.0, 150.0, 125.0],
];

/// Model distance between the two outer eye corners
const MODEL_EYE_SPAN: f64 = 450.0;

pub const PITCH_LIMIT_DEG: f64 = 60.0;
pub const YAW_LIMIT_DEG: f64 = 75.0;
pub const ROLL_LIMIT_DEG: f64 = 45.0;

/// Below this `sy` the Euler decomposition is in gimbal lock
const SINGULAR_EPS: f64 = 1e-6;
const MIN_DEPTH: f64 = 1e-9;
const MAX_DAMPING: f64 = 1e10;

/// Pinhole camera intrinsics
#[derive(Debug, Clone, Copy)]
struct Camera {
    focal: f64,
    cx: f64,
    cy: f64,
}

impl Camera {
    fn for_frame(frame: FrameSize) -> Result<Self, GeometryError> {
        if frame.width == 0 || frame.height == 0 {
            return Err(GeometryError::PoseSolve(format!(
                "invalid frame size {}x{}",
                frame.width, frame.height
            )));
        }
        Ok(Self {
            focal: frame.width as f64,
            cx: frame.width as f64 / 2.0,
            cy: frame.height as f64 / 2.0,
        })
    }
}

/// Result of a successful pose solve
#[derive(Debug, Clone)]
pub struct PoseSolution {
    /// 3x3 rotation, model to camera
    pub rotation: Array2<f64>,
    /// Translation in model units
    pub translation: Array1<f64>,
    /// RMS reprojection error in pixels
    pub rms_error: f64,
    pub iterations: usize,
}

impl PoseSolution {
    /// Clamped pitch/yaw/roll in degrees
    pub fn euler_angles(&self) -> HeadPose {
        rotation_to_euler(&self.rotation)
    }
}

/// Head pose estimator using the canonical six-point face model
#[derive(Debug, Clone)]
pub struct PoseEstimator {
    model: Array2<f64>,
    max_iterations: usize,
}

impl PoseEstimator {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            model: arr2(&MODEL_POINTS),
            max_iterations: max_iterations.max(1),
        }
    }

    /// Estimate head pose from the full landmark set
    ///
    /// Any failure yields the zero pose.
    pub fn estimate(&self, landmarks: &[Point2], frame: FrameSize) -> HeadPose {
        match pose_points(landmarks).and_then(|points| self.solve(&points, frame)) {
            Ok(solution) => {
                debug!(
                    rms_error = solution.rms_error,
                    iterations = solution.iterations,
                    "head pose solved"
                );
                solution.euler_angles()
            }
            Err(e) => {
                warn!("Head pose unavailable, using zero pose: {}", e);
                HeadPose::default()
            }
        }
    }

    /// Solve for the pose that projects the model onto `image_points`
    pub fn solve(
        &self,
        image_points: &[Point2; 6],
        frame: FrameSize,
    ) -> Result<PoseSolution, GeometryError> {
        let camera = Camera::for_frame(frame)?;
        let mut params = self.initial_guess(image_points, &camera)?;

        let mut residuals = self
            .residuals(&params, image_points, &camera)
            .ok_or_else(|| GeometryError::PoseSolve("initial guess behind camera".into()))?;
        let mut cost = residuals.dot(&residuals);
        let mut damping = 1e-3;
        let mut iterations = 0;

        while iterations < self.max_iterations && damping < MAX_DAMPING {
            iterations += 1;

            let jacobian = self.jacobian(&params, &residuals, image_points, &camera)?;
            let mut normal = jacobian.t().dot(&jacobian);
            let gradient = jacobian.t().dot(&residuals);
            for i in 0..6 {
                let diagonal = normal[[i, i]].max(1e-9);
                normal[[i, i]] += damping * diagonal;
            }

            let Some(step) = solve_linear(normal, -gradient) else {
                damping *= 10.0;
                continue;
            };

            let candidate = &params + &step;
            match self.residuals(&candidate, image_points, &camera) {
                Some(next) if next.dot(&next) < cost => {
                    let step_norm = step.dot(&step).sqrt();
                    let param_norm = candidate.dot(&candidate).sqrt();
                    params = candidate;
                    cost = next.dot(&next);
                    residuals = next;
                    damping = (damping / 10.0).max(1e-12);
                    if step_norm <= 1e-10 * (param_norm + 1e-10) {
                        break;
                    }
                }
                _ => damping *= 10.0,
            }
        }

        if !params.iter().all(|v| v.is_finite()) || !cost.is_finite() {
            return Err(GeometryError::PoseSolve("solver diverged".into()));
        }

        Ok(PoseSolution {
            rotation: rodrigues(params[0], params[1], params[2]),
            translation: params.slice(ndarray::s![3..]).to_owned(),
            rms_error: (cost / 6.0).sqrt(),
            iterations,
        })
    }

    /// Zero rotation, depth from eye span, nose tip placed on its landmark
    fn initial_guess(
        &self,
        image_points: &[Point2; 6],
        camera: &Camera,
    ) -> Result<Array1<f64>, GeometryError> {
        let eye_span = image_points[2].distance(&image_points[3]);
        if !eye_span.is_finite() || eye_span < 1e-6 {
            return Err(GeometryError::DegenerateLandmarks("pose landmarks"));
        }

        let tz = camera.focal * MODEL_EYE_SPAN / eye_span;
        let tx = (image_points[0].x - camera.cx) * tz / camera.focal;
        let ty = (image_points[0].y - camera.cy) * tz / camera.focal;
        Ok(Array1::from(vec![0.0, 0.0, 0.0, tx, ty, tz]))
    }

    /// Reprojection residuals, `None` when a point falls behind the camera
    fn residuals(
        &self,
        params: &Array1<f64>,
        image_points: &[Point2; 6],
        camera: &Camera,
    ) -> Option<Array1<f64>> {
        let rotation = rodrigues(params[0], params[1], params[2]);
        let mut residuals = Array1::zeros(12);

        for (i, (model_point, observed)) in
            self.model.rows().into_iter().zip(image_points).enumerate()
        {
            let rotated = rotation.dot(&model_point);
            let x = rotated[0] + params[3];
            let y = rotated[1] + params[4];
            let z = rotated[2] + params[5];
            if z <= MIN_DEPTH {
                return None;
            }
            residuals[2 * i] = camera.focal * x / z + camera.cx - observed.x;
            residuals[2 * i + 1] = camera.focal * y / z + camera.cy - observed.y;
        }

        Some(residuals)
    }

    /// Forward-difference Jacobian of the residuals (12x6)
    fn jacobian(
        &self,
        params: &Array1<f64>,
        residuals: &Array1<f64>,
        image_points: &[Point2; 6],
        camera: &Camera,
    ) -> Result<Array2<f64>, GeometryError> {
        let mut jacobian = Array2::zeros((12, 6));
        for j in 0..6 {
            let h = 1e-6 * params[j].abs().max(1.0);
            let mut shifted = params.clone();
            shifted[j] += h;
            let moved = self
                .residuals(&shifted, image_points, camera)
                .ok_or_else(|| GeometryError::PoseSolve("jacobian probe behind camera".into()))?;
            let column = (&moved - residuals) / h;
            jacobian.column_mut(j).assign(&column);
        }
        Ok(jacobian)
    }
}

impl Default for PoseEstimator {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Select the six pose landmarks from the full mesh
fn pose_points(landmarks: &[Point2]) -> Result<[Point2; 6], GeometryError> {
    let mut points = [Point2::default(); 6];
    for (slot, &idx) in points.iter_mut().zip(POSE_LANDMARKS.iter()) {
        match landmarks.get(idx) {
            Some(p) if p.x.is_finite() && p.y.is_finite() => *slot = *p,
            _ => return Err(GeometryError::DegenerateLandmarks("pose landmarks")),
        }
    }
    Ok(points)
}

/// Rotation matrix from a Rodrigues rotation vector
pub fn rodrigues(rx: f64, ry: f64, rz: f64) -> Array2<f64> {
    let theta = (rx * rx + ry * ry + rz * rz).sqrt();
    if theta < 1e-12 {
        return arr2(&[[1.0, -rz, ry], [rz, 1.0, -rx], [-ry, rx, 1.0]]);
    }

    let (kx, ky, kz) = (rx / theta, ry / theta, rz / theta);
    let (s, c) = theta.sin_cos();
    let v = 1.0 - c;

    arr2(&[
        [c + kx * kx * v, kx * ky * v - kz * s, kx * kz * v + ky * s],
        [ky * kx * v + kz * s, c + ky * ky * v, ky * kz * v - kx * s],
        [kz * kx * v - ky * s, kz * ky * v + kx * s, c + kz * kz * v],
    ])
}

/// Extrinsic XYZ Euler decomposition in degrees, clamped to the pose limits
///
/// Pitch is negative when the head nods down. With y pointing down, a
/// positive rotation about x moves the chin away from the camera, so the
/// x angle is negated.
pub fn rotation_to_euler(rotation: &Array2<f64>) -> HeadPose {
    let r = rotation;
    let sy = (r[[0, 0]] * r[[0, 0]] + r[[1, 0]] * r[[1, 0]]).sqrt();

    let (x_angle, yaw, roll) = if sy >= SINGULAR_EPS {
        (
            r[[2, 1]].atan2(r[[2, 2]]),
            (-r[[2, 0]]).atan2(sy),
            r[[1, 0]].atan2(r[[0, 0]]),
        )
    } else {
        (
            (-r[[1, 2]]).atan2(r[[1, 1]]),
            (-r[[2, 0]]).atan2(sy),
            0.0,
        )
    };
    let pitch = -x_angle;

    HeadPose {
        pitch: pitch.to_degrees().clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG),
        yaw: yaw.to_degrees().clamp(-YAW_LIMIT_DEG, YAW_LIMIT_DEG),
        roll: roll.to_degrees().clamp(-ROLL_LIMIT_DEG, ROLL_LIMIT_DEG),
    }
}

/// Gaussian elimination with partial pivoting
fn solve_linear(mut a: Array2<f64>, mut b: Array1<f64>) -> Option<Array1<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))?;
        if a[[pivot, col]].abs() < 1e-14 {
            return None;
        }
        if pivot != col {
            for k in 0..n {
                a.swap([col, k], [pivot, k]);
            }
            b.swap(col, pivot);
        }

        for row in (col + 1)..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                let delta = factor * a[[col, k]];
                a[[row, k]] -= delta;
            }
            let delta = factor * b[col];
            b[row] -= delta;
        }
    }

    let mut x = Array1::zeros(n);
    for row in (0..n).rev() {
        let mut sum = b[row];
        for k in (row + 1)..n {
            sum -= a[[row, k]] * x[k];
        }
        x[row] = sum / a[[row, row]];
    }

    x.iter().all(|v| v.is_finite()).then_some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: FrameSize = FrameSize {
        width: 640,
        height: 480,
    };

    /// Project the model with a known pose
    fn project(rvec: [f64; 3], t: [f64; 3]) -> [Point2; 6] {
        let rotation = rodrigues(rvec[0], rvec[1], rvec[2]);
        let f = FRAME.width as f64;
        let (cx, cy) = (FRAME.width as f64 / 2.0, FRAME.height as f64 / 2.0);
        let mut points = [Point2::default(); 6];
        for (slot, model) in points.iter_mut().zip(MODEL_POINTS.iter()) {
            let p = rotation.dot(&Array1::from(model.to_vec()));
            let (x, y, z) = (p[0] + t[0], p[1] + t[1], p[2] + t[2]);
            *slot = Point2::new(f * x / z + cx, f * y / z + cy);
        }
        points
    }

    fn landmarks_from(points: &[Point2; 6]) -> Vec<Point2> {
        let mut landmarks = vec![Point2::new(320.0, 240.0); 478];
        for (&idx, p) in POSE_LANDMARKS.iter().zip(points) {
            landmarks[idx] = *p;
        }
        landmarks
    }

    #[test]
    fn test_frontal_face_is_zero_pose() {
        let points = project([0.0, 0.0, 0.0], [0.0, 0.0, 1500.0]);
        let pose = PoseEstimator::default().estimate(&landmarks_from(&points), FRAME);
        assert!(pose.pitch.abs() < 0.5, "pitch {}", pose.pitch);
        assert!(pose.yaw.abs() < 0.5, "yaw {}", pose.yaw);
        assert!(pose.roll.abs() < 0.5, "roll {}", pose.roll);
    }

    #[test]
    fn test_recovers_pitch() {
        // Chin swings away from the camera: nod down
        let points = project([15f64.to_radians(), 0.0, 0.0], [20.0, -10.0, 1200.0]);
        let solution = PoseEstimator::default().solve(&points, FRAME).unwrap();
        let pose = solution.euler_angles();
        assert!((pose.pitch + 15.0).abs() < 0.5, "pitch {}", pose.pitch);
        assert!(pose.yaw.abs() < 0.5);
        assert!(solution.rms_error < 0.1);
    }

    #[test]
    fn test_recovers_yaw_and_roll() {
        let points = project([0.0, 20f64.to_radians(), 0.0], [0.0, 0.0, 1400.0]);
        let pose = PoseEstimator::default().solve(&points, FRAME).unwrap().euler_angles();
        assert!((pose.yaw - 20.0).abs() < 0.5, "yaw {}", pose.yaw);

        let points = project([0.0, 0.0, (-10f64).to_radians()], [0.0, 0.0, 1400.0]);
        let pose = PoseEstimator::default().solve(&points, FRAME).unwrap().euler_angles();
        assert!((pose.roll + 10.0).abs() < 0.5, "roll {}", pose.roll);
    }

    #[test]
    fn test_degenerate_points_fail() {
        let points = [Point2::new(100.0, 100.0); 6];
        let result = PoseEstimator::default().solve(&points, FRAME);
        assert_eq!(
            result.unwrap_err(),
            GeometryError::DegenerateLandmarks("pose landmarks")
        );
    }

    #[test]
    fn test_failure_yields_zero_pose() {
        let landmarks = vec![Point2::new(100.0, 100.0); 478];
        let pose = PoseEstimator::default().estimate(&landmarks, FRAME);
        assert_eq!(pose, HeadPose::default());

        let short = vec![Point2::new(1.0, 2.0); 10];
        assert_eq!(PoseEstimator::default().estimate(&short, FRAME), HeadPose::default());
    }

    #[test]
    fn test_zero_frame_size_fails() {
        let points = project([0.0, 0.0, 0.0], [0.0, 0.0, 1500.0]);
        let frame = FrameSize {
            width: 0,
            height: 480,
        };
        assert!(PoseEstimator::default().solve(&points, frame).is_err());
    }

    #[test]
    fn test_euler_clamps_angles() {
        let pose = rotation_to_euler(&rodrigues(80f64.to_radians(), 0.0, 0.0));
        assert_eq!(pose.pitch, -PITCH_LIMIT_DEG);

        let pose = rotation_to_euler(&rodrigues((-80f64).to_radians(), 0.0, 0.0));
        assert_eq!(pose.pitch, PITCH_LIMIT_DEG);

        let pose = rotation_to_euler(&rodrigues(0.0, 0.0, (-70f64).to_radians()));
        assert_eq!(pose.roll, -ROLL_LIMIT_DEG);
    }

    #[test]
    fn test_nod_down_moves_chin_away() {
        let rotation = rodrigues(15f64.to_radians(), 0.0, 0.0);
        let chin = rotation.dot(&Array1::from(MODEL_POINTS[1].to_vec()));
        let eye = rotation.dot(&Array1::from(MODEL_POINTS[2].to_vec()));
        assert!(chin[2] > MODEL_POINTS[1][2]);
        assert!(eye[2] < MODEL_POINTS[2][2]);
        assert!(rotation_to_euler(&rotation).pitch < 0.0);
    }

    #[test]
    fn test_euler_gimbal_lock() {
        // 90 degree rotation about y: sy == 0
        let rotation = arr2(&[[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [-1.0, 0.0, 0.0]]);
        let pose = rotation_to_euler(&rotation);
        assert_eq!(pose.pitch, 0.0);
        assert_eq!(pose.yaw, YAW_LIMIT_DEG);
        assert_eq!(pose.roll, 0.0);
    }

    #[test]
    fn test_solve_linear() {
        let a = arr2(&[[0.0, 2.0], [3.0, 1.0]]);
        let b = Array1::from(vec![4.0, 5.0]);
        let x = solve_linear(a, b).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);

        let singular = arr2(&[[1.0, 2.0], [2.0, 4.0]]);
        assert!(solve_linear(singular, Array1::from(vec![1.0, 2.0])).is_none());
    }
}
