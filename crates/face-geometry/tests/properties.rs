use face_geometry::ear::{eye_aspect_ratio, LEFT_EYE, NEUTRAL_EAR, RIGHT_EYE};
use face_geometry::{
    BlendShapes, EmotionScores, FrameSize, GeometryAdapter, PartialEyeState, PartialHeadPose,
    Point2, RawFrame,
};
use proptest::prelude::*;

fn point() -> impl Strategy<Value = Point2> {
    (
        prop_oneof![-1000.0..1000.0f64, Just(f64::NAN), Just(f64::INFINITY)],
        -1000.0..1000.0f64,
    )
        .prop_map(|(x, y)| Point2::new(x, y))
}

fn blend_shapes() -> impl Strategy<Value = BlendShapes> {
    prop::collection::vec(
        (
            prop::sample::select(vec![
                "mouthSmileLeft",
                "mouthSmileRight",
                "browDownLeft",
                "browDownRight",
                "browInnerUp",
                "eyeWideLeft",
                "eyeWideRight",
                "jawOpen",
                "noseSneerLeft",
                "mouthStretchRight",
                "_neutral",
            ]),
            -2.0..3.0f64,
        ),
        0..12,
    )
    .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    #[test]
    fn ear_is_finite_and_non_negative(landmarks in prop::collection::vec(point(), 0..480)) {
        for indices in [&LEFT_EYE, &RIGHT_EYE] {
            let ear = eye_aspect_ratio(&landmarks, indices);
            prop_assert!(ear.is_finite());
            prop_assert!(ear >= 0.0);
        }
    }

    #[test]
    fn coincident_points_read_neutral(x in -500.0..500.0f64, y in -500.0..500.0f64) {
        let landmarks = vec![Point2::new(x, y); 478];
        prop_assert_eq!(eye_aspect_ratio(&landmarks, &LEFT_EYE), NEUTRAL_EAR);
    }

    #[test]
    fn fallback_emotions_in_unit_range(shapes in blend_shapes()) {
        let emotions = EmotionScores::from_blend_shapes(&shapes);
        prop_assert_eq!(emotions.len(), 7);
        for label in ["happy", "sad", "angry", "surprise", "neutral", "fear", "disgust"] {
            let score = emotions.get(label).unwrap();
            prop_assert!((0.0..=1.0).contains(&score), "{} = {}", label, score);
        }
    }

    #[test]
    fn adapter_never_panics(
        face_detected in any::<bool>(),
        landmarks in prop::option::of(prop::collection::vec(point(), 0..480)),
        shapes in prop::option::of(blend_shapes()),
        pitch in prop::option::of(-90.0..90.0f64),
        left_ear in prop::option::of(0.0..0.5f64),
        width in 0u32..2000,
        height in 0u32..2000,
    ) {
        let raw = RawFrame {
            face_detected,
            landmarks_2d: landmarks,
            blend_shapes: shapes,
            head_pose: pitch.map(|p| PartialHeadPose { pitch: Some(p), ..Default::default() }),
            eye_state: left_ear.map(|e| PartialEyeState { left_ear: Some(e), ..Default::default() }),
            frame_size: Some(FrameSize { width, height }),
        };

        let mut adapter = GeometryAdapter::default();
        let geometry = adapter.adapt(&raw);

        prop_assert_eq!(geometry.face_detected, face_detected);
        prop_assert!(geometry.head_pose.pitch.is_finite());
        prop_assert!(geometry.head_pose.yaw.is_finite());
        prop_assert!(geometry.head_pose.roll.is_finite());
        prop_assert!(geometry.blend_shapes.iter().all(|(_, v)| (0.0..=1.0).contains(&v)));
    }
}
