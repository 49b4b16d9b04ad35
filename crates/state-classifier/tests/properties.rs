use metric_engine::MetricsSnapshot;
use proptest::prelude::*;
use state_classifier::{StateClassifier, StateLabel};

fn snapshot() -> impl Strategy<Value = MetricsSnapshot> {
    (0u8..=100, 0u8..=100, 0u8..=100, 0u8..=100).prop_map(
        |(attention, fatigue, frustration, distraction)| MetricsSnapshot {
            attention,
            fatigue,
            frustration,
            distraction,
        },
    )
}

proptest! {
    #[test]
    fn label_is_never_unknown_for_a_snapshot(m in snapshot(), engagement in 0u8..=100) {
        let label = StateClassifier::default().classify_with_engagement(&m, engagement);
        prop_assert!(StateLabel::ALL.contains(&label));
        prop_assert_ne!(label, StateLabel::Unknown);
    }

    #[test]
    fn critical_fatigue_always_wins(m in snapshot(), engagement in 0u8..=100) {
        let m = MetricsSnapshot { fatigue: m.fatigue.max(70), ..m };
        prop_assert_eq!(
            StateClassifier::default().classify_with_engagement(&m, engagement),
            StateLabel::HighlyFatigued
        );
    }

    #[test]
    fn classification_is_pure(m in snapshot(), engagement in 0u8..=100) {
        let classifier = StateClassifier::default();
        prop_assert_eq!(
            classifier.classify_with_engagement(&m, engagement),
            classifier.classify_with_engagement(&m, engagement)
        );
    }
}
