use proptest::prelude::*;
use ring_buffer::{MetricHistory, RingBuffer};

proptest! {
    #[test]
    fn keeps_most_recent(values in prop::collection::vec(any::<i32>(), 0..50), capacity in 1usize..8) {
        let mut buffer = RingBuffer::new(capacity);
        for &v in &values {
            buffer.push(v);
        }

        let expected: Vec<i32> = values.iter().rev().take(capacity).rev().copied().collect();
        prop_assert_eq!(buffer.iter().collect::<Vec<_>>(), expected);
        prop_assert!(buffer.len() <= capacity);
    }

    #[test]
    fn mean_within_bounds(values in prop::collection::vec(0.0..100.0f64, 1..20)) {
        let mut history = MetricHistory::new(3);
        for &v in &values {
            history.push(v);
        }
        let mean = history.mean().unwrap();
        let min = history.iter().fold(f64::INFINITY, f64::min);
        let max = history.iter().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(mean >= min - 1e-9 && mean <= max + 1e-9);
    }
}
