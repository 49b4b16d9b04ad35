//! Fixed-Capacity Ring Buffer
//!
//! Bounded history of recent values. Pushing into a full buffer evicts the
//! oldest entry. Used for the per-metric smoothing windows.

mod buffer;

pub use buffer::{RingBuffer, DEFAULT_CAPACITY};

/// Smoothing history of raw metric values
pub type MetricHistory = RingBuffer<f64>;
