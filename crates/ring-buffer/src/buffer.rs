//! Ring buffer implementation

use serde::{Deserialize, Serialize};

/// Default history length (smoothing window N)
pub const DEFAULT_CAPACITY: usize = 3;

/// Bounded FIFO of the most recent `capacity` values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingBuffer<T> {
    /// Pre-allocated storage
    storage: Vec<T>,
    /// Capacity of the buffer, at least 1
    capacity: usize,
    /// Next write position
    head: usize,
}

impl<T: Copy> RingBuffer<T> {
    /// Create a buffer holding at most `capacity` values (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            storage: Vec::with_capacity(capacity),
            capacity,
            head: 0,
        }
    }

    /// Push a value, evicting the oldest when full
    pub fn push(&mut self, value: T) {
        if self.storage.len() < self.capacity {
            self.storage.push(value);
        } else {
            self.storage[self.head] = value;
        }
        self.head = (self.head + 1) % self.capacity;
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.storage.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Values oldest first
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let (newer, older) = if self.is_full() {
            self.storage.split_at(self.head)
        } else {
            self.storage.split_at(0)
        };
        older.iter().chain(newer.iter()).copied()
    }

    pub fn clear(&mut self) {
        self.storage.clear();
        self.head = 0;
    }
}

impl RingBuffer<f64> {
    /// Arithmetic mean of the held values, `None` when empty
    pub fn mean(&self) -> Option<f64> {
        if self.storage.is_empty() {
            return None;
        }
        Some(self.storage.iter().sum::<f64>() / self.storage.len() as f64)
    }
}

impl<T: Copy> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
