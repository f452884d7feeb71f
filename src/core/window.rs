//! Fixed-capacity sliding window over per-sample features.
//!
//! A circular buffer holding the most recent `capacity` samples, with a step
//! counter that drives the overlapping evaluation schedule (default: window
//! of 50 samples, evaluated every 25 pushes once full).

use crate::core::features::SampleFeatures;

/// Ring buffer of the most recent per-sample features.
///
/// The write index and count are internal; callers only ever see the
/// chronological `snapshot()`.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    buf: Vec<SampleFeatures>,
    capacity: usize,
    /// Next slot to write (the oldest entry once the window is full)
    write_index: usize,
    /// Valid entries, capped at capacity
    count: usize,
    /// Pushes since the last evaluation was taken
    steps_since_eval: usize,
}

impl SampleWindow {
    /// Create an empty window. `capacity` must be nonzero (enforced by
    /// config validation upstream).
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![SampleFeatures::default(); capacity],
            capacity,
            write_index: 0,
            count: 0,
            steps_since_eval: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of valid entries, i.e. min(samples seen, capacity).
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True once the window has seen at least `capacity` samples.
    pub fn is_full(&self) -> bool {
        self.count == self.capacity
    }

    /// Pushes since the last `take_evaluation()`.
    pub fn steps_since_eval(&self) -> usize {
        self.steps_since_eval
    }

    /// Insert a sample, evicting the oldest entry once full.
    pub fn push(&mut self, features: SampleFeatures) {
        self.buf[self.write_index] = features;
        self.write_index = (self.write_index + 1) % self.capacity;
        if self.count < self.capacity {
            self.count += 1;
        }
        self.steps_since_eval += 1;
    }

    /// The current contents in chronological order, oldest first.
    ///
    /// Once full, the entry at the write index is the oldest; before that,
    /// entries simply occupy the front of the buffer in push order.
    pub fn snapshot(&self) -> Vec<SampleFeatures> {
        if self.count < self.capacity {
            return self.buf[..self.count].to_vec();
        }
        let mut out = Vec::with_capacity(self.capacity);
        for i in 0..self.capacity {
            out.push(self.buf[(self.write_index + i) % self.capacity]);
        }
        out
    }

    /// Reset the step counter after an evaluation has been taken.
    pub fn mark_evaluated(&mut self) {
        self.steps_since_eval = 0;
    }
}
