//! Rolling window of net torque samples for the chart

use std::collections::VecDeque;

/// Bounded sample buffer; pushing past capacity evicts the oldest sample
#[derive(Debug, Clone)]
pub struct TorqueHistory {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl TorqueHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: f32) {
        if self.capacity == 0 {
            return;
        }
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Most recent sample, if any
    pub fn latest(&self) -> Option<f32> {
        self.samples.back().copied()
    }

    /// Samples from oldest to newest
    pub fn iter(&self) -> impl ExactSizeIterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }

    /// Largest absolute sample (0 when empty)
    pub fn peak_magnitude(&self) -> f32 {
        self.samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }
}
