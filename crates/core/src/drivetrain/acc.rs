//! Adaptive-cruise voting filter
//!
//! A sliding window of integer ACC samples (typically 0/1 "road is clear"
//! votes from a perception model) with a running sum. The sum is kept in
//! `i64`, which holds any window of `i32` samples exactly. The window sum is
//! compared against two thresholds; between them nothing is voted, which
//! keeps the drivetrain from oscillating between regimes.

use heapless::Deque;

/// Largest supported window
pub const ACC_WINDOW_MAX: usize = 64;

/// Outcome of the vote over the current window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccVote {
    Accelerate,
    Decelerate,
}

/// Fixed-capacity ring buffer of ACC samples with a running sum
#[derive(Debug, Clone)]
pub struct AccFilter {
    samples: Deque<i32, ACC_WINDOW_MAX>,
    capacity: usize,
    sum: i64,
    threshold_high: i32,
    threshold_low: i32,
}

impl AccFilter {
    /// Create a filter; `capacity` is clamped to `1..=ACC_WINDOW_MAX`
    pub fn new(capacity: usize, threshold_high: i32, threshold_low: i32) -> Self {
        Self {
            samples: Deque::new(),
            capacity: capacity.clamp(1, ACC_WINDOW_MAX),
            sum: 0,
            threshold_high,
            threshold_low,
        }
    }

    /// Insert a sample, evicting the oldest at capacity
    pub fn push(&mut self, sample: i32) {
        if self.samples.len() >= self.capacity {
            if let Some(oldest) = self.samples.pop_front() {
                self.sum -= i64::from(oldest);
            }
        }
        // Cannot fail: capacity never exceeds the deque size
        let _ = self.samples.push_back(sample);
        self.sum += i64::from(sample);
    }

    pub fn sum(&self) -> i64 {
        self.sum
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Vote over the current window
    ///
    /// Sum at or above the high threshold accelerates; at or below the low
    /// threshold decelerates.
    pub fn vote(&self) -> Option<AccVote> {
        if self.sum >= i64::from(self.threshold_high) {
            Some(AccVote::Accelerate)
        } else if self.sum <= i64::from(self.threshold_low) {
            Some(AccVote::Decelerate)
        } else {
            None
        }
    }
}
