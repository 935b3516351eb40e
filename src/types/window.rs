use serde::{Deserialize, Serialize};

/// Fixed-capacity circular buffer that keeps the sum of its contents current.
///
/// Slots start at zero, so before the buffer has wrapped the sum covers only
/// the values pushed so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingWindow {
    slots: Vec<u64>,
    cursor: usize,
    sum: u64,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "rolling window needs at least one slot");
        Self {
            slots: vec![0; capacity],
            cursor: 0,
            sum: 0,
        }
    }

    /// Stores `value` in place of the oldest sample and returns the evicted one.
    pub fn push(&mut self, value: u64) -> u64 {
        let evicted = std::mem::replace(&mut self.slots[self.cursor], value);
        self.sum = self.sum - evicted + value;
        self.cursor = (self.cursor + 1) % self.slots.len();
        evicted
    }

    pub fn sum(&self) -> u64 {
        self.sum
    }

    /// Mean over the full capacity, matching how the window is sampled once full.
    pub fn mean(&self) -> f64 {
        self.sum as f64 / self.slots.len() as f64
    }
}
