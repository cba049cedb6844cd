//! Per-group cooldown bookkeeping.
//!
//! Two parallel arrays indexed by position within the group. Invariants:
//! `0 ≤ remaining[i] ≤ max[i]` and both arrays match the group's length.

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CooldownBank {
    remaining: Vec<f32>,
    max: Vec<f32>,
}

impl CooldownBank {
    pub fn new(len: usize) -> Self {
        Self {
            remaining: vec![0.0; len],
            max: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Resizes to `len` and clears every timer.
    pub fn reset(&mut self, len: usize) {
        self.remaining.clear();
        self.max.clear();
        self.remaining.resize(len, 0.0);
        self.max.resize(len, 0.0);
    }

    /// Clears one timer.
    pub fn clear(&mut self, index: usize) {
        if let (Some(remaining), Some(max)) = (self.remaining.get_mut(index), self.max.get_mut(index)) {
            *remaining = 0.0;
            *max = 0.0;
        }
    }

    /// Starts a cooldown: `remaining = max = duration`.
    pub fn arm(&mut self, index: usize, duration: f32) {
        let duration = duration.max(0.0);
        if let (Some(remaining), Some(max)) = (self.remaining.get_mut(index), self.max.get_mut(index)) {
            *remaining = duration;
            *max = duration;
        }
    }

    pub fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        for remaining in &mut self.remaining {
            *remaining = (*remaining - dt).max(0.0);
        }
    }

    pub fn remaining(&self, index: usize) -> f32 {
        self.remaining.get(index).copied().unwrap_or(0.0)
    }

    pub fn max(&self, index: usize) -> f32 {
        self.max.get(index).copied().unwrap_or(0.0)
    }

    pub fn is_ready(&self, index: usize) -> bool {
        self.remaining(index) <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_decreases_monotonically_to_zero() {
        let mut bank = CooldownBank::new(2);
        bank.arm(1, 1.0);

        let mut previous = bank.remaining(1);
        for _ in 0..40 {
            bank.tick(1.0 / 30.0);
            let now = bank.remaining(1);
            assert!(now <= previous);
            assert!((0.0..=bank.max(1)).contains(&now));
            previous = now;
        }
        assert_eq!(bank.remaining(1), 0.0);
        assert_eq!(bank.max(1), 1.0);
        assert!(bank.is_ready(0));
    }

    #[test]
    fn reset_resizes_and_clears() {
        let mut bank = CooldownBank::new(1);
        bank.arm(0, 3.0);
        bank.reset(3);

        assert_eq!(bank.len(), 3);
        assert!((0..3).all(|i| bank.is_ready(i) && bank.max(i) == 0.0));
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let mut bank = CooldownBank::new(1);
        bank.arm(5, 2.0);
        assert_eq!(bank.remaining(5), 0.0);
        assert_eq!(bank.len(), 1);
    }
}
