//! Depletable resources (HP, MP).
//!
//! Meters clamp on every write; callers learn whether a write actually changed
//! the value so they can decide whether observers need a notification.

/// A depletable resource pool clamped to `[0, max]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    current: f32,
    max: f32,
}

impl ResourceMeter {
    /// Create a meter; `current` is clamped into `[0, max]`.
    pub fn new(current: f32, max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: current.clamp(0.0, max),
            max,
        }
    }

    /// Create a meter at its maximum.
    pub fn full(max: f32) -> Self {
        Self::new(max, max)
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    /// Writes a new value (clamped). Returns true if the stored value changed.
    pub fn set(&mut self, value: f32) -> bool {
        let clamped = value.clamp(0.0, self.max);
        let changed = clamped != self.current;
        self.current = clamped;
        changed
    }

    /// Adds a signed delta (clamped). Returns true if the stored value changed.
    pub fn add(&mut self, delta: f32) -> bool {
        self.set(self.current + delta)
    }

    /// Spends `amount` if the pool can cover it; never goes partially negative.
    pub fn try_spend(&mut self, amount: f32) -> bool {
        let amount = amount.max(0.0);
        if self.current < amount {
            return false;
        }
        self.current -= amount;
        true
    }

    /// Changes the maximum and re-clamps the current value.
    pub fn set_max(&mut self, max: f32) {
        self.max = max.max(0.0);
        self.current = self.current.min(self.max);
    }
}

/// The two depletable pools tracked per combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vitals {
    pub hp: ResourceMeter,
    pub mp: ResourceMeter,
}

impl Vitals {
    pub fn new(hp: ResourceMeter, mp: ResourceMeter) -> Self {
        Self { hp, mp }
    }

    /// Both pools at their maximum.
    pub fn full(max_hp: f32, max_mp: f32) -> Self {
        Self {
            hp: ResourceMeter::full(max_hp),
            mp: ResourceMeter::full(max_mp),
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.hp.is_empty()
    }
}
