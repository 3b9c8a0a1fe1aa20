use serde::{Deserialize, Serialize};

/// Health pool with flat damage reduction.
///
/// The alive flag flips exactly once, the first time health reaches zero.
/// Dead pools ignore both damage and healing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    current: f32,
    max: f32,
    defense: f32,
    alive: bool,
}

impl Vitals {
    pub fn new(max: f32, defense: f32) -> Self {
        let max = max.max(1.0);
        Self {
            current: max,
            max,
            defense: defense.max(0.0),
            alive: true,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn defense(&self) -> f32 {
        self.defense
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Apply `amount` minus defense. Returns whether the owner is still alive.
    ///
    /// Negative amounts count as zero, so damage can never heal.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        let effective = (amount - self.defense).max(0.0);
        self.current = (self.current - effective).max(0.0);
        if self.current <= 0.0 {
            self.alive = false;
        }
        self.alive
    }

    /// Restore up to `max`. Negative amounts count as zero.
    pub fn heal(&mut self, amount: f32) {
        if !self.alive || !amount.is_finite() {
            return;
        }
        self.current = (self.current + amount.max(0.0)).min(self.max);
    }
}
