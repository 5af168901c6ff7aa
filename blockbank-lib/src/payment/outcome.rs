//! Success/failure decision for simulated payments.

use rand::Rng;

/// Decides whether a simulated payment settles.
pub trait OutcomeDecider: Send + Sync {
    fn succeeds(&self) -> bool;
}

/// Succeeds with a fixed probability.
#[derive(Debug, Clone, Copy)]
pub struct RandomOutcome {
    success_rate: f64,
}

impl RandomOutcome {
    /// `success_rate` is clamped to `0.0..=1.0`.
    pub fn new(success_rate: f64) -> Self {
        let success_rate = if success_rate.is_nan() {
            0.0
        } else {
            success_rate.clamp(0.0, 1.0)
        };
        Self { success_rate }
    }

    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }
}

impl Default for RandomOutcome {
    fn default() -> Self {
        Self::new(0.8)
    }
}

impl OutcomeDecider for RandomOutcome {
    fn succeeds(&self) -> bool {
        rand::thread_rng().gen_bool(self.success_rate)
    }
}

/// Always the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedOutcome(pub bool);

impl FixedOutcome {
    pub const SUCCEED: FixedOutcome = FixedOutcome(true);
    pub const FAIL: FixedOutcome = FixedOutcome(false);
}

impl OutcomeDecider for FixedOutcome {
    fn succeeds(&self) -> bool {
        self.0
    }
}
