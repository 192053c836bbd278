use std::cell::Cell;

use lnb_util::MeritValue;

use crate::pipeline::Filter;

/// Rejects any generator whose merit is at or above a running threshold,
/// pruning a generating value whose merit already exceeds the best value
/// found so far before spending further work on it. The threshold starts at
/// `+inf` (nothing pruned) and is meant to be lowered as the search's
/// [`crate`]-external `MinObserver` improves on the running minimum:
/// lowering the threshold can only reject generators that were already
/// going to lose, never change which one wins.
pub struct LowPass {
    threshold: Cell<f64>,
}

impl LowPass {
    pub fn new() -> Self {
        LowPass { threshold: Cell::new(f64::INFINITY) }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold.get()
    }

    /// Lowers the active threshold; raising it back up is never done, since
    /// the running minimum in a CBC search only ever improves.
    pub fn tighten(&self, new_threshold: f64) {
        if new_threshold < self.threshold.get() {
            self.threshold.set(new_threshold);
        }
    }
}

impl Default for LowPass {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for LowPass {
    fn name(&self) -> &'static str {
        "low-pass"
    }

    fn apply(&self, merit: MeritValue) -> Option<MeritValue> {
        if merit.compare_key() >= self.threshold.get() {
            None
        } else {
            Some(merit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_everything_before_any_tightening() {
        let low_pass = LowPass::new();
        assert_eq!(low_pass.apply(MeritValue::Scalar(1e9)), Some(MeritValue::Scalar(1e9)));
    }

    #[test]
    fn rejects_at_or_above_the_threshold() {
        let low_pass = LowPass::new();
        low_pass.tighten(0.5);
        assert_eq!(low_pass.apply(MeritValue::Scalar(0.5)), None);
        assert_eq!(low_pass.apply(MeritValue::Scalar(0.6)), None);
        assert_eq!(low_pass.apply(MeritValue::Scalar(0.4)), Some(MeritValue::Scalar(0.4)));
    }

    #[test]
    fn tightening_never_loosens_the_threshold() {
        let low_pass = LowPass::new();
        low_pass.tighten(0.3);
        low_pass.tighten(0.8);
        assert_eq!(low_pass.threshold(), 0.3);
    }
}
