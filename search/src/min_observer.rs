use lnb_util::MeritValue;

/// Tracks the running minimum merit seen across an exploration pass, and the
/// generator value that achieved it. `observe` is the one signal every
/// explorer candidate is fed through; callers chain a
/// `lnb-filters::FilterPipeline` before it so a rejected candidate never
/// reaches the observer at all.
pub struct MinObserver {
    best: Option<(u64, MeritValue)>,
    evaluated: usize,
}

impl MinObserver {
    pub fn new() -> Self {
        MinObserver { best: None, evaluated: 0 }
    }

    /// Records one candidate; returns `true` if it improved (or established)
    /// the running minimum.
    pub fn observe(&mut self, gen: u64, merit: MeritValue) -> bool {
        self.evaluated += 1;
        let improves = match &self.best {
            None => true,
            Some((_, best_merit)) => merit.compare_key() < best_merit.compare_key(),
        };
        if improves {
            self.best = Some((gen, merit));
        }
        improves
    }

    pub fn best(&self) -> Option<&(u64, MeritValue)> {
        self.best.as_ref()
    }

    pub fn best_merit(&self) -> Option<f64> {
        self.best.as_ref().map(|(_, m)| m.compare_key())
    }

    pub fn evaluated(&self) -> usize {
        self.evaluated
    }

    /// Resets the running minimum for the next coordinate's pass, keeping no
    /// state across dimensions: each coordinate's search starts with a
    /// fresh running minimum over that coordinate's candidates.
    pub fn reset(&mut self) {
        self.best = None;
        self.evaluated = 0;
    }
}

impl Default for MinObserver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_always_improves() {
        let mut observer = MinObserver::new();
        assert!(observer.observe(3, MeritValue::Scalar(1.0)));
        assert_eq!(observer.best(), Some(&(3, MeritValue::Scalar(1.0))));
    }

    #[test]
    fn only_strictly_smaller_merits_improve() {
        let mut observer = MinObserver::new();
        observer.observe(1, MeritValue::Scalar(0.5));
        assert!(!observer.observe(2, MeritValue::Scalar(0.5)));
        assert!(!observer.observe(3, MeritValue::Scalar(0.9)));
        assert!(observer.observe(4, MeritValue::Scalar(0.1)));
        assert_eq!(observer.best().unwrap().0, 4);
    }

    #[test]
    fn reset_clears_the_running_minimum() {
        let mut observer = MinObserver::new();
        observer.observe(1, MeritValue::Scalar(0.1));
        observer.reset();
        assert!(observer.best().is_none());
        assert_eq!(observer.evaluated(), 0);
    }
}
