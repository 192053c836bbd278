use lnb_util::MeritValue;

use crate::pipeline::Filter;

/// The five ways a multilevel [`MeritValue::Levels`] merit collapses to a
/// single scalar. `MaxLevel` and `Level` read
/// off a single coordinate; `Sum`/`Max` fold over every level; `WeightedDq`
/// applies a geometric per-level decay `q^level` before summing, the
/// "virtual level weight" construction used to bias multilevel search
/// towards resolving the coarsest levels first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LevelCombineRule {
    MaxLevel,
    Level(usize),
    Sum,
    Max,
    WeightedDq(f64),
}

/// Collapses a [`MeritValue::Levels`] to a [`MeritValue::Scalar`] per the
/// configured [`LevelCombineRule`]; a merit already scalar passes through
/// unchanged, since an already-unilevel construction has nothing to
/// combine.
pub struct LevelCombiner {
    rule: LevelCombineRule,
}

impl LevelCombiner {
    pub fn new(rule: LevelCombineRule) -> Self {
        LevelCombiner { rule }
    }

    fn combine(&self, levels: &[f64]) -> f64 {
        match self.rule {
            LevelCombineRule::MaxLevel => levels.last().copied().unwrap_or(0.0),
            LevelCombineRule::Level(l) => levels.get(l).copied().unwrap_or(0.0),
            LevelCombineRule::Sum => levels.iter().sum(),
            LevelCombineRule::Max => levels.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            LevelCombineRule::WeightedDq(q) => {
                levels.iter().enumerate().map(|(level, &v)| q.powi(level as i32) * v).sum()
            }
        }
    }
}

impl Filter for LevelCombiner {
    fn name(&self) -> &'static str {
        "level-combiner"
    }

    fn apply(&self, merit: MeritValue) -> Option<MeritValue> {
        match merit {
            MeritValue::Scalar(v) => Some(MeritValue::Scalar(v)),
            MeritValue::Levels(levels) => Some(MeritValue::Scalar(self.combine(&levels))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_level_takes_the_last_entry() {
        let combiner = LevelCombiner::new(LevelCombineRule::MaxLevel);
        let result = combiner.apply(MeritValue::Levels(vec![0.1, 0.2, 0.9]));
        assert_eq!(result, Some(MeritValue::Scalar(0.9)));
    }

    #[test]
    fn level_reads_a_fixed_coordinate() {
        let combiner = LevelCombiner::new(LevelCombineRule::Level(1));
        let result = combiner.apply(MeritValue::Levels(vec![0.1, 0.2, 0.9]));
        assert_eq!(result, Some(MeritValue::Scalar(0.2)));
    }

    #[test]
    fn sum_adds_every_level() {
        let combiner = LevelCombiner::new(LevelCombineRule::Sum);
        let result = combiner.apply(MeritValue::Levels(vec![0.1, 0.2, 0.3]));
        assert_eq!(result, Some(MeritValue::Scalar(0.6000000000000001)));
    }

    #[test]
    fn max_takes_the_largest_level() {
        let combiner = LevelCombiner::new(LevelCombineRule::Max);
        let result = combiner.apply(MeritValue::Levels(vec![0.1, 0.9, 0.3]));
        assert_eq!(result, Some(MeritValue::Scalar(0.9)));
    }

    #[test]
    fn weighted_dq_decays_later_levels() {
        let combiner = LevelCombiner::new(LevelCombineRule::WeightedDq(0.5));
        let result = combiner.apply(MeritValue::Levels(vec![1.0, 1.0]));
        assert_eq!(result, Some(MeritValue::Scalar(1.5)));
    }

    #[test]
    fn a_scalar_merit_passes_through_unchanged() {
        let combiner = LevelCombiner::new(LevelCombineRule::Sum);
        let result = combiner.apply(MeritValue::Scalar(0.42));
        assert_eq!(result, Some(MeritValue::Scalar(0.42)));
    }
}
