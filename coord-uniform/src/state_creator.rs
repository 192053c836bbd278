use lnb_weights::Weights;

use crate::state::CoordUniformState;

/// Builds the list of [`CoordUniformState`]s a `CoordUniformCbc` owns for
/// the lifetime of a search, one per weight sub-family. A `Combined` weight
/// splits into one state per summand so each sub-family's recurrence stays
/// independent; every other variant produces a single-element list.
pub struct StateCreator;

impl StateCreator {
    pub fn create(weights: &Weights, n: usize) -> Vec<CoordUniformState> {
        match weights {
            Weights::Combined(parts) => parts.iter().map(|w| CoordUniformState::new(w.clone(), n)).collect(),
            other => vec![CoordUniformState::new(other.clone(), n)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_weights_split_into_one_state_per_part() {
        let a = Weights::product(0.0, vec![0.5]);
        let b = Weights::order_dependent(0.0, vec![1.0]);
        let w = Weights::combined(vec![a, b]);
        let states = StateCreator::create(&w, 4);
        assert_eq!(states.len(), 2);
    }

    #[test]
    fn non_combined_weights_produce_single_state() {
        let w = Weights::product(0.0, vec![0.5]);
        let states = StateCreator::create(&w, 4);
        assert_eq!(states.len(), 1);
    }
}
