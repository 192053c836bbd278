use lnb_util::Lfsr;

/// Produces the sequence of candidate generator values a CBC search tries
/// at one coordinate, given the full admissible set for the active size
/// parameter. `FullCBCExplorer` tries every
/// admissible value (exhaustive, exact); `RandomCBCExplorer` samples a fixed
/// count without replacement (fast, heuristic); `MixedCBCExplorer` is full
/// for the first few coordinates (where the admissible set is still small)
/// and falls back to random sampling once the dimension grows past that.
pub trait Explorer {
    /// Called once per coordinate (`dimension` is the coordinate about to be
    /// searched, 1-based) with that coordinate's admissible set. Returns the
    /// candidates to evaluate, in the order they should be tried.
    fn candidates(&mut self, dimension: usize, admissible: &[u64]) -> Vec<u64>;
}

/// Exhaustive search: every admissible value, in ascending order.
#[derive(Clone, Copy, Debug, Default)]
pub struct FullCBCExplorer;

impl Explorer for FullCBCExplorer {
    fn candidates(&mut self, _dimension: usize, admissible: &[u64]) -> Vec<u64> {
        admissible.to_vec()
    }
}

/// Samples `sample_size` distinct admissible values per coordinate via a
/// seeded [`Lfsr`]: the same seed must always draw the same candidates.
/// Never samples more than the admissible set actually has.
pub struct RandomCBCExplorer {
    rng: Lfsr,
    sample_size: usize,
}

impl RandomCBCExplorer {
    pub fn new(seed: u64, sample_size: usize) -> Self {
        RandomCBCExplorer { rng: Lfsr::new(seed), sample_size }
    }
}

impl Explorer for RandomCBCExplorer {
    fn candidates(&mut self, _dimension: usize, admissible: &[u64]) -> Vec<u64> {
        let count = self.sample_size.min(admissible.len());
        let mut pool: Vec<u64> = admissible.to_vec();
        let mut chosen = Vec::with_capacity(count);
        for _ in 0..count {
            let idx = self.rng.next_below(pool.len() as u64) as usize;
            chosen.push(pool.swap_remove(idx));
        }
        chosen
    }
}

/// Full search through coordinate `full_until` (inclusive), random sampling
/// afterward: the admissible set is cheap to scan exhaustively at low
/// dimension and becomes the bottleneck as dimension grows, so this
/// explorer switches strategy partway through.
pub struct MixedCBCExplorer {
    full_until: usize,
    random: RandomCBCExplorer,
}

impl MixedCBCExplorer {
    pub fn new(full_until: usize, seed: u64, sample_size: usize) -> Self {
        MixedCBCExplorer { full_until, random: RandomCBCExplorer::new(seed, sample_size) }
    }
}

impl Explorer for MixedCBCExplorer {
    fn candidates(&mut self, dimension: usize, admissible: &[u64]) -> Vec<u64> {
        if dimension <= self.full_until {
            admissible.to_vec()
        } else {
            self.random.candidates(dimension, admissible)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_explorer_returns_everything() {
        let mut explorer = FullCBCExplorer;
        let admissible = vec![1, 3, 5, 7];
        assert_eq!(explorer.candidates(2, &admissible), admissible);
    }

    #[test]
    fn random_explorer_never_exceeds_the_admissible_set() {
        let mut explorer = RandomCBCExplorer::new(7, 100);
        let admissible = vec![1, 3, 5];
        let chosen = explorer.candidates(1, &admissible);
        assert_eq!(chosen.len(), 3);
        for c in &chosen {
            assert!(admissible.contains(c));
        }
    }

    #[test]
    fn random_explorer_is_reproducible_for_the_same_seed() {
        let admissible = vec![1, 3, 5, 7, 9, 11];
        let mut a = RandomCBCExplorer::new(42, 3);
        let mut b = RandomCBCExplorer::new(42, 3);
        assert_eq!(a.candidates(1, &admissible), b.candidates(1, &admissible));
    }

    #[test]
    fn mixed_explorer_switches_strategy_after_full_until() {
        let admissible: Vec<u64> = (1..20).collect();
        let mut explorer = MixedCBCExplorer::new(2, 1, 4);
        assert_eq!(explorer.candidates(1, &admissible).len(), admissible.len());
        assert_eq!(explorer.candidates(2, &admissible).len(), admissible.len());
        assert_eq!(explorer.candidates(3, &admissible).len(), 4);
    }
}
