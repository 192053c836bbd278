use tracing::info;

use lnb_coord_uniform::{CoordUniformState, InnerProduct, StateCreator};
use lnb_filters::{FilterPipeline, LowPass};
use lnb_lattice::{LatticeRule, SizeParam};
use lnb_storage::{Embedding, Kernel, Storage};
use lnb_util::MeritValue;
use lnb_weights::Weights;

use crate::explorer::Explorer;
use crate::min_observer::MinObserver;

fn zero_merit(storage: &Storage) -> MeritValue {
    match storage.embedding() {
        Embedding::Unilevel => MeritValue::Scalar(0.0),
        Embedding::Multilevel { max_level, .. } => MeritValue::Levels(vec![0.0; max_level as usize + 1]),
    }
}

fn combined_weighted_state(states: &[CoordUniformState], n: usize) -> Vec<f64> {
    let mut q = vec![0.0; n];
    for state in states {
        for (acc, v) in q.iter_mut().zip(state.weighted_state()) {
            *acc += v;
        }
    }
    q
}

/// The lattice-rule CBC search driver: grows a
/// rank-1 generating vector one coordinate at a time, at each step asking an
/// [`Explorer`] for candidates, scoring them through the coordinate-uniform
/// additive recurrence (`lnb-coord-uniform`, the fast path available because
/// a lattice figure's merit is coordinate-uniform), filtering, and keeping
/// the best via a [`MinObserver`].
pub struct LatticeSearchDriver {
    size: SizeParam,
    storage: Storage,
    kernel_values: Vec<f64>,
    states: Vec<CoordUniformState>,
    base_merit: MeritValue,
    generators: Vec<u64>,
}

impl LatticeSearchDriver {
    pub fn new(size: SizeParam, kernel: &dyn Kernel, weights: &Weights) -> Self {
        let storage = Storage::new(size.to_size_kind(), kernel.suggested_compression(), size.to_storage_embedding());
        let kernel_values = kernel.values_vector(&storage.canonical_points());
        let states = StateCreator::create(weights, storage.n() as usize);
        let base_merit = zero_merit(&storage);
        LatticeSearchDriver { size, storage, kernel_values, states, base_merit, generators: Vec::new() }
    }

    pub fn dimension(&self) -> usize {
        self.generators.len()
    }

    pub fn base_merit(&self) -> &MeritValue {
        &self.base_merit
    }

    pub fn generators(&self) -> &[u64] {
        &self.generators
    }

    /// Searches and accepts the next coordinate: evaluates every candidate
    /// `explorer` proposes, runs each through `filters` and `low_pass`
    /// (tightened to the best merit found so far in this pass), keeps the
    /// best via a fresh [`MinObserver`], and extends the generating vector
    /// with it.
    pub fn search_next_coordinate(
        &mut self,
        explorer: &mut dyn Explorer,
        filters: &FilterPipeline,
        low_pass: Option<&LowPass>,
    ) -> Option<(u64, MeritValue)> {
        let d = self.generators.len() + 1;
        let admissible = self.size.admissible_generators();
        let candidates = explorer.candidates(d, &admissible);

        let mut observer = MinObserver::new();
        let inner = InnerProduct::new(&self.storage, &self.kernel_values);
        let q = combined_weighted_state(&self.states, self.storage.n() as usize);

        for (gen, raw) in inner.prod_seq(candidates.into_iter(), &q) {
            let merit = self.base_merit.zip_with(&raw, |a, b| a + b);
            let Some(merit) = filters.apply(merit) else { continue };
            if let Some(low_pass) = low_pass {
                let Some(merit) = low_pass.apply(merit) else { continue };
                if observer.observe(gen, merit) {
                    low_pass.tighten(observer.best_merit().expect("just observed"));
                }
            } else {
                observer.observe(gen, merit);
            }
        }

        let best = observer.best().cloned();
        if let Some((gen, merit)) = &best {
            info!(dimension = d, gen, merit = %merit, "lattice CBC dimension complete");
            self.accept(*gen, merit.clone());
        }
        best
    }

    fn accept(&mut self, gen: u64, merit: MeritValue) {
        self.base_merit = merit;
        self.generators.push(gen);
        let n = self.storage.n();
        let view = self.storage.strided(&self.kernel_values, gen);
        let omega: Vec<f64> = (0..n).map(|i| view.get(i)).collect();
        for state in &mut self.states {
            state.update(&omega);
        }
    }

    /// Searches coordinates `1..=dimension`, returning the resulting
    /// `LatticeRule`. `explorer` is reused across coordinates so a
    /// [`crate::explorer::MixedCBCExplorer`]'s internal dimension counter
    /// stays coherent.
    pub fn run(&mut self, dimension: usize, explorer: &mut dyn Explorer, filters: &FilterPipeline, low_pass: Option<&LowPass>) -> LatticeRule {
        while self.dimension() < dimension {
            if self.search_next_coordinate(explorer, filters, low_pass).is_none() {
                break;
            }
        }
        LatticeRule::new(self.size, self.generators.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::FullCBCExplorer;
    use lnb_storage::PAlpha;

    #[test]
    fn full_cbc_search_matches_brute_force_minimum() {
        let size = SizeParam::ordinary(13).unwrap();
        let kernel = PAlpha::new(2);
        let weights = Weights::product(0.0, vec![1.0, 1.0]);
        let mut driver = LatticeSearchDriver::new(size, &kernel, &weights);
        let mut explorer = FullCBCExplorer;
        let filters = FilterPipeline::new();

        let rule = driver.run(2, &mut explorer, &filters, None);
        assert_eq!(rule.dimension(), 2);
        assert_eq!(rule.generating_vector()[0], 1, "the first coordinate's generator is always 1");

        // Brute force over every admissible second generator must agree
        // with the incrementally-selected one (CBC monotonicity).
        let storage = Storage::new(size.to_size_kind(), kernel.suggested_compression(), size.to_storage_embedding());
        let values = kernel.values_vector(&storage.canonical_points());
        let best_gen = rule.generating_vector()[1];
        let mut best_merit = f64::INFINITY;
        let mut best_found = 0;
        for g in size.admissible_generators() {
            let rule2 = LatticeRule::new(size, vec![1, g]);
            let mut sum = 0.0;
            for i in 0..storage.n() {
                let x0 = rule2.point_coordinate(i, 0);
                let x1 = rule2.point_coordinate(i, 1);
                sum += weights.get_weight(&lnb_weights::Projection::new([0])) * {
                    let idx = storage.compress_index((i * 1) % storage.n());
                    values[idx]
                } + weights.get_weight(&lnb_weights::Projection::new([1])) * {
                    let idx = storage.compress_index((i * g) % storage.n());
                    values[idx]
                } + weights.get_weight(&lnb_weights::Projection::new([0, 1])) * {
                    let idx0 = storage.compress_index(i % storage.n());
                    let idx1 = storage.compress_index((i * g) % storage.n());
                    values[idx0] * values[idx1]
                };
                let _ = (x0, x1);
            }
            let merit = sum / storage.n() as f64;
            if merit < best_merit {
                best_merit = merit;
                best_found = g;
            }
        }
        assert_eq!(best_gen, best_found);
    }

    #[test]
    fn dimension_tracks_accepted_coordinates() {
        let size = SizeParam::ordinary(7).unwrap();
        let kernel = PAlpha::new(2);
        let weights = Weights::product(0.0, vec![1.0]);
        let mut driver = LatticeSearchDriver::new(size, &kernel, &weights);
        let mut explorer = FullCBCExplorer;
        let filters = FilterPipeline::new();
        driver.run(3, &mut explorer, &filters, None);
        assert_eq!(driver.dimension(), 3);
    }
}
