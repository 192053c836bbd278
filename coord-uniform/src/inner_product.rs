use lnb_storage::Storage;
use lnb_util::MeritValue;
use tracing::debug;

use crate::state::CoordUniformState;

/// Owns `Storage` and the kernel-values array; `prod_seq` lazily maps a
/// sequence of candidate generator values to their raw (not yet
/// base-merit-added) merit contribution for the next coordinate.
pub struct InnerProduct<'a> {
    storage: &'a Storage,
    kernel_values: &'a [f64],
}

impl<'a> InnerProduct<'a> {
    pub fn new(storage: &'a Storage, kernel_values: &'a [f64]) -> Self {
        InnerProduct { storage, kernel_values }
    }

    /// `prodSeq(genSeq, q)`: for each `gen` in `gen_seq`, the compressed sum
    /// of `q` against `gen`'s strided kernel values.
    pub fn prod_seq<'b, I>(&'b self, gen_seq: I, q: &'b [f64]) -> impl Iterator<Item = (u64, MeritValue)> + 'b
    where
        I: Iterator<Item = u64> + 'b,
    {
        gen_seq.map(move |gen| (gen, self.storage.compressed_sum(q, self.kernel_values, gen)))
    }

    pub fn storage(&self) -> &Storage {
        self.storage
    }

    pub fn kernel_values(&self) -> &[f64] {
        self.kernel_values
    }
}

fn zero_merit(storage: &Storage) -> MeritValue {
    match storage.embedding() {
        lnb_storage::Embedding::Unilevel => MeritValue::Scalar(0.0),
        lnb_storage::Embedding::Multilevel { max_level, .. } => MeritValue::Levels(vec![0.0; max_level as usize + 1]),
    }
}

/// Composes the current base lattice/net's merit, the list of
/// `CoordUniformState`s (one per weight sub-family), and an `InnerProduct`
/// to score and accept candidate extensions one coordinate at a time.
pub struct CoordUniformCbc<'a> {
    inner: InnerProduct<'a>,
    states: Vec<CoordUniformState>,
    base_merit: MeritValue,
    selected_generators: Vec<u64>,
}

impl<'a> CoordUniformCbc<'a> {
    pub fn new(storage: &'a Storage, kernel_values: &'a [f64], states: Vec<CoordUniformState>) -> Self {
        let base_merit = zero_merit(storage);
        CoordUniformCbc { inner: InnerProduct::new(storage, kernel_values), states, base_merit, selected_generators: Vec::new() }
    }

    pub fn base_merit(&self) -> &MeritValue {
        &self.base_merit
    }

    pub fn selected_generators(&self) -> &[u64] {
        &self.selected_generators
    }

    pub fn dimension(&self) -> usize {
        self.selected_generators.len()
    }

    fn combined_weighted_state(&self) -> Vec<f64> {
        let n = self.inner.storage().n() as usize;
        let mut q = vec![0.0; n];
        for state in &self.states {
            for (acc, v) in q.iter_mut().zip(state.weighted_state()) {
                *acc += v;
            }
        }
        q
    }

    /// `meritSeq(genSeq)`: the post-normalised-by-addition merit (base merit
    /// plus this coordinate's raw contribution) for every candidate in
    /// `gen_seq`. Callers chain their own filter pipeline (`lnb-filters`)
    /// over the resulting `MeritValue`s before comparing to the running
    /// minimum.
    ///
    /// Eagerly evaluated rather than lazily streamed: `q` (the combined
    /// weighted state) is freshly computed per call and would otherwise
    /// need to outlive a borrowing iterator across calls to `select`. A full
    /// CBC explorer's candidate list is bounded by the admissible-generator
    /// count, so this trades a lazy-sequence style for a simpler lifetime
    /// story at one evaluation step, not a complexity regression.
    pub fn merit_seq<I>(&self, gen_seq: I) -> Vec<(u64, MeritValue)>
    where
        I: Iterator<Item = u64>,
    {
        let q = self.combined_weighted_state();
        self.inner
            .prod_seq(gen_seq, &q)
            .map(|(gen, raw)| (gen, self.base_merit.zip_with(&raw, |a, b| a + b)))
            .collect()
    }

    /// `select(it)`: installs `gen`'s merit as the new base merit and
    /// broadcasts `gen` to every state.
    pub fn select(&mut self, gen: u64, merit: MeritValue) {
        debug!(gen, dimension = self.dimension() + 1, "CBC accept");
        self.base_merit = merit;
        self.selected_generators.push(gen);
        let n = self.inner.storage().n();
        let view = self.inner.storage().strided(self.inner.kernel_values(), gen);
        let omega: Vec<f64> = (0..n).map(|i| view.get(i)).collect();
        for state in &mut self.states {
            state.update(&omega);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lnb_storage::{Compression, Embedding, SizeKind};
    use lnb_weights::Weights;

    #[test]
    fn merit_seq_matches_from_scratch_evaluation() {
        let storage = Storage::new(SizeKind::Integer(8), Compression::None, Embedding::Unilevel);
        let values: Vec<f64> = storage.canonical_points().iter().map(|&x| x * (1.0 - x)).collect();
        let weights = Weights::product(0.0, vec![1.0, 1.0]);
        let states = crate::state_creator::StateCreator::create(&weights, storage.n() as usize);
        let mut cbc = CoordUniformCbc::new(&storage, &values, states);

        // Dimension 1: select gen = 1.
        let candidates: Vec<(u64, MeritValue)> = cbc.merit_seq(1..8).collect();
        let (g1, m1) = candidates[0].clone();
        cbc.select(g1, m1.clone());
        assert_eq!(cbc.selected_generators(), &[g1]);
        assert_eq!(cbc.base_merit(), &m1);

        // Dimension 2: from-scratch evaluation of (g1, g2) must match the
        // incremental base merit (CBC monotonicity).
        let g2 = 3u64;
        let scratch = from_scratch_merit(&storage, &values, &weights, &[g1, g2]);
        let incremental: Vec<(u64, MeritValue)> = cbc.merit_seq(std::iter::once(g2)).collect();
        let (_, m2) = &incremental[0];
        match (m2, &scratch) {
            (MeritValue::Scalar(a), MeritValue::Scalar(b)) => assert!((a - b).abs() < 1e-8),
            _ => panic!("expected scalar merits"),
        }
    }

    fn from_scratch_merit(storage: &Storage, values: &[f64], weights: &Weights, gens: &[u64]) -> MeritValue {
        let n = storage.n();
        let mut sum = 0.0;
        for point in 0..n {
            let omegas: Vec<f64> = gens
                .iter()
                .map(|&g| storage.strided(values, g).get(point))
                .collect();
            let s = gens.len();
            let mut acc = 0.0;
            for mask in 0u32..(1u32 << s) {
                let mut prod = 1.0;
                let mut coords = Vec::new();
                for i in 0..s {
                    if mask & (1 << i) != 0 {
                        coords.push(i);
                        prod *= omegas[i];
                    }
                }
                if coords.is_empty() {
                    continue;
                }
                let proj = lnb_weights::Projection::new(coords);
                acc += weights.get_weight(&proj) * prod;
            }
            sum += acc;
        }
        MeritValue::Scalar(sum / n as f64)
    }
}
