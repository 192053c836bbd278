use std::collections::HashMap;

use lnb_weights::{Projection, Weights};

/// Per-weight-family incremental state. `update` incorporates one more
/// coordinate's (already strided, already GF(2)/integer-generator-applied)
/// kernel values; `weighted_state` returns the vector `q_s` consumed by
/// `InnerProduct` to score candidates for the *next* coordinate.
///
/// All state vectors are kept over the raw `0..n` point index rather than
/// `Storage`'s (possibly symmetric-compressed) slot index: compression is
/// applied once, at the final `Storage::compressed_sum` fold, not duplicated
/// into every intermediate recurrence.
#[derive(Clone, Debug)]
pub enum CoordUniformState {
    Product {
        weights: Weights,
        n: usize,
        p: Vec<f64>,
        dim: usize,
    },
    OrderDependent {
        weights: Weights,
        n: usize,
        /// `p[l]` is the degree-`l` elementary symmetric polynomial in the
        /// incorporated kernel values, one entry per point.
        p: Vec<Vec<f64>>,
        dim: usize,
    },
    Pod {
        weights: Weights,
        n: usize,
        p: Vec<Vec<f64>>,
        dim: usize,
    },
    ProjectionDependent {
        weights: Weights,
        n: usize,
        /// Known partial products, keyed by the subset of already-incorporated
        /// coordinates they cover; only subsets of some explicitly-weighted
        /// projection are tracked, created lazily on first use.
        map: HashMap<Projection, Vec<f64>>,
        dim: usize,
    },
    InterlacedPod {
        weights: Weights,
        n: usize,
        interlacing_factor: usize,
        /// Kernel values collected for the in-progress interlaced block.
        buffer: Vec<Vec<f64>>,
        /// The underlying POD-style recurrence over completed blocks.
        pod: Box<CoordUniformState>,
    },
    Combined(Vec<CoordUniformState>),
}

impl CoordUniformState {
    /// Builds the state for the given weight family over a storage of `n`
    /// raw points, for the non-combined and non-projection-dependent
    /// constructors; `StateCreator` handles `Combined` and recursion.
    pub fn new(weights: Weights, n: usize) -> Self {
        match &weights {
            Weights::Product { .. } => CoordUniformState::Product { weights, n, p: vec![1.0; n], dim: 0 },
            Weights::OrderDependent { .. } => {
                CoordUniformState::OrderDependent { weights, n, p: vec![vec![1.0; n]], dim: 0 }
            }
            Weights::Pod { .. } => CoordUniformState::Pod { weights, n, p: vec![vec![1.0; n]], dim: 0 },
            Weights::ProjectionDependent { .. } => {
                CoordUniformState::ProjectionDependent { weights, n, map: HashMap::new(), dim: 0 }
            }
            Weights::InterlacedPod { pod, interlacing_factor } => CoordUniformState::InterlacedPod {
                weights: weights.clone(),
                n,
                interlacing_factor: *interlacing_factor,
                buffer: Vec::new(),
                pod: Box::new(CoordUniformState::new((**pod).clone(), n)),
            },
            Weights::Combined(parts) => {
                CoordUniformState::Combined(parts.iter().cloned().map(|w| CoordUniformState::new(w, n)).collect())
            }
        }
    }

    pub fn reset(&mut self) {
        *self = CoordUniformState::new(self.weights_clone(), self.n());
    }

    fn weights_clone(&self) -> Weights {
        match self {
            CoordUniformState::Product { weights, .. }
            | CoordUniformState::OrderDependent { weights, .. }
            | CoordUniformState::Pod { weights, .. }
            | CoordUniformState::ProjectionDependent { weights, .. }
            | CoordUniformState::InterlacedPod { weights, .. } => weights.clone(),
            CoordUniformState::Combined(parts) => Weights::Combined(parts.iter().map(|p| p.weights_clone()).collect()),
        }
    }

    pub fn n(&self) -> usize {
        match self {
            CoordUniformState::Product { n, .. }
            | CoordUniformState::OrderDependent { n, .. }
            | CoordUniformState::Pod { n, .. }
            | CoordUniformState::ProjectionDependent { n, .. }
            | CoordUniformState::InterlacedPod { n, .. } => *n,
            CoordUniformState::Combined(parts) => parts.first().map_or(0, |p| p.n()),
        }
    }

    pub fn dimension(&self) -> usize {
        match self {
            CoordUniformState::Product { dim, .. } | CoordUniformState::OrderDependent { dim, .. } => *dim,
            CoordUniformState::Pod { dim, .. } | CoordUniformState::ProjectionDependent { dim, .. } => *dim,
            CoordUniformState::InterlacedPod { pod, buffer, interlacing_factor, .. } => {
                pod.dimension() * interlacing_factor + buffer.len()
            }
            CoordUniformState::Combined(parts) => parts.first().map_or(0, |p| p.dimension()),
        }
    }

    /// Incorporates the kernel values of the coordinate just fixed by the
    /// CBC driver (the strided, per-point `omega` vector for the accepted
    /// generator at this coordinate), advancing `dimension()` by one.
    pub fn update(&mut self, omega: &[f64]) {
        match self {
            CoordUniformState::Product { weights, p, dim, .. } => {
                let gamma_s = weights.gamma_j(*dim);
                for (pi, &o) in p.iter_mut().zip(omega) {
                    *pi *= 1.0 + gamma_s * o;
                }
                *dim += 1;
            }
            CoordUniformState::OrderDependent { p, dim, .. } => {
                extend_elementary_symmetric(p, omega);
                *dim += 1;
            }
            CoordUniformState::Pod { weights, p, dim, .. } => {
                let gamma_s = weights.gamma_j(*dim);
                let scaled: Vec<f64> = omega.iter().map(|&o| gamma_s * o).collect();
                extend_elementary_symmetric(p, &scaled);
                *dim += 1;
            }
            CoordUniformState::ProjectionDependent { weights, map, dim, n } => {
                update_projection_dependent(weights, map, *dim, *n, omega);
                *dim += 1;
            }
            CoordUniformState::InterlacedPod { interlacing_factor, buffer, pod, .. } => {
                buffer.push(omega.to_vec());
                if buffer.len() == *interlacing_factor {
                    let combined = combine_interlaced_block(buffer);
                    pod.update(&combined);
                    buffer.clear();
                }
            }
            CoordUniformState::Combined(parts) => {
                for part in parts {
                    part.update(omega);
                }
            }
        }
    }

    /// `q_s`: the vector `InnerProduct` multiplies against a candidate's
    /// strided kernel values to score the *next* coordinate.
    pub fn weighted_state(&self) -> Vec<f64> {
        match self {
            CoordUniformState::Product { weights, p, dim, .. } => {
                let gamma_next = weights.gamma_j(*dim);
                p.iter().map(|&v| gamma_next * v).collect()
            }
            CoordUniformState::OrderDependent { weights, p, n, .. } => weighted_sum_by_cardinal(weights, p, *n),
            CoordUniformState::Pod { weights, p, n, .. } => weighted_sum_by_cardinal(weights, p, *n),
            CoordUniformState::ProjectionDependent { weights, map, dim, n } => {
                weighted_projection_dependent(weights, map, *dim, *n)
            }
            CoordUniformState::InterlacedPod { pod, .. } => pod.weighted_state(),
            CoordUniformState::Combined(parts) => {
                let n = self.n();
                let mut acc = vec![0.0; n];
                for part in parts {
                    let q = part.weighted_state();
                    for (a, v) in acc.iter_mut().zip(q) {
                        *a += v;
                    }
                }
                acc
            }
        }
    }
}

/// `p[l] = p[l] + omega * p[l-1]` for `l` from the current top cardinal down
/// to 1, then appends a new top entry `omega * p[last]` — the order-dependent
/// and POD recurrence over the `p_{s,ℓ}` family.
fn extend_elementary_symmetric(p: &mut Vec<Vec<f64>>, omega: &[f64]) {
    // `p[l]` already holds `p_old[l]` for `l < old_len` (untouched below) and
    // a fresh zero vector for the newly pushed top entry `l == old_len`;
    // processing `l` from high to low lets each step read `p[l-1]`'s old
    // value before that slot is itself overwritten.
    let n = omega.len();
    let old_len = p.len();
    p.push(vec![0.0; n]);
    for l in (1..=old_len).rev() {
        let (lower, upper) = p.split_at_mut(l);
        let src = &lower[l - 1];
        let dst = &mut upper[0];
        for i in 0..n {
            dst[i] += omega[i] * src[i];
        }
    }
}

fn weighted_sum_by_cardinal(weights: &Weights, p: &[Vec<f64>], n: usize) -> Vec<f64> {
    let mut acc = vec![0.0; n];
    for (l, p_l) in p.iter().enumerate() {
        let cap_gamma = weights.capital_gamma_card(l + 1);
        if cap_gamma == 0.0 {
            continue;
        }
        for (a, &v) in acc.iter_mut().zip(p_l) {
            *a += cap_gamma * v;
        }
    }
    acc
}

fn update_projection_dependent(
    weights: &Weights,
    map: &mut HashMap<Projection, Vec<f64>>,
    dim: usize,
    n: usize,
    omega: &[f64],
) {
    // `dim` is 0-based count of coordinates already incorporated; the
    // coordinate just supplied is internal index `dim`.
    let coord = dim;
    let targets = all_relevant_projections(weights);
    let mut additions = Vec::new();
    // The empty projection is represented implicitly (vector of all ones);
    // duplicating it into `{coord}` covers every singleton target.
    if targets.iter().any(|t| t.contains(coord)) {
        additions.push((Projection::singleton(coord), omega.to_vec()));
    }
    for (proj, vec) in map.iter() {
        if proj.contains(coord) || proj.max() >= coord {
            continue;
        }
        let candidate = proj.union_coord(coord);
        if targets.iter().any(|t| is_subset(&candidate, t)) {
            let new_vec: Vec<f64> = vec.iter().zip(omega).map(|(&a, &b)| a * b).collect();
            additions.push((candidate, new_vec));
        }
    }
    for (proj, vec) in additions {
        map.insert(proj, vec);
    }
    let _ = n;
}

fn weighted_projection_dependent(weights: &Weights, map: &HashMap<Projection, Vec<f64>>, dim: usize, n: usize) -> Vec<f64> {
    let next_coord = dim;
    let mut acc = vec![0.0; n];
    // The virtual empty projection contributes gamma({next_coord}) * 1.
    let singleton = Projection::singleton(next_coord);
    let gamma_singleton = weights.get_weight(&singleton);
    if gamma_singleton != 0.0 {
        for a in acc.iter_mut() {
            *a += gamma_singleton;
        }
    }
    for (proj, vec) in map {
        if proj.contains(next_coord) {
            continue;
        }
        let candidate = proj.union_coord(next_coord);
        let gamma = weights.get_weight(&candidate);
        if gamma == 0.0 {
            continue;
        }
        for (a, &v) in acc.iter_mut().zip(vec) {
            *a += gamma * v;
        }
    }
    acc
}

fn all_relevant_projections(weights: &Weights) -> Vec<Projection> {
    match weights {
        Weights::ProjectionDependent { by_projection, .. } => by_projection.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

fn is_subset(small: &Projection, big: &Projection) -> bool {
    small.iter().all(|c| big.contains(c))
}

/// Combines one full interlaced block's kernel-value vectors into a single
/// "effective omega" vector via the sum of elementary symmetric polynomials
/// `e_1 + .. + e_f` of the block.
fn combine_interlaced_block(block: &[Vec<f64>]) -> Vec<f64> {
    let n = block[0].len();
    let f = block.len();
    let mut e = vec![vec![0.0; n]; f + 1];
    e[0] = vec![1.0; n];
    for omega in block {
        for k in (1..=f).rev() {
            for i in 0..n {
                e[k][i] += omega[i] * e[k - 1][i];
            }
        }
    }
    let mut combined = vec![0.0; n];
    for level in e.iter().skip(1) {
        for i in 0..n {
            combined[i] += level[i];
        }
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_state_consistency(weights: Weights, n: usize, omegas: &[Vec<f64>]) {
        let mut state = CoordUniformState::new(weights.clone(), n);
        for omega in omegas {
            state.update(omega);
        }
        let q = state.weighted_state();
        let s = omegas.len();
        // naive: for every subset u of {0..s-1}, add weight(u union {s}) * prod omega_i[point]
        for point in 0..n {
            let mut naive = 0.0;
            for mask in 0u32..(1u32 << s) {
                let mut coords = Vec::new();
                let mut prod = 1.0;
                for i in 0..s {
                    if mask & (1 << i) != 0 {
                        coords.push(i);
                        prod *= omegas[i][point];
                    }
                }
                coords.push(s);
                let proj = Projection::new(coords);
                naive += weights.get_weight(&proj) * prod;
            }
            assert!((q[point] - naive).abs() < 1e-8, "mismatch at point {point}: {} vs {}", q[point], naive);
        }
    }

    #[test]
    fn product_state_matches_naive_formula() {
        let weights = Weights::product(0.3, vec![0.5, 0.7, 0.9, 0.4]);
        let omegas = vec![vec![0.1, 0.2, 0.3], vec![0.4, 0.1, 0.9], vec![0.2, 0.5, 0.6]];
        naive_state_consistency(weights, 3, &omegas);
    }

    #[test]
    fn order_dependent_state_matches_naive_formula() {
        let weights = Weights::order_dependent(0.0, vec![1.0, 0.5, 0.2, 0.05]);
        let omegas = vec![vec![0.1, 0.9], vec![0.3, 0.2], vec![0.7, 0.4]];
        naive_state_consistency(weights, 2, &omegas);
    }

    #[test]
    fn pod_state_matches_naive_formula() {
        let weights = Weights::pod(0.0, vec![1.0, 0.4, 0.1], 0.0, vec![0.6, 0.8, 0.3]);
        let omegas = vec![vec![0.2, 0.6], vec![0.5, 0.1]];
        naive_state_consistency(weights, 2, &omegas);
    }

    #[test]
    fn projection_dependent_state_matches_naive_formula() {
        let entries = vec![
            (Projection::new([0, 2]), 0.7),
            (Projection::new([1]), 0.3),
            (Projection::new([2]), 0.9),
        ];
        let weights = Weights::projection_dependent(0.0, entries);
        let omegas = vec![vec![0.2, 0.5], vec![0.4, 0.3]];
        naive_state_consistency(weights, 2, &omegas);
    }

    #[test]
    fn combined_state_sums_parts() {
        let a = Weights::product(0.0, vec![0.5, 0.5]);
        let b = Weights::order_dependent(0.0, vec![1.0, 0.2]);
        let weights = Weights::combined(vec![a, b]);
        let omegas = vec![vec![0.3, 0.7]];
        naive_state_consistency(weights, 2, &omegas);
    }

    #[test]
    fn interlaced_pod_dimension_advances_per_block() {
        let pod = Weights::pod(0.0, vec![1.0], 0.0, vec![0.5]);
        let weights = Weights::interlaced_pod(pod, 3);
        let mut state = CoordUniformState::new(weights, 4);
        for _ in 0..2 {
            state.update(&[0.1, 0.2, 0.3, 0.4]);
        }
        assert_eq!(state.dimension(), 2);
        state.update(&[0.5, 0.5, 0.5, 0.5]);
        assert_eq!(state.dimension(), 3);
        let q = state.weighted_state();
        assert_eq!(q.len(), 4);
    }
}
