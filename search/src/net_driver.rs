use tracing::info;

use lnb_lattice::SizeParam;
use lnb_matrix::GenMatrix;
use lnb_net::{DigitalNet, NetConstruction};
use lnb_projtree::{compute_max_card_from_weights, FigureEvaluator, OuterNorm, ProjectionTree};
use lnb_tvalue::gauss;
use lnb_util::{Gf2Poly, MeritValue};
use lnb_weights::{Projection, Weights};

use crate::explorer::Explorer;

/// The polynomial-lattice-as-digital-net CBC search driver: unlike
/// [`crate::lattice_driver::LatticeSearchDriver`], a t-value figure of merit
/// is not coordinate-uniform (the t-value of a projection is a combinatorial
/// property of the stacked generating matrices, with no per-coordinate
/// additive recurrence), so dimension `d`'s candidates are scored through
/// the weighted [`FigureEvaluator`] dialect instead, with `mu(projection, _)
/// = gauss(matrices restricted to projection)` as the per-node merit
/// function.
pub struct NetSearchDriver {
    modulus: Gf2Poly,
    m_rows: usize,
    tree: ProjectionTree,
    evaluator: FigureEvaluator,
    net: DigitalNet,
}

impl NetSearchDriver {
    /// `m_rows` is also this net's column count: a polynomial lattice's
    /// generating matrices are square (`m` output digits from `m` input
    /// bits), unlike a Sobol net's matrices which may need more input bits
    /// than output digits.
    pub fn new(weights: Weights, modulus: Gf2Poly, m_rows: usize, max_dimension: usize) -> Self {
        let max_cardinal = compute_max_card_from_weights(&weights, max_dimension);
        let tree = ProjectionTree::new(weights, max_cardinal);
        let evaluator = FigureEvaluator::new(OuterNorm::PSum(1.0));
        let net = DigitalNet::empty(NetConstruction::Polynomial, m_rows, m_rows);
        NetSearchDriver { modulus, m_rows, tree, evaluator, net }
    }

    pub fn dimension(&self) -> usize {
        self.net.dimension()
    }

    pub fn net(&self) -> &DigitalNet {
        &self.net
    }

    fn candidate_matrix(&self, gen: u64) -> GenMatrix {
        NetConstruction::polynomial_matrix(Gf2Poly::from_int(gen), self.modulus, self.m_rows, self.m_rows)
    }

    /// Searches and accepts dimension `self.dimension() + 1`'s generator
    /// polynomial: re-runs the weighted evaluator once per admissible
    /// candidate (widening every matrix so far by one column), keeping the
    /// lowest accumulated merit, then commits the winner's matrix and tree
    /// state.
    pub fn search_next_dimension(&mut self, explorer: &mut dyn Explorer) -> Option<(u64, f64)> {
        let d = self.net.dimension() + 1;
        let size = SizeParam::polynomial(self.modulus, None).expect("modulus validated at construction");
        let admissible = size.admissible_generators();
        let candidates = explorer.candidates(d, &admissible);
        let m_rows = self.m_rows;

        let mut best: Option<(u64, f64, GenMatrix)> = None;
        for gen in candidates {
            let matrix = self.candidate_matrix(gen);
            let trial_net = self.net.with_matrix_appended(matrix.clone());
            let mu = |proj: &Projection, mother_bound: f64| -> f64 {
                let mats: Vec<GenMatrix> = proj.iter().map(|j| trial_net.matrix(j - 1).clone()).collect();
                let bound = if mother_bound.is_finite() { Some(mother_bound.round() as usize) } else { None };
                gauss(&mats, m_rows, bound) as f64
            };
            let acc = self.evaluator.evaluate_dimension(&mut self.tree, d, mu, |_| true, None);
            if best.as_ref().is_none_or(|(_, best_acc, _)| acc < *best_acc) {
                best = Some((gen, acc, matrix));
            }
        }

        let (gen, acc, matrix) = best?;
        // Re-run with the winning candidate so `merit_tmp`/`merit_mem`
        // reflect the accepted net, not whichever candidate evaluated last.
        let winning_net = self.net.with_matrix_appended(matrix.clone());
        let mu = |proj: &Projection, mother_bound: f64| -> f64 {
            let mats: Vec<GenMatrix> = proj.iter().map(|j| winning_net.matrix(j - 1).clone()).collect();
            let bound = if mother_bound.is_finite() { Some(mother_bound.round() as usize) } else { None };
            gauss(&mats, m_rows, bound) as f64
        };
        self.evaluator.evaluate_dimension(&mut self.tree, d, mu, |_| true, None);
        self.net = winning_net;
        info!(dimension = d, gen, merit = acc, "digital net CBC dimension complete");
        Some((gen, acc))
    }

    pub fn run(&mut self, dimension: usize, explorer: &mut dyn Explorer) -> DigitalNet {
        while self.dimension() < dimension {
            if self.search_next_dimension(explorer).is_none() {
                break;
            }
        }
        self.net.clone()
    }
}

/// Builds a [`MeritValue`] from this driver's own weighted accumulation for
/// external reporting (e.g. a CLI summary line), without involving the
/// `lnb-filters` pipeline — that pipeline belongs to the per-candidate
/// search loop, not a finished net's reported merit.
pub fn weighted_merit_of(weights: &Weights, matrices: &[GenMatrix], m_rows: usize) -> MeritValue {
    let mut acc = 0.0;
    for (j, mat) in matrices.iter().enumerate() {
        let proj = Projection::singleton(j);
        acc += weights.get_weight(&proj) * gauss(std::slice::from_ref(mat), m_rows, None) as f64;
    }
    MeritValue::Scalar(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::FullCBCExplorer;

    #[test]
    fn search_accepts_one_matrix_per_dimension() {
        let modulus = Gf2Poly::from_int(0b1011); // z^3 + z + 1, irreducible
        let weights = Weights::product(0.0, vec![1.0, 1.0]);
        let mut driver = NetSearchDriver::new(weights, modulus, 3, 2);
        let mut explorer = FullCBCExplorer;
        let net = driver.run(2, &mut explorer);
        assert_eq!(net.dimension(), 2);
        assert_eq!(net.m_rows(), 3);
    }

    #[test]
    fn accepted_generators_are_admissible_for_the_modulus() {
        let modulus = Gf2Poly::from_int(0b1011);
        let weights = Weights::product(0.0, vec![1.0]);
        let mut driver = NetSearchDriver::new(weights, modulus, 3, 1);
        let mut explorer = FullCBCExplorer;
        let (gen, _) = driver.search_next_dimension(&mut explorer).unwrap();
        let size = SizeParam::polynomial(modulus, None).unwrap();
        assert!(size.is_admissible_generator(gen));
    }

    #[test]
    fn weighted_merit_of_reads_every_coordinates_own_weight() {
        // A sentinel default far from either real weight: if the second
        // matrix's weight were looked up off-by-one (reading past `gamma`)
        // it would silently fall back to 999.0 instead of 5.0.
        let weights = Weights::product(999.0, vec![2.0, 5.0]);
        let mut a = GenMatrix::zeros(3, 3);
        a.set(0, 0, true);
        let mut b = GenMatrix::zeros(3, 3);
        b.set(1, 1, true);
        let matrices = vec![a.clone(), b.clone()];
        let merit = weighted_merit_of(&weights, &matrices, 3);
        let expected = 2.0 * gauss(std::slice::from_ref(&a), 3, None) as f64
            + 5.0 * gauss(std::slice::from_ref(&b), 3, None) as f64;
        assert_eq!(merit, MeritValue::Scalar(expected));
    }
}
