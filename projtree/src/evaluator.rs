use tracing::debug;

use lnb_weights::Projection;

use crate::tree::ProjectionTree;

/// How individual node terms combine into the outer accumulator: a `p`-sum
/// (`p = 1` is a plain sum, larger `p` gives an `l^p` norm) or a max.
#[derive(Clone, Copy, Debug)]
pub enum OuterNorm {
    PSum(f64),
    Max,
}

impl OuterNorm {
    fn identity(self) -> f64 {
        match self {
            OuterNorm::PSum(_) => 0.0,
            OuterNorm::Max => f64::NEG_INFINITY,
        }
    }

    fn combine(self, acc: f64, term: f64) -> f64 {
        match self {
            OuterNorm::PSum(_) => acc + term,
            OuterNorm::Max => acc.max(term),
        }
    }

    /// `(weight * merit^p)^(1/p)` for the p-sum norm; the max norm has no
    /// exponentiation to undo, so the term is simply `weight * merit`.
    fn node_term(self, weight: f64, merit: f64) -> f64 {
        match self {
            OuterNorm::PSum(p) => (weight * merit.powf(p)).powf(1.0 / p),
            OuterNorm::Max => weight * merit,
        }
    }
}

/// Drives the weighted dialect of the figure evaluator: evaluates every
/// node at a given dimension, in the tree's cardinality-then-weight order,
/// folding each node's sub-merit `mu(projection, max_mother_merit)` into a
/// running accumulator published via `on_progress` after each step.
pub struct FigureEvaluator {
    norm: OuterNorm,
    /// When set, a node whose mother bound already makes its *lower-bound*
    /// term meet or exceed the active threshold skips the `mu` call
    /// entirely (the mother bound is assumed to be a valid lower bound on
    /// `mu`, true for every monotone-in-cardinality figure in this
    /// workspace). Off by default.
    short_circuit_on_mother_bound: bool,
}

impl FigureEvaluator {
    pub fn new(norm: OuterNorm) -> Self {
        FigureEvaluator { norm, short_circuit_on_mother_bound: false }
    }

    pub fn with_mother_bound_short_circuit(mut self, enabled: bool) -> Self {
        self.short_circuit_on_mother_bound = enabled;
        self
    }

    /// Evaluates dimension `d`: calls `tree.extend_up_to_dimension(d)`,
    /// then walks every node containing `d` in the tree's evaluation order,
    /// computing `mu(projection, max_mother_merit)`, accumulating via the
    /// outer norm, and publishing the running total through `on_progress`.
    /// If `on_progress` returns `false` the evaluation aborts and `+inf` is
    /// returned, a cooperative cancellation contract.
    /// `threshold`, when given, feeds the mother-bound short circuit above.
    pub fn evaluate_dimension<F, P>(
        &self,
        tree: &mut ProjectionTree,
        d: usize,
        mut mu: F,
        mut on_progress: P,
        threshold: Option<f64>,
    ) -> f64
    where
        F: FnMut(&Projection, f64) -> f64,
        P: FnMut(f64) -> bool,
    {
        tree.extend_up_to_dimension(d);
        let node_ids = tree.nodes_at_dimension(d).to_vec();
        let mut acc = self.norm.identity();

        for id in node_ids {
            let mother_bound = tree.max_mother_merit(id, d);
            let weight = tree.weight(id);

            let merit = if self.short_circuit_on_mother_bound
                && threshold.is_some_and(|t| self.norm.node_term(weight, mother_bound) >= t)
            {
                mother_bound
            } else {
                mu(tree.projection(id), mother_bound)
            };

            tree.set_merit_tmp(id, merit);
            let term = self.norm.node_term(weight, merit);
            acc = self.norm.combine(acc, term);

            if !on_progress(acc) {
                debug!(d, "figure evaluation aborted mid-dimension");
                return f64::INFINITY;
            }
        }
        tree.commit_dimension(d);
        acc
    }
}
