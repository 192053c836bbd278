use std::cmp::Ordering;
use std::collections::HashMap;

use lnb_weights::{Projection, Weights};

/// One arena entry: a projection `u` with `max(u) == max_coord`, its
/// cardinality and weight cached at construction time, and the indices of
/// its "mother" nodes `u \ {i}` for each `i in u`. `merit_tmp` holds the
/// value computed while `max_coord` is the dimension currently being
/// evaluated; it is folded into `merit_mem` once that dimension's
/// evaluation completes.
#[derive(Clone, Debug)]
struct Node {
    projection: Projection,
    max_coord: usize,
    cardinality: usize,
    weight: f64,
    mothers: Vec<usize>,
    merit_tmp: Option<f64>,
    merit_mem: Option<f64>,
}

/// Ordered collection of projections with `d` in their index set, one arena
/// per weighted figure evaluation. Built lazily one dimension at a time via
/// [`ProjectionTree::extend_up_to_dimension`].
pub struct ProjectionTree {
    weights: Weights,
    max_cardinal: usize,
    nodes: Vec<Node>,
    by_projection: HashMap<Projection, usize>,
    /// `nodes_at[d]` lists the node indices with `max_coord == d`, already
    /// sorted `(cardinality ascending, weight descending)` — the evaluation
    /// walk order, materialised as a plain index list rather than an
    /// intrusive sibling pointer.
    nodes_at: Vec<Vec<usize>>,
    extended_to: usize,
}

impl ProjectionTree {
    pub fn new(weights: Weights, max_cardinal: usize) -> Self {
        assert!(max_cardinal >= 1, "a projection tree needs at least singleton projections");
        ProjectionTree {
            weights,
            max_cardinal,
            nodes: Vec::new(),
            by_projection: HashMap::new(),
            nodes_at: vec![Vec::new()],
            extended_to: 0,
        }
    }

    pub fn max_cardinal(&self) -> usize {
        self.max_cardinal
    }

    pub fn extended_to(&self) -> usize {
        self.extended_to
    }

    pub fn projection(&self, id: usize) -> &Projection {
        &self.nodes[id].projection
    }

    pub fn weight(&self, id: usize) -> f64 {
        self.nodes[id].weight
    }

    pub fn cardinality(&self, id: usize) -> usize {
        self.nodes[id].cardinality
    }

    pub fn max_coord(&self, id: usize) -> usize {
        self.nodes[id].max_coord
    }

    pub fn mothers(&self, id: usize) -> &[usize] {
        &self.nodes[id].mothers
    }

    pub fn merit_tmp(&self, id: usize) -> Option<f64> {
        self.nodes[id].merit_tmp
    }

    pub fn merit_mem(&self, id: usize) -> Option<f64> {
        self.nodes[id].merit_mem
    }

    pub fn set_merit_tmp(&mut self, id: usize, merit: f64) {
        self.nodes[id].merit_tmp = Some(merit);
    }

    /// Nodes with `max_coord == d`, in the order evaluation should visit
    /// them (cardinality ascending, then weight descending).
    pub fn nodes_at_dimension(&self, d: usize) -> &[usize] {
        self.nodes_at.get(d).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Folds every node's `merit_tmp` at dimension `d` into `merit_mem`,
    /// clearing `merit_tmp` — called once a dimension's evaluation has
    /// fully completed.
    pub fn commit_dimension(&mut self, d: usize) {
        for &id in self.nodes_at.get(d).cloned().unwrap_or_default().iter() {
            if let Some(v) = self.nodes[id].merit_tmp.take() {
                self.nodes[id].merit_mem = Some(v);
            }
        }
    }

    /// The max over `n`'s mothers of their merit: the mother's `merit_tmp`
    /// if it also contains `d` (i.e. its `max_coord == d`), else its
    /// `merit_mem`. `0.0` if `n` has no mothers (a singleton projection).
    pub fn max_mother_merit(&self, id: usize, d: usize) -> f64 {
        self.nodes[id]
            .mothers
            .iter()
            .map(|&m| {
                if self.nodes[m].max_coord == d {
                    self.nodes[m].merit_tmp.unwrap_or(0.0)
                } else {
                    self.nodes[m].merit_mem.unwrap_or(0.0)
                }
            })
            .fold(0.0, f64::max)
    }

    /// Grows the arena up to dimension `d`: for each existing node `u` with
    /// `max(u) < d` and `|u| < max_cardinal`, materialises `u ∪ {d}`, plus
    /// the new singleton `{d}`. Construction proceeds one coordinate at a
    /// time.
    pub fn extend_up_to_dimension(&mut self, d: usize) {
        while self.extended_to < d {
            self.extended_to += 1;
            let dim = self.extended_to;
            self.nodes_at.resize(dim + 1, Vec::new());

            // Singleton {dim}.
            self.insert_node(Projection::singleton(dim), dim, Vec::new());

            // Extend every node with max_coord < dim and room to grow.
            let candidates: Vec<usize> = self
                .nodes
                .iter()
                .enumerate()
                .filter(|(_, n)| n.max_coord < dim && n.cardinality < self.max_cardinal)
                .map(|(id, _)| id)
                .collect();
            for parent_id in candidates {
                let child_proj = self.nodes[parent_id].projection.union_coord(dim);
                if self.by_projection.contains_key(&child_proj) {
                    continue;
                }
                let mothers: Vec<usize> = child_proj
                    .iter()
                    .map(|i| {
                        let mother_proj = child_proj.remove_coord(i).expect("cardinality >= 2 for a child node");
                        *self.by_projection.get(&mother_proj).expect("mother projection must already exist")
                    })
                    .collect();
                self.insert_node(child_proj, dim, mothers);
            }
        }
    }

    fn insert_node(&mut self, projection: Projection, max_coord: usize, mothers: Vec<usize>) {
        let weight = self.weights.get_weight(&zero_based(&projection));
        let cardinality = projection.len();
        let id = self.nodes.len();
        self.nodes.push(Node {
            projection: projection.clone(),
            max_coord,
            cardinality,
            weight,
            mothers,
            merit_tmp: None,
            merit_mem: None,
        });
        self.by_projection.insert(projection, id);
        let bucket = &mut self.nodes_at[max_coord];
        let insert_at = bucket.partition_point(|&existing| {
            order_key(self.nodes[existing].cardinality, self.nodes[existing].weight) <= order_key(cardinality, weight)
        });
        bucket.insert(insert_at, id);
    }
}

/// The tree itself numbers dimensions starting at 1 (`Projection::singleton(1)`
/// is the first coordinate), but `Weights` indexes coordinates from 0, so a
/// node's weight is looked up under its projection shifted down by one in
/// every coordinate, not under the projection used for node identity.
fn zero_based(projection: &Projection) -> Projection {
    Projection::new(projection.iter().map(|c| c - 1))
}

/// `(cardinality, -weight)` as a total order key: cardinality ascending,
/// weight descending (ties broken arbitrarily, `NaN` weights sort last).
fn order_key(cardinality: usize, weight: f64) -> (usize, OrderedDesc) {
    (cardinality, OrderedDesc(weight))
}

#[derive(Clone, Copy, PartialEq)]
struct OrderedDesc(f64);

impl PartialOrd for OrderedDesc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        // Descending: a larger weight compares as "smaller" in this key so
        // it sorts first among equal-cardinality nodes.
        other.0.partial_cmp(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_builds_all_projections_up_to_max_cardinal() {
        let weights = Weights::product(0.5, vec![1.0, 1.0, 1.0]);
        let mut tree = ProjectionTree::new(weights, 2);
        tree.extend_up_to_dimension(3);
        // Singletons {1},{2},{3} and pairs {1,2},{1,3},{2,3}: 6 nodes.
        assert_eq!(tree.nodes.len(), 6);
    }

    #[test]
    fn nodes_are_ordered_by_cardinality_then_weight_descending() {
        let weights = Weights::projection_dependent(
            0.1,
            vec![(Projection::new([0, 1]), 0.9), (Projection::new([0, 2]), 0.3)],
        );
        let mut tree = ProjectionTree::new(weights, 2);
        tree.extend_up_to_dimension(2);
        let at_2 = tree.nodes_at_dimension(2).to_vec();
        // singleton {2} has cardinality 1, should come before the pair {0,2}.
        let cards: Vec<usize> = at_2.iter().map(|&id| tree.cardinality(id)).collect();
        assert!(cards.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn mothers_of_a_pair_are_its_two_singletons() {
        let weights = Weights::product(0.5, vec![1.0, 1.0]);
        let mut tree = ProjectionTree::new(weights, 2);
        tree.extend_up_to_dimension(2);
        let pair_id = *tree.by_projection.get(&Projection::new([1, 2])).unwrap();
        let mothers = tree.mothers(pair_id);
        assert_eq!(mothers.len(), 2);
        let mother_projs: Vec<&Projection> = mothers.iter().map(|&m| tree.projection(m)).collect();
        assert!(mother_projs.contains(&&Projection::singleton(1)));
        assert!(mother_projs.contains(&&Projection::singleton(2)));
    }

    #[test]
    fn singleton_weight_matches_its_zero_based_coordinate() {
        // Tree dimensions are 1-based ({1},{2},{3}) but `Weights` indexes
        // `gamma` from 0; a node's weight must come from `gamma[dim - 1]`,
        // not `gamma[dim]` (which would shift every lookup and run the top
        // coordinate off the end of `gamma` into the default).
        let weights = Weights::product(0.0, vec![10.0, 20.0, 30.0]);
        let mut tree = ProjectionTree::new(weights, 1);
        tree.extend_up_to_dimension(3);
        let weight_at = |dim: usize| {
            let id = *tree.by_projection.get(&Projection::singleton(dim)).unwrap();
            tree.weight(id)
        };
        assert_eq!(weight_at(1), 10.0);
        assert_eq!(weight_at(2), 20.0);
        assert_eq!(weight_at(3), 30.0);
    }

    #[test]
    fn commit_dimension_moves_tmp_into_mem() {
        let weights = Weights::product(0.5, vec![1.0]);
        let mut tree = ProjectionTree::new(weights, 1);
        tree.extend_up_to_dimension(1);
        let id = tree.nodes_at_dimension(1)[0];
        tree.set_merit_tmp(id, 0.42);
        tree.commit_dimension(1);
        assert_eq!(tree.merit_mem(id), Some(0.42));
        assert_eq!(tree.merit_tmp(id), None);
    }
}
