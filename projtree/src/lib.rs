//! `ProjectionTree` and the weighted `FigureEvaluator` dialect.
//!
//! The tree is a single `Vec<Node>` addressed by integer indices rather than
//! a raw mother/sibling pointer graph, the same way a constraint DAG is
//! often represented as a flat `Vec` of nodes instead of boxed trees.

mod evaluator;
mod max_cardinal;
mod tree;

pub use evaluator::{FigureEvaluator, OuterNorm};
pub use max_cardinal::compute_max_card_from_weights;
pub use tree::ProjectionTree;
