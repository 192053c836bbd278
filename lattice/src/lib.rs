//! `SizeParam` and rank-1 lattice-rule arithmetic.

mod lattice_rule;
mod size_param;

pub use lattice_rule::LatticeRule;
pub use size_param::{polynomial_size_from_int, EmbeddingSpec, SizeParam};
