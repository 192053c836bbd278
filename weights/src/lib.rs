//! Projections and the `Weights` family.
//!
//! A small, purely-data type (here a projection) lives in its own module,
//! and the higher-level abstraction (`Weights`) is built as a tagged sum
//! over it, separating a concrete representation from the operations
//! layered over it.

mod projection;
mod weights;

pub use projection::Projection;
pub use weights::Weights;
