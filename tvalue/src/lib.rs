//! t-value algorithms for digital nets: progressive Gauss (via
//! `lnb_matrix::ProgressiveRowReducer`), Schmid XOR enumeration, and their
//! `PirsicSchmid` per-level refinement, plus the `uniformity` wrappers
//! (`resolution_gap`, `a_property`).
//!
//! Offers more than one algorithm for the same mathematical quantity so
//! that one can cross-check the other in tests, exercised by the
//! `gauss`/`schmid` agreement tests.

mod engine;
pub mod uniformity;

pub use engine::{compositions_for, gauss, gauss_per_level, pirsic_schmid_per_level, schmid};
