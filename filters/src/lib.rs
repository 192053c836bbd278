//! The filter pipeline: an ordered list of unary,
//! possibly-rejecting transforms applied to a raw `MeritValue` before it
//! reaches the `MinObserver`. Standard filters: [`Normaliser`] (Brent-fit
//! theoretical-bound division), [`LowPass`] (running-minimum pruning) and
//! [`LevelCombiner`] (multilevel collapse).
//!
//! A small trait with one entry point threaded through a
//! `Vec<Box<dyn Trait>>` pipeline: `Filter` implementations composed by
//! [`FilterPipeline`].

mod brent;
mod level_combiner;
mod low_pass;
mod normaliser;
mod pipeline;

pub use brent::brent_minimize;
pub use level_combiner::{LevelCombineRule, LevelCombiner};
pub use low_pass::LowPass;
pub use normaliser::{Normaliser, NormaliserKind};
pub use pipeline::{Filter, FilterPipeline};
