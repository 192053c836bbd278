//! Coordinate-uniform state recurrences, `InnerProduct` and the
//! `CoordUniformCBC` driver.
//!
//! An incrementally-maintained state separated from the single final fold
//! that reads it out: `CoordUniformState` plays the incremental-builder
//! role, `InnerProduct` the fold.

mod inner_product;
mod state;
mod state_creator;

pub use inner_product::{CoordUniformCbc, InnerProduct};
pub use state::CoordUniformState;
pub use state_creator::StateCreator;
