//! Kernel-value storage and the `Kernel` trait.
//!
//! A storage layer holding values under a fixed layout (`Storage`, carrying
//! compression x embedding) kept separate from the trait that fills it
//! (`Kernel`).

mod kernel;
mod storage;

pub use kernel::{IAlpha, IbKernel, Kernel, PAlpha, PAlphaPlr, RKernel, RPlr, ICAlpha};
pub use storage::{Compression, Embedding, SizeKind, Storage, StridedView};
