//! Shared low-level helpers: bit twiddling, Gray-code enumeration, GF(2)
//! polynomial arithmetic, the workspace-wide error type, and `MeritValue`.
//!
//! A small grab-bag crate referenced by every higher crate for bit-twiddling
//! and error plumbing, the way a workspace keeps one low-level utility crate
//! rather than duplicating `log2`/`reverse_bits` helpers per caller.

mod bits;
mod error;
mod gf2poly;
pub mod gray;
mod lfsr;
mod merit;

pub use bits::{ceil_log2, is_power_of_two, log2_strict, reverse_bits};
pub use error::{LnbError, LnbResult};
pub use gf2poly::Gf2Poly;
pub use lfsr::Lfsr;
pub use merit::MeritValue;
