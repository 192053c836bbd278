//! Digital nets in base 2: the generating-matrix model shared by the Sobol,
//! polynomial and explicit constructions.
//!
//! One concrete representation (`GenMatrix`) with construction-specific
//! producers layered over it, rather than one type per backing algorithm.

mod construction;
mod digital_net;
mod primitive_poly;
mod sobol;

pub use construction::NetConstruction;
pub use digital_net::DigitalNet;
pub use primitive_poly::{primitive_polynomial, PrimitivePoly, MAX_TABULATED_DIMENSION};
pub use sobol::{direction_numbers_to_matrix, joe_kuo_direction_numbers, SobolParams};
