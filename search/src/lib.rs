//! The CBC search driver: [`Explorer`]s, [`MinObserver`], and the
//! two concrete drivers — [`LatticeSearchDriver`] (coordinate-uniform
//! recurrence, for rank-1 lattice rules) and [`NetSearchDriver`] (weighted
//! `FigureEvaluator` dialect, for polynomial-lattice digital nets, whose
//! t-value merit has no coordinate-uniform recurrence) — plus
//! [`build_sobol_net`] for the one construction that needs no search at all.
//!
//! A driver owns the long-lived state (here, the generating vector/net so
//! far) and calls out to small, swappable strategy objects (`Explorer` and
//! `FilterPipeline`) once per step.

mod explorer;
mod lattice_driver;
mod min_observer;
mod net_driver;
mod sobol;

pub use explorer::{Explorer, FullCBCExplorer, MixedCBCExplorer, RandomCBCExplorer};
pub use lattice_driver::LatticeSearchDriver;
pub use min_observer::MinObserver;
pub use net_driver::{weighted_merit_of, NetSearchDriver};
pub use sobol::build_sobol_net;
