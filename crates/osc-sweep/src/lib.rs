//! osc-sweep: parameter sweeps and simulation planning.
//!
//! Turns a study configuration into the list of simulator requests that the
//! runner executes.

pub mod harmonics;
pub mod plan;
pub mod sweeps;

pub use harmonics::{chain_harmonics, harmonic_frequency_grid};
pub use plan::{PlanError, coupled_requests, damped_requests};
pub use sweeps::{SweepDefinition, SweepType};
