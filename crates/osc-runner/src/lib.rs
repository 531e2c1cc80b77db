//! osc-runner: launches the external simulator for batches of parameter sets.
//!
//! One `SimulationRequest` maps to one subprocess writing into its own
//! directory, so workers never share state. The pool's join is the only
//! synchronization point; a failed run is reported, never fatal.

pub mod error;
pub mod launcher;
pub mod pool;
pub mod request;

pub use error::{RunError, RunResult};
pub use launcher::{Launcher, ProcessLauncher};
pub use pool::{
    BatchOptions, BatchReport, BatchTick, RunOutcome, RunStatus, WorkerPool, remove_run_root,
};
pub use request::{CoupledParams, DampedParams, ScenarioParams, SimulationRequest};
