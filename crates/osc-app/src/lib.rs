//! Shared application service layer for the oscillator studies.
//!
//! Frontends call into this crate for the three phases: `generate` runs the
//! simulator batch and writes the interchange file, `plot` and `animate`
//! read it back and render artifacts through a `PlotSink`.

pub mod animate_service;
pub mod error;
pub mod generate_service;
pub mod plot_service;
pub mod progress;
pub mod project_service;

pub use animate_service::{animate, animate_records};
pub use error::{AppError, AppResult};
pub use generate_service::{
    GenerateRequest, GenerateResponse, GenerateTiming, ProgressCallback, build_records,
    collect_runs, generate, generate_with_launcher, plan_requests,
};
pub use plot_service::{PlotSummary, plot, plot_damped, plot_results};
pub use progress::{BatchProgressEvent, BatchStage};
pub use project_service::load_study;
