//! osc-analysis: reductions over parsed simulator output.
//!
//! Everything here is a pure function of its inputs. The reports at the end
//! of the pipeline bundle what the plotting layer needs for one study.

pub mod amplitude;
pub mod damped;
pub mod peaks;
pub mod regression;
pub mod report;
pub mod resonance;

pub use amplitude::{amplitudes, displacement_trace, max_amplitude};
pub use damped::{analytic_position, analytic_positions, mean_squared_error, squared_errors};
pub use peaks::find_peaks;
pub use regression::{RegressionFit, fit_sqrt_law};
pub use report::{
    CoupledReport, DampedReport, DampedRun, ResonanceCurve, analyze_coupled, analyze_damped,
};
pub use resonance::resonance_frequency;

use osc_core::OscError;

pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error(transparent)]
    Numeric(#[from] OscError),

    #[error("No data: {0}")]
    Empty(&'static str),
}
