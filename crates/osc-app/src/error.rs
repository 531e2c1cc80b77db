//! Error types for the osc-app service layer.

use std::path::PathBuf;

/// Application error wrapping the backend crates' errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Planning error: {0}")]
    Plan(String),

    #[error("Runner error: {0}")]
    Runner(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("No results at {path}; run `generate` first")]
    MissingResults { path: PathBuf },

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Plot error: {0}")]
    Plot(String),

    #[error("No record in {path} carries positions to animate")]
    NothingToAnimate { path: PathBuf },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<osc_project::ProjectError> for AppError {
    fn from(err: osc_project::ProjectError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<osc_sweep::PlanError> for AppError {
    fn from(err: osc_sweep::PlanError) -> Self {
        AppError::Plan(err.to_string())
    }
}

impl From<osc_runner::RunError> for AppError {
    fn from(err: osc_runner::RunError) -> Self {
        AppError::Runner(err.to_string())
    }
}

impl From<osc_results::ResultsError> for AppError {
    fn from(err: osc_results::ResultsError) -> Self {
        match err {
            osc_results::ResultsError::NotFound { path } => AppError::MissingResults { path },
            other => AppError::Results(other.to_string()),
        }
    }
}

impl From<osc_analysis::AnalysisError> for AppError {
    fn from(err: osc_analysis::AnalysisError) -> Self {
        AppError::Analysis(err.to_string())
    }
}

impl From<osc_plot::PlotError> for AppError {
    fn from(err: osc_plot::PlotError) -> Self {
        AppError::Plot(err.to_string())
    }
}
