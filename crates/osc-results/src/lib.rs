//! osc-results: simulator output parsing and the results interchange file.

pub mod dynamic;
pub mod parse;
pub mod record;
pub mod run;
pub mod static_params;
pub mod store;

pub use dynamic::{DYNAMIC_FILE, TimeSeries, parse_dynamic};
pub use parse::ParseError;
pub use record::ResultRecord;
pub use run::{RunResult, read_run_dir};
pub use static_params::{CoupledStatic, DampedStatic, STATIC_FILE, Scenario, StaticParameters};
pub use store::{RESULTS_FILE, ResultsStore};

use std::path::PathBuf;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Results not found: {path} (run `generate` first)")]
    NotFound { path: PathBuf },
}
