use std::path::PathBuf;
use thiserror::Error;

pub type RunResult<T> = Result<T, RunError>;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Simulator exited with {}: {stderr}", exit_label(.code))]
    ProcessFailed { code: Option<i32>, stderr: String },

    #[error("Failed to prepare run directory {path}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Worker pool error: {0}")]
    Pool(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}
