//! Interchange file storage.

use crate::record::ResultRecord;
use crate::{ResultsError, ResultsResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const RESULTS_FILE: &str = "results.json";

/// `results.json` inside an output directory.
#[derive(Debug, Clone)]
pub struct ResultsStore {
    root_dir: PathBuf,
}

impl ResultsStore {
    pub fn new(root_dir: PathBuf) -> Self {
        Self { root_dir }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn path(&self) -> PathBuf {
        self.root_dir.join(RESULTS_FILE)
    }

    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    pub fn save(&self, records: &[ResultRecord]) -> ResultsResult<()> {
        fs::create_dir_all(&self.root_dir)?;
        let path = self.path();
        info!(records = records.len(), path = %path.display(), "Saving results");
        let content = serde_json::to_string(records)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn load(&self) -> ResultsResult<Vec<ResultRecord>> {
        let path = self.path();
        if !path.exists() {
            return Err(ResultsError::NotFound { path });
        }

        let content = fs::read_to_string(&path)?;
        let records: Vec<ResultRecord> = serde_json::from_str(&content)?;
        info!(records = records.len(), path = %path.display(), "Loaded results");
        Ok(records)
    }
}
