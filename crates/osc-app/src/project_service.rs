//! Study configuration loading.

use osc_project::StudyConfig;
use std::path::Path;
use tracing::info;

use crate::error::AppResult;

/// Load a study from YAML/JSON, or the built-in defaults when no path is given.
pub fn load_study(path: Option<&Path>) -> AppResult<StudyConfig> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading study configuration");
            Ok(osc_project::load_config(path)?)
        }
        None => {
            let config = StudyConfig::default();
            osc_project::validate_config(&config).map_err(osc_project::ProjectError::from)?;
            Ok(config)
        }
    }
}
