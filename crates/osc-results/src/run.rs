use crate::dynamic::{DYNAMIC_FILE, TimeSeries, parse_dynamic};
use crate::parse::ParseError;
use crate::static_params::{STATIC_FILE, Scenario, StaticParameters};
use osc_project::DynamicLayout;
use std::fs;
use std::path::{Path, PathBuf};

/// Parsed output of one simulator run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub source_dir: PathBuf,
    pub parameters: StaticParameters,
    pub series: TimeSeries,
}

/// Read `static.txt` and `dynamic.txt` from a run directory.
pub fn read_run_dir(
    dir: &Path,
    scenario: Scenario,
    layout: DynamicLayout,
) -> Result<RunResult, ParseError> {
    let static_text = read(&dir.join(STATIC_FILE))?;
    let parameters = StaticParameters::parse(&static_text, scenario)?;

    let dynamic_text = read(&dir.join(DYNAMIC_FILE))?;
    let series = parse_dynamic(&dynamic_text, layout, parameters.particle_count())?;

    Ok(RunResult {
        source_dir: dir.to_path_buf(),
        parameters,
        series,
    })
}

fn read(path: &Path) -> Result<String, ParseError> {
    fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })
}
