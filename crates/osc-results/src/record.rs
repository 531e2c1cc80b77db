//! Per-run record of the interchange file.

use crate::run::RunResult;
use crate::static_params::StaticParameters;
use serde::{Deserialize, Serialize};

/// What `generate` keeps of a run for the `plot` and `animate` phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub parameters: StaticParameters,
    pub time: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amplitudes: Option<Vec<f64>>,
    /// Full trace, `positions[sample][particle]`. Only kept where needed
    /// since it dominates the file size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<Vec<f64>>>,
    pub k: f64,
    /// Driving frequency, zero for undriven runs.
    pub w: f64,
}

impl ResultRecord {
    pub fn from_run(run: RunResult, amplitudes: Option<Vec<f64>>, keep_positions: bool) -> Self {
        let parameters = run.parameters;
        Self {
            k: parameters.stiffness(),
            w: parameters.driving_frequency(),
            parameters,
            time: run.series.time,
            amplitudes,
            positions: keep_positions.then_some(run.series.positions),
        }
    }

    pub fn has_positions(&self) -> bool {
        self.positions.as_ref().is_some_and(|p| !p.is_empty())
    }
}
