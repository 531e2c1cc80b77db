//! Brute-force fit of `w0 = C * sqrt(k)`.

use crate::{AnalysisError, AnalysisResult};
use osc_core::{OscError, ensure_finite, linspace};
use osc_project::RegressionDef;

#[derive(Debug, Clone, PartialEq)]
pub struct RegressionFit {
    pub best_constant: f64,
    /// Candidate constants, in grid order.
    pub constants: Vec<f64>,
    /// Total squared error for each candidate.
    pub errors: Vec<f64>,
}

impl RegressionFit {
    pub fn predict(&self, k: f64) -> f64 {
        self.best_constant * k.sqrt()
    }

    pub fn best_error(&self) -> Option<f64> {
        self.constants
            .iter()
            .position(|c| *c == self.best_constant)
            .map(|i| self.errors[i])
    }
}

/// Scan the candidate grid and keep the constant with the smallest total
/// squared error over `(k, w0)` pairs. Ties go to the first candidate.
pub fn fit_sqrt_law(pairs: &[(f64, f64)], grid: &RegressionDef) -> AnalysisResult<RegressionFit> {
    if pairs.is_empty() {
        return Err(AnalysisError::Empty("resonance pairs"));
    }
    if grid.points == 0 {
        return Err(OscError::InvalidArg {
            what: "regression grid needs at least one point",
        }
        .into());
    }
    ensure_finite(grid.c_min, "regression c_min")?;
    ensure_finite(grid.c_max, "regression c_max")?;

    let constants = linspace(grid.c_min, grid.c_max, grid.points);
    let errors: Vec<f64> = constants
        .iter()
        .map(|c| pairs.iter().map(|(k, w)| (w - c * k.sqrt()).powi(2)).sum())
        .collect();

    let mut best = 0;
    for (i, error) in errors.iter().enumerate() {
        if *error < errors[best] {
            best = i;
        }
    }

    Ok(RegressionFit {
        best_constant: constants[best],
        constants,
        errors,
    })
}
