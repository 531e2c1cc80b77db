//! Sweep point generation.
//!
//! Supports linear and logarithmic sweeps over a single scalar such as a
//! driving frequency or an integration time step.

use osc_project::{Spacing, SweepDef};
use std::fmt;

/// Type of sweep progression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SweepType {
    /// Uniformly spaced points
    Linear,
    /// Logarithmically spaced points
    Logarithmic,
}

impl From<Spacing> for SweepType {
    fn from(spacing: Spacing) -> Self {
        match spacing {
            Spacing::Linear => Self::Linear,
            Spacing::Logarithmic => Self::Logarithmic,
        }
    }
}

/// Definition of a single parameter sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepDefinition {
    pub start: f64,
    pub end: f64,
    /// Number of points to generate
    pub num_points: usize,
    /// Spacing type
    pub sweep_type: SweepType,
}

impl SweepDefinition {
    /// Create a sweep, rejecting degenerate bounds.
    pub fn new(
        start: f64,
        end: f64,
        num_points: usize,
        sweep_type: SweepType,
    ) -> Result<Self, String> {
        if !start.is_finite() || !end.is_finite() {
            return Err("Sweep bounds must be finite".to_string());
        }

        if num_points < 2 {
            return Err("Sweep must have at least 2 points".to_string());
        }

        if (start - end).abs() < 1e-12 {
            return Err("Start and end values must be different".to_string());
        }

        Ok(SweepDefinition {
            start,
            end,
            num_points,
            sweep_type,
        })
    }

    pub fn from_def(def: &SweepDef) -> Result<Self, String> {
        Self::new(def.start, def.end, def.points, def.spacing.into())
    }

    /// Generate all points in the sweep.
    pub fn generate_points(&self) -> Vec<f64> {
        match self.sweep_type {
            SweepType::Linear => self.generate_linear(),
            SweepType::Logarithmic => self.generate_logarithmic(),
        }
    }

    fn generate_linear(&self) -> Vec<f64> {
        osc_core::linspace(self.start, self.end, self.num_points)
    }

    fn generate_logarithmic(&self) -> Vec<f64> {
        if self.num_points <= 1 {
            return vec![self.start];
        }

        // For logarithmic sweep, both start and end must be positive
        if self.start <= 0.0 || self.end <= 0.0 {
            return self.generate_linear();
        }

        let mut points: Vec<f64> =
            osc_core::linspace(self.start.ln(), self.end.ln(), self.num_points)
                .into_iter()
                .map(f64::exp)
                .collect();

        // Ensure exact endpoints
        points[0] = self.start;
        points[self.num_points - 1] = self.end;
        points
    }
}

impl fmt::Display for SweepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "Linear"),
            Self::Logarithmic => write!(f, "Logarithmic"),
        }
    }
}

impl fmt::Display for SweepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sweep from {} to {} ({} points, {})",
            self.start, self.end, self.num_points, self.sweep_type
        )
    }
}
