//! Study configuration validation.

use crate::schema::{
    CoupledStudy, DampedStudy, FrequencyPlanDef, RegressionDef, RunnerDef, SimulatorDef, Spacing,
    StudyConfig, SweepDef,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Empty list: {field}")]
    Empty { field: String },

    #[error("Length mismatch: {field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive and finite"))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be non-negative and finite"))
    }
}

pub fn validate_config(config: &StudyConfig) -> Result<(), ValidationError> {
    validate_runner(&config.runner)?;
    validate_regression(&config.analysis.regression)?;
    if config.analysis.peak_count == 0 {
        return Err(invalid("analysis.peak_count", 0, "must be at least 1"));
    }
    validate_coupled(&config.coupled)?;
    validate_damped(&config.damped)?;
    Ok(())
}

pub fn validate_runner(runner: &RunnerDef) -> Result<(), ValidationError> {
    if runner.workers == 0 {
        return Err(invalid("runner.workers", 0, "must be at least 1"));
    }
    if runner.simulations_dir.trim().is_empty() {
        return Err(ValidationError::Empty {
            field: "runner.simulations_dir".to_string(),
        });
    }
    Ok(())
}

pub fn validate_regression(regression: &RegressionDef) -> Result<(), ValidationError> {
    if !regression.c_min.is_finite() || !regression.c_max.is_finite() {
        return Err(invalid(
            "analysis.regression",
            format!("[{}, {}]", regression.c_min, regression.c_max),
            "bounds must be finite",
        ));
    }
    if regression.c_max < regression.c_min {
        return Err(invalid(
            "analysis.regression",
            format!("[{}, {}]", regression.c_min, regression.c_max),
            "c_max must not be below c_min",
        ));
    }
    if regression.points == 0 {
        return Err(invalid("analysis.regression.points", 0, "must be at least 1"));
    }
    Ok(())
}

fn validate_simulator(field: &str, simulator: &SimulatorDef) -> Result<(), ValidationError> {
    if simulator.program.trim().is_empty() {
        return Err(ValidationError::Empty {
            field: format!("{field}.program"),
        });
    }
    Ok(())
}

fn validate_sweep(field: &str, sweep: &SweepDef) -> Result<(), ValidationError> {
    if sweep.points < 2 {
        return Err(invalid(
            &format!("{field}.points"),
            sweep.points,
            "sweep must have at least 2 points",
        ));
    }
    if !sweep.start.is_finite() || !sweep.end.is_finite() {
        return Err(invalid(
            field,
            format!("{}..{}", sweep.start, sweep.end),
            "bounds must be finite",
        ));
    }
    if (sweep.start - sweep.end).abs() < 1e-12 {
        return Err(invalid(
            field,
            format!("{}..{}", sweep.start, sweep.end),
            "start and end values must be different",
        ));
    }
    if sweep.spacing == Spacing::Logarithmic && (sweep.start <= 0.0 || sweep.end <= 0.0) {
        return Err(invalid(
            field,
            format!("{}..{}", sweep.start, sweep.end),
            "logarithmic sweeps need positive bounds",
        ));
    }
    Ok(())
}

pub fn validate_coupled(study: &CoupledStudy) -> Result<(), ValidationError> {
    validate_simulator("coupled.simulator", &study.simulator)?;
    positive("coupled.mass", study.mass)?;
    non_negative("coupled.amplitude", study.amplitude)?;
    positive("coupled.lattice_spacing", study.lattice_spacing)?;
    if study.particle_count < 2 {
        return Err(invalid(
            "coupled.particle_count",
            study.particle_count,
            "a chain needs at least 2 particles",
        ));
    }
    if study.stiffnesses.is_empty() {
        return Err(ValidationError::Empty {
            field: "coupled.stiffnesses".to_string(),
        });
    }
    for k in &study.stiffnesses {
        positive("coupled.stiffnesses", *k)?;
    }
    match &study.frequencies {
        FrequencyPlanDef::Ranges { ranges } => {
            if ranges.len() != study.stiffnesses.len() {
                return Err(ValidationError::LengthMismatch {
                    field: "coupled.frequencies.ranges".to_string(),
                    expected: study.stiffnesses.len(),
                    actual: ranges.len(),
                });
            }
            for range in ranges {
                validate_sweep("coupled.frequencies.ranges", range)?;
                if range.start <= 0.0 || range.end <= 0.0 {
                    return Err(invalid(
                        "coupled.frequencies.ranges",
                        format!("{}..{}", range.start, range.end),
                        "driving frequencies must be positive",
                    ));
                }
            }
        }
        FrequencyPlanDef::Harmonics { points } => {
            if *points < 5 {
                return Err(invalid(
                    "coupled.frequencies.points",
                    points,
                    "harmonic grids need at least 5 points",
                ));
            }
        }
    }
    positive("coupled.steps_per_period", study.steps_per_period)?;
    positive("coupled.samples_per_period", study.samples_per_period)?;
    positive("coupled.short_final_time", study.short_final_time)?;
    positive("coupled.long_final_time", study.long_final_time)?;
    non_negative("coupled.resonance_window", study.resonance_window)?;
    for combo in &study.animate {
        positive("coupled.animate.k", combo.k)?;
        positive("coupled.animate.w", combo.w)?;
    }
    Ok(())
}

pub fn validate_damped(study: &DampedStudy) -> Result<(), ValidationError> {
    validate_simulator("damped.simulator", &study.simulator)?;
    positive("damped.mass", study.mass)?;
    positive("damped.stiffness", study.stiffness)?;
    non_negative("damped.damping", study.damping)?;
    positive("damped.final_time", study.final_time)?;
    positive("damped.sample_dt", study.sample_dt)?;
    if study.integrators.is_empty() {
        return Err(ValidationError::Empty {
            field: "damped.integrators".to_string(),
        });
    }
    validate_sweep("damped.dts", &study.dts)?;
    if study.dts.start <= 0.0 || study.dts.end <= 0.0 {
        return Err(invalid(
            "damped.dts",
            format!("{}..{}", study.dts.start, study.dts.end),
            "time steps must be positive",
        ));
    }
    Ok(())
}
