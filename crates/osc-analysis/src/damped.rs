//! Underdamped oscillator: closed-form solution and integration error.

use osc_core::{OscError, OscResult};

/// `x(t) = A * exp(-(gamma / 2m) t) * cos(sqrt(k/m - (gamma / 2m)^2) t)`
pub fn analytic_position(t: f64, mass: f64, stiffness: f64, damping: f64, amplitude: f64) -> f64 {
    let decay = damping / (2.0 * mass);
    let omega = (stiffness / mass - decay * decay).sqrt();
    amplitude * (-decay * t).exp() * (omega * t).cos()
}

pub fn analytic_positions(
    time: &[f64],
    mass: f64,
    stiffness: f64,
    damping: f64,
    amplitude: f64,
) -> Vec<f64> {
    time.iter()
        .map(|&t| analytic_position(t, mass, stiffness, damping, amplitude))
        .collect()
}

pub fn squared_errors(numeric: &[f64], analytic: &[f64]) -> OscResult<Vec<f64>> {
    if numeric.len() != analytic.len() {
        return Err(OscError::LengthMismatch {
            what: "numeric and analytic traces",
            expected: analytic.len(),
            actual: numeric.len(),
        });
    }
    Ok(numeric
        .iter()
        .zip(analytic)
        .map(|(x, y)| (x - y).powi(2))
        .collect())
}

/// Mean of the squared errors; `None` for an empty trace.
pub fn mean_squared_error(errors: &[f64]) -> Option<f64> {
    if errors.is_empty() {
        None
    } else {
        Some(errors.iter().sum::<f64>() / errors.len() as f64)
    }
}
