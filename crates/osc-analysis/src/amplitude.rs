//! Displacement summaries per time sample.

/// Largest absolute displacement across particles, per sample.
/// An empty sample has amplitude zero.
pub fn amplitudes(positions: &[Vec<f64>]) -> Vec<f64> {
    positions
        .iter()
        .map(|sample| sample.iter().fold(0.0_f64, |acc, x| acc.max(x.abs())))
        .collect()
}

/// Signed displacement of one particle over time.
pub fn displacement_trace(positions: &[Vec<f64>], particle: usize) -> Option<Vec<f64>> {
    positions
        .iter()
        .map(|sample| sample.get(particle).copied())
        .collect()
}

pub fn max_amplitude(amplitudes: &[f64]) -> Option<f64> {
    amplitudes.iter().copied().reduce(f64::max)
}
