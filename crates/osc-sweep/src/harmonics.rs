//! Normal modes of a chain of identical masses and springs.

use osc_core::{Tolerances, linspace, sorted_unique};
use std::f64::consts::PI;

/// Angular frequencies of the first `count` modes of an `n`-particle chain:
/// `w_j = 2 * sqrt(k / m) * sin(j * pi / (2n))`.
pub fn chain_harmonics(k: f64, m: f64, n: usize, count: usize) -> Vec<f64> {
    let scale = 2.0 * (k / m).sqrt();
    (1..=count)
        .map(|j| scale * (j as f64 * PI / (2.0 * n as f64)).sin())
        .collect()
}

/// Driving frequencies concentrated around the first three harmonics.
///
/// A fifth of the points goes to a narrow window around each harmonic, the
/// rest covers `[0.5, 3.5]` times the first harmonic. The harmonics
/// themselves are always included. Returns sorted, deduplicated frequencies
/// and the harmonics.
pub fn harmonic_frequency_grid(
    k: f64,
    m: f64,
    n: usize,
    num_points: usize,
) -> (Vec<f64>, Vec<f64>) {
    let harmonics = chain_harmonics(k, m, n, 3);

    let per_harmonic = num_points / 5;
    let remaining = num_points.saturating_sub(3 * per_harmonic);

    let mut frequencies = Vec::with_capacity(num_points + harmonics.len());
    for &harmonic in &harmonics {
        let delta = if k < 100.0 {
            0.05 * harmonic
        } else {
            0.01 * harmonic
        };
        frequencies.extend(linspace(harmonic - delta, harmonic + delta, per_harmonic));
    }

    let first = harmonics[0];
    frequencies.extend(linspace(0.5 * first, 3.5 * first, remaining));
    frequencies.extend(harmonics.iter().copied());

    (sorted_unique(frequencies, Tolerances::default()), harmonics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_harmonic_of_reference_chain() {
        let harmonics = chain_harmonics(100.0, 0.001, 100, 3);
        let expected = 2.0 * (100.0_f64 / 0.001).sqrt() * (PI / 200.0).sin();
        assert!((harmonics[0] - expected).abs() < 1e-12);
        assert!(harmonics[0] < harmonics[1] && harmonics[1] < harmonics[2]);
        // Long-chain limit: w1 ~ sqrt(k/m) * pi / n
        assert!((harmonics[0] - 9.93).abs() < 0.01);
    }

    #[test]
    fn grid_is_sorted_and_contains_harmonics() {
        let (frequencies, harmonics) = harmonic_frequency_grid(2000.0, 0.001, 100, 50);
        assert!(frequencies.windows(2).all(|w| w[0] < w[1]));
        for h in &harmonics {
            assert!(frequencies.iter().any(|f| (f - h).abs() < 1e-9));
        }
        assert!(frequencies.len() <= 53);
        let first = harmonics[0];
        assert!(frequencies[0] >= 0.5 * first - 1e-9);
        assert!(*frequencies.last().unwrap() <= 3.5 * first + 1e-9);
    }
}
