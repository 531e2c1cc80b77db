//! Fundamental resonance of an amplitude-vs-frequency curve.

use crate::peaks::find_peaks;

/// Lowest driving frequency among the `peak_count` highest peaks of
/// `(frequency, max_amplitude)` points.
///
/// Points are sorted by frequency first. With fewer peaks than `peak_count`
/// all of them compete; with none the resonance is undefined.
pub fn resonance_frequency(points: &[(f64, f64)], peak_count: usize) -> Option<f64> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
    let amplitudes: Vec<f64> = sorted.iter().map(|(_, a)| *a).collect();

    let mut peaks = find_peaks(&amplitudes);
    // Stable: equal heights keep frequency order.
    peaks.sort_by(|&a, &b| amplitudes[b].total_cmp(&amplitudes[a]));
    peaks
        .into_iter()
        .take(peak_count)
        .map(|i| sorted[i].0)
        .reduce(f64::min)
}
