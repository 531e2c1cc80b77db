//! Animated view of a driven particle chain.

use std::path::PathBuf;

/// Particles sit at `x = i * l0` and move vertically. The driven particle is
/// drawn at `x = -l0`, the fixed wall at one spacing past the last particle.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainAnimation {
    pub path: PathBuf,
    /// `positions[frame][particle]`
    pub positions: Vec<Vec<f64>>,
    pub lattice_spacing: f64,
    pub amplitude: f64,
    pub driving_frequency: f64,
    pub sample_dt: f64,
    pub frame_delay_ms: u32,
    pub size: (u32, u32),
}

/// Geometry of one frame in chart coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub particles: Vec<(f64, f64)>,
    pub wall: [(f64, f64); 2],
    pub forced: (f64, f64),
}

impl ChainAnimation {
    pub fn frame_count(&self) -> usize {
        self.positions.len()
    }

    pub fn frame(&self, index: usize) -> Option<Frame> {
        let sample = self.positions.get(index)?;
        let l0 = self.lattice_spacing;
        let particles: Vec<(f64, f64)> = sample
            .iter()
            .enumerate()
            .map(|(i, &y)| (i as f64 * l0, y))
            .collect();
        let last = particles.last().copied().unwrap_or((-l0, 0.0));
        let t = (index + 1) as f64 * self.sample_dt;

        Some(Frame {
            particles,
            wall: [last, (last.0 + l0, 0.0)],
            forced: (-l0, self.amplitude * (self.driving_frequency * t).sin()),
        })
    }

    pub fn x_range(&self) -> (f64, f64) {
        let particles = self.positions.first().map_or(0, Vec::len);
        (-2.0 * self.lattice_spacing, self.lattice_spacing * particles as f64)
    }

    /// Vertical extent of every frame plus a fifth of the span on each side.
    pub fn y_range(&self) -> (f64, f64) {
        let (min, max) = self
            .positions
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &y| (lo.min(y), hi.max(y)));
        if !min.is_finite() || !max.is_finite() {
            return (-1.0, 1.0);
        }
        let extra = (max - min) / 5.0;
        if extra > 0.0 {
            (min - extra, max + extra)
        } else {
            let pad = if self.amplitude > 0.0 { self.amplitude } else { 1.0 };
            (min - pad, max + pad)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animation() -> ChainAnimation {
        ChainAnimation {
            path: PathBuf::from("animation_100_10.gif"),
            positions: vec![vec![0.0, 0.01, -0.01], vec![0.005, 0.0, 0.002]],
            lattice_spacing: 0.001,
            amplitude: 0.01,
            driving_frequency: 10.0,
            sample_dt: 0.01,
            frame_delay_ms: 100,
            size: (640, 480),
        }
    }

    #[test]
    fn frame_geometry() {
        let frame = animation().frame(1).unwrap();
        assert_eq!(frame.particles[2], (0.002, 0.002));
        assert_eq!(frame.wall[0], (0.002, 0.002));
        assert!((frame.wall[1].0 - 0.003).abs() < 1e-15);
        assert_eq!(frame.wall[1].1, 0.0);
        assert_eq!(frame.forced.0, -0.001);
        assert!((frame.forced.1 - 0.01 * (10.0_f64 * 0.02).sin()).abs() < 1e-15);
    }

    #[test]
    fn frames_past_the_end_are_none() {
        assert!(animation().frame(2).is_none());
        assert_eq!(animation().frame_count(), 2);
    }

    #[test]
    fn ranges_cover_chain() {
        let anim = animation();
        let (left, right) = anim.x_range();
        assert_eq!(left, -0.002);
        assert!((right - 0.003).abs() < 1e-15);
        let (lo, hi) = anim.y_range();
        assert!((lo - (-0.01 - 0.004)).abs() < 1e-15);
        assert!((hi - (0.01 + 0.004)).abs() < 1e-15);
    }
}
