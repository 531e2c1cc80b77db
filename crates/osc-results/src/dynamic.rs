//! Time-series files.
//!
//! Both layouts start with a `particle_count sample_count` header. After it,
//! `HeaderMatrix` holds a flat row-major matrix of `sample_count` rows of
//! `1 + particle_count` values (time first), while `SampleBlocks` holds, per
//! sample, a timestamp line followed by one line per particle.

use crate::parse::{ParseError, parse_f64};
use osc_project::DynamicLayout;

pub const DYNAMIC_FILE: &str = "dynamic.txt";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    pub time: Vec<f64>,
    /// `positions[sample][particle]`
    pub positions: Vec<Vec<f64>>,
    /// Same shape as `positions` when the layout carries velocities.
    pub velocities: Option<Vec<Vec<f64>>>,
}

impl TimeSeries {
    pub fn sample_count(&self) -> usize {
        self.time.len()
    }

    pub fn particle_count(&self) -> usize {
        self.positions.first().map_or(0, Vec::len)
    }
}

/// Parse a dynamic file. `expected_particles` comes from the static file when
/// it declares a particle count.
pub fn parse_dynamic(
    text: &str,
    layout: DynamicLayout,
    expected_particles: Option<usize>,
) -> Result<TimeSeries, ParseError> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    let header = lines.next().ok_or(ParseError::Header(String::new()))?;
    let (particles, samples) = parse_header(header)?;

    if let Some(expected) = expected_particles
        && expected != particles
    {
        return Err(ParseError::ParticleMismatch {
            declared: particles,
            expected,
        });
    }

    match layout {
        DynamicLayout::HeaderMatrix => parse_matrix(lines, particles, samples),
        DynamicLayout::SampleBlocks { velocities } => {
            parse_blocks(lines.collect(), particles, samples, velocities)
        }
    }
}

fn parse_header(header: &str) -> Result<(usize, usize), ParseError> {
    let tokens: Vec<&str> = header.split_whitespace().collect();
    let [particles, samples] = tokens.as_slice() else {
        return Err(ParseError::Header(header.to_string()));
    };
    let particles = particles
        .parse()
        .map_err(|_| ParseError::Header(header.to_string()))?;
    let samples = samples
        .parse()
        .map_err(|_| ParseError::Header(header.to_string()))?;
    Ok((particles, samples))
}

fn parse_matrix<'a>(
    lines: impl Iterator<Item = &'a str>,
    particles: usize,
    samples: usize,
) -> Result<TimeSeries, ParseError> {
    let values = lines
        .flat_map(str::split_whitespace)
        .map(|token| parse_f64(token, "matrix value"))
        .collect::<Result<Vec<f64>, _>>()?;

    let width = particles + 1;
    let expected = samples * width;
    if values.len() != expected {
        return Err(ParseError::Count {
            what: "matrix values",
            expected,
            actual: values.len(),
        });
    }

    let mut series = TimeSeries {
        time: Vec::with_capacity(samples),
        positions: Vec::with_capacity(samples),
        velocities: None,
    };
    for row in values.chunks_exact(width) {
        series.time.push(row[0]);
        series.positions.push(row[1..].to_vec());
    }
    Ok(series)
}

fn parse_blocks(
    lines: Vec<&str>,
    particles: usize,
    samples: usize,
    with_velocities: bool,
) -> Result<TimeSeries, ParseError> {
    let block = particles + 1;
    let expected = samples * block;
    if lines.len() != expected {
        return Err(ParseError::Count {
            what: "lines after the header",
            expected,
            actual: lines.len(),
        });
    }

    let columns = if with_velocities { 2 } else { 1 };
    let mut time = Vec::with_capacity(samples);
    let mut positions = Vec::with_capacity(samples);
    let mut velocities = Vec::with_capacity(if with_velocities { samples } else { 0 });

    for chunk in lines.chunks_exact(block) {
        time.push(single_value(chunk[0], "timestamp")?);

        let mut sample_positions = Vec::with_capacity(particles);
        let mut sample_velocities = Vec::with_capacity(if with_velocities { particles } else { 0 });
        for line in &chunk[1..] {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != columns {
                return Err(ParseError::Count {
                    what: "values per particle line",
                    expected: columns,
                    actual: tokens.len(),
                });
            }
            sample_positions.push(parse_f64(tokens[0], "position")?);
            if with_velocities {
                sample_velocities.push(parse_f64(tokens[1], "velocity")?);
            }
        }
        positions.push(sample_positions);
        if with_velocities {
            velocities.push(sample_velocities);
        }
    }

    Ok(TimeSeries {
        time,
        positions,
        velocities: with_velocities.then_some(velocities),
    })
}

fn single_value(line: &str, field: &str) -> Result<f64, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 1 {
        return Err(ParseError::Count {
            what: "values on a timestamp line",
            expected: 1,
            actual: tokens.len(),
        });
    }
    parse_f64(tokens[0], field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BLOCKS: DynamicLayout = DynamicLayout::SampleBlocks { velocities: false };

    #[test]
    fn matrix_layout_reshapes_rows() {
        let text = "2 3\n0.1 1.0 2.0\n0.2 1.5 2.5\n0.3 -1.0 -2.0\n";
        let series = parse_dynamic(text, DynamicLayout::HeaderMatrix, None).unwrap();
        assert_eq!(series.time, vec![0.1, 0.2, 0.3]);
        assert_eq!(series.positions[1], vec![1.5, 2.5]);
        assert_eq!(series.particle_count(), 2);
        assert!(series.velocities.is_none());
    }

    #[test]
    fn matrix_layout_ignores_line_breaks() {
        let text = "2 2\n0.1 1.0\n2.0 0.2\n1.5 2.5\n";
        let series = parse_dynamic(text, DynamicLayout::HeaderMatrix, None).unwrap();
        assert_eq!(series.positions, vec![vec![1.0, 2.0], vec![1.5, 2.5]]);
    }

    #[test]
    fn matrix_with_missing_values_fails() {
        let text = "2 3\n0.1 1.0 2.0\n0.2 1.5 2.5\n0.3 -1.0\n";
        let err = parse_dynamic(text, DynamicLayout::HeaderMatrix, None).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Count {
                expected: 9,
                actual: 8,
                ..
            }
        ));
    }

    #[test]
    fn block_layout_reads_positions() {
        let text = "2 2\n0.01\n0.5\n-0.5\n0.02\n0.25\n-0.25\n";
        let series = parse_dynamic(text, BLOCKS, Some(2)).unwrap();
        assert_eq!(series.time, vec![0.01, 0.02]);
        assert_eq!(series.positions, vec![vec![0.5, -0.5], vec![0.25, -0.25]]);
    }

    #[test]
    fn block_layout_reads_velocities() {
        let text = "1 2\n0.01\n0.5 1.0\n0.02\n0.25 -1.0\n";
        let layout = DynamicLayout::SampleBlocks { velocities: true };
        let series = parse_dynamic(text, layout, None).unwrap();
        assert_eq!(series.positions, vec![vec![0.5], vec![0.25]]);
        assert_eq!(series.velocities, Some(vec![vec![1.0], vec![-1.0]]));
    }

    #[test]
    fn block_layout_with_short_sample_fails() {
        let text = "2 2\n0.01\n0.5\n-0.5\n0.02\n0.25\n";
        let err = parse_dynamic(text, BLOCKS, None).unwrap_err();
        assert!(matches!(err, ParseError::Count { .. }));
    }

    #[test]
    fn header_must_match_static_particle_count() {
        let text = "2 1\n0.01\n0.5\n-0.5\n";
        let err = parse_dynamic(text, BLOCKS, Some(3)).unwrap_err();
        assert!(matches!(
            err,
            ParseError::ParticleMismatch {
                declared: 2,
                expected: 3
            }
        ));
    }

    #[test]
    fn malformed_header_fails() {
        assert!(matches!(
            parse_dynamic("2\n0.1 1.0\n", DynamicLayout::HeaderMatrix, None),
            Err(ParseError::Header(_))
        ));
        assert!(matches!(
            parse_dynamic("", BLOCKS, None),
            Err(ParseError::Header(_))
        ));
    }

    fn render_blocks(samples: &[Vec<f64>]) -> String {
        let particles = samples.first().map_or(0, Vec::len);
        let mut text = format!("{particles} {}\n", samples.len());
        for (i, sample) in samples.iter().enumerate() {
            text.push_str(&format!("{}\n", (i + 1) as f64 * 0.01));
            for x in sample {
                text.push_str(&format!("{x}\n"));
            }
        }
        text
    }

    proptest! {
        #[test]
        fn block_shape_matches_header(
            particles in 1usize..8,
            samples in 1usize..20,
            seed in -1.0f64..1.0,
        ) {
            let data: Vec<Vec<f64>> = (0..samples)
                .map(|s| (0..particles).map(|p| seed * (s * particles + p) as f64).collect())
                .collect();
            let series = parse_dynamic(&render_blocks(&data), BLOCKS, Some(particles)).unwrap();
            prop_assert_eq!(series.sample_count(), samples);
            prop_assert!(series.positions.iter().all(|row| row.len() == particles));
            prop_assert_eq!(series.positions, data);
        }

        #[test]
        fn dropping_a_line_always_fails(particles in 1usize..8, samples in 1usize..20) {
            let data = vec![vec![0.5; particles]; samples];
            let text = render_blocks(&data);
            let truncated: String = text
                .lines()
                .take(text.lines().count() - 1)
                .map(|l| format!("{l}\n"))
                .collect();
            prop_assert!(parse_dynamic(&truncated, BLOCKS, None).is_err());
        }
    }
}
