//! Backend-independent chart description.

use std::ops::Range;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scale {
    #[default]
    Linear,
    /// Values are drawn as `log10(v)`; non-positive values are dropped.
    Log10,
}

impl Scale {
    pub fn apply(self, v: f64) -> Option<f64> {
        match self {
            Self::Linear => v.is_finite().then_some(v),
            Self::Log10 => (v > 0.0 && v.is_finite()).then(|| v.log10()),
        }
    }

    /// Tick label for a value in drawing coordinates.
    pub fn format_tick(self, v: f64) -> String {
        match self {
            Self::Linear => format_linear(v),
            Self::Log10 => format!("1e{}", v.round()),
        }
    }
}

fn format_linear(v: f64) -> String {
    let magnitude = v.abs();
    if magnitude != 0.0 && !(1e-3..1e5).contains(&magnitude) {
        format!("{v:.1e}")
    } else {
        let text = format!("{v:.3}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesStyle {
    #[default]
    Line,
    Points,
    LinePoints,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: Option<String>,
    pub points: Vec<(f64, f64)>,
    pub style: SeriesStyle,
}

impl Series {
    pub fn line(label: Option<&str>, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.map(str::to_string),
            points,
            style: SeriesStyle::Line,
        }
    }

    pub fn points(label: Option<&str>, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.map(str::to_string),
            points,
            style: SeriesStyle::Points,
        }
    }

    pub fn from_xy(label: Option<&str>, x: &[f64], y: &[f64], style: SeriesStyle) -> Self {
        Self {
            label: label.map(str::to_string),
            points: x.iter().copied().zip(y.iter().copied()).collect(),
            style,
        }
    }
}

/// Full-height vertical line at `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub path: PathBuf,
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    pub x_scale: Scale,
    pub y_scale: Scale,
    pub series: Vec<Series>,
    pub markers: Vec<Marker>,
    pub size: (u32, u32),
}

impl ChartSpec {
    pub fn new(path: impl Into<PathBuf>, x_label: &str, y_label: &str) -> Self {
        Self {
            path: path.into(),
            title: None,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            x_scale: Scale::Linear,
            y_scale: Scale::Linear,
            series: Vec::new(),
            markers: Vec::new(),
            size: (1000, 600),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn scales(mut self, x: Scale, y: Scale) -> Self {
        self.x_scale = x;
        self.y_scale = y;
        self
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn with_marker(mut self, x: f64, label: Option<&str>) -> Self {
        self.markers.push(Marker {
            x,
            label: label.map(str::to_string),
        });
        self
    }

    /// Series in drawing coordinates, points the scales cannot show removed.
    pub fn scaled_series(&self) -> Vec<Series> {
        self.series
            .iter()
            .map(|s| Series {
                label: s.label.clone(),
                style: s.style,
                points: s
                    .points
                    .iter()
                    .filter_map(|&(x, y)| Some((self.x_scale.apply(x)?, self.y_scale.apply(y)?)))
                    .collect(),
            })
            .collect()
    }

    pub fn scaled_markers(&self) -> Vec<(f64, Option<&str>)> {
        self.markers
            .iter()
            .filter_map(|m| Some((self.x_scale.apply(m.x)?, m.label.as_deref())))
            .collect()
    }

    /// Axis ranges in drawing coordinates, padded by 5%. `None` when no
    /// point survives scaling.
    pub fn bounds(&self) -> Option<(Range<f64>, Range<f64>)> {
        let series = self.scaled_series();
        let mut points = series.iter().flat_map(|s| s.points.iter().copied()).peekable();
        points.peek()?;

        let (mut x_min, mut x_max, mut y_min, mut y_max) =
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
        for (x, y) in points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        for (x, _) in self.scaled_markers() {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
        }
        Some((padded(x_min, x_max), padded(y_min, y_max)))
    }
}

fn padded(min: f64, max: f64) -> Range<f64> {
    let span = max - min;
    if span <= f64::EPSILON * max.abs().max(1.0) {
        let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.1 };
        return (min - pad)..(max + pad);
    }
    (min - 0.05 * span)..(max + 0.05 * span)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_scale_drops_non_positive_points() {
        let spec = ChartSpec::new("mse.png", "dt", "mse")
            .scales(Scale::Log10, Scale::Log10)
            .with_series(Series::line(
                Some("verlet"),
                vec![(1e-6, 1e-12), (1e-4, 0.0), (1e-2, 1e-4)],
            ));
        let scaled = spec.scaled_series();
        assert_eq!(scaled[0].points.len(), 2);
        assert!((scaled[0].points[0].0 + 6.0).abs() < 1e-12);
        assert!((scaled[0].points[1].1 + 4.0).abs() < 1e-12);
    }

    #[test]
    fn bounds_include_markers() {
        let spec = ChartSpec::new("a.png", "w", "A")
            .with_series(Series::points(None, vec![(9.0, 0.1), (11.0, 0.3)]))
            .with_marker(20.0, Some("theoretical"));
        let (x, y) = spec.bounds().unwrap();
        assert!(x.start < 9.0 && x.end > 20.0);
        assert!(y.start < 0.1 && y.end > 0.3);
    }

    #[test]
    fn flat_series_gets_nonempty_range() {
        let spec = ChartSpec::new("a.png", "t", "A")
            .with_series(Series::line(None, vec![(0.0, 0.0), (1.0, 0.0)]));
        let (_, y) = spec.bounds().unwrap();
        assert!(y.start < y.end);
    }

    #[test]
    fn empty_chart_has_no_bounds() {
        let spec = ChartSpec::new("a.png", "t", "A")
            .scales(Scale::Linear, Scale::Log10)
            .with_series(Series::line(None, vec![(0.0, 0.0)]));
        assert!(spec.bounds().is_none());
    }

    #[test]
    fn tick_labels() {
        assert_eq!(Scale::Log10.format_tick(-6.0), "1e-6");
        assert_eq!(Scale::Linear.format_tick(0.25), "0.25");
        assert_eq!(Scale::Linear.format_tick(10.0), "10");
        assert_eq!(Scale::Linear.format_tick(0.0), "0");
    }
}
