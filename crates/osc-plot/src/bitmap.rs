//! PNG charts and GIF animations with plotters.

use crate::animation::ChainAnimation;
use crate::chart::{ChartSpec, SeriesStyle};
use crate::{PlotError, PlotResult, PlotSink};
use plotters::prelude::*;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(214, 39, 40),
    RGBColor(44, 160, 44),
    RGBColor(255, 127, 14),
    RGBColor(148, 103, 189),
    RGBColor(23, 190, 207),
];

#[derive(Debug, Clone, Default)]
pub struct BitmapPlotter;

impl BitmapPlotter {
    pub fn new() -> Self {
        Self
    }
}

fn backend<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Backend(e.to_string())
}

fn ensure_parent(path: &Path) -> PlotResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| PlotError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

impl PlotSink for BitmapPlotter {
    fn chart(&mut self, spec: &ChartSpec) -> PlotResult<()> {
        let (x_range, y_range) = spec.bounds().ok_or_else(|| PlotError::Empty {
            path: spec.path.clone(),
        })?;
        ensure_parent(&spec.path)?;

        let root = BitMapBackend::new(&spec.path, spec.size).into_drawing_area();
        root.fill(&WHITE).map_err(backend)?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(20).x_label_area_size(50).y_label_area_size(80);
        if let Some(title) = &spec.title {
            builder.caption(title, ("sans-serif", 26).into_font());
        }
        let (y_start, y_end) = (y_range.start, y_range.end);
        let mut chart = builder
            .build_cartesian_2d(x_range, y_range)
            .map_err(backend)?;

        let x_ticks = |v: &f64| spec.x_scale.format_tick(*v);
        let y_ticks = |v: &f64| spec.y_scale.format_tick(*v);
        chart
            .configure_mesh()
            .x_desc(spec.x_label.as_str())
            .y_desc(spec.y_label.as_str())
            .x_label_formatter(&x_ticks)
            .y_label_formatter(&y_ticks)
            .draw()
            .map_err(backend)?;

        let mut labelled = false;
        for (i, series) in spec.scaled_series().into_iter().enumerate() {
            let color = PALETTE[i % PALETTE.len()];
            let points = series.points;

            let anno = match series.style {
                SeriesStyle::Points => chart
                    .draw_series(points.iter().map(|&p| Circle::new(p, 3, color.filled()))),
                SeriesStyle::Line | SeriesStyle::LinePoints => chart
                    .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2))),
            }
            .map_err(backend)?;

            if let Some(label) = series.label {
                labelled = true;
                anno.label(label).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            }

            if series.style == SeriesStyle::LinePoints {
                chart
                    .draw_series(points.iter().map(|&p| Circle::new(p, 3, color.filled())))
                    .map_err(backend)?;
            }
        }

        for (x, label) in spec.scaled_markers() {
            let anno = chart
                .draw_series(LineSeries::new(
                    vec![(x, y_start), (x, y_end)],
                    BLACK.stroke_width(1),
                ))
                .map_err(backend)?;
            if let Some(label) = label {
                labelled = true;
                anno.label(label).legend(|(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(1))
                });
            }
        }

        if labelled {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .border_style(BLACK)
                .background_style(WHITE.mix(0.8))
                .draw()
                .map_err(backend)?;
        }

        root.present().map_err(backend)?;
        debug!(path = %spec.path.display(), "Chart written");
        Ok(())
    }

    fn animation(&mut self, animation: &ChainAnimation) -> PlotResult<()> {
        let frames = animation.frame_count();
        if frames == 0 {
            return Err(PlotError::Empty {
                path: animation.path.clone(),
            });
        }
        ensure_parent(&animation.path)?;

        let (x0, x1) = animation.x_range();
        let (y0, y1) = animation.y_range();
        let root = BitMapBackend::gif(&animation.path, animation.size, animation.frame_delay_ms)
            .map_err(backend)?
            .into_drawing_area();

        let step = (frames / 20).max(1);
        for index in 0..frames {
            if frames > 20 && index % step == 0 {
                let percent = index as f64 / frames as f64 * 100.0;
                info!(path = %animation.path.display(), "Progress: {percent:.1}%");
            }
            let Some(frame) = animation.frame(index) else {
                break;
            };

            root.fill(&WHITE).map_err(backend)?;
            let mut chart = ChartBuilder::on(&root)
                .margin(10)
                .build_cartesian_2d(x0..x1, y0..y1)
                .map_err(backend)?;

            chart
                .draw_series(LineSeries::new(frame.particles.iter().copied(), BLUE.stroke_width(1)))
                .map_err(backend)?;
            chart
                .draw_series(frame.particles.iter().map(|&p| Circle::new(p, 1, BLUE.filled())))
                .map_err(backend)?;
            chart
                .draw_series(LineSeries::new(frame.wall, BLUE.stroke_width(1)))
                .map_err(backend)?;
            chart
                .draw_series(std::iter::once(Circle::new(frame.forced, 2, GREEN.filled())))
                .map_err(backend)?;

            root.present().map_err(backend)?;
        }

        info!(path = %animation.path.display(), frames, "Animation written");
        Ok(())
    }
}
