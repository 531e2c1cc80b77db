//! osc-plot: chart and animation rendering.
//!
//! Callers describe an artifact with a `ChartSpec` or `ChainAnimation` and
//! hand it to a `PlotSink`. `BitmapPlotter` draws PNG charts and GIF
//! animations; `RecordingSink` only keeps the specs.

pub mod animation;
pub mod bitmap;
pub mod chart;
pub mod recording;

pub use animation::{ChainAnimation, Frame};
pub use bitmap::BitmapPlotter;
pub use chart::{ChartSpec, Marker, Scale, Series, SeriesStyle};
pub use recording::RecordingSink;

use std::path::PathBuf;

pub type PlotResult<T> = Result<T, PlotError>;

#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    #[error("Cannot create {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Drawing failed: {0}")]
    Backend(String),

    #[error("Nothing to draw for {path}")]
    Empty { path: PathBuf },
}

/// Destination for rendered artifacts. Each call is self-contained.
pub trait PlotSink {
    fn chart(&mut self, spec: &ChartSpec) -> PlotResult<()>;

    fn animation(&mut self, animation: &ChainAnimation) -> PlotResult<()>;
}
