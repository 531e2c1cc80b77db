use crate::animation::ChainAnimation;
use crate::chart::ChartSpec;
use crate::{PlotResult, PlotSink};

/// Keeps every spec it is given instead of drawing it.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub charts: Vec<ChartSpec>,
    pub animations: Vec<ChainAnimation>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chart whose output file name is `name`.
    pub fn chart_named(&self, name: &str) -> Option<&ChartSpec> {
        self.charts
            .iter()
            .find(|c| c.path.file_name().is_some_and(|f| f == name))
    }
}

impl PlotSink for RecordingSink {
    fn chart(&mut self, spec: &ChartSpec) -> PlotResult<()> {
        self.charts.push(spec.clone());
        Ok(())
    }

    fn animation(&mut self, animation: &ChainAnimation) -> PlotResult<()> {
        self.animations.push(animation.clone());
        Ok(())
    }
}
