//! The `animate` phase: one GIF per coupled run that kept its positions.

use std::path::{Path, PathBuf};

use osc_plot::{ChainAnimation, PlotSink};
use osc_results::{ResultRecord, ResultsStore, StaticParameters};
use tracing::info;

use crate::error::{AppError, AppResult};

const FRAME_DELAY_MS: u32 = 100;
const FRAME_SIZE: (u32, u32) = (800, 600);

/// Load `results.json` from `output_dir` and animate every eligible record.
pub fn animate(output_dir: &Path, sink: &mut dyn PlotSink) -> AppResult<Vec<PathBuf>> {
    let records = ResultsStore::new(output_dir.to_path_buf()).load()?;
    animate_records(&records, output_dir, sink)
}

/// Render `animations/animation_<k>_<w>.gif` for each coupled record with a
/// position trace. Returns the written paths in record order.
pub fn animate_records(
    records: &[ResultRecord],
    output_dir: &Path,
    sink: &mut dyn PlotSink,
) -> AppResult<Vec<PathBuf>> {
    let dir = output_dir.join("animations");
    let mut written = Vec::new();

    for record in records {
        let StaticParameters::Coupled(params) = &record.parameters else {
            continue;
        };
        let Some(positions) = record.positions.as_ref().filter(|p| !p.is_empty()) else {
            continue;
        };

        let path = dir.join(format!("animation_{}_{}.gif", record.k, record.w));
        info!(path = %path.display(), frames = positions.len(), "Rendering animation");
        let animation = ChainAnimation {
            path: path.clone(),
            positions: positions.clone(),
            lattice_spacing: params.lattice_spacing,
            amplitude: params.amplitude,
            driving_frequency: params.driving_frequency,
            sample_dt: params.sample_dt,
            frame_delay_ms: FRAME_DELAY_MS,
            size: FRAME_SIZE,
        };
        sink.animation(&animation)?;
        written.push(path);
    }

    if written.is_empty() {
        return Err(AppError::NothingToAnimate {
            path: ResultsStore::new(output_dir.to_path_buf()).path(),
        });
    }
    Ok(written)
}
