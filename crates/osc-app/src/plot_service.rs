//! The `plot` phase: aggregate the interchange records and render charts.

use std::path::Path;

use osc_analysis::report::record_amplitudes;
use osc_analysis::{CoupledReport, DampedReport, analyze_coupled, analyze_damped};
use osc_core::linspace;
use osc_project::AnalysisDef;
use osc_plot::{ChartSpec, PlotSink, Scale, Series, SeriesStyle};
use osc_results::{ResultRecord, ResultsStore, Scenario};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
pub struct PlotSummary {
    pub charts: usize,
    /// `(k, w0)` pairs of the coupled study.
    pub resonances: Vec<(f64, f64)>,
    pub best_constant: Option<f64>,
    /// `(integrator, dt, mse)` of the damped study.
    pub mean_squared_errors: Vec<(String, f64, f64)>,
}

/// Load `results.json` from `output_dir` and plot whichever studies it holds.
pub fn plot(
    output_dir: &Path,
    analysis: &AnalysisDef,
    sink: &mut dyn PlotSink,
) -> AppResult<PlotSummary> {
    let records = ResultsStore::new(output_dir.to_path_buf()).load()?;
    if records.is_empty() {
        return Err(AppError::InvalidInput(
            "results file holds no records".to_string(),
        ));
    }

    let (coupled, damped): (Vec<ResultRecord>, Vec<ResultRecord>) = records
        .into_iter()
        .partition(|r| r.parameters.scenario() == Scenario::Coupled);

    let mut summary = PlotSummary::default();
    if !coupled.is_empty() {
        let (report, charts) = plot_coupled_charts(&coupled, analysis, output_dir, sink)?;
        summary.charts += charts;
        summary.resonances = report.resonances;
        summary.best_constant = report.fit.map(|f| f.best_constant);
    }
    if !damped.is_empty() {
        let (report, charts) = plot_damped_charts(&damped, output_dir, sink)?;
        summary.charts += charts;
        summary.mean_squared_errors = report
            .runs
            .iter()
            .map(|r| (r.integrator.to_string(), r.dt, r.mse))
            .collect();
    }
    info!(charts = summary.charts, "Results plotted");
    Ok(summary)
}

/// Plot the coupled chain study: amplitude traces, resonance curves,
/// resonance against stiffness, the sqrt-law fit and its error.
pub fn plot_results(
    records: &[ResultRecord],
    analysis: &AnalysisDef,
    output_dir: &Path,
    sink: &mut dyn PlotSink,
) -> AppResult<CoupledReport> {
    plot_coupled_charts(records, analysis, output_dir, sink).map(|(report, _)| report)
}

fn plot_coupled_charts(
    records: &[ResultRecord],
    analysis: &AnalysisDef,
    output_dir: &Path,
    sink: &mut dyn PlotSink,
) -> AppResult<(CoupledReport, usize)> {
    info!(records = records.len(), "Plotting coupled results");
    let mut charts = 0;

    let traces_dir = output_dir.join("amplitudes_vs_time");
    for record in records {
        if record.parameters.scenario() != Scenario::Coupled {
            continue;
        }
        let Some(trace) = record_amplitudes(record).filter(|t| !t.is_empty()) else {
            debug!(k = record.k, w = record.w, "No amplitude trace, skipping chart");
            continue;
        };
        let spec = ChartSpec::new(
            traces_dir.join(format!("amplitudes_vs_time_k-{}_w-{}.png", record.k, record.w)),
            "Time (s)",
            "Amplitude (m)",
        )
        .title(format!("k={:.0} kg/s², w={:.2} rad/s", record.k, record.w))
        .with_series(Series::from_xy(None, &record.time, &trace, SeriesStyle::Line));
        sink.chart(&spec)?;
        charts += 1;
    }

    let report = analyze_coupled(records, analysis)?;

    let curves_dir = output_dir.join("amplitudes_vs_w");
    for curve in &report.curves {
        if curve.frequencies.is_empty() {
            continue;
        }
        let mut spec = ChartSpec::new(
            curves_dir.join(format!("amplitudes_vs_w_k-{}.png", curve.k)),
            "w (rad/s)",
            "Max amplitude (m)",
        )
        .title(format!("k={:.0} kg/s²", curve.k))
        .with_series(Series::from_xy(
            Some("Simulated"),
            &curve.frequencies,
            &curve.max_amplitudes,
            SeriesStyle::LinePoints,
        ));
        if let Some(w) = curve.theoretical {
            spec = spec.with_marker(w, Some("Theoretical w0"));
        }
        sink.chart(&spec)?;
        charts += 1;
    }

    if report.resonances.is_empty() {
        return Ok((report, charts));
    }

    let spec = ChartSpec::new(output_dir.join("resonances.png"), "k (kg/s²)", "w0 (rad/s)")
        .with_series(Series::points(None, report.resonances.clone()));
    sink.chart(&spec)?;
    charts += 1;

    if let Some(fit) = &report.fit {
        let k_min = report.resonances.first().map_or(0.0, |r| r.0);
        let k_max = report.resonances.last().map_or(0.0, |r| r.0);
        let curve: Vec<(f64, f64)> = linspace(k_min, k_max, 200)
            .into_iter()
            .map(|k| (k, fit.predict(k)))
            .collect();
        let label = format!("w0 = {:.4} sqrt(k)", fit.best_constant);

        let spec = ChartSpec::new(output_dir.join("resonance.png"), "k (kg/s²)", "w0 (rad/s)")
            .with_series(Series::points(Some("Resonance"), report.resonances.clone()))
            .with_series(Series::line(Some(&label), curve));
        sink.chart(&spec)?;

        let spec = ChartSpec::new(
            output_dir.join("regression_error.png"),
            "C",
            "Squared error (rad²/s²)",
        )
        .with_series(Series::from_xy(
            None,
            &fit.constants,
            &fit.errors,
            SeriesStyle::Line,
        ));
        sink.chart(&spec)?;
        charts += 2;
    }

    Ok((report, charts))
}

/// Plot the damped oscillator study: positions and squared error against the
/// closed-form solution per time step, and mean squared error against dt.
pub fn plot_damped(
    records: &[ResultRecord],
    output_dir: &Path,
    sink: &mut dyn PlotSink,
) -> AppResult<DampedReport> {
    plot_damped_charts(records, output_dir, sink).map(|(report, _)| report)
}

fn plot_damped_charts(
    records: &[ResultRecord],
    output_dir: &Path,
    sink: &mut dyn PlotSink,
) -> AppResult<(DampedReport, usize)> {
    info!(records = records.len(), "Plotting damped results");
    let report = analyze_damped(records)?;
    let mut charts = 0;

    for dt in report.dts() {
        let runs = report.runs_at(dt);
        let Some(first) = runs.first() else {
            continue;
        };

        let mut positions = ChartSpec::new(
            output_dir.join(format!("positions_vs_time_dt-{dt}.png")),
            "Time (s)",
            "Position (m)",
        )
        .title(format!("dt = {dt} s"));
        let mut errors = ChartSpec::new(
            output_dir.join(format!("squared_error_vs_time_dt-{dt}.png")),
            "Time (s)",
            "Squared error (m²)",
        )
        .title(format!("dt = {dt} s"))
        .scales(Scale::Linear, Scale::Log10);

        for run in &runs {
            let label = run.integrator.to_string();
            positions = positions.with_series(Series::from_xy(
                Some(&label),
                &run.time,
                &run.positions,
                SeriesStyle::Line,
            ));
            errors = errors.with_series(Series::from_xy(
                Some(&label),
                &run.time,
                &run.squared_errors,
                SeriesStyle::Line,
            ));
        }
        positions = positions.with_series(Series::from_xy(
            Some("analytic"),
            &first.time,
            &first.analytic,
            SeriesStyle::Line,
        ));

        sink.chart(&positions)?;
        charts += 1;
        // An exact run has no error to show on a log axis.
        if errors.bounds().is_some() {
            sink.chart(&errors)?;
            charts += 1;
        } else {
            debug!(dt, "Squared errors are all zero, skipping log chart");
        }
    }

    let mut mse = ChartSpec::new(
        output_dir.join("mean_squared_error_vs_dt.png"),
        "dt (s)",
        "Mean squared error (m²)",
    )
    .scales(Scale::Log10, Scale::Log10);
    for (integrator, points) in report.mse_by_integrator() {
        mse = mse.with_series(Series {
            label: Some(integrator.to_string()),
            points,
            style: SeriesStyle::LinePoints,
        });
    }
    if mse.bounds().is_some() {
        sink.chart(&mse)?;
        charts += 1;
    }

    Ok((report, charts))
}
