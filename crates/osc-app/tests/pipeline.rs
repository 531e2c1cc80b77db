//! End-to-end generate → plot → animate with an in-process simulator stand-in.

use std::fs;
use std::path::{Path, PathBuf};

use osc_analysis::analytic_position;
use osc_app::{
    AppError, BatchProgressEvent, BatchStage, GenerateRequest, animate, build_records,
    generate_with_launcher, plot, plot_results,
};
use osc_plot::{RecordingSink, Scale};
use osc_project::{
    AnimateDef, DynamicLayout, FrequencyPlanDef, Integrator, StudyConfig, SweepDef,
};
use osc_results::{
    CoupledStatic, DYNAMIC_FILE, DampedStatic, STATIC_FILE, Scenario, StaticParameters,
    read_run_dir,
};
use osc_runner::{RunError, ScenarioParams, SimulationRequest};

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("osc_app_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn coupled_config(stiffness: f64, range: SweepDef) -> StudyConfig {
    let mut config = StudyConfig::default();
    config.runner.workers = 2;
    config.coupled.stiffnesses = vec![stiffness];
    config.coupled.frequencies = FrequencyPlanDef::Ranges {
        ranges: vec![range],
    };
    config.coupled.particle_count = 2;
    config.coupled.short_final_time = 1.0;
    config.coupled.long_final_time = 1.0;
    config.coupled.animate = Vec::new();
    config.coupled.layout = DynamicLayout::HeaderMatrix;
    config
}

/// Writes what the simulator would: a static file and a header-matrix
/// dynamic file. Chain displacement peaks at `w = 10`.
fn fake_simulator(request: &SimulationRequest, out_dir: &Path) -> Result<(), RunError> {
    let samples = 5;
    let (params, rows) = match request.scenario {
        ScenarioParams::Coupled(p) => {
            let a = 0.01 / (1.0 + (p.driving_frequency - 10.0).powi(2));
            let rows: Vec<String> = (0..samples)
                .map(|i| format!("{} {} {}", i as f64 * request.sample_dt, a, -a / 2.0))
                .collect();
            let params = StaticParameters::Coupled(CoupledStatic {
                mass: p.mass,
                stiffness: p.stiffness,
                amplitude: p.amplitude,
                lattice_spacing: p.lattice_spacing,
                particle_count: p.particle_count,
                driving_frequency: p.driving_frequency,
                dt: request.dt,
                sample_dt: request.sample_dt,
                final_time: request.final_time,
                integrator: request.integrator,
            });
            (params, rows)
        }
        ScenarioParams::Damped(p) => {
            // Offset from the closed form by dt so the error shrinks with it.
            let rows: Vec<String> = (0..samples)
                .map(|i| {
                    let t = i as f64 * request.sample_dt;
                    let x = analytic_position(t, p.mass, p.stiffness, p.damping, p.amplitude);
                    format!("{t} {}", x + request.dt)
                })
                .collect();
            let params = StaticParameters::Damped(DampedStatic {
                mass: p.mass,
                stiffness: p.stiffness,
                damping: p.damping,
                amplitude: p.amplitude,
                dt: request.dt,
                sample_dt: request.sample_dt,
                final_time: request.final_time,
                integrator: request.integrator,
            });
            (params, rows)
        }
    };

    let particles = match request.scenario {
        ScenarioParams::Coupled(p) => p.particle_count,
        ScenarioParams::Damped(_) => 1,
    };
    let dynamic = format!("{particles} {samples}\n{}\n", rows.join("\n"));
    fs::write(out_dir.join(STATIC_FILE), params.to_text()).map_err(|source| {
        RunError::Directory {
            path: out_dir.to_path_buf(),
            source,
        }
    })?;
    fs::write(out_dir.join(DYNAMIC_FILE), dynamic).map_err(|source| RunError::Directory {
        path: out_dir.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[test]
fn coupled_pipeline_finds_resonance_and_animates() {
    let dir = temp_dir("coupled_pipeline");
    let mut config = coupled_config(100.0, SweepDef::linear(9.0, 11.0, 3));
    config.coupled.animate = vec![AnimateDef { k: 100.0, w: 10.0 }];

    let request = GenerateRequest {
        output_dir: &dir,
        scenario: Scenario::Coupled,
        config: &config,
        ideal_frequencies: false,
    };
    let response = generate_with_launcher(&request, &fake_simulator, None).unwrap();
    assert_eq!(response.requested, 3);
    assert_eq!(response.parsed, 3);
    assert_eq!(response.failed_runs, 0);
    assert!(response.results_path.exists());
    // Scratch directory removed once parsed.
    assert!(!dir.join(&config.runner.simulations_dir).exists());

    let mut sink = RecordingSink::new();
    let summary = plot(&dir, &config.analysis, &mut sink).unwrap();
    assert_eq!(summary.resonances.len(), 1);
    let (k, w0) = summary.resonances[0];
    assert_eq!(k, 100.0);
    assert!((w0 - 10.0).abs() < 1e-12);
    let c = summary.best_constant.unwrap();
    assert!((c - 1.0).abs() < 1e-9);

    assert!(sink.chart_named("amplitudes_vs_time_k-100_w-10.png").is_some());
    assert!(sink.chart_named("amplitudes_vs_w_k-100.png").is_some());
    assert!(sink.chart_named("resonances.png").is_some());
    assert!(sink.chart_named("regression_error.png").is_some());
    let resonance = sink.chart_named("resonance.png").unwrap();
    assert_eq!(resonance.series.len(), 2);
    assert_eq!(summary.charts, sink.charts.len());

    let mut sink = RecordingSink::new();
    let written = animate(&dir, &mut sink).unwrap();
    assert_eq!(written.len(), 1);
    assert!(written[0].ends_with("animations/animation_100_10.gif"));
    assert_eq!(sink.animations.len(), 1);
    assert_eq!(sink.animations[0].frame_count(), 5);
    assert_eq!(sink.animations[0].frame_delay_ms, 100);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn canned_runs_resolve_to_one_resonance() {
    let dir = temp_dir("canned");
    let config = coupled_config(100.0, SweepDef::linear(9.0, 11.0, 3));
    let requests = osc_app::plan_requests(&config, Scenario::Coupled, false).unwrap();

    let mut runs = Vec::new();
    for request in &requests {
        let run_dir = dir.join(request.dir_name());
        fs::create_dir_all(&run_dir).unwrap();
        fake_simulator(request, &run_dir).unwrap();
        runs.push(read_run_dir(&run_dir, Scenario::Coupled, config.coupled.layout).unwrap());
    }
    let records = build_records(runs, &[]);

    let mut sink = RecordingSink::new();
    let report = plot_results(&records, &config.analysis, &dir, &mut sink).unwrap();
    assert_eq!(report.resonances, vec![(100.0, 10.0)]);
    assert_eq!(report.curves.len(), 1);
    assert_eq!(report.curves[0].frequencies, vec![9.0, 10.0, 11.0]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn failed_simulation_is_left_out_of_results() {
    let dir = temp_dir("failed_run");
    let config = coupled_config(100.0, SweepDef::linear(1.0, 10.0, 10));

    let launcher = |request: &SimulationRequest, out_dir: &Path| -> Result<(), RunError> {
        if let ScenarioParams::Coupled(p) = request.scenario
            && p.driving_frequency == 5.0
        {
            return Err(RunError::ProcessFailed {
                code: Some(1),
                stderr: "boom".to_string(),
            });
        }
        fake_simulator(request, out_dir)
    };

    let request = GenerateRequest {
        output_dir: &dir,
        scenario: Scenario::Coupled,
        config: &config,
        ideal_frequencies: false,
    };
    let response = generate_with_launcher(&request, &launcher, None).unwrap();
    assert_eq!(response.requested, 10);
    assert_eq!(response.failed_runs, 1);
    assert_eq!(response.parse_failures, 0);
    assert_eq!(response.parsed, 9);

    let records = osc_results::ResultsStore::new(dir.clone()).load().unwrap();
    assert_eq!(records.len(), 9);
    assert!(records.iter().all(|r| r.w != 5.0));
    // No animate combos, so no record keeps its positions.
    assert!(records.iter().all(|r| !r.has_positions()));

    let mut sink = RecordingSink::new();
    let err = animate(&dir, &mut sink).unwrap_err();
    assert!(matches!(err, AppError::NothingToAnimate { .. }));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn failed_simulation_with_readable_output_is_excluded() {
    let dir = temp_dir("failed_with_output");
    let config = coupled_config(100.0, SweepDef::linear(1.0, 10.0, 10));

    // Writes complete files for every run, then reports a non-zero exit for w = 5.
    let launcher = |request: &SimulationRequest, out_dir: &Path| -> Result<(), RunError> {
        fake_simulator(request, out_dir)?;
        if let ScenarioParams::Coupled(p) = request.scenario
            && p.driving_frequency == 5.0
        {
            return Err(RunError::ProcessFailed {
                code: Some(1),
                stderr: "diverged".to_string(),
            });
        }
        Ok(())
    };

    let request = GenerateRequest {
        output_dir: &dir,
        scenario: Scenario::Coupled,
        config: &config,
        ideal_frequencies: false,
    };
    let response = generate_with_launcher(&request, &launcher, None).unwrap();
    assert_eq!(response.failed_runs, 1);
    assert_eq!(response.parse_failures, 0);
    assert_eq!(response.parsed, 9);

    let records = osc_results::ResultsStore::new(dir.clone()).load().unwrap();
    assert_eq!(records.len(), 9);
    assert!(records.iter().all(|r| r.w != 5.0));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn damped_pipeline_reports_error_per_integrator() {
    let dir = temp_dir("damped_pipeline");
    let mut config = StudyConfig::default();
    config.runner.workers = 3;
    config.damped.final_time = 0.04;
    config.damped.sample_dt = 0.01;
    config.damped.integrators = vec![Integrator::Verlet, Integrator::Beeman];
    config.damped.dts = SweepDef::logarithmic(1e-4, 1e-2, 3);
    config.damped.layout = DynamicLayout::HeaderMatrix;

    let request = GenerateRequest {
        output_dir: &dir,
        scenario: Scenario::Damped,
        config: &config,
        ideal_frequencies: false,
    };
    let response = generate_with_launcher(&request, &fake_simulator, None).unwrap();
    assert_eq!(response.requested, 6);
    assert_eq!(response.parsed, 6);

    let mut sink = RecordingSink::new();
    let summary = plot(&dir, &config.analysis, &mut sink).unwrap();
    assert_eq!(summary.mean_squared_errors.len(), 6);
    for (_, dt, mse) in &summary.mean_squared_errors {
        assert!((mse - dt * dt).abs() < 1e-12 * dt * dt.max(1.0) + 1e-18);
    }

    let mse = sink.chart_named("mean_squared_error_vs_dt.png").unwrap();
    assert_eq!((mse.x_scale, mse.y_scale), (Scale::Log10, Scale::Log10));
    assert_eq!(mse.series.len(), 2);
    let positions: Vec<_> = sink
        .charts
        .iter()
        .filter(|c| {
            c.path
                .file_name()
                .and_then(|f| f.to_str())
                .is_some_and(|f| f.starts_with("positions_vs_time_dt-"))
        })
        .collect();
    assert_eq!(positions.len(), 3);
    // Both integrators plus the closed form.
    assert!(positions.iter().all(|c| c.series.len() == 3));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn progress_reaches_completed() {
    let dir = temp_dir("progress");
    let config = coupled_config(100.0, SweepDef::linear(9.0, 11.0, 3));
    let events = std::sync::Mutex::new(Vec::<BatchProgressEvent>::new());
    let record: &(dyn Fn(BatchProgressEvent) + Sync) = &|event| {
        if let Ok(mut events) = events.lock() {
            events.push(event);
        }
    };

    let request = GenerateRequest {
        output_dir: &dir,
        scenario: Scenario::Coupled,
        config: &config,
        ideal_frequencies: false,
    };
    generate_with_launcher(&request, &fake_simulator, Some(record)).unwrap();

    let events = events.into_inner().unwrap();
    assert_eq!(events.first().map(|e| e.stage), Some(BatchStage::Planning));
    assert_eq!(events.last().map(|e| e.stage), Some(BatchStage::Completed));
    let ticks = events
        .iter()
        .filter(|e| e.stage == BatchStage::Simulating)
        .count();
    assert_eq!(ticks, 3);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn plot_without_results_is_fatal() {
    let dir = temp_dir("missing");
    let mut sink = RecordingSink::new();
    let err = plot(&dir, &StudyConfig::default().analysis, &mut sink).unwrap_err();
    assert!(matches!(err, AppError::MissingResults { .. }));
    let err = animate(&dir, &mut sink).unwrap_err();
    assert!(matches!(err, AppError::MissingResults { .. }));
}
