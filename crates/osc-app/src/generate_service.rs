//! The `generate` phase: plan, simulate, parse, save.

use std::path::{Path, PathBuf};

use osc_analysis::amplitudes;
use osc_core::{Timer, Tolerances, nearly_equal};
use osc_project::{AnimateDef, DynamicLayout, SimulatorDef, StudyConfig};
use osc_results::{ResultRecord, ResultsStore, RunResult, Scenario, read_run_dir};
use osc_runner::{
    BatchOptions, BatchReport, BatchTick, Launcher, ProcessLauncher, SimulationRequest, WorkerPool,
    remove_run_root,
};
use tracing::{error, info, warn};

use crate::error::AppResult;
use crate::progress::{BatchProgressEvent, BatchStage};

pub type ProgressCallback<'a> = &'a (dyn Fn(BatchProgressEvent) + Sync);

pub struct GenerateRequest<'a> {
    pub output_dir: &'a Path,
    pub scenario: Scenario,
    pub config: &'a StudyConfig,
    /// Use the harmonic-focused frequency grid for the coupled study.
    pub ideal_frequencies: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GenerateTiming {
    pub plan_time_s: f64,
    pub simulate_time_s: f64,
    pub parse_time_s: f64,
    pub save_time_s: f64,
    pub total_time_s: f64,
}

#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub results_path: PathBuf,
    pub requested: usize,
    pub failed_runs: usize,
    pub skipped_runs: usize,
    pub parsed: usize,
    pub parse_failures: usize,
    pub timing: GenerateTiming,
}

fn emit(progress: Option<ProgressCallback<'_>>, event: BatchProgressEvent) {
    if let Some(cb) = progress {
        cb(event);
    }
}

/// Requests for one scenario of the study, in execution order.
pub fn plan_requests(
    config: &StudyConfig,
    scenario: Scenario,
    ideal_frequencies: bool,
) -> AppResult<Vec<SimulationRequest>> {
    let requests = match scenario {
        Scenario::Coupled => osc_sweep::coupled_requests(&config.coupled, ideal_frequencies)?,
        Scenario::Damped => osc_sweep::damped_requests(&config.damped)?,
    };
    Ok(requests)
}

fn scenario_setup(config: &StudyConfig, scenario: Scenario) -> (&SimulatorDef, DynamicLayout) {
    match scenario {
        Scenario::Coupled => (&config.coupled.simulator, config.coupled.layout),
        Scenario::Damped => (&config.damped.simulator, config.damped.layout),
    }
}

/// Run the study with the configured simulator.
pub fn generate(
    request: &GenerateRequest,
    progress: Option<ProgressCallback<'_>>,
) -> AppResult<GenerateResponse> {
    let (simulator, _) = scenario_setup(request.config, request.scenario);
    let launcher = ProcessLauncher::new(simulator.clone());
    generate_with_launcher(request, &launcher, progress)
}

/// Run the study, launching each simulation through `launcher`.
pub fn generate_with_launcher<L: Launcher>(
    request: &GenerateRequest,
    launcher: &L,
    progress: Option<ProgressCallback<'_>>,
) -> AppResult<GenerateResponse> {
    let total_timer = Timer::start("generate");
    let scenario = request.scenario;
    let config = request.config;
    let (_, layout) = scenario_setup(config, scenario);
    let mut timing = GenerateTiming::default();

    emit(
        progress,
        BatchProgressEvent::stage(
            scenario,
            BatchStage::Planning,
            total_timer.elapsed_s(),
            Some("Planning simulations".to_string()),
        ),
    );
    let timer = Timer::start("plan");
    let requests = plan_requests(config, scenario, request.ideal_frequencies)?;
    timing.plan_time_s = timer.stop();
    info!(%scenario, requests = requests.len(), "Planned simulations");

    let pool = WorkerPool::new(config.runner.workers)?;
    let options = BatchOptions {
        root_dir: request.output_dir.join(&config.runner.simulations_dir),
        skip_existing: config.runner.skip_existing,
    };

    let on_tick = |tick: BatchTick| {
        if let Some(cb) = progress {
            let mut event = BatchProgressEvent::stage(
                scenario,
                BatchStage::Simulating,
                total_timer.elapsed_s(),
                None,
            );
            event.completed = Some(tick.completed);
            event.total = Some(tick.total);
            cb(event);
        }
    };

    let timer = Timer::start("simulate");
    let report = pool.run_batch(&requests, launcher, &options, Some(&on_tick));
    timing.simulate_time_s = timer.stop();

    emit(
        progress,
        BatchProgressEvent::stage(
            scenario,
            BatchStage::Parsing,
            total_timer.elapsed_s(),
            Some(format!("Parsing {} run directories", report.outcomes.len())),
        ),
    );
    let timer = Timer::start("parse");
    let (runs, parse_failures) = collect_runs(&report, scenario, layout);
    let records = build_records(runs, &config.coupled.animate);
    timing.parse_time_s = timer.stop();

    if config.runner.cleanup {
        emit(
            progress,
            BatchProgressEvent::stage(
                scenario,
                BatchStage::CleaningUp,
                total_timer.elapsed_s(),
                None,
            ),
        );
        remove_run_root(&options.root_dir);
    }

    emit(
        progress,
        BatchProgressEvent::stage(scenario, BatchStage::Saving, total_timer.elapsed_s(), None),
    );
    let timer = Timer::start("save");
    let store = ResultsStore::new(request.output_dir.to_path_buf());
    store.save(&records)?;
    timing.save_time_s = timer.stop();

    timing.total_time_s = total_timer.stop();
    let response = GenerateResponse {
        results_path: store.path(),
        requested: requests.len(),
        failed_runs: report.failed(),
        skipped_runs: report.skipped(),
        parsed: records.len(),
        parse_failures,
        timing,
    };
    emit(
        progress,
        BatchProgressEvent::stage(
            scenario,
            BatchStage::Completed,
            response.timing.total_time_s,
            Some(format!("{} results saved", response.parsed)),
        ),
    );
    Ok(response)
}

/// Parse every run directory of a batch, in request order.
///
/// Failed simulations are skipped whatever their directory holds. Directories
/// that fail to parse are logged and left out. Returns the runs and the
/// number of parse failures.
pub fn collect_runs(
    report: &BatchReport,
    scenario: Scenario,
    layout: DynamicLayout,
) -> (Vec<RunResult>, usize) {
    let total = report.outcomes.len();
    let mut runs = Vec::with_capacity(total);
    let mut failures = 0;

    for (i, outcome) in report.outcomes.iter().enumerate() {
        if outcome.is_failed() {
            warn!(
                dir = %outcome.dir.display(),
                "[{}/{}] Simulation failed, results excluded",
                i + 1,
                total
            );
            continue;
        }
        match read_run_dir(&outcome.dir, scenario, layout) {
            Ok(run) => {
                info!(dir = %outcome.dir.display(), "[{}/{}] Results parsed", i + 1, total);
                runs.push(run);
            }
            Err(err) => {
                failures += 1;
                error!(
                    dir = %outcome.dir.display(),
                    error = %err,
                    "[{}/{}] Error parsing results",
                    i + 1,
                    total
                );
            }
        }
    }
    (runs, failures)
}

/// Interchange records for parsed runs.
///
/// Coupled runs keep their full position trace only when listed in
/// `animate`; damped runs always keep it.
pub fn build_records(runs: Vec<RunResult>, animate: &[AnimateDef]) -> Vec<ResultRecord> {
    let tol = Tolerances::default();
    runs.into_iter()
        .map(|run| match run.parameters.scenario() {
            Scenario::Coupled => {
                let (k, w) = (run.parameters.stiffness(), run.parameters.driving_frequency());
                let keep = animate
                    .iter()
                    .any(|a| nearly_equal(a.k, k, tol) && nearly_equal(a.w, w, tol));
                let trace = amplitudes(&run.series.positions);
                ResultRecord::from_run(run, Some(trace), keep)
            }
            Scenario::Damped => ResultRecord::from_run(run, None, true),
        })
        .collect()
}
