//! Fixed-size worker pool for simulator batches.

use crate::error::{RunError, RunResult};
use crate::launcher::Launcher;
use crate::request::SimulationRequest;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory that receives one subdirectory per request.
    pub root_dir: PathBuf,
    pub skip_existing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    Completed,
    /// The run directory already existed and was reused.
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub request: SimulationRequest,
    pub dir: PathBuf,
    pub status: RunStatus,
}

impl RunOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, RunStatus::Failed(_))
    }
}

/// Emitted by a worker each time one request finishes.
#[derive(Debug, Clone, Copy)]
pub struct BatchTick {
    pub completed: usize,
    pub total: usize,
    pub failed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// One outcome per request, in request order.
    pub outcomes: Vec<RunOutcome>,
}

impl BatchReport {
    /// Every run directory, whether or not its process succeeded.
    pub fn directories(&self) -> Vec<&Path> {
        self.outcomes.iter().map(|o| o.dir.as_path()).collect()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == RunStatus::Skipped)
            .count()
    }
}

pub struct WorkerPool {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> RunResult<Self> {
        if workers == 0 {
            return Err(RunError::Pool("worker count must be at least 1".to_string()));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("osc-worker-{i}"))
            .build()
            .map_err(|e| RunError::Pool(e.to_string()))?;
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run every request, at most `workers` at a time, and wait for all of them.
    pub fn run_batch<L: Launcher>(
        &self,
        requests: &[SimulationRequest],
        launcher: &L,
        options: &BatchOptions,
        on_tick: Option<&(dyn Fn(BatchTick) + Sync)>,
    ) -> BatchReport {
        let total = requests.len();
        let completed = AtomicUsize::new(0);
        info!(
            total,
            workers = self.workers,
            root = %options.root_dir.display(),
            "Executing simulations"
        );

        let outcomes: Vec<RunOutcome> = self.pool.install(|| {
            requests
                .par_iter()
                .map(|request| {
                    let outcome = run_one(request, launcher, options);
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(cb) = on_tick {
                        cb(BatchTick {
                            completed: done,
                            total,
                            failed: outcome.is_failed(),
                        });
                    }
                    outcome
                })
                .collect()
        });

        let report = BatchReport { outcomes };
        info!(
            total,
            failed = report.failed(),
            skipped = report.skipped(),
            "Simulations finished"
        );
        report
    }
}

fn run_one<L: Launcher>(
    request: &SimulationRequest,
    launcher: &L,
    options: &BatchOptions,
) -> RunOutcome {
    let dir = options.root_dir.join(request.dir_name());

    if options.skip_existing && dir.exists() {
        debug!(%request, dir = %dir.display(), "Reusing existing run directory");
        return RunOutcome {
            request: request.clone(),
            dir,
            status: RunStatus::Skipped,
        };
    }

    let result = fs::create_dir_all(&dir)
        .map_err(|source| RunError::Directory {
            path: dir.clone(),
            source,
        })
        .and_then(|()| {
            info!(%request, "Running simulation");
            launcher.launch(request, &dir)
        });

    let status = match result {
        Ok(()) => {
            info!(%request, "Simulation finished");
            RunStatus::Completed
        }
        Err(err) => {
            error!(%request, error = %err, "Error running simulation");
            RunStatus::Failed(err.to_string())
        }
    };

    RunOutcome {
        request: request.clone(),
        dir,
        status,
    }
}

/// Delete the batch root directory. Failures are logged and reported as `false`.
pub fn remove_run_root(root: &Path) -> bool {
    if !root.exists() {
        return true;
    }
    info!(root = %root.display(), "Removing simulation directories");
    match fs::remove_dir_all(root) {
        Ok(()) => true,
        Err(err) => {
            warn!(root = %root.display(), error = %err, "Error removing simulation directories");
            false
        }
    }
}
