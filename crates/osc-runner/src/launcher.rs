//! Process launching seam.

use crate::error::{RunError, RunResult};
use crate::request::SimulationRequest;
use osc_project::SimulatorDef;
use std::path::Path;
use std::process::{Command, Stdio};

/// Executes one request, writing its output files into `out_dir`.
///
/// Implementations are called concurrently from pool workers.
pub trait Launcher: Sync {
    fn launch(&self, request: &SimulationRequest, out_dir: &Path) -> RunResult<()>;
}

impl<F> Launcher for F
where
    F: Fn(&SimulationRequest, &Path) -> RunResult<()> + Sync,
{
    fn launch(&self, request: &SimulationRequest, out_dir: &Path) -> RunResult<()> {
        self(request, out_dir)
    }
}

/// Runs the simulator as a child process and waits for it to exit.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    simulator: SimulatorDef,
}

impl ProcessLauncher {
    pub fn new(simulator: SimulatorDef) -> Self {
        Self { simulator }
    }

    pub fn command(&self, request: &SimulationRequest, out_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.simulator.program);
        if let Some(memory) = &self.simulator.memory {
            cmd.arg(format!("-Xms{memory}"));
            cmd.arg(format!("-Xmx{memory}"));
        }
        cmd.args(&self.simulator.args);
        cmd.args(request.to_args(out_dir));
        cmd.stdin(Stdio::null());
        cmd
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&self, request: &SimulationRequest, out_dir: &Path) -> RunResult<()> {
        let output = self
            .command(request, out_dir)
            .output()
            .map_err(|source| RunError::Spawn {
                program: self.simulator.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(RunError::ProcessFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
