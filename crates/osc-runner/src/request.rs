//! Simulation requests and their command-line encoding.

use osc_project::Integrator;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;

/// Chain of `particle_count` masses driven at one end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoupledParams {
    pub mass: f64,
    pub stiffness: f64,
    pub amplitude: f64,
    pub lattice_spacing: f64,
    pub particle_count: usize,
    pub driving_frequency: f64,
}

/// Single mass on a damped spring, released from `amplitude`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DampedParams {
    pub mass: f64,
    pub stiffness: f64,
    pub damping: f64,
    pub amplitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScenarioParams {
    Coupled(CoupledParams),
    Damped(DampedParams),
}

/// One simulator invocation. Built once by the planner, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    pub scenario: ScenarioParams,
    pub integrator: Integrator,
    pub dt: f64,
    pub sample_dt: f64,
    pub final_time: f64,
}

impl SimulationRequest {
    pub fn coupled(
        params: CoupledParams,
        integrator: Integrator,
        dt: f64,
        sample_dt: f64,
        final_time: f64,
    ) -> Self {
        Self {
            scenario: ScenarioParams::Coupled(params),
            integrator,
            dt,
            sample_dt,
            final_time,
        }
    }

    pub fn damped(
        params: DampedParams,
        integrator: Integrator,
        dt: f64,
        sample_dt: f64,
        final_time: f64,
    ) -> Self {
        Self {
            scenario: ScenarioParams::Damped(params),
            integrator,
            dt,
            sample_dt,
            final_time,
        }
    }

    pub fn stiffness(&self) -> f64 {
        match &self.scenario {
            ScenarioParams::Coupled(p) => p.stiffness,
            ScenarioParams::Damped(p) => p.stiffness,
        }
    }

    /// Deterministic directory name built from the parameters that vary
    /// within a sweep.
    pub fn dir_name(&self) -> String {
        match &self.scenario {
            ScenarioParams::Coupled(p) => format!("w-{}_k-{}", p.driving_frequency, p.stiffness),
            ScenarioParams::Damped(_) => format!("i-{}_dt-{}", self.integrator, self.dt),
        }
    }

    /// Simulator flags, starting at `-out`.
    pub fn to_args(&self, out_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-out".into(), out_dir.as_os_str().to_os_string()];
        let mut push = |flag: &str, value: String| {
            args.push(flag.into());
            args.push(value.into());
        };

        match &self.scenario {
            ScenarioParams::Coupled(p) => {
                push("-k", p.stiffness.to_string());
                push("-m", p.mass.to_string());
                push("-A", p.amplitude.to_string());
                push("-l0", p.lattice_spacing.to_string());
                push("-N", p.particle_count.to_string());
                push("-w", p.driving_frequency.to_string());
            }
            ScenarioParams::Damped(p) => {
                push("-k", p.stiffness.to_string());
                push("-m", p.mass.to_string());
                push("-g", p.damping.to_string());
                push("-r0", p.amplitude.to_string());
            }
        }
        push("-i", self.integrator.to_string());
        push("-dt", self.dt.to_string());
        push("-dt2", self.sample_dt.to_string());
        push("-tf", self.final_time.to_string());
        args
    }
}

impl fmt::Display for SimulationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scenario {
            ScenarioParams::Coupled(p) => {
                write!(f, "w={}, k={}", p.driving_frequency, p.stiffness)
            }
            ScenarioParams::Damped(_) => {
                write!(f, "integrator={}, dt={}", self.integrator, self.dt)
            }
        }
    }
}
