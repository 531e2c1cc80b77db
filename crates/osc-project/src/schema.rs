//! Study configuration schema.
//!
//! Every constant the sweeps depend on lives here so that the runner and the
//! analysis receive them explicitly. `Default` reproduces the reference study.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct StudyConfig {
    pub runner: RunnerDef,
    pub analysis: AnalysisDef,
    pub coupled: CoupledStudy,
    pub damped: DampedStudy,
}

/// Movement integration scheme implemented by the external simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Integrator {
    Verlet,
    Beeman,
    Gear,
}

impl Integrator {
    pub const ALL: [Integrator; 3] = [Integrator::Verlet, Integrator::Beeman, Integrator::Gear];

    /// Name understood by the simulator's `-i` flag and written to static files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verlet => "verlet",
            Self::Beeman => "beeman",
            Self::Gear => "gear",
        }
    }
}

impl fmt::Display for Integrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("Unknown integrator: {0}")]
pub struct UnknownIntegrator(pub String);

impl FromStr for Integrator {
    type Err = UnknownIntegrator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verlet" => Ok(Self::Verlet),
            "beeman" => Ok(Self::Beeman),
            "gear" => Ok(Self::Gear),
            other => Err(UnknownIntegrator(other.to_string())),
        }
    }
}

/// Layout of the simulator's time-series file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DynamicLayout {
    /// Header, then a flat numeric matrix of shape [samples, 1 + particles].
    HeaderMatrix,
    /// Header, then per sample a timestamp line and one line per particle.
    SampleBlocks {
        #[serde(default)]
        velocities: bool,
    },
}

impl Default for DynamicLayout {
    fn default() -> Self {
        Self::SampleBlocks { velocities: false }
    }
}

/// How to launch the simulator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulatorDef {
    pub program: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// JVM heap size, forwarded as `-Xms<mem> -Xmx<mem>` ahead of `args`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
}

impl SimulatorDef {
    pub fn jar(path: &str, memory: Option<&str>) -> Self {
        Self {
            program: "java".to_string(),
            args: vec!["-jar".to_string(), path.to_string()],
            memory: memory.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunnerDef {
    pub workers: usize,
    /// Reuse a run directory that already exists instead of re-running it.
    pub skip_existing: bool,
    /// Scratch directory for per-run output, relative to the output directory.
    pub simulations_dir: String,
    /// Remove the scratch directory once every run has been parsed.
    pub cleanup: bool,
}

impl Default for RunnerDef {
    fn default() -> Self {
        Self {
            workers: 8,
            skip_existing: true,
            simulations_dir: "simulations".to_string(),
            cleanup: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisDef {
    /// How many of the highest peaks compete for the fundamental resonance.
    pub peak_count: usize,
    pub regression: RegressionDef,
}

impl Default for AnalysisDef {
    fn default() -> Self {
        Self {
            peak_count: 3,
            regression: RegressionDef::default(),
        }
    }
}

/// Candidate grid for the `w0 = C * sqrt(k)` fit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RegressionDef {
    pub c_min: f64,
    pub c_max: f64,
    pub points: usize,
}

impl Default for RegressionDef {
    fn default() -> Self {
        Self {
            c_min: 0.99,
            c_max: 1.0,
            points: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Spacing {
    #[default]
    Linear,
    Logarithmic,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SweepDef {
    pub start: f64,
    pub end: f64,
    pub points: usize,
    #[serde(default)]
    pub spacing: Spacing,
}

impl SweepDef {
    pub fn linear(start: f64, end: f64, points: usize) -> Self {
        Self {
            start,
            end,
            points,
            spacing: Spacing::Linear,
        }
    }

    pub fn logarithmic(start: f64, end: f64, points: usize) -> Self {
        Self {
            start,
            end,
            points,
            spacing: Spacing::Logarithmic,
        }
    }
}

/// Driving frequencies to simulate for each stiffness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FrequencyPlanDef {
    /// One sweep per stiffness, in the same order as `stiffnesses`.
    Ranges { ranges: Vec<SweepDef> },
    /// Points concentrated around the chain's first harmonics.
    Harmonics { points: usize },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AnimateDef {
    pub k: f64,
    pub w: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoupledStudy {
    pub simulator: SimulatorDef,
    pub mass: f64,
    pub particle_count: usize,
    pub amplitude: f64,
    pub lattice_spacing: f64,
    pub integrator: Integrator,
    pub stiffnesses: Vec<f64>,
    pub frequencies: FrequencyPlanDef,
    /// Integration steps per driving period: `dt = 1 / (steps_per_period * w)`.
    pub steps_per_period: f64,
    /// Samples per driving period: `dt2 = 1 / (samples_per_period * w)`.
    pub samples_per_period: f64,
    pub short_final_time: f64,
    /// Final time used near a theoretical harmonic and for animated runs.
    pub long_final_time: f64,
    pub resonance_window: f64,
    pub animate: Vec<AnimateDef>,
    pub layout: DynamicLayout,
}

impl Default for CoupledStudy {
    fn default() -> Self {
        Self {
            simulator: SimulatorDef::jar(
                "target/coupled-oscillator-jar-with-dependencies.jar",
                Some("1524m"),
            ),
            mass: 0.001,
            particle_count: 100,
            amplitude: 0.01,
            lattice_spacing: 0.001,
            integrator: Integrator::Verlet,
            stiffnesses: vec![100.0, 2000.0, 4000.0, 7000.0, 10000.0],
            frequencies: FrequencyPlanDef::Ranges {
                ranges: vec![
                    SweepDef::linear(5.0, 15.0, 50),
                    SweepDef::linear(40.0, 50.0, 50),
                    SweepDef::linear(55.0, 70.0, 50),
                    SweepDef::linear(75.0, 90.0, 50),
                    SweepDef::linear(90.0, 110.0, 50),
                ],
            },
            steps_per_period: 100.0,
            samples_per_period: 10.0,
            short_final_time: 10.0,
            long_final_time: 100.0,
            resonance_window: 1.0,
            animate: vec![AnimateDef { k: 100.0, w: 10.0 }, AnimateDef { k: 100.0, w: 15.0 }],
            layout: DynamicLayout::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DampedStudy {
    pub simulator: SimulatorDef,
    pub mass: f64,
    pub stiffness: f64,
    pub damping: f64,
    /// Initial displacement r0.
    pub amplitude: f64,
    pub final_time: f64,
    pub sample_dt: f64,
    pub integrators: Vec<Integrator>,
    pub dts: SweepDef,
    pub layout: DynamicLayout,
}

impl Default for DampedStudy {
    fn default() -> Self {
        Self {
            simulator: SimulatorDef::jar(
                "target/dampened-oscillator-jar-with-dependencies.jar",
                Some("1524m"),
            ),
            mass: 70.0,
            stiffness: 1e4,
            damping: 100.0,
            amplitude: 1.0,
            final_time: 5.0,
            sample_dt: 0.01,
            integrators: Integrator::ALL.to_vec(),
            dts: SweepDef::logarithmic(1e-6, 1e-2, 5),
            layout: DynamicLayout::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrator_names_roundtrip() {
        for integrator in Integrator::ALL {
            assert_eq!(integrator.as_str().parse::<Integrator>().unwrap(), integrator);
        }
        assert_eq!(" Verlet\n".parse::<Integrator>().unwrap(), Integrator::Verlet);
        assert!("euler".parse::<Integrator>().is_err());
    }

    #[test]
    fn default_study_matches_reference_constants() {
        let config = StudyConfig::default();
        assert_eq!(config.coupled.stiffnesses.len(), 5);
        assert_eq!(config.coupled.particle_count, 100);
        assert_eq!(config.analysis.peak_count, 3);
        assert_eq!(config.runner.workers, 8);
        assert_eq!(config.damped.integrators.len(), 3);
    }

    #[test]
    fn layout_tags_are_snake_case() {
        let json =
            serde_json::to_string(&DynamicLayout::SampleBlocks { velocities: true }).unwrap();
        assert_eq!(json, r#"{"type":"sample_blocks","velocities":true}"#);
        let layout: DynamicLayout = serde_json::from_str(r#"{"type":"header_matrix"}"#).unwrap();
        assert_eq!(layout, DynamicLayout::HeaderMatrix);
    }
}
