//! Static parameter files: one scalar per line, position defines meaning.
//!
//! Damped: mass, stiffness, damping, amplitude, dt, sample_dt, final_time,
//! integrator.
//! Coupled: mass, stiffness, amplitude, lattice_spacing, particle_count,
//! driving_frequency, dt, sample_dt, final_time, integrator.

use crate::parse::{Fields, ParseError};
use osc_project::Integrator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const STATIC_FILE: &str = "static.txt";

/// Which physical system a run simulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Coupled,
    Damped,
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coupled => f.write_str("coupled"),
            Self::Damped => f.write_str("damped"),
        }
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coupled" => Ok(Self::Coupled),
            "damped" | "dampened" => Ok(Self::Damped),
            other => Err(format!("Unknown scenario: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DampedStatic {
    pub mass: f64,
    pub stiffness: f64,
    pub damping: f64,
    pub amplitude: f64,
    pub dt: f64,
    pub sample_dt: f64,
    pub final_time: f64,
    pub integrator: Integrator,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoupledStatic {
    pub mass: f64,
    pub stiffness: f64,
    pub amplitude: f64,
    pub lattice_spacing: f64,
    pub particle_count: usize,
    pub driving_frequency: f64,
    pub dt: f64,
    pub sample_dt: f64,
    pub final_time: f64,
    pub integrator: Integrator,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scenario", rename_all = "lowercase")]
pub enum StaticParameters {
    Coupled(CoupledStatic),
    Damped(DampedStatic),
}

impl StaticParameters {
    pub fn parse(text: &str, scenario: Scenario) -> Result<Self, ParseError> {
        let mut fields = Fields::new(text);
        let params = match scenario {
            Scenario::Damped => Self::Damped(DampedStatic {
                mass: fields.next_f64("mass")?,
                stiffness: fields.next_f64("stiffness")?,
                damping: fields.next_f64("damping")?,
                amplitude: fields.next_f64("amplitude")?,
                dt: fields.next_f64("dt")?,
                sample_dt: fields.next_f64("sample_dt")?,
                final_time: fields.next_f64("final_time")?,
                integrator: fields.next_str("integrator")?.parse()?,
            }),
            Scenario::Coupled => Self::Coupled(CoupledStatic {
                mass: fields.next_f64("mass")?,
                stiffness: fields.next_f64("stiffness")?,
                amplitude: fields.next_f64("amplitude")?,
                lattice_spacing: fields.next_f64("lattice_spacing")?,
                particle_count: fields.next_usize("particle_count")?,
                driving_frequency: fields.next_f64("driving_frequency")?,
                dt: fields.next_f64("dt")?,
                sample_dt: fields.next_f64("sample_dt")?,
                final_time: fields.next_f64("final_time")?,
                integrator: fields.next_str("integrator")?.parse()?,
            }),
        };
        fields.finish()?;
        Ok(params)
    }

    /// Text in the same field order `parse` expects.
    pub fn to_text(&self) -> String {
        let lines: Vec<String> = match self {
            Self::Damped(p) => vec![
                p.mass.to_string(),
                p.stiffness.to_string(),
                p.damping.to_string(),
                p.amplitude.to_string(),
                p.dt.to_string(),
                p.sample_dt.to_string(),
                p.final_time.to_string(),
                p.integrator.to_string(),
            ],
            Self::Coupled(p) => vec![
                p.mass.to_string(),
                p.stiffness.to_string(),
                p.amplitude.to_string(),
                p.lattice_spacing.to_string(),
                p.particle_count.to_string(),
                p.driving_frequency.to_string(),
                p.dt.to_string(),
                p.sample_dt.to_string(),
                p.final_time.to_string(),
                p.integrator.to_string(),
            ],
        };
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    pub fn scenario(&self) -> Scenario {
        match self {
            Self::Coupled(_) => Scenario::Coupled,
            Self::Damped(_) => Scenario::Damped,
        }
    }

    pub fn stiffness(&self) -> f64 {
        match self {
            Self::Coupled(p) => p.stiffness,
            Self::Damped(p) => p.stiffness,
        }
    }

    /// Driving frequency; zero for the undriven damped oscillator.
    pub fn driving_frequency(&self) -> f64 {
        match self {
            Self::Coupled(p) => p.driving_frequency,
            Self::Damped(_) => 0.0,
        }
    }

    pub fn integrator(&self) -> Integrator {
        match self {
            Self::Coupled(p) => p.integrator,
            Self::Damped(p) => p.integrator,
        }
    }

    pub fn dt(&self) -> f64 {
        match self {
            Self::Coupled(p) => p.dt,
            Self::Damped(p) => p.dt,
        }
    }

    pub fn sample_dt(&self) -> f64 {
        match self {
            Self::Coupled(p) => p.sample_dt,
            Self::Damped(p) => p.sample_dt,
        }
    }

    /// Particle count the dynamic file must match, when the static file states one.
    pub fn particle_count(&self) -> Option<usize> {
        match self {
            Self::Coupled(p) => Some(p.particle_count),
            Self::Damped(_) => None,
        }
    }
}
