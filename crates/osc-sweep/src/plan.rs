//! Study planning: configuration in, simulator requests out.

use crate::harmonics::{chain_harmonics, harmonic_frequency_grid};
use crate::sweeps::SweepDefinition;
use osc_core::{OscError, Tolerances, ensure_positive, nearly_equal};
use osc_project::{CoupledStudy, DampedStudy, FrequencyPlanDef};
use osc_runner::{CoupledParams, DampedParams, SimulationRequest};

/// Points used for the harmonic-focused grid when it is forced from the
/// command line on a study configured with explicit ranges.
pub const DEFAULT_HARMONIC_POINTS: usize = 50;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("Invalid sweep: {0}")]
    Sweep(String),

    #[error("Expected {expected} frequency ranges (one per stiffness), got {actual}")]
    RangeCount { expected: usize, actual: usize },

    #[error(transparent)]
    Numeric(#[from] OscError),
}

/// Driving frequencies for one stiffness with the final time each one gets.
#[derive(Debug, Clone, PartialEq)]
struct StiffnessPlan {
    k: f64,
    runs: Vec<(f64, f64)>,
}

/// Requests for the coupled chain study, grouped by stiffness in
/// configuration order.
///
/// With `ideal_frequencies` the harmonic-focused grid is used even when the
/// study configures explicit ranges.
pub fn coupled_requests(
    study: &CoupledStudy,
    ideal_frequencies: bool,
) -> Result<Vec<SimulationRequest>, PlanError> {
    ensure_positive(study.mass, "mass")?;
    ensure_positive(study.steps_per_period, "steps_per_period")?;
    ensure_positive(study.samples_per_period, "samples_per_period")?;

    let mut plans = Vec::with_capacity(study.stiffnesses.len());
    for (index, &k) in study.stiffnesses.iter().enumerate() {
        ensure_positive(k, "stiffness")?;
        let frequencies = frequencies_for(study, index, k, ideal_frequencies)?;
        let harmonics = chain_harmonics(k, study.mass, study.particle_count, 3);
        let runs = frequencies
            .into_iter()
            .map(|w| {
                let near_harmonic = harmonics
                    .iter()
                    .any(|h| (w - h).abs() <= study.resonance_window);
                let tf = if near_harmonic {
                    study.long_final_time
                } else {
                    study.short_final_time
                };
                (w, tf)
            })
            .collect();
        plans.push(StiffnessPlan { k, runs });
    }

    for combo in &study.animate {
        force_long_run(&mut plans, combo.k, combo.w, study.long_final_time);
    }

    let mut requests = Vec::new();
    for plan in &plans {
        for &(w, tf) in &plan.runs {
            ensure_positive(w, "driving_frequency")?;
            let params = CoupledParams {
                mass: study.mass,
                stiffness: plan.k,
                amplitude: study.amplitude,
                lattice_spacing: study.lattice_spacing,
                particle_count: study.particle_count,
                driving_frequency: w,
            };
            requests.push(SimulationRequest::coupled(
                params,
                study.integrator,
                1.0 / (study.steps_per_period * w),
                1.0 / (study.samples_per_period * w),
                tf,
            ));
        }
    }
    Ok(requests)
}

fn frequencies_for(
    study: &CoupledStudy,
    index: usize,
    k: f64,
    ideal_frequencies: bool,
) -> Result<Vec<f64>, PlanError> {
    let harmonic_points = match (&study.frequencies, ideal_frequencies) {
        (FrequencyPlanDef::Harmonics { points }, _) => Some(*points),
        (FrequencyPlanDef::Ranges { .. }, true) => Some(DEFAULT_HARMONIC_POINTS),
        (FrequencyPlanDef::Ranges { .. }, false) => None,
    };

    if let Some(points) = harmonic_points {
        let (grid, _) = harmonic_frequency_grid(k, study.mass, study.particle_count, points);
        return Ok(grid);
    }

    let FrequencyPlanDef::Ranges { ranges } = &study.frequencies else {
        return Ok(Vec::new());
    };
    let range = ranges.get(index).ok_or(PlanError::RangeCount {
        expected: study.stiffnesses.len(),
        actual: ranges.len(),
    })?;
    let sweep = SweepDefinition::from_def(range).map_err(PlanError::Sweep)?;
    Ok(sweep.generate_points())
}

/// Make sure `(k, w)` is simulated, and for the long final time.
fn force_long_run(plans: &mut Vec<StiffnessPlan>, k: f64, w: f64, long_final_time: f64) {
    let tol = Tolerances::default();
    let Some(plan) = plans.iter_mut().find(|p| nearly_equal(p.k, k, tol)) else {
        plans.push(StiffnessPlan {
            k,
            runs: vec![(w, long_final_time)],
        });
        return;
    };

    match plan.runs.iter_mut().find(|(f, _)| nearly_equal(*f, w, tol)) {
        Some(run) => run.1 = long_final_time,
        None => plan.runs.push((w, long_final_time)),
    }
}

/// Requests for the damped oscillator study: every integrator at every dt.
pub fn damped_requests(study: &DampedStudy) -> Result<Vec<SimulationRequest>, PlanError> {
    ensure_positive(study.mass, "mass")?;
    ensure_positive(study.final_time, "final_time")?;

    let dts = SweepDefinition::from_def(&study.dts)
        .map_err(PlanError::Sweep)?
        .generate_points();
    let params = DampedParams {
        mass: study.mass,
        stiffness: study.stiffness,
        damping: study.damping,
        amplitude: study.amplitude,
    };

    let mut requests = Vec::with_capacity(study.integrators.len() * dts.len());
    for &integrator in &study.integrators {
        for &dt in &dts {
            ensure_positive(dt, "dt")?;
            requests.push(SimulationRequest::damped(
                params,
                integrator,
                dt,
                study.sample_dt.max(dt),
                study.final_time,
            ));
        }
    }
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use osc_project::{AnimateDef, Integrator, SweepDef};
    use osc_runner::ScenarioParams;

    fn coupled(request: &SimulationRequest) -> CoupledParams {
        match request.scenario {
            ScenarioParams::Coupled(p) => p,
            ScenarioParams::Damped(_) => panic!("expected coupled request"),
        }
    }

    fn small_study() -> CoupledStudy {
        CoupledStudy {
            stiffnesses: vec![100.0],
            frequencies: FrequencyPlanDef::Ranges {
                ranges: vec![SweepDef::linear(5.0, 15.0, 11)],
            },
            animate: vec![],
            ..CoupledStudy::default()
        }
    }

    #[test]
    fn default_study_has_one_run_per_frequency() {
        let requests = coupled_requests(&CoupledStudy::default(), false).unwrap();
        // 5 stiffnesses x 50 frequencies, plus (100, 10) which is not on the 5..15 grid
        assert_eq!(requests.len(), 251);
        assert_eq!(coupled(&requests[0]).stiffness, 100.0);
        assert_eq!(coupled(&requests[250]).stiffness, 10000.0);
    }

    #[test]
    fn time_steps_follow_driving_period() {
        let requests = coupled_requests(&small_study(), false).unwrap();
        let at_five = &requests[0];
        assert_eq!(coupled(at_five).driving_frequency, 5.0);
        assert!((at_five.dt - 1.0 / 500.0).abs() < 1e-15);
        assert!((at_five.sample_dt - 1.0 / 50.0).abs() < 1e-15);
    }

    #[test]
    fn final_time_is_long_near_harmonics() {
        // first harmonic for k=100, m=0.001, N=100 is ~9.93
        let requests = coupled_requests(&small_study(), false).unwrap();
        for request in &requests {
            let w = coupled(request).driving_frequency;
            let expected = if (w - 9.93).abs() <= 1.0 { 100.0 } else { 10.0 };
            assert_eq!(request.final_time, expected, "w = {w}");
        }
    }

    #[test]
    fn animate_combos_are_forced_long() {
        let mut study = small_study();
        study.animate = vec![
            AnimateDef { k: 100.0, w: 15.0 },
            AnimateDef { k: 100.0, w: 12.5 },
            AnimateDef { k: 300.0, w: 20.0 },
        ];
        let requests = coupled_requests(&study, false).unwrap();
        assert_eq!(requests.len(), 13);

        let find = |k: f64, w: f64| {
            requests
                .iter()
                .find(|r| coupled(r).stiffness == k && coupled(r).driving_frequency == w)
                .unwrap()
        };
        assert_eq!(find(100.0, 15.0).final_time, 100.0);
        assert_eq!(find(100.0, 12.5).final_time, 100.0);
        assert_eq!(find(300.0, 20.0).final_time, 100.0);
        assert_eq!(coupled(requests.last().unwrap()).stiffness, 300.0);
    }

    #[test]
    fn ideal_frequencies_override_ranges() {
        let requests = coupled_requests(&small_study(), true).unwrap();
        let harmonics = chain_harmonics(100.0, 0.001, 100, 3);
        assert!(requests.len() > 11);
        assert!(
            requests
                .iter()
                .any(|r| (coupled(r).driving_frequency - harmonics[0]).abs() < 1e-9)
        );
    }

    #[test]
    fn missing_range_is_reported() {
        let mut study = small_study();
        study.stiffnesses.push(2000.0);
        let err = coupled_requests(&study, false).unwrap_err();
        assert_eq!(
            err,
            PlanError::RangeCount {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn damped_plan_crosses_integrators_and_steps() {
        let study = DampedStudy::default();
        let requests = damped_requests(&study).unwrap();
        assert_eq!(requests.len(), 15);
        assert_eq!(requests[0].integrator, Integrator::Verlet);
        assert_eq!(requests[14].integrator, Integrator::Gear);
        assert_eq!(requests[0].dt, 1e-6);
        assert_eq!(requests[0].sample_dt, 0.01);
        assert_eq!(requests[4].dt, 1e-2);
        assert_eq!(requests[4].sample_dt, 1e-2);
        assert!(requests.iter().all(|r| r.final_time == 5.0));
    }

    #[test]
    fn sample_step_never_below_integration_step() {
        let study = DampedStudy {
            sample_dt: 1e-3,
            dts: SweepDef::logarithmic(1e-4, 1e-1, 4),
            integrators: vec![Integrator::Beeman],
            ..DampedStudy::default()
        };
        for request in damped_requests(&study).unwrap() {
            assert!(request.sample_dt >= request.dt);
        }
    }
}
