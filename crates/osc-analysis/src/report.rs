//! Study-level aggregates built from interchange records.

use crate::amplitude::{amplitudes, displacement_trace, max_amplitude};
use crate::damped::{analytic_positions, mean_squared_error, squared_errors};
use crate::regression::{RegressionFit, fit_sqrt_law};
use crate::resonance::resonance_frequency;
use crate::{AnalysisError, AnalysisResult};
use osc_core::{Tolerances, nearly_equal};
use osc_project::{AnalysisDef, Integrator};
use osc_results::{ResultRecord, StaticParameters};
use osc_sweep::chain_harmonics;
use tracing::{debug, warn};

/// Max amplitude against driving frequency for one stiffness.
#[derive(Debug, Clone, PartialEq)]
pub struct ResonanceCurve {
    pub k: f64,
    /// Sorted ascending.
    pub frequencies: Vec<f64>,
    pub max_amplitudes: Vec<f64>,
    /// First normal mode of the chain.
    pub theoretical: Option<f64>,
    pub resonance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoupledReport {
    /// In order of first appearance in the records.
    pub curves: Vec<ResonanceCurve>,
    /// `(k, w0)` for every stiffness with a defined resonance, sorted by k.
    pub resonances: Vec<(f64, f64)>,
    pub fit: Option<RegressionFit>,
}

/// Per-sample amplitudes of a record, from the stored values or its positions.
pub fn record_amplitudes(record: &ResultRecord) -> Option<Vec<f64>> {
    match (&record.amplitudes, &record.positions) {
        (Some(stored), _) => Some(stored.clone()),
        (None, Some(positions)) => Some(amplitudes(positions)),
        (None, None) => None,
    }
}

pub fn analyze_coupled(
    records: &[ResultRecord],
    analysis: &AnalysisDef,
) -> AnalysisResult<CoupledReport> {
    let tol = Tolerances::default();
    let mut groups: Vec<(f64, Option<f64>, Vec<(f64, f64)>)> = Vec::new();

    for record in records {
        let StaticParameters::Coupled(params) = &record.parameters else {
            debug!(k = record.k, "Skipping non-coupled record");
            continue;
        };

        let index = match groups.iter().position(|(k, _, _)| nearly_equal(*k, record.k, tol)) {
            Some(index) => index,
            None => {
                let theoretical = (params.particle_count > 0)
                    .then(|| chain_harmonics(record.k, params.mass, params.particle_count, 1)[0]);
                groups.push((record.k, theoretical, Vec::new()));
                groups.len() - 1
            }
        };

        match record_amplitudes(record).as_deref().and_then(max_amplitude) {
            Some(peak) => groups[index].2.push((record.w, peak)),
            None => debug!(k = record.k, w = record.w, "Record has no amplitudes"),
        }
    }

    if groups.is_empty() {
        return Err(AnalysisError::Empty("coupled runs"));
    }

    let mut curves = Vec::with_capacity(groups.len());
    let mut resonances = Vec::new();
    for (k, theoretical, mut points) in groups {
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        let resonance = resonance_frequency(&points, analysis.peak_count);
        match resonance {
            Some(w0) => resonances.push((k, w0)),
            None => warn!(k, points = points.len(), "No resonance peak found, skipping stiffness"),
        }
        curves.push(ResonanceCurve {
            k,
            frequencies: points.iter().map(|p| p.0).collect(),
            max_amplitudes: points.iter().map(|p| p.1).collect(),
            theoretical,
            resonance,
        });
    }
    resonances.sort_by(|a, b| a.0.total_cmp(&b.0));

    let fit = if resonances.is_empty() {
        warn!("No resonances found, skipping regression");
        None
    } else {
        Some(fit_sqrt_law(&resonances, &analysis.regression)?)
    };

    Ok(CoupledReport {
        curves,
        resonances,
        fit,
    })
}

/// One integrator at one time step against the closed-form solution.
#[derive(Debug, Clone, PartialEq)]
pub struct DampedRun {
    pub integrator: Integrator,
    pub dt: f64,
    pub time: Vec<f64>,
    pub positions: Vec<f64>,
    pub analytic: Vec<f64>,
    pub squared_errors: Vec<f64>,
    pub mse: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DampedReport {
    /// Sorted by dt, then integrator.
    pub runs: Vec<DampedRun>,
}

impl DampedReport {
    /// Distinct time steps, ascending.
    pub fn dts(&self) -> Vec<f64> {
        osc_core::sorted_unique(self.runs.iter().map(|r| r.dt).collect(), Tolerances::default())
    }

    pub fn runs_at(&self, dt: f64) -> Vec<&DampedRun> {
        self.runs
            .iter()
            .filter(|r| nearly_equal(r.dt, dt, Tolerances::default()))
            .collect()
    }

    /// `(dt, mse)` per integrator, sorted by dt, integrators in declaration order.
    pub fn mse_by_integrator(&self) -> Vec<(Integrator, Vec<(f64, f64)>)> {
        let mut grouped: Vec<(Integrator, Vec<(f64, f64)>)> = Vec::new();
        for run in &self.runs {
            match grouped.iter_mut().find(|(i, _)| *i == run.integrator) {
                Some((_, points)) => points.push((run.dt, run.mse)),
                None => grouped.push((run.integrator, vec![(run.dt, run.mse)])),
            }
        }
        grouped.sort_by_key(|(integrator, _)| *integrator);
        for (_, points) in &mut grouped {
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
        }
        grouped
    }
}

pub fn analyze_damped(records: &[ResultRecord]) -> AnalysisResult<DampedReport> {
    let mut runs = Vec::new();

    for record in records {
        let StaticParameters::Damped(params) = &record.parameters else {
            debug!(k = record.k, "Skipping non-damped record");
            continue;
        };
        let Some(positions) = record
            .positions
            .as_deref()
            .and_then(|p| displacement_trace(p, 0))
        else {
            warn!(
                integrator = %params.integrator,
                dt = params.dt,
                "Record has no positions, skipping"
            );
            continue;
        };

        let analytic = analytic_positions(
            &record.time,
            params.mass,
            params.stiffness,
            params.damping,
            params.amplitude,
        );
        let errors = match squared_errors(&positions, &analytic) {
            Ok(errors) => errors,
            Err(err) => {
                warn!(
                    integrator = %params.integrator,
                    dt = params.dt,
                    error = %err,
                    "Trace does not match its time axis, skipping"
                );
                continue;
            }
        };
        let Some(mse) = mean_squared_error(&errors) else {
            warn!(integrator = %params.integrator, dt = params.dt, "Empty trace, skipping");
            continue;
        };

        runs.push(DampedRun {
            integrator: params.integrator,
            dt: params.dt,
            time: record.time.clone(),
            positions,
            analytic,
            squared_errors: errors,
            mse,
        });
    }

    if runs.is_empty() {
        return Err(AnalysisError::Empty("damped runs"));
    }

    runs.sort_by(|a, b| a.dt.total_cmp(&b.dt).then(a.integrator.cmp(&b.integrator)));
    Ok(DampedReport { runs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use osc_results::{CoupledStatic, DampedStatic};

    fn coupled(k: f64, w: f64, amplitude: f64) -> ResultRecord {
        ResultRecord {
            parameters: StaticParameters::Coupled(CoupledStatic {
                mass: 0.001,
                stiffness: k,
                amplitude: 0.01,
                lattice_spacing: 0.001,
                particle_count: 100,
                driving_frequency: w,
                dt: 1.0 / (100.0 * w),
                sample_dt: 1.0 / (10.0 * w),
                final_time: 10.0,
                integrator: Integrator::Verlet,
            }),
            time: vec![0.1, 0.2, 0.3],
            amplitudes: Some(vec![0.0, amplitude, amplitude / 2.0]),
            positions: None,
            k,
            w,
        }
    }

    fn damped(integrator: Integrator, dt: f64, offset: f64) -> ResultRecord {
        let params = DampedStatic {
            mass: 70.0,
            stiffness: 1e4,
            damping: 100.0,
            amplitude: 1.0,
            dt,
            sample_dt: 0.01,
            final_time: 5.0,
            integrator,
        };
        let time: Vec<f64> = (1..=50).map(|i| i as f64 * 0.01).collect();
        let exact = analytic_positions(&time, 70.0, 1e4, 100.0, 1.0);
        ResultRecord {
            parameters: StaticParameters::Damped(params),
            positions: Some(exact.iter().map(|x| vec![x + offset]).collect()),
            time,
            amplitudes: None,
            k: 1e4,
            w: 0.0,
        }
    }

    #[test]
    fn coupled_report_finds_resonance_per_stiffness() {
        let records = vec![
            coupled(100.0, 11.0, 0.02),
            coupled(100.0, 9.0, 0.03),
            coupled(100.0, 10.0, 0.5),
            coupled(400.0, 19.0, 0.1),
            coupled(400.0, 20.0, 0.9),
            coupled(400.0, 21.0, 0.2),
        ];
        let report = analyze_coupled(&records, &AnalysisDef::default()).unwrap();

        assert_eq!(report.curves.len(), 2);
        assert_eq!(report.curves[0].frequencies, vec![9.0, 10.0, 11.0]);
        assert_eq!(report.curves[0].max_amplitudes, vec![0.03, 0.5, 0.02]);
        assert!(report.curves[0].theoretical.is_some());
        assert_eq!(report.resonances, vec![(100.0, 10.0), (400.0, 20.0)]);

        let fit = report.fit.unwrap();
        assert!((fit.best_constant - 1.0).abs() < 1e-9);
    }

    #[test]
    fn stiffness_without_peak_is_skipped() {
        let records = vec![
            coupled(100.0, 9.0, 0.1),
            coupled(100.0, 10.0, 0.2),
            coupled(100.0, 11.0, 0.3),
        ];
        let report = analyze_coupled(&records, &AnalysisDef::default()).unwrap();
        assert_eq!(report.curves.len(), 1);
        assert_eq!(report.curves[0].resonance, None);
        assert!(report.resonances.is_empty());
        assert!(report.fit.is_none());
    }

    #[test]
    fn coupled_amplitudes_fall_back_to_positions() {
        let mut record = coupled(100.0, 10.0, 0.0);
        record.amplitudes = None;
        record.positions = Some(vec![vec![0.1, -0.4], vec![0.2, 0.0]]);
        assert_eq!(record_amplitudes(&record), Some(vec![0.4, 0.2]));
    }

    #[test]
    fn no_coupled_records_is_empty() {
        let records = vec![damped(Integrator::Verlet, 1e-3, 0.0)];
        assert_eq!(
            analyze_coupled(&records, &AnalysisDef::default()),
            Err(AnalysisError::Empty("coupled runs"))
        );
    }

    #[test]
    fn damped_report_groups_errors() {
        let records = vec![
            damped(Integrator::Gear, 1e-3, 0.1),
            damped(Integrator::Verlet, 1e-3, 0.2),
            damped(Integrator::Verlet, 1e-4, 0.0),
            damped(Integrator::Gear, 1e-4, 0.0),
        ];
        let report = analyze_damped(&records).unwrap();

        assert_eq!(report.dts(), vec![1e-4, 1e-3]);
        assert_eq!(report.runs_at(1e-3).len(), 2);
        assert_eq!(report.runs[0].integrator, Integrator::Verlet);
        assert_eq!(report.runs[0].mse, 0.0);

        let mse = report.mse_by_integrator();
        assert_eq!(mse.len(), 2);
        assert_eq!(mse[0].0, Integrator::Verlet);
        assert_eq!(mse[0].1[0], (1e-4, 0.0));
        assert!((mse[0].1[1].1 - 0.04).abs() < 1e-12);
        assert_eq!(mse[1].0, Integrator::Gear);
        assert!((mse[1].1[1].1 - 0.01).abs() < 1e-12);
    }

    #[test]
    fn damped_record_without_positions_is_skipped() {
        let mut bare = damped(Integrator::Beeman, 1e-3, 0.0);
        bare.positions = None;
        let records = vec![bare, damped(Integrator::Verlet, 1e-3, 0.0)];
        let report = analyze_damped(&records).unwrap();
        assert_eq!(report.runs.len(), 1);
    }

    #[test]
    fn damped_record_with_short_trace_is_skipped() {
        let mut short = damped(Integrator::Gear, 1e-3, 0.0);
        if let Some(positions) = short.positions.as_mut() {
            positions.truncate(10);
        }
        let records = vec![short, damped(Integrator::Verlet, 1e-3, 0.0)];
        let report = analyze_damped(&records).unwrap();
        assert_eq!(report.runs.len(), 1);
        assert_eq!(report.runs[0].integrator, Integrator::Verlet);
    }
}
