use crate::OscError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, OscError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(OscError::NonFinite { what, value: v })
    }
}

pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, OscError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(OscError::NonPositive { what, value: v })
    }
}

/// `num` evenly spaced values over `[start, end]`, endpoint included.
pub fn linspace(start: Real, end: Real, num: usize) -> Vec<Real> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num - 1) as Real;
            let mut points: Vec<Real> = (0..num).map(|i| start + i as Real * step).collect();
            points[num - 1] = end;
            points
        }
    }
}

/// Sort ascending and drop values that compare nearly equal to their predecessor.
pub fn sorted_unique(mut values: Vec<Real>, tol: Tolerances) -> Vec<Real> {
    values.retain(|v| v.is_finite());
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup_by(|b, a| nearly_equal(*a, *b, tol));
    values
}
