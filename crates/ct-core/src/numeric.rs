
/// Floating point type used throughout system
pub type Real = f64;

/// Tolerance used when comparing derived weight totals.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-9,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Conservation tolerance for weight sums in kilograms.
    pub const WEIGHT_KG: Tolerances = Tolerances {
        abs: 0.01,
        rel: 0.0,
    };
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Round to two decimals, the precision weights are reported with.
pub fn round2(v: Real) -> Real {
    (v * 100.0).round() / 100.0
}

/// Population variance; `None` for an empty slice.
pub fn population_variance(values: &[Real]) -> Option<Real> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as Real;
    let mean = values.iter().sum::<Real>() / n;
    Some(values.iter().map(|v| (v - mean).powi(2)).sum::<Real>() / n)
}
