//! Fubini-Study metric tensor
//!
//! `M[i,j] = Re(⟨g_i|g_j⟩ − ⟨g_i|P|g_j⟩)` with `P = |ψ⟩⟨ψ|`. Only the real,
//! symmetric part of the quantum geometric tensor is kept; the imaginary
//! (Berry curvature) part does not enter the natural gradient.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::error::{Error, Result};
use crate::quantum::linalg::{inner_product, projector};

/// Largest `|M[i,j] − M[j,i]|`
pub fn asymmetry(m: &Array2<f64>) -> f64 {
    let n = m.nrows();
    let mut deviation = 0.0_f64;
    for i in 0..n {
        for j in (i + 1)..n {
            deviation = deviation.max((m[[i, j]] - m[[j, i]]).abs());
        }
    }
    deviation
}

/// Fail with `AsymmetricMetric` if `m` deviates from symmetry by more than
/// `tolerance` relative to its largest entry
pub fn check_symmetry(m: &Array2<f64>, tolerance: f64) -> Result<()> {
    let deviation = asymmetry(m);
    let scale = m.iter().fold(0.0_f64, |acc, x| acc.max(x.abs())).max(1.0);
    if deviation > tolerance * scale {
        return Err(Error::AsymmetricMetric { deviation, tolerance });
    }
    Ok(())
}

/// Assemble the metric from derivative vectors and the current state
///
/// Fails if a derivative vector is not shaped like `psi`, or if the result
/// is asymmetric beyond `symmetry_tolerance` relative to its largest entry.
/// The returned matrix is exactly symmetric.
pub fn fubini_study_metric(
    derivatives: &[Array1<Complex64>],
    psi: &Array1<Complex64>,
    symmetry_tolerance: f64,
) -> Result<Array2<f64>> {
    for g in derivatives {
        if g.len() != psi.len() {
            return Err(Error::dimension("derivative vector", psi.len(), g.len()));
        }
    }

    let k = derivatives.len();
    let p = projector(psi);
    let projected: Vec<Array1<Complex64>> = derivatives.iter().map(|g| p.dot(g)).collect();

    let mut metric = Array2::<f64>::zeros((k, k));
    for i in 0..k {
        for j in 0..k {
            metric[[i, j]] = (inner_product(&derivatives[i], &derivatives[j])
                - inner_product(&derivatives[i], &projected[j]))
            .re;
        }
    }

    check_symmetry(&metric, symmetry_tolerance)?;

    Ok((&metric + &metric.t()) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_derivative_along_state_has_zero_metric() {
        // a derivative parallel to ψ only changes the global phase/norm
        let psi = array![c(0.6, 0.0), c(0.0, 0.8)];
        let along = psi.mapv(|z| z * c(0.0, 1.0));
        let metric = fubini_study_metric(&[along], &psi, 1e-8).unwrap();
        assert!(metric[[0, 0]].abs() < 1e-14);
    }

    #[test]
    fn test_orthogonal_derivatives() {
        let psi = array![c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0)];
        let g0 = array![c(0.0, 0.0), c(0.5, 0.0), c(0.0, 0.0)];
        let g1 = array![c(0.0, 0.0), c(0.0, 0.0), c(0.0, 2.0)];

        let metric = fubini_study_metric(&[g0, g1], &psi, 1e-8).unwrap();
        assert_eq!(metric, array![[0.25, 0.0], [0.0, 4.0]]);
    }

    #[test]
    fn test_shape_mismatch() {
        let psi = array![c(1.0, 0.0), c(0.0, 0.0)];
        let g = array![c(0.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)];
        assert!(matches!(
            fubini_study_metric(&[g], &psi, 1e-8),
            Err(Error::DimensionMismatch { expected: 2, actual: 3, .. })
        ));
    }

    #[test]
    fn test_asymmetry() {
        let m = array![[1.0, 2.0], [2.5, 1.0]];
        assert_eq!(asymmetry(&m), 0.5);
    }

    #[test]
    fn test_asymmetric_metric_is_rejected() {
        // deviation 0.5 against a largest entry of 2.5
        let m = array![[1.0, 2.0], [2.5, 1.0]];

        assert_eq!(
            check_symmetry(&m, 0.1),
            Err(Error::AsymmetricMetric { deviation: 0.5, tolerance: 0.1 })
        );
        assert!(check_symmetry(&m, 0.25).is_ok());
        assert!(check_symmetry(&array![[1.0, 2.0], [2.0, 1.0]], 0.0).is_ok());
    }
}
