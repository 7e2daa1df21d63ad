//! Energy-coupling vector and the pseudo-inverse solve `M · x = C`

use log::warn;
use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::error::{Error, Result};
use crate::quantum::linalg::inner_product;
use crate::quantum::pseudo_inverse::pseudo_inverse_with_rank;

/// `C[i] = Re⟨g_i|H|ψ⟩`, half the Euclidean energy gradient for normalized ψ
pub fn energy_coupling(
    hamiltonian: &Array2<Complex64>,
    psi: &Array1<Complex64>,
    derivatives: &[Array1<Complex64>],
) -> Result<Array1<f64>> {
    if hamiltonian.ncols() != psi.len() {
        return Err(Error::dimension("Hamiltonian and state", hamiltonian.ncols(), psi.len()));
    }

    let h_psi = hamiltonian.dot(psi);
    derivatives
        .iter()
        .map(|g| {
            if g.len() != h_psi.len() {
                return Err(Error::dimension("derivative vector", h_psi.len(), g.len()));
            }
            Ok(inner_product(g, &h_psi).re)
        })
        .collect::<Result<Vec<f64>>>()
        .map(Array1::from)
}

/// Minimum-norm least-squares solution of `metric · x = coupling`
///
/// Returns the solution and the numerical rank of the metric. A
/// rank-deficient metric is not an error; the dropped directions simply get
/// no component in `x`.
pub fn solve(metric: &Array2<f64>, coupling: &Array1<f64>, rcond: f64) -> Result<(Array1<f64>, usize)> {
    let (rows, cols) = metric.dim();
    if rows != coupling.len() {
        return Err(Error::dimension("metric and coupling vector", rows, coupling.len()));
    }

    let (pinv, rank) = pseudo_inverse_with_rank(metric, rcond);
    if rank < rows.min(cols) {
        warn!(
            "metric tensor is rank deficient ({} of {}), using minimum-norm solution",
            rank,
            rows.min(cols)
        );
    }

    Ok((pinv.dot(coupling), rank))
}
