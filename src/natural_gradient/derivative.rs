//! Derivative vectors `∂ψ/∂θ_i` of an ansatz
//!
//! Both strategies return one vector per parameter, ordered by parameter
//! index and shaped like the base state, so the metric and solver never need
//! to know which one produced them.

use ndarray::Array1;
use num_complex::Complex64;
use rayon::prelude::*;

use crate::config::DerivativeStrategy;
use crate::error::{Error, Result};
use crate::quantum::ansatz::{prepare_state, Ansatz};

/// `theta` with `delta` added to component `index`
fn shifted(theta: &[f64], index: usize, delta: f64) -> Vec<f64> {
    let mut shifted = theta.to_vec();
    shifted[index] += delta;
    shifted
}

/// Derivative of the state along parameter `index`
///
/// `psi` must be `ansatz(theta)`; the forward difference reuses it as the
/// base point.
pub fn derivative<A: Ansatz + ?Sized>(
    theta: &[f64],
    psi: &Array1<Complex64>,
    ansatz: &A,
    strategy: DerivativeStrategy,
    index: usize,
) -> Result<Array1<Complex64>> {
    if index >= theta.len() {
        return Err(Error::dimension("derivative index", theta.len(), index));
    }

    let derivative = match strategy {
        DerivativeStrategy::FiniteDifference { step } => {
            let forward = prepare_state(ansatz, &shifted(theta, index, step))?;
            if forward.len() != psi.len() {
                return Err(Error::dimension("finite difference", psi.len(), forward.len()));
            }
            (forward - psi).mapv(|z| z / step)
        }
        DerivativeStrategy::ParameterShift { shift } => {
            let plus = prepare_state(ansatz, &shifted(theta, index, shift))?;
            let minus = prepare_state(ansatz, &shifted(theta, index, -shift))?;
            // For U(θ) = exp(-iθG) with G² = 1/4,
            // U(θ+s) - U(θ-s) = 4 sin(s/2) ∂U/∂θ
            let scale = 4.0 * (shift / 2.0).sin();
            (plus - minus).mapv(|z| z / scale)
        }
    };

    Ok(derivative)
}

/// All derivative vectors at `theta`, one per parameter
///
/// With `parallel` set the parameters are spread over the rayon pool; the
/// result is identical to the sequential one.
pub fn derivative_vectors<A: Ansatz + ?Sized>(
    theta: &[f64],
    psi: &Array1<Complex64>,
    ansatz: &A,
    strategy: DerivativeStrategy,
    parallel: bool,
) -> Result<Vec<Array1<Complex64>>> {
    let component = |index: usize| derivative(theta, psi, ansatz, strategy, index);

    if parallel {
        (0..theta.len()).into_par_iter().map(component).collect()
    } else {
        (0..theta.len()).map(component).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantum::ansatz::FnAnsatz;
    use crate::quantum::gate::{ParametrizedGate, QuantumGate};
    use crate::quantum::state::zero_state;

    fn ry_ansatz() -> impl Ansatz {
        FnAnsatz::new(2, |theta: &[f64]| ParametrizedGate::Ry(theta[0]).matrix().dot(&zero_state(1)))
            .with_parameter_count(1)
    }

    #[test]
    fn test_parameter_shift_is_exact_for_rotations() {
        let ansatz = ry_ansatz();
        let theta = [0.9];
        let psi = ansatz.evaluate(&theta);

        let d = derivative(&theta, &psi, &ansatz, DerivativeStrategy::parameter_shift(), 0).unwrap();

        // d/dθ (cos(θ/2), sin(θ/2)) = (-sin(θ/2)/2, cos(θ/2)/2)
        assert!((d[0].re + (0.45_f64).sin() / 2.0).abs() < 1e-14);
        assert!((d[1].re - (0.45_f64).cos() / 2.0).abs() < 1e-14);
    }

    #[test]
    fn test_finite_difference_error_is_first_order() {
        let ansatz = ry_ansatz();
        let theta = [0.9];
        let psi = ansatz.evaluate(&theta);

        let exact = derivative(&theta, &psi, &ansatz, DerivativeStrategy::parameter_shift(), 0).unwrap();
        let coarse = derivative(&theta, &psi, &ansatz, DerivativeStrategy::FiniteDifference { step: 1e-2 }, 0).unwrap();
        let fine = derivative(&theta, &psi, &ansatz, DerivativeStrategy::FiniteDifference { step: 1e-3 }, 0).unwrap();

        let err = |d: &Array1<Complex64>| (d - &exact).iter().map(|z| z.norm()).fold(0.0, f64::max);
        assert!(err(&fine) < 1e-3);
        assert!(err(&fine) < err(&coarse) / 5.0);
    }

    #[test]
    fn test_out_of_range_index() {
        let ansatz = ry_ansatz();
        let psi = ansatz.evaluate(&[0.0]);
        let result = derivative(&[0.0], &psi, &ansatz, DerivativeStrategy::finite_difference(), 1);
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }
}
