//! Quantum natural gradient
//!
//! One evaluation runs the pipeline
//!
//! ```text
//! θ ─► ansatz ─► ψ ─► derivative vectors g_i ─┬─► metric M ─┐
//!                                             └─► coupling C ┴─► x = M⁺ C
//! ```
//!
//! All shape and Hermiticity checks happen once at the entry of
//! [`NaturalGradient::evaluate`]; the stages below it assume valid input.
//!
//! # Example
//!
//! ```
//! use feynkac::prelude::*;
//! use ndarray::Array2;
//! use num_complex::Complex64;
//!
//! let ansatz = CircuitAnsatz::feynman_kac_example();
//! let diag = [1.0, 2.0, 3.0, 0.0];
//! let hamiltonian = Array2::from_shape_fn((4, 4), |(i, j)| {
//!     if i == j { Complex64::new(diag[i], 0.0) } else { Complex64::new(0.0, 0.0) }
//! });
//!
//! let theta = [std::f64::consts::FRAC_PI_2, 0.05];
//! let gradient = natural_gradient(&theta, &hamiltonian, &ansatz, &GradientConfig::default()).unwrap();
//! assert_eq!(gradient.len(), 2);
//! ```

pub mod derivative;
pub mod metric;
pub mod solver;

use log::trace;
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use serde::Serialize;

use crate::config::GradientConfig;
use crate::error::Result;
use crate::quantum::ansatz::{check_parameters, prepare_state, Ansatz};
use crate::quantum::linalg::{expectation, validate_hamiltonian};

pub use derivative::{derivative, derivative_vectors};
pub use metric::fubini_study_metric;
pub use solver::{energy_coupling, solve};

/// Everything computed during one natural-gradient evaluation
#[derive(Debug, Clone, Serialize)]
pub struct NaturalGradient {
    /// `⟨ψ|H|ψ⟩` at the evaluation point
    pub energy: f64,
    /// Fubini-Study metric `M`
    pub metric: Array2<f64>,
    /// Energy-coupling vector `C`
    pub coupling: Array1<f64>,
    /// Natural gradient `M⁺ C`
    pub gradient: Array1<f64>,
    /// Numerical rank of `M`
    pub rank: usize,
}

impl NaturalGradient {
    /// Evaluate the natural gradient of `⟨H⟩` at `theta`
    pub fn evaluate<A: Ansatz + ?Sized>(
        theta: &[f64],
        hamiltonian: &Array2<Complex64>,
        ansatz: &A,
        config: &GradientConfig,
    ) -> Result<Self> {
        config.validate()?;
        check_parameters(ansatz, theta)?;
        validate_hamiltonian(hamiltonian, ansatz.dimension(), config.hermiticity_tolerance)?;

        let psi = prepare_state(ansatz, theta)?;
        let energy = expectation(hamiltonian, &psi, config.hermiticity_tolerance)?;

        let derivatives = derivative_vectors(theta, &psi, ansatz, config.strategy, config.parallel)?;
        let metric = fubini_study_metric(&derivatives, &psi, config.symmetry_tolerance)?;
        let coupling = energy_coupling(hamiltonian, &psi, &derivatives)?;
        let (gradient, rank) = solve(&metric, &coupling, config.rcond)?;

        trace!("metric {:?}, coupling {:?}, gradient {:?}", metric, coupling, gradient);

        Ok(NaturalGradient {
            energy,
            metric,
            coupling,
            gradient,
            rank,
        })
    }

    /// Euclidean norm of the natural gradient
    pub fn norm(&self) -> f64 {
        self.gradient.dot(&self.gradient).sqrt()
    }
}

/// Natural gradient of `⟨H⟩` at `theta`
pub fn natural_gradient<A: Ansatz + ?Sized>(
    theta: &[f64],
    hamiltonian: &Array2<Complex64>,
    ansatz: &A,
    config: &GradientConfig,
) -> Result<Array1<f64>> {
    NaturalGradient::evaluate(theta, hamiltonian, ansatz, config).map(|step| step.gradient)
}
