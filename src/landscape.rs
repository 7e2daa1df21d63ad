//! Energy landscape of a two-parameter ansatz
//!
//! Samples `⟨H⟩` on a square grid so an evolved trajectory can be checked
//! against the surface it is supposed to descend.

use std::f64::consts::PI;

use log::debug;
use ndarray::Array2;
use num_complex::Complex64;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::quantum::ansatz::{check_parameters, prepare_state, Ansatz};
use crate::quantum::linalg::{expectation_unchecked, validate_hamiltonian};

/// Default sampling interval for each parameter
pub const DEFAULT_RANGE: (f64, f64) = (-PI, PI);

/// Default grid spacing
pub const DEFAULT_RESOLUTION: f64 = 0.1;

/// Energies on a square parameter grid
///
/// `energies[[i, j]]` is the energy at `θ = (axis[i], axis[j])`.
#[derive(Debug, Clone, Serialize)]
pub struct EnergyLandscape {
    pub axis: Vec<f64>,
    pub energies: Array2<f64>,
}

impl EnergyLandscape {
    /// Sample over `[DEFAULT_RANGE)` with `DEFAULT_RESOLUTION` spacing
    pub fn sample_default<A: Ansatz + ?Sized>(
        hamiltonian: &Array2<Complex64>,
        ansatz: &A,
        tolerance: f64,
    ) -> Result<Self> {
        Self::sample(hamiltonian, ansatz, DEFAULT_RANGE, DEFAULT_RESOLUTION, tolerance)
    }

    /// Sample `⟨H⟩` on the grid `start, start + resolution, …` below `end`
    ///
    /// `tolerance` bounds the anti-Hermitian residual of the Hamiltonian.
    pub fn sample<A: Ansatz + ?Sized>(
        hamiltonian: &Array2<Complex64>,
        ansatz: &A,
        range: (f64, f64),
        resolution: f64,
        tolerance: f64,
    ) -> Result<Self> {
        let (start, end) = range;
        if !(resolution > 0.0 && resolution.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "landscape resolution must be positive, got {}",
                resolution
            )));
        }
        if !(start.is_finite() && end.is_finite() && end > start) {
            return Err(Error::InvalidConfig(format!(
                "landscape range [{}, {}) is empty",
                start, end
            )));
        }

        check_parameters(ansatz, &[start, start])?;
        validate_hamiltonian(hamiltonian, ansatz.dimension(), tolerance)?;

        let points = ((end - start) / resolution).ceil() as usize;
        let axis: Vec<f64> = (0..points).map(|i| start + i as f64 * resolution).collect();
        debug!("sampling a {}x{} energy landscape", points, points);

        let rows = axis
            .par_iter()
            .map(|&a| {
                axis.iter()
                    .map(|&b| {
                        prepare_state(ansatz, &[a, b]).map(|psi| expectation_unchecked(hamiltonian, &psi))
                    })
                    .collect::<Result<Vec<f64>>>()
            })
            .collect::<Result<Vec<Vec<f64>>>>()?;

        let energies = Array2::from_shape_fn((points, points), |(i, j)| rows[i][j]);
        Ok(EnergyLandscape { axis, energies })
    }

    /// Lowest sampled energy and the parameters where it occurs
    pub fn minimum(&self) -> (f64, [f64; 2]) {
        let mut best = (f64::INFINITY, [0.0, 0.0]);
        for ((i, j), &energy) in self.energies.indexed_iter() {
            if energy < best.0 {
                best = (energy, [self.axis[i], self.axis[j]]);
            }
        }
        best
    }

    /// Energy at the grid point nearest `theta`, if it lies on the grid
    pub fn nearest(&self, theta: [f64; 2]) -> Option<f64> {
        let index = |value: f64| -> Option<usize> {
            let first = *self.axis.first()?;
            let step = if self.axis.len() > 1 { self.axis[1] - first } else { 1.0 };
            let i = ((value - first) / step).round();
            if i < 0.0 || i as usize >= self.axis.len() {
                None
            } else {
                Some(i as usize)
            }
        };
        Some(self.energies[[index(theta[0])?, index(theta[1])?]])
    }
}
