//! State-vector helpers
//!
//! States are bare `Array1<Complex64>` column vectors. Normalization is a
//! convention of the caller, not something these helpers enforce.

use std::fmt::{self, Display};

use ndarray::Array1;
use num_complex::Complex64;

use crate::error::{Error, Result};

/// Computational basis state `|index⟩` on `qubit_count` qubits
pub fn basis_state(qubit_count: usize, index: usize) -> Result<Array1<Complex64>> {
    let dim = 1 << qubit_count;

    if index >= dim {
        return Err(Error::dimension("basis state index", dim, index));
    }

    let mut amplitudes = Array1::zeros(dim);
    amplitudes[index] = Complex64::new(1.0, 0.0);
    Ok(amplitudes)
}

/// The all-zero state `|00...0⟩`
pub fn zero_state(qubit_count: usize) -> Array1<Complex64> {
    let mut amplitudes = Array1::zeros(1 << qubit_count);
    amplitudes[0] = Complex64::new(1.0, 0.0);
    amplitudes
}

/// Whether `psi` has unit norm within `tolerance`
pub fn is_normalized(psi: &Array1<Complex64>, tolerance: f64) -> bool {
    let norm_sqr: f64 = psi.iter().map(|amp| amp.norm_sqr()).sum();
    (norm_sqr - 1.0).abs() < tolerance
}

/// Ket notation for a state vector, e.g. `(0.707107+0.000000i) |00⟩ [50.0%]`
pub struct Ket<'a>(pub &'a Array1<Complex64>);

impl Display for Ket<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let amplitudes = self.0;
        let width = amplitudes.len().max(2).next_power_of_two().trailing_zeros() as usize;
        let threshold = 1e-10;
        let mut has_entries = false;

        for (i, amp) in amplitudes.iter().enumerate() {
            let prob = amp.norm_sqr();
            if prob <= threshold {
                continue;
            }
            has_entries = true;

            let bit_string = format!("{:0width$b}", i, width = width);
            writeln!(
                f,
                "  ({:.6}{:+.6}i) |{}⟩ [{:.1}%]",
                amp.re, amp.im, bit_string, prob * 100.0
            )?;
        }

        if !has_entries {
            writeln!(f, "  (zero state)")?;
        }

        Ok(())
    }
}
