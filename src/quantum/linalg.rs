//! Linear algebra primitives over complex vectors and matrices
//!
//! State vectors are column vectors stored as `Array1<Complex64>`. Every inner
//! product returns a plain `Complex64`, never a 1×1 matrix.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::error::{Error, Result};

/// Identity matrix of dimension `dim`
pub fn identity(dim: usize) -> Array2<Complex64> {
    Array2::from_diag(&Array1::from_elem(dim, Complex64::new(1.0, 0.0)))
}

/// Kronecker product of two matrices
pub fn kron(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Array2<Complex64> {
    let (a_rows, a_cols) = a.dim();
    let (b_rows, b_cols) = b.dim();

    let mut result = Array2::zeros((a_rows * b_rows, a_cols * b_cols));

    for i in 0..a_rows {
        for j in 0..a_cols {
            let factor = a[[i, j]];
            if factor == Complex64::new(0.0, 0.0) {
                continue;
            }
            for k in 0..b_rows {
                for l in 0..b_cols {
                    result[[i * b_rows + k, j * b_cols + l]] = factor * b[[k, l]];
                }
            }
        }
    }

    result
}

/// Left-to-right Kronecker product of an ordered sequence of matrices
///
/// `tensor_product(&[a, b, c])` is `(a ⊗ b) ⊗ c`.
pub fn tensor_product(matrices: &[Array2<Complex64>]) -> Result<Array2<Complex64>> {
    let (first, rest) = matrices.split_first().ok_or(Error::EmptyTensorProduct)?;

    Ok(rest.iter().fold(first.clone(), |acc, m| kron(&acc, m)))
}

/// Conjugate transpose
pub fn adjoint(m: &Array2<Complex64>) -> Array2<Complex64> {
    m.t().mapv(|z| z.conj())
}

/// `⟨a|b⟩ = a† · b`
///
/// # Panics
///
/// Panics if the vectors have different lengths.
pub fn inner_product(a: &Array1<Complex64>, b: &Array1<Complex64>) -> Complex64 {
    assert_eq!(a.len(), b.len(), "Dimension mismatch in inner product");

    a.iter()
        .zip(b.iter())
        .fold(Complex64::new(0.0, 0.0), |acc, (x, y)| acc + x.conj() * y)
}

/// Euclidean norm of a state vector
pub fn norm(psi: &Array1<Complex64>) -> f64 {
    psi.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
}

/// Projector `|ψ⟩⟨ψ|`
pub fn projector(psi: &Array1<Complex64>) -> Array2<Complex64> {
    let n = psi.len();
    Array2::from_shape_fn((n, n), |(i, j)| psi[i] * psi[j].conj())
}

/// Largest element-wise deviation `|H[i,j] − conj(H[j,i])|`
pub fn hermiticity_residual(h: &Array2<Complex64>) -> f64 {
    let (rows, cols) = h.dim();
    if rows != cols {
        return f64::INFINITY;
    }

    let mut residual = 0.0_f64;
    for i in 0..rows {
        for j in i..cols {
            residual = residual.max((h[[i, j]] - h[[j, i]].conj()).norm());
        }
    }
    residual
}

/// Whether `h` is square and Hermitian within `tolerance`
pub fn is_hermitian(h: &Array2<Complex64>, tolerance: f64) -> bool {
    hermiticity_residual(h) <= tolerance
}

/// Check that `h` is a square Hermitian matrix of dimension `dim`
pub fn validate_hamiltonian(h: &Array2<Complex64>, dim: usize, tolerance: f64) -> Result<()> {
    let (rows, cols) = h.dim();
    if rows != cols {
        return Err(Error::dimension("Hamiltonian columns", rows, cols));
    }
    if rows != dim {
        return Err(Error::dimension("Hamiltonian dimension", dim, rows));
    }

    let residual = hermiticity_residual(h);
    if residual > tolerance {
        return Err(Error::NonHermitian { residual, tolerance });
    }

    Ok(())
}

/// `Re⟨ψ|H|ψ⟩` without looking at the discarded imaginary part
pub fn expectation_unchecked(h: &Array2<Complex64>, psi: &Array1<Complex64>) -> f64 {
    inner_product(psi, &h.dot(psi)).re
}

/// `⟨ψ|H|ψ⟩`, rejecting results whose imaginary part exceeds `tolerance`
/// (scaled by the magnitude of the value)
pub fn expectation(h: &Array2<Complex64>, psi: &Array1<Complex64>, tolerance: f64) -> Result<f64> {
    if h.nrows() != h.ncols() {
        return Err(Error::dimension("Hamiltonian columns", h.nrows(), h.ncols()));
    }
    if h.ncols() != psi.len() {
        return Err(Error::dimension("expectation value", h.ncols(), psi.len()));
    }

    let value = inner_product(psi, &h.dot(psi));
    let scale = value.norm().max(1.0);
    if value.im.abs() > tolerance * scale {
        return Err(Error::NonHermitian {
            residual: value.im.abs(),
            tolerance,
        });
    }

    Ok(value.re)
}
