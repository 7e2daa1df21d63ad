//! Moore-Penrose pseudo-inverse of real matrices
//!
//! Symmetric input is diagonalized with the cyclic Jacobi method,
//! `A = V Λ Vᵀ`, and inverted as `A⁺ = V Λ⁺ Vᵀ` where eigenvalues with
//! `|λ| <= rcond · max|λ|` are dropped. Other shapes go through the normal
//! equations, `A⁺ = (AᵀA)⁺ Aᵀ`. Singular input never fails; the dropped
//! directions give the minimum-norm least-squares solution.

use ndarray::{Array1, Array2};

const MAX_SWEEPS: usize = 64;

/// Eigen-decomposition of a real symmetric matrix
#[derive(Debug, Clone)]
pub struct SymmetricEigen {
    /// Eigenvalues, unordered
    pub eigenvalues: Array1<f64>,
    /// Eigenvectors as columns, matching `eigenvalues`
    pub eigenvectors: Array2<f64>,
}

impl SymmetricEigen {
    /// Diagonalize `matrix`, which must be square and symmetric
    ///
    /// Only the upper triangle's symmetry is assumed, not checked.
    pub fn new(matrix: &Array2<f64>) -> Self {
        let n = matrix.nrows();
        let mut a = matrix.clone();
        let mut v = Array2::<f64>::eye(n);

        let frobenius = a.iter().map(|x| x * x).sum::<f64>().sqrt();
        let threshold = (f64::EPSILON * frobenius).powi(2);

        for _ in 0..MAX_SWEEPS {
            let mut off_diagonal = 0.0;
            for p in 0..n {
                for q in (p + 1)..n {
                    off_diagonal += a[[p, q]] * a[[p, q]];
                }
            }
            if off_diagonal <= threshold {
                break;
            }

            for p in 0..n {
                for q in (p + 1)..n {
                    let apq = a[[p, q]];
                    if apq == 0.0 {
                        continue;
                    }

                    let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                    let t = if theta.abs() > 1e150 {
                        0.5 / theta
                    } else {
                        theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt())
                    };
                    let c = 1.0 / (t * t + 1.0).sqrt();
                    let s = t * c;

                    rotate(&mut a, &mut v, p, q, c, s);
                }
            }
        }

        SymmetricEigen {
            eigenvalues: a.diag().to_owned(),
            eigenvectors: v,
        }
    }

    /// Largest absolute eigenvalue
    pub fn spectral_radius(&self) -> f64 {
        self.eigenvalues.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()))
    }

    /// Number of eigenvalues above the relative cutoff
    pub fn rank(&self, rcond: f64) -> usize {
        let cutoff = rcond * self.spectral_radius();
        self.eigenvalues.iter().filter(|x| x.abs() > cutoff).count()
    }
}

// A ← JᵀAJ, V ← VJ for the Givens rotation J acting on (p, q)
fn rotate(a: &mut Array2<f64>, v: &mut Array2<f64>, p: usize, q: usize, c: f64, s: f64) {
    let n = a.nrows();

    for k in 0..n {
        let akp = a[[k, p]];
        let akq = a[[k, q]];
        a[[k, p]] = c * akp - s * akq;
        a[[k, q]] = s * akp + c * akq;
    }
    for k in 0..n {
        let apk = a[[p, k]];
        let aqk = a[[q, k]];
        a[[p, k]] = c * apk - s * aqk;
        a[[q, k]] = s * apk + c * aqk;
    }
    a[[p, q]] = 0.0;
    a[[q, p]] = 0.0;

    for k in 0..n {
        let vkp = v[[k, p]];
        let vkq = v[[k, q]];
        v[[k, p]] = c * vkp - s * vkq;
        v[[k, q]] = s * vkp + c * vkq;
    }
}

/// Whether `m` is square and symmetric up to `tolerance` relative to its
/// largest entry
pub fn is_symmetric(m: &Array2<f64>, tolerance: f64) -> bool {
    let (rows, cols) = m.dim();
    if rows != cols {
        return false;
    }
    let scale = m.iter().fold(0.0_f64, |acc, x| acc.max(x.abs())).max(1.0);
    for i in 0..rows {
        for j in (i + 1)..cols {
            if (m[[i, j]] - m[[j, i]]).abs() > tolerance * scale {
                return false;
            }
        }
    }
    true
}

/// Pseudo-inverse of `m` together with its numerical rank
pub fn pseudo_inverse_with_rank(m: &Array2<f64>, rcond: f64) -> (Array2<f64>, usize) {
    if m.is_empty() {
        return (Array2::zeros((m.ncols(), m.nrows())), 0);
    }

    if is_symmetric(m, 1e-12) {
        return symmetric_pseudo_inverse(m, rcond);
    }

    let mt = m.t().to_owned();
    let gram = mt.dot(m);
    let (gram_pinv, rank) = symmetric_pseudo_inverse(&gram, rcond * rcond);
    (gram_pinv.dot(&mt), rank)
}

/// Moore-Penrose pseudo-inverse of `m`
pub fn pseudo_inverse(m: &Array2<f64>, rcond: f64) -> Array2<f64> {
    pseudo_inverse_with_rank(m, rcond).0
}

fn symmetric_pseudo_inverse(m: &Array2<f64>, rcond: f64) -> (Array2<f64>, usize) {
    let n = m.nrows();
    let eigen = SymmetricEigen::new(m);
    let cutoff = rcond * eigen.spectral_radius();

    let mut result = Array2::<f64>::zeros((n, n));
    let mut rank = 0;

    for (k, &lambda) in eigen.eigenvalues.iter().enumerate() {
        if lambda.abs() <= cutoff || lambda == 0.0 {
            continue;
        }
        rank += 1;

        let inv = 1.0 / lambda;
        for i in 0..n {
            let vik = eigen.eigenvectors[[i, k]] * inv;
            for j in 0..n {
                result[[i, j]] += vik * eigen.eigenvectors[[j, k]];
            }
        }
    }

    (result, rank)
}
