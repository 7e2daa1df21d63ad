//! Error types shared across the crate

use thiserror::Error;

/// Errors raised at the boundaries of the natural-gradient machinery
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Two objects that must share a dimension do not
    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The Hamiltonian (or an expectation value computed from it) has an
    /// anti-Hermitian part larger than the configured tolerance
    #[error("Hamiltonian is not Hermitian: residual {residual:e} exceeds tolerance {tolerance:e}")]
    NonHermitian { residual: f64, tolerance: f64 },

    /// The assembled metric tensor is not symmetric, which points at a broken
    /// derivative estimate
    #[error("metric tensor is not symmetric: deviation {deviation:e} exceeds tolerance {tolerance:e}")]
    AsymmetricMetric { deviation: f64, tolerance: f64 },

    /// `tensor_product` was called without operands
    #[error("tensor product requires at least one operand")]
    EmptyTensorProduct,

    /// A configuration value is outside its valid domain
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn dimension(context: &'static str, expected: usize, actual: usize) -> Self {
        Error::DimensionMismatch { context, expected, actual }
    }
}
