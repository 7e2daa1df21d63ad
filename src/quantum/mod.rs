//! State vectors, gates and parametrized circuits
//!
//! Everything here works on dense `ndarray` arrays of `Complex64`; the
//! natural-gradient code builds on these primitives.

pub mod ansatz;
pub mod gate;
pub mod linalg;
pub mod pseudo_inverse;
pub mod state;

pub use ansatz::{check_parameters, prepare_state, Ansatz, CircuitAnsatz, FnAnsatz, LayerGate};
pub use gate::{ParametrizedGate, QuantumGate, StandardGate};
pub use linalg::{adjoint, expectation, inner_product, kron, tensor_product};
pub use pseudo_inverse::{pseudo_inverse, SymmetricEigen};
pub use state::{basis_state, zero_state, Ket};

/// Re-export commonly used types and traits
pub mod prelude {
    pub use super::{Ansatz, CircuitAnsatz, FnAnsatz, LayerGate};
    pub use super::{ParametrizedGate, QuantumGate, StandardGate};
    pub use super::{basis_state, zero_state, Ket};
}
