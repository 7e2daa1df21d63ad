//! Quantum gate library
//!
//! Gates are plain matrix constructors used to assemble ansatz circuits.
//! Qubit order is big-endian: in a two-qubit gate the first qubit is the
//! most significant bit of the basis index, so `CNOT` and `CRy` are
//! controlled on qubit 0.

use std::fmt::Debug;

use ndarray::{array, Array2};
use num_complex::Complex64;

use super::linalg;

/// Common complex numbers used in quantum gates
pub mod constants {
    use num_complex::Complex64;

    /// The imaginary unit i
    pub const I: Complex64 = Complex64::new(0.0, 1.0);

    /// Complex zero
    pub const ZERO: Complex64 = Complex64::new(0.0, 0.0);

    /// Complex one
    pub const ONE: Complex64 = Complex64::new(1.0, 0.0);

    /// 1/sqrt(2)
    pub const FRAC_1_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;
}

/// Trait for quantum gates
pub trait QuantumGate: Debug + Send + Sync {
    /// Returns the number of qubits this gate acts on
    fn qubit_count(&self) -> usize;

    /// Returns the matrix representation of this gate
    fn matrix(&self) -> Array2<Complex64>;

    /// Create a clone of this gate
    fn clone_box(&self) -> Box<dyn QuantumGate>;
}

impl Clone for Box<dyn QuantumGate> {
    fn clone(&self) -> Box<dyn QuantumGate> {
        self.clone_box()
    }
}

/// Fixed (non-parametrized) gates
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StandardGate {
    /// Identity on the given number of qubits
    I(usize),

    /// Pauli-X gate
    X,

    /// Pauli-Y gate
    Y,

    /// Pauli-Z gate
    Z,

    /// Hadamard gate
    H,

    /// CNOT gate, control on the first qubit
    CNOT,
}

impl QuantumGate for StandardGate {
    fn qubit_count(&self) -> usize {
        match self {
            StandardGate::I(n) => *n,
            StandardGate::X | StandardGate::Y | StandardGate::Z | StandardGate::H => 1,
            StandardGate::CNOT => 2,
        }
    }

    fn matrix(&self) -> Array2<Complex64> {
        use constants::*;
        match self {
            StandardGate::I(n) => linalg::identity(1 << n),
            StandardGate::X => array![[ZERO, ONE], [ONE, ZERO]],
            StandardGate::Y => array![[ZERO, -I], [I, ZERO]],
            StandardGate::Z => array![[ONE, ZERO], [ZERO, -ONE]],
            StandardGate::H => {
                let factor = Complex64::new(FRAC_1_SQRT_2, 0.0);
                array![[factor, factor], [factor, -factor]]
            }
            StandardGate::CNOT => array![
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, ONE, ZERO, ZERO],
                [ZERO, ZERO, ZERO, ONE],
                [ZERO, ZERO, ONE, ZERO]
            ],
        }
    }

    fn clone_box(&self) -> Box<dyn QuantumGate> {
        Box::new(self.clone())
    }
}

/// Gates with a single real angle
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParametrizedGate {
    /// Rotation around X-axis, `exp(-iθX/2)`
    Rx(f64),

    /// Rotation around Y-axis, `exp(-iθY/2)`
    Ry(f64),

    /// Rotation around Z-axis, `exp(-iθZ/2)`
    Rz(f64),

    /// Ry on the second qubit controlled by the first
    CRy(f64),

    /// Phase gate `diag(1, e^{iφ})`
    Phase(f64),
}

impl QuantumGate for ParametrizedGate {
    fn qubit_count(&self) -> usize {
        match self {
            ParametrizedGate::Rx(_)
            | ParametrizedGate::Ry(_)
            | ParametrizedGate::Rz(_)
            | ParametrizedGate::Phase(_) => 1,
            ParametrizedGate::CRy(_) => 2,
        }
    }

    fn matrix(&self) -> Array2<Complex64> {
        use constants::*;
        match *self {
            ParametrizedGate::Rx(theta) => {
                let cos = (theta / 2.0).cos();
                let sin = (theta / 2.0).sin();
                array![
                    [Complex64::new(cos, 0.0), Complex64::new(0.0, -sin)],
                    [Complex64::new(0.0, -sin), Complex64::new(cos, 0.0)]
                ]
            }
            ParametrizedGate::Ry(theta) => {
                let cos = (theta / 2.0).cos();
                let sin = (theta / 2.0).sin();
                array![
                    [Complex64::new(cos, 0.0), Complex64::new(-sin, 0.0)],
                    [Complex64::new(sin, 0.0), Complex64::new(cos, 0.0)]
                ]
            }
            ParametrizedGate::Rz(theta) => {
                let phase_neg = Complex64::new(0.0, -theta / 2.0).exp();
                let phase_pos = Complex64::new(0.0, theta / 2.0).exp();
                array![[phase_neg, ZERO], [ZERO, phase_pos]]
            }
            ParametrizedGate::CRy(theta) => {
                let cos = Complex64::new((theta / 2.0).cos(), 0.0);
                let sin = Complex64::new((theta / 2.0).sin(), 0.0);
                array![
                    [ONE, ZERO, ZERO, ZERO],
                    [ZERO, ONE, ZERO, ZERO],
                    [ZERO, ZERO, cos, -sin],
                    [ZERO, ZERO, sin, cos]
                ]
            }
            ParametrizedGate::Phase(phi) => {
                array![[ONE, ZERO], [ZERO, Complex64::new(0.0, phi).exp()]]
            }
        }
    }

    fn clone_box(&self) -> Box<dyn QuantumGate> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_matrix_size_matches_qubit_count() {
        let gates: Vec<Box<dyn QuantumGate>> = vec![
            Box::new(ParametrizedGate::Rx(0.3)),
            Box::new(ParametrizedGate::Ry(-1.2)),
            Box::new(ParametrizedGate::Rz(2.5)),
            Box::new(ParametrizedGate::CRy(0.7)),
            Box::new(ParametrizedGate::Phase(PI / 3.0)),
            Box::new(StandardGate::Y),
            Box::new(StandardGate::I(3)),
            Box::new(StandardGate::CNOT),
        ];

        for gate in gates.clone() {
            let dim = 1 << gate.qubit_count();
            assert_eq!(gate.matrix().dim(), (dim, dim), "{:?} has the wrong size", gate);
        }
        assert_eq!(gates[3].clone().matrix(), ParametrizedGate::CRy(0.7).matrix());
    }

    #[test]
    fn test_gates_are_unitary() {
        let gates: Vec<Box<dyn QuantumGate>> = vec![
            Box::new(StandardGate::H),
            Box::new(StandardGate::I(2)),
            Box::new(ParametrizedGate::Rx(1.1)),
            Box::new(ParametrizedGate::CRy(-0.4)),
            Box::new(ParametrizedGate::Phase(0.9)),
        ];

        for gate in gates {
            let m = gate.matrix();
            let product = linalg::adjoint(&m).dot(&m);
            let identity = linalg::identity(m.nrows());
            let diff: f64 = (&product - &identity).iter().map(|z| z.norm()).sum();
            assert!(diff < 1e-12, "{:?} is not unitary", gate);
        }
    }

    #[test]
    fn test_rx_pi_is_x_up_to_phase() {
        let rx = ParametrizedGate::Rx(PI).matrix();
        let x = StandardGate::X.matrix().mapv(|z| z * -constants::I);
        let diff: f64 = (&rx - &x).iter().map(|z| z.norm()).sum();
        assert!(diff < 1e-12);
    }
}
