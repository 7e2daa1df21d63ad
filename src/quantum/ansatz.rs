//! Parametrized state preparation
//!
//! An [`Ansatz`] is a pure map from a real parameter vector to a complex
//! state vector of fixed, declared dimension. The natural-gradient code only
//! ever talks to this trait; [`FnAnsatz`] wraps a closure and
//! [`CircuitAnsatz`] builds states from layers of gates.

use std::f64::consts::PI;
use std::fmt;

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use rand::Rng;

use super::gate::{ParametrizedGate, QuantumGate, StandardGate};
use super::linalg;
use super::state::zero_state;
use crate::error::{Error, Result};

/// A pure function from parameters to a state vector
pub trait Ansatz: Sync {
    /// Length of every state vector this ansatz produces
    fn dimension(&self) -> usize;

    /// Number of parameters, if the ansatz declares one
    fn parameter_count(&self) -> Option<usize> {
        None
    }

    /// Prepare the state for `theta`
    ///
    /// Must return the same vector for the same input.
    fn evaluate(&self, theta: &[f64]) -> Array1<Complex64>;
}

impl<A: Ansatz + ?Sized> Ansatz for &A {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn parameter_count(&self) -> Option<usize> {
        (**self).parameter_count()
    }

    fn evaluate(&self, theta: &[f64]) -> Array1<Complex64> {
        (**self).evaluate(theta)
    }
}

impl<A: Ansatz + ?Sized> Ansatz for Box<A> {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn parameter_count(&self) -> Option<usize> {
        (**self).parameter_count()
    }

    fn evaluate(&self, theta: &[f64]) -> Array1<Complex64> {
        (**self).evaluate(theta)
    }
}

/// Check `theta` against the ansatz's declared parameter count
pub fn check_parameters<A: Ansatz + ?Sized>(ansatz: &A, theta: &[f64]) -> Result<()> {
    match ansatz.parameter_count() {
        Some(expected) if expected != theta.len() => {
            Err(Error::dimension("parameter vector", expected, theta.len()))
        }
        _ => Ok(()),
    }
}

/// Evaluate the ansatz and verify the output has the declared dimension
pub fn prepare_state<A: Ansatz + ?Sized>(ansatz: &A, theta: &[f64]) -> Result<Array1<Complex64>> {
    let psi = ansatz.evaluate(theta);
    if psi.len() != ansatz.dimension() {
        return Err(Error::dimension("ansatz output", ansatz.dimension(), psi.len()));
    }
    Ok(psi)
}

/// Ansatz backed by a closure
pub struct FnAnsatz<F> {
    dimension: usize,
    parameter_count: Option<usize>,
    prepare: F,
}

impl<F> FnAnsatz<F>
where
    F: Fn(&[f64]) -> Array1<Complex64> + Sync,
{
    /// Wrap `prepare`, which must return vectors of length `dimension`
    pub fn new(dimension: usize, prepare: F) -> Self {
        FnAnsatz { dimension, parameter_count: None, prepare }
    }

    /// Declare the number of parameters so callers get a shape check
    pub fn with_parameter_count(mut self, parameter_count: usize) -> Self {
        self.parameter_count = Some(parameter_count);
        self
    }
}

impl<F> Ansatz for FnAnsatz<F>
where
    F: Fn(&[f64]) -> Array1<Complex64> + Sync,
{
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn parameter_count(&self) -> Option<usize> {
        self.parameter_count
    }

    fn evaluate(&self, theta: &[f64]) -> Array1<Complex64> {
        (self.prepare)(theta)
    }
}

impl<F> fmt::Debug for FnAnsatz<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAnsatz")
            .field("dimension", &self.dimension)
            .field("parameter_count", &self.parameter_count)
            .finish()
    }
}

/// One tensor factor of a circuit layer
#[derive(Debug, Clone)]
pub enum LayerGate {
    /// A gate with no free parameters
    Fixed(Box<dyn QuantumGate>),

    /// A gate whose angle is `theta[parameter]`
    Parametrized {
        gate: fn(f64) -> ParametrizedGate,
        parameter: usize,
    },
}

impl LayerGate {
    /// Fixed gate
    pub fn fixed<G: QuantumGate + 'static>(gate: G) -> Self {
        LayerGate::Fixed(Box::new(gate))
    }

    /// Identity on `qubits` qubits
    pub fn identity(qubits: usize) -> Self {
        LayerGate::fixed(StandardGate::I(qubits))
    }

    /// Gate driven by parameter `parameter`, e.g. `LayerGate::param(ParametrizedGate::Rx, 0)`
    pub fn param(gate: fn(f64) -> ParametrizedGate, parameter: usize) -> Self {
        LayerGate::Parametrized { gate, parameter }
    }

    fn qubit_count(&self) -> usize {
        match self {
            LayerGate::Fixed(gate) => gate.qubit_count(),
            LayerGate::Parametrized { gate, .. } => gate(0.0).qubit_count(),
        }
    }

    fn matrix(&self, theta: &[f64]) -> Array2<Complex64> {
        match self {
            LayerGate::Fixed(gate) => gate.matrix(),
            LayerGate::Parametrized { gate, parameter } => gate(theta[*parameter]).matrix(),
        }
    }
}

/// A circuit ansatz: layers applied in order to `|0...0⟩`
///
/// Each layer is a tensor product of gates that together span every qubit,
/// so the prepared state is `L_n ⋯ L_1 |0...0⟩` with
/// `L_k = g_{k,1} ⊗ g_{k,2} ⊗ ⋯`.
#[derive(Debug, Clone)]
pub struct CircuitAnsatz {
    qubit_count: usize,
    parameter_count: usize,
    layers: Vec<Vec<LayerGate>>,
}

impl CircuitAnsatz {
    /// Empty circuit on `qubit_count` qubits
    pub fn new(qubit_count: usize) -> Self {
        CircuitAnsatz {
            qubit_count,
            parameter_count: 0,
            layers: Vec::new(),
        }
    }

    /// Append a layer; its gates must cover exactly `qubit_count` qubits
    pub fn layer(mut self, gates: Vec<LayerGate>) -> Result<Self> {
        let covered: usize = gates.iter().map(LayerGate::qubit_count).sum();
        if covered != self.qubit_count {
            return Err(Error::dimension("circuit layer width", self.qubit_count, covered));
        }

        for gate in &gates {
            if let LayerGate::Parametrized { parameter, .. } = gate {
                self.parameter_count = self.parameter_count.max(parameter + 1);
            }
        }

        self.layers.push(gates);
        Ok(self)
    }

    /// The two-qubit ansatz `CRy(θ₁) · (Rx(θ₀) ⊗ I) · |00⟩`
    pub fn feynman_kac_example() -> Self {
        CircuitAnsatz {
            qubit_count: 2,
            parameter_count: 2,
            layers: vec![
                vec![LayerGate::param(ParametrizedGate::Rx, 0), LayerGate::identity(1)],
                vec![LayerGate::param(ParametrizedGate::CRy, 1)],
            ],
        }
    }

    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Uniformly random parameters in `[0, 2π)`
    pub fn random_parameters<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        (0..self.parameter_count)
            .map(|_| rng.gen_range(0.0..2.0 * PI))
            .collect()
    }

    /// Full unitary of one layer
    fn layer_matrix(&self, layer: &[LayerGate], theta: &[f64]) -> Array2<Complex64> {
        let mut factors = layer.iter().map(|gate| gate.matrix(theta));
        match factors.next() {
            Some(first) => factors.fold(first, |acc, m| linalg::kron(&acc, &m)),
            None => linalg::identity(1 << self.qubit_count),
        }
    }
}

impl Ansatz for CircuitAnsatz {
    fn dimension(&self) -> usize {
        1 << self.qubit_count
    }

    fn parameter_count(&self) -> Option<usize> {
        Some(self.parameter_count)
    }

    /// # Panics
    ///
    /// Panics if `theta` is shorter than the parameter count.
    fn evaluate(&self, theta: &[f64]) -> Array1<Complex64> {
        self.layers
            .iter()
            .fold(zero_state(self.qubit_count), |state, layer| {
                self.layer_matrix(layer, theta).dot(&state)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantum::state::is_normalized;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_example_ansatz_matches_closed_form() {
        let ansatz = CircuitAnsatz::feynman_kac_example();
        assert_eq!(ansatz.dimension(), 4);
        assert_eq!(ansatz.parameter_count(), Some(2));
        assert_eq!(ansatz.layer_count(), 2);

        // cos(a/2)|00⟩ - i sin(a/2) (cos(b/2)|10⟩ + sin(b/2)|11⟩)
        let (a, b) = (0.8_f64, 1.3_f64);
        let psi = ansatz.evaluate(&[a, b]);

        let expected = [
            Complex64::new((a / 2.0).cos(), 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, -(a / 2.0).sin() * (b / 2.0).cos()),
            Complex64::new(0.0, -(a / 2.0).sin() * (b / 2.0).sin()),
        ];
        for (amp, want) in psi.iter().zip(expected.iter()) {
            assert!((amp - want).norm() < 1e-12);
        }
        assert!(is_normalized(&psi, 1e-12));
    }

    #[test]
    fn test_layer_width_is_checked() {
        let result = CircuitAnsatz::new(2).layer(vec![LayerGate::param(ParametrizedGate::Ry, 0)]);
        assert!(matches!(
            result,
            Err(Error::DimensionMismatch { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_builder_tracks_parameter_count() {
        let ansatz = CircuitAnsatz::new(2)
            .layer(vec![
                LayerGate::param(ParametrizedGate::Ry, 0),
                LayerGate::param(ParametrizedGate::Ry, 2),
            ])
            .unwrap()
            .layer(vec![LayerGate::fixed(StandardGate::CNOT)])
            .unwrap();

        assert_eq!(ansatz.parameter_count(), Some(3));

        let mut rng = StdRng::seed_from_u64(7);
        let theta = ansatz.random_parameters(&mut rng);
        assert_eq!(theta.len(), 3);
        assert!(theta.iter().all(|t| (0.0..2.0 * PI).contains(t)));
        assert!(is_normalized(&ansatz.evaluate(&theta), 1e-12));
    }

    #[test]
    fn test_prepare_state_checks_output_length() {
        let broken = FnAnsatz::new(4, |_theta: &[f64]| Array1::zeros(2));
        assert!(matches!(
            prepare_state(&broken, &[0.0]),
            Err(Error::DimensionMismatch { expected: 4, actual: 2, .. })
        ));

        let declared = FnAnsatz::new(2, |_theta: &[f64]| zero_state(1)).with_parameter_count(1);
        assert!(check_parameters(&declared, &[0.1]).is_ok());
        assert!(check_parameters(&declared, &[0.1, 0.2]).is_err());
    }
}
