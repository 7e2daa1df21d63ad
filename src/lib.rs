//! Imaginary-time evolution of variational quantum circuits
//!
//! This crate drives the parameters of a state-preparation ansatz along the
//! quantum natural gradient of `⟨H⟩`. Each step estimates the derivative
//! vectors of the prepared state, builds the Fubini-Study metric and the
//! energy-coupling vector, and solves the (possibly singular) linear system
//! with a pseudo-inverse. Repeating this with a small time step approximates
//! projected imaginary-time evolution, which relaxes the state toward the
//! ground state reachable by the ansatz.

pub mod config;
pub mod error;
pub mod evolution;
pub mod landscape;
pub mod natural_gradient;
pub mod quantum;

pub use error::{Error, Result};

// Create a prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{DerivativeStrategy, EvolutionConfig, GradientConfig};
    pub use crate::evolution::{evolve, Evolution, Trajectory};
    pub use crate::landscape::EnergyLandscape;
    pub use crate::natural_gradient::{natural_gradient, NaturalGradient};
    pub use crate::quantum::linalg::{adjoint, expectation, inner_product, tensor_product};
    pub use crate::quantum::prelude::*;
}

// Version and crate information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
