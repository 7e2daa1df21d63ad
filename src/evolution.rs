//! Imaginary-time evolution of variational parameters
//!
//! Each step moves the parameters against the natural gradient,
//! `θ_{t+1} = θ_t − dt · M⁺(θ_t) C(θ_t)`, which follows the projected
//! imaginary-time (Feynman-Kac) flow toward lower energy.

use std::time::Instant;

use log::{debug, info, warn};
use ndarray::{Array1, Array2, ArrayView1};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::config::EvolutionConfig;
use crate::error::{Error, Result};
use crate::natural_gradient::NaturalGradient;
use crate::quantum::ansatz::{check_parameters, prepare_state, Ansatz};
use crate::quantum::linalg::{expectation, validate_hamiltonian};

/// Parameter vectors visited by an evolution, one per time step
///
/// Never empty, and every row has the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TrajectoryRecord")]
pub struct Trajectory {
    dt: f64,
    steps: Vec<Array1<f64>>,
    truncated: bool,
}

/// Unchecked wire form of a [`Trajectory`]
#[derive(Deserialize)]
struct TrajectoryRecord {
    dt: f64,
    steps: Vec<Array1<f64>>,
    truncated: bool,
}

impl TryFrom<TrajectoryRecord> for Trajectory {
    type Error = Error;

    fn try_from(record: TrajectoryRecord) -> Result<Self> {
        let columns = match record.steps.first() {
            Some(initial) => initial.len(),
            None => {
                return Err(Error::InvalidConfig(
                    "trajectory must hold at least the initial parameters".to_string(),
                ))
            }
        };

        if let Some(row) = record.steps.iter().find(|row| row.len() != columns) {
            return Err(Error::dimension("trajectory row", columns, row.len()));
        }

        Ok(Trajectory {
            dt: record.dt,
            steps: record.steps,
            truncated: record.truncated,
        })
    }
}

impl Trajectory {
    fn new(dt: f64, initial: Array1<f64>) -> Self {
        Trajectory {
            dt,
            steps: vec![initial],
            truncated: false,
        }
    }

    /// Time step between consecutive rows
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of rows, the initial parameters included
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// A trajectory always holds at least the initial parameters
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether the wall-clock budget stopped the evolution early
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Parameters at row `index`
    pub fn step(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        self.steps.get(index).map(|theta| theta.view())
    }

    /// Parameters the evolution started from
    pub fn initial(&self) -> ArrayView1<'_, f64> {
        self.steps[0].view()
    }

    /// Parameters after the last completed step
    pub fn last(&self) -> ArrayView1<'_, f64> {
        self.steps[self.steps.len() - 1].view()
    }

    /// Iterate over rows in time order
    pub fn iter(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> {
        self.steps.iter().map(|theta| theta.view())
    }

    /// Rows stacked into a `len × parameter_count` matrix
    pub fn to_matrix(&self) -> Array2<f64> {
        let columns = self.steps[0].len();
        Array2::from_shape_fn((self.steps.len(), columns), |(i, j)| self.steps[i][j])
    }

    /// Energy `⟨H⟩` at every row
    ///
    /// `tolerance` bounds the anti-Hermitian residual of the Hamiltonian, as
    /// `GradientConfig::hermiticity_tolerance` does during evolution.
    pub fn energies<A: Ansatz + ?Sized>(
        &self,
        hamiltonian: &Array2<Complex64>,
        ansatz: &A,
        tolerance: f64,
    ) -> Result<Vec<f64>> {
        validate_hamiltonian(hamiltonian, ansatz.dimension(), tolerance)?;

        self.steps
            .iter()
            .map(|row| {
                let theta = row.to_vec();
                check_parameters(ansatz, &theta)?;
                let psi = prepare_state(ansatz, &theta)?;
                expectation(hamiltonian, &psi, tolerance)
            })
            .collect()
    }

    fn push(&mut self, theta: Array1<f64>) {
        self.steps.push(theta);
    }
}

/// Driver for imaginary-time evolution
#[derive(Debug, Clone, Default)]
pub struct Evolution {
    config: EvolutionConfig,
}

impl Evolution {
    pub fn new(config: EvolutionConfig) -> Self {
        Evolution { config }
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Evolve `initial_theta` for the configured number of steps
    pub fn run<A: Ansatz + ?Sized>(
        &self,
        initial_theta: &[f64],
        hamiltonian: &Array2<Complex64>,
        ansatz: &A,
    ) -> Result<Trajectory> {
        self.config.validate()?;
        check_parameters(ansatz, initial_theta)?;
        validate_hamiltonian(
            hamiltonian,
            ansatz.dimension(),
            self.config.gradient.hermiticity_tolerance,
        )?;

        let started = Instant::now();
        let dt = self.config.dt;
        let mut trajectory = Trajectory::new(dt, Array1::from(initial_theta.to_vec()));

        for step in 1..self.config.timesteps {
            if let Some(budget) = self.config.max_duration {
                if started.elapsed() >= budget {
                    warn!(
                        "evolution stopped after {} of {} steps: wall-clock budget of {:?} spent",
                        step, self.config.timesteps, budget
                    );
                    trajectory.truncated = true;
                    break;
                }
            }

            let theta = trajectory.last().to_vec();
            let evaluation =
                NaturalGradient::evaluate(&theta, hamiltonian, ansatz, &self.config.gradient)?;

            if evaluation.gradient.len() != theta.len() {
                return Err(Error::dimension(
                    "natural gradient",
                    theta.len(),
                    evaluation.gradient.len(),
                ));
            }

            debug!(
                "step {}: energy {:.8}, |gradient| {:.3e}",
                step,
                evaluation.energy,
                evaluation.norm()
            );

            let mut next = Array1::from(theta);
            next.scaled_add(-dt, &evaluation.gradient);
            trajectory.push(next);
        }

        info!(
            "imaginary-time evolution finished with {} rows (dt = {})",
            trajectory.len(),
            dt
        );

        Ok(trajectory)
    }
}

/// Evolve with the default gradient settings
pub fn evolve<A: Ansatz + ?Sized>(
    initial_theta: &[f64],
    dt: f64,
    timesteps: usize,
    hamiltonian: &Array2<Complex64>,
    ansatz: &A,
) -> Result<Trajectory> {
    let config = EvolutionConfig::default()
        .with_dt(dt)
        .with_timesteps(timesteps);

    Evolution::new(config).run(initial_theta, hamiltonian, ansatz)
}
