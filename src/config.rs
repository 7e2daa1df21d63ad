//! Configuration for gradient evaluation and imaginary-time evolution
//!
//! Every struct here has a `Default` carrying the documented constants,
//! builder-style `with_*` setters and serde support with field defaults, so a
//! partial JSON/TOML document is enough to override a single knob.

use std::f64::consts::FRAC_PI_2;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default forward-difference step
pub const DEFAULT_FINITE_DIFFERENCE_STEP: f64 = 1e-3;

/// Default parameter-shift offset
pub const DEFAULT_PARAMETER_SHIFT: f64 = FRAC_PI_2;

/// Default tolerance on the anti-Hermitian part of the Hamiltonian
pub const DEFAULT_HERMITICITY_TOLERANCE: f64 = 1e-9;

/// Default relative tolerance on metric asymmetry
pub const DEFAULT_SYMMETRY_TOLERANCE: f64 = 1e-8;

/// Default relative cutoff below which metric eigenvalues count as zero
pub const DEFAULT_RCOND: f64 = 1e-12;

/// Default imaginary-time step
pub const DEFAULT_TIME_STEP: f64 = 0.1;

/// Default number of trajectory rows
pub const DEFAULT_TIMESTEPS: usize = 1000;

/// How derivative vectors of the ansatz are estimated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum DerivativeStrategy {
    /// Forward difference `(ψ(θ + h·e_i) − ψ(θ)) / h`
    FiniteDifference {
        #[serde(default = "default_step")]
        step: f64,
    },

    /// Parameter-shift rule with shifts of `±shift` along each axis
    ParameterShift {
        #[serde(default = "default_shift")]
        shift: f64,
    },
}

fn default_step() -> f64 {
    DEFAULT_FINITE_DIFFERENCE_STEP
}

fn default_shift() -> f64 {
    DEFAULT_PARAMETER_SHIFT
}

impl Default for DerivativeStrategy {
    fn default() -> Self {
        DerivativeStrategy::finite_difference()
    }
}

impl DerivativeStrategy {
    /// Forward difference with the default step
    pub fn finite_difference() -> Self {
        DerivativeStrategy::FiniteDifference { step: DEFAULT_FINITE_DIFFERENCE_STEP }
    }

    /// Parameter shift with the default `π/2` offset
    pub fn parameter_shift() -> Self {
        DerivativeStrategy::ParameterShift { shift: DEFAULT_PARAMETER_SHIFT }
    }

    /// Number of ansatz evaluations needed for `parameter_count` parameters,
    /// including the base state
    pub fn evaluations(&self, parameter_count: usize) -> usize {
        match self {
            DerivativeStrategy::FiniteDifference { .. } => parameter_count + 1,
            DerivativeStrategy::ParameterShift { .. } => 2 * parameter_count + 1,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            DerivativeStrategy::FiniteDifference { step } => {
                if !step.is_finite() || step <= 0.0 {
                    return Err(Error::InvalidConfig(format!(
                        "finite-difference step must be positive and finite, got {}",
                        step
                    )));
                }
            }
            DerivativeStrategy::ParameterShift { shift } => {
                // The estimator divides by 4·sin(shift/2)
                if !shift.is_finite() || (shift / 2.0).sin().abs() < 1e-12 {
                    return Err(Error::InvalidConfig(format!(
                        "parameter shift {} is degenerate",
                        shift
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Settings for one natural-gradient evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    /// Derivative estimator
    pub strategy: DerivativeStrategy,
    /// Allowed anti-Hermitian residual of the Hamiltonian
    pub hermiticity_tolerance: f64,
    /// Allowed relative asymmetry of the metric tensor
    pub symmetry_tolerance: f64,
    /// Relative eigenvalue cutoff of the pseudo-inverse
    pub rcond: f64,
    /// Evaluate the per-parameter derivatives on the rayon pool
    pub parallel: bool,
}

impl Default for GradientConfig {
    fn default() -> Self {
        GradientConfig {
            strategy: DerivativeStrategy::default(),
            hermiticity_tolerance: DEFAULT_HERMITICITY_TOLERANCE,
            symmetry_tolerance: DEFAULT_SYMMETRY_TOLERANCE,
            rcond: DEFAULT_RCOND,
            parallel: false,
        }
    }
}

impl GradientConfig {
    /// Set the derivative strategy
    pub fn with_strategy(mut self, strategy: DerivativeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the Hermiticity tolerance
    pub fn with_hermiticity_tolerance(mut self, tolerance: f64) -> Self {
        self.hermiticity_tolerance = tolerance;
        self
    }

    /// Set the metric symmetry tolerance
    pub fn with_symmetry_tolerance(mut self, tolerance: f64) -> Self {
        self.symmetry_tolerance = tolerance;
        self
    }

    /// Set the pseudo-inverse cutoff
    pub fn with_rcond(mut self, rcond: f64) -> Self {
        self.rcond = rcond;
        self
    }

    /// Enable or disable parallel derivative evaluation
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.strategy.validate()?;

        for (name, value) in [
            ("hermiticity_tolerance", self.hermiticity_tolerance),
            ("symmetry_tolerance", self.symmetry_tolerance),
            ("rcond", self.rcond),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} must be non-negative and finite, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

/// Settings for a full imaginary-time evolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Imaginary-time step `dt`
    pub dt: f64,
    /// Number of trajectory rows, the initial parameters included
    pub timesteps: usize,
    /// Settings forwarded to every gradient evaluation
    pub gradient: GradientConfig,
    /// Optional wall-clock budget; evolution stops early once it is spent
    pub max_duration: Option<Duration>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        EvolutionConfig {
            dt: DEFAULT_TIME_STEP,
            timesteps: DEFAULT_TIMESTEPS,
            gradient: GradientConfig::default(),
            max_duration: None,
        }
    }
}

impl EvolutionConfig {
    /// Set the time step
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Set the number of trajectory rows
    pub fn with_timesteps(mut self, timesteps: usize) -> Self {
        self.timesteps = timesteps;
        self
    }

    /// Set the gradient settings
    pub fn with_gradient(mut self, gradient: GradientConfig) -> Self {
        self.gradient = gradient;
        self
    }

    /// Set the wall-clock budget
    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration = Some(max_duration);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.dt.is_finite() {
            return Err(Error::InvalidConfig(format!("dt must be finite, got {}", self.dt)));
        }
        if self.timesteps == 0 {
            return Err(Error::InvalidConfig("timesteps must be at least 1".to_string()));
        }
        self.gradient.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_constants() {
        let config = EvolutionConfig::default();
        assert_eq!(config.dt, 0.1);
        assert_eq!(config.timesteps, 1000);
        assert_eq!(
            config.gradient.strategy,
            DerivativeStrategy::FiniteDifference { step: 0.001 }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_loads_with_defaults() {
        let json = r#"{ "dt": 0.05, "gradient": { "strategy": { "method": "parameter_shift" } } }"#;
        let config: EvolutionConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.dt, 0.05);
        assert_eq!(config.timesteps, DEFAULT_TIMESTEPS);
        assert_eq!(config.gradient.strategy, DerivativeStrategy::parameter_shift());
        assert_eq!(config.gradient.rcond, DEFAULT_RCOND);
        assert!(config.max_duration.is_none());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad_step = GradientConfig::default()
            .with_strategy(DerivativeStrategy::FiniteDifference { step: 0.0 });
        assert!(matches!(bad_step.validate(), Err(Error::InvalidConfig(_))));

        let bad_shift = GradientConfig::default()
            .with_strategy(DerivativeStrategy::ParameterShift { shift: 0.0 });
        assert!(matches!(bad_shift.validate(), Err(Error::InvalidConfig(_))));

        let no_steps = EvolutionConfig::default().with_timesteps(0);
        assert!(matches!(no_steps.validate(), Err(Error::InvalidConfig(_))));

        let nan_dt = EvolutionConfig::default().with_dt(f64::NAN);
        assert!(nan_dt.validate().is_err());
    }

    #[test]
    fn test_evaluation_counts() {
        assert_eq!(DerivativeStrategy::finite_difference().evaluations(3), 4);
        assert_eq!(DerivativeStrategy::parameter_shift().evaluations(3), 7);
    }
}
