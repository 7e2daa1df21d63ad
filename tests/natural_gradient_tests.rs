use feynkac::config::{DerivativeStrategy, GradientConfig};
use feynkac::natural_gradient::{natural_gradient, NaturalGradient};
use feynkac::quantum::ansatz::{Ansatz, CircuitAnsatz, FnAnsatz, LayerGate};
use feynkac::quantum::gate::{ParametrizedGate, QuantumGate, StandardGate};
use feynkac::quantum::pseudo_inverse::SymmetricEigen;
use feynkac::quantum::state::zero_state;
use ndarray::Array2;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn diagonal(values: &[f64]) -> Array2<Complex64> {
    let n = values.len();
    Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            Complex64::new(values[i], 0.0)
        } else {
            Complex64::new(0.0, 0.0)
        }
    })
}

/// Two layers of Ry rotations around a CNOT
fn hardware_efficient() -> CircuitAnsatz {
    CircuitAnsatz::new(2)
        .layer(vec![
            LayerGate::param(ParametrizedGate::Ry, 0),
            LayerGate::param(ParametrizedGate::Ry, 1),
        ])
        .unwrap()
        .layer(vec![LayerGate::fixed(StandardGate::CNOT)])
        .unwrap()
        .layer(vec![
            LayerGate::param(ParametrizedGate::Ry, 2),
            LayerGate::param(ParametrizedGate::Ry, 3),
        ])
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategies_agree() {
        let ansatz = CircuitAnsatz::feynman_kac_example();
        let h = diagonal(&[1.0, 2.0, 3.0, 0.0]);
        let theta = [1.0, 0.4];

        let finite = natural_gradient(&theta, &h, &ansatz, &GradientConfig::default()).unwrap();
        let shift = natural_gradient(
            &theta,
            &h,
            &ansatz,
            &GradientConfig::default().with_strategy(DerivativeStrategy::parameter_shift()),
        )
        .unwrap();

        for (f, s) in finite.iter().zip(shift.iter()) {
            assert!((f - s).abs() < 1e-2, "finite difference {} vs parameter shift {}", f, s);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let ansatz = hardware_efficient();
        let h = diagonal(&[0.5, -1.0, 2.0, 0.25]);
        let mut rng = StdRng::seed_from_u64(2024);
        let theta = ansatz.random_parameters(&mut rng);

        let sequential = GradientConfig::default().with_parallel(false);
        let parallel = GradientConfig::default().with_parallel(true);

        assert_eq!(
            natural_gradient(&theta, &h, &ansatz, &sequential).unwrap(),
            natural_gradient(&theta, &h, &ansatz, &parallel).unwrap()
        );
    }

    #[test]
    fn test_metric_is_symmetric_positive_semidefinite() {
        let ansatz = hardware_efficient();
        let h = diagonal(&[0.5, -1.0, 2.0, 0.25]);
        let mut rng = StdRng::seed_from_u64(99);
        let config = GradientConfig::default().with_strategy(DerivativeStrategy::parameter_shift());

        for _ in 0..5 {
            let theta = ansatz.random_parameters(&mut rng);
            let step = NaturalGradient::evaluate(&theta, &h, &ansatz, &config).unwrap();

            assert_eq!(step.metric, step.metric.t());
            let eigen = SymmetricEigen::new(&step.metric);
            assert!(eigen.eigenvalues.iter().all(|&lambda| lambda > -1e-12));
        }
    }

    #[test]
    fn test_redundant_parameters_share_the_step() {
        // both parameters drive the same rotation, so the metric has rank one
        let ansatz = FnAnsatz::new(2, |theta: &[f64]| {
            ParametrizedGate::Ry(theta[0] + theta[1]).matrix().dot(&zero_state(1))
        })
        .with_parameter_count(2);
        assert_eq!(ansatz.parameter_count(), Some(2));

        let h = diagonal(&[1.0, -1.0]);
        let theta = [0.3, 0.5];
        let config = GradientConfig::default().with_strategy(DerivativeStrategy::parameter_shift());

        let step = NaturalGradient::evaluate(&theta, &h, &ansatz, &config).unwrap();

        // the single-parameter natural gradient -2 sin(t) is split evenly
        let expected = -(0.8_f64).sin();
        assert_eq!(step.rank, 1);
        assert!((step.gradient[0] - expected).abs() < 1e-10);
        assert!((step.gradient[1] - expected).abs() < 1e-10);
    }
}
