// demos/imaginary_time.rs
//! Imaginary-time evolution of a two-qubit circuit
//!
//! Evolves `CRy(θ₁) · (Rx(θ₀) ⊗ I) · |00⟩` under `H = diag(1, 2, 3, 0)` and
//! compares the result against a brute-force scan of the energy landscape.
//! Run with `RUST_LOG=debug` to see every step.

use std::error::Error;
use std::f64::consts::FRAC_PI_2;

use ndarray::Array2;
use num_complex::Complex64;

use feynkac::prelude::*;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    println!("Imaginary-Time Evolution Example");
    println!("================================\n");

    let ansatz = CircuitAnsatz::feynman_kac_example();
    let diagonal = [1.0, 2.0, 3.0, 0.0];
    let hamiltonian = Array2::from_shape_fn((4, 4), |(i, j)| {
        if i == j {
            Complex64::new(diagonal[i], 0.0)
        } else {
            Complex64::new(0.0, 0.0)
        }
    });

    let initial = [FRAC_PI_2, 0.05];
    let config = EvolutionConfig::default().with_dt(0.1).with_timesteps(1000);
    let tolerance = config.gradient.hermiticity_tolerance;
    let trajectory = Evolution::new(config).run(&initial, &hamiltonian, &ansatz)?;
    let energies = trajectory.energies(&hamiltonian, &ansatz, tolerance)?;

    println!("Energy along the trajectory:");
    for (step, energy) in energies.iter().enumerate().step_by(100) {
        println!("  step {:4}: {:.6}", step, energy);
    }

    let last = trajectory.last().to_vec();
    println!(
        "\nFinal parameters: θ = ({:.4}, {:.4}), energy {:.6}",
        last[0],
        last[1],
        energies[energies.len() - 1]
    );
    println!("Final state:");
    print!("{}", Ket(&ansatz.evaluate(&last)));

    let landscape = EnergyLandscape::sample_default(&hamiltonian, &ansatz, tolerance)?;
    let (minimum, at) = landscape.minimum();
    println!(
        "\nLandscape minimum on a {}x{} grid: {:.6} at θ = ({:.2}, {:.2})",
        landscape.axis.len(),
        landscape.axis.len(),
        minimum,
        at[0],
        at[1]
    );

    Ok(())
}
