//! Velocity-Verlet integration and the run driver.

use super::config::MdConfig;
use super::forces::{compute_forces, ForceEvaluation};
use super::potential::LennardJones;
use super::thermo::{is_equilibrated, kinetic_energy, temperature, total_momentum};
use super::velocity::initialize_velocities;
use crate::error::{Error, Result};
use crate::types::Vec3;
use rand::Rng;

/// Advance positions and velocities by one velocity-Verlet step.
///
/// Forces are evaluated at the start and end of the step; the returned
/// evaluation holds the end-of-step forces and potential energy, so the
/// caller can record observables without a third force pass.
pub fn velocity_verlet_step(
    positions: &mut [Vec3],
    velocities: &mut [Vec3],
    potential: &LennardJones,
    box_length: f64,
    mass: f64,
    time_step: f64,
) -> ForceEvaluation {
    let start = compute_forces(positions, potential, box_length);

    let half_dt_sq = 0.5 * time_step * time_step / mass;
    for (position, (velocity, force)) in positions
        .iter_mut()
        .zip(velocities.iter().zip(&start.forces))
    {
        *position += velocity * time_step + force * half_dt_sq;
    }

    let end = compute_forces(positions, potential, box_length);

    let half_dt = 0.5 * time_step / mass;
    for (velocity, (old, new)) in velocities
        .iter_mut()
        .zip(start.forces.iter().zip(&end.forces))
    {
        *velocity += (old + new) * half_dt;
    }

    end
}

/// Per-step observable series recorded during a run.
///
/// Entry `i` describes the state after completed step `i + 1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observables {
    /// Kinetic energy per step.
    pub kinetic_energy: Vec<f64>,
    /// Shifted potential energy per step.
    pub potential_energy: Vec<f64>,
    /// Total energy per step, kinetic plus potential.
    pub total_energy: Vec<f64>,
    /// Instantaneous temperature per step.
    pub temperature: Vec<f64>,
    /// Total momentum components per step.
    pub momentum_x: Vec<f64>,
    /// Total momentum components per step.
    pub momentum_y: Vec<f64>,
    /// Total momentum components per step.
    pub momentum_z: Vec<f64>,
}

impl Observables {
    /// Pre-allocate storage for `n` steps.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            kinetic_energy: Vec::with_capacity(n),
            potential_energy: Vec::with_capacity(n),
            total_energy: Vec::with_capacity(n),
            temperature: Vec::with_capacity(n),
            momentum_x: Vec::with_capacity(n),
            momentum_y: Vec::with_capacity(n),
            momentum_z: Vec::with_capacity(n),
        }
    }

    /// Append one step's observables.
    pub fn record(&mut self, kinetic: f64, potential: f64, temp: f64, momentum: Vec3) {
        self.kinetic_energy.push(kinetic);
        self.potential_energy.push(potential);
        self.total_energy.push(kinetic + potential);
        self.temperature.push(temp);
        self.momentum_x.push(momentum.x);
        self.momentum_y.push(momentum.y);
        self.momentum_z.push(momentum.z);
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.total_energy.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.total_energy.is_empty()
    }
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct MdRun {
    /// Observable series over all steps.
    pub observables: Observables,
    /// Final particle positions.
    pub positions: Vec<Vec3>,
    /// Final particle velocities.
    pub velocities: Vec<Vec3>,
    /// 1-based step at which the temperature first satisfied the
    /// equilibration criterion, if it ever did.
    pub equilibrated_at: Option<usize>,
}

/// Run an NVE simulation from the given initial positions.
///
/// Velocities are drawn from `rng` and rescaled to the configured target
/// temperature. Observables are recorded after every completed step, and the
/// equilibration criterion is checked against the growing temperature series.
///
/// # Errors
///
/// Returns [`Error::Config`] if the configuration fails validation and
/// [`Error::Input`] if the position count does not match `n_particles`.
pub fn run<R: Rng + ?Sized>(
    config: &MdConfig,
    initial_positions: Vec<Vec3>,
    rng: &mut R,
) -> Result<MdRun> {
    let config = config.clone().validated()?;
    if initial_positions.len() != config.n_particles {
        return Err(Error::Input(format!(
            "expected {} initial positions, got {}",
            config.n_particles,
            initial_positions.len()
        )));
    }

    let potential = LennardJones::from_config(&config);
    let mut positions = initial_positions;
    let mut velocities = initialize_velocities(&config, rng)?;

    log::info!(
        "starting NVE run: {} particles, {} steps, dt = {}, box = {}",
        config.n_particles,
        config.n_steps,
        config.time_step,
        config.box_length
    );

    let mut observables = Observables::with_capacity(config.n_steps);
    let mut equilibrated_at = None;

    for step in 1..=config.n_steps {
        let eval = velocity_verlet_step(
            &mut positions,
            &mut velocities,
            &potential,
            config.box_length,
            config.mass,
            config.time_step,
        );

        let kinetic = kinetic_energy(&velocities, config.mass);
        let temp = temperature(&velocities, config.mass, config.boltzmann);
        let momentum = total_momentum(&velocities, config.mass);
        observables.record(kinetic, eval.potential_energy, temp, momentum);

        if equilibrated_at.is_none()
            && is_equilibrated(
                &observables.temperature,
                config.target_temperature,
                config.equilibration_window,
                config.equilibration_mean_tol,
                config.equilibration_std_tol,
            )
        {
            equilibrated_at = Some(step);
            log::info!("temperature settled at step {}", step);
        }
    }

    Ok(MdRun {
        observables,
        positions,
        velocities,
        equilibrated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> MdConfig {
        MdConfig {
            n_particles: 8,
            epsilon: 1.0,
            sigma: 1.0,
            mass: 1.0,
            boltzmann: 1.0,
            target_temperature: 1.0,
            box_length: 5.2,
            time_step: 0.005,
            n_steps: 50,
            cutoff_factor: 2.5,
            equilibration_window: 10,
            equilibration_mean_tol: 0.05,
            equilibration_std_tol: 0.05,
        }
    }

    // Neighbors sit 2.4 apart, inside the 2.5 cutoff, so every particle
    // interacts from the first step.
    fn cube_positions() -> Vec<Vec3> {
        let mut positions = Vec::new();
        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    positions.push(Vec3::new(
                        0.65 + 2.4 * i as f64,
                        0.65 + 2.4 * j as f64,
                        0.65 + 2.4 * k as f64,
                    ));
                }
            }
        }
        positions
    }

    #[test]
    fn single_step_matches_hand_integration() {
        // Two particles at rest, separated by 1.5 along x. Forces stay axial,
        // so the update reduces to scalar formulas in the pair separation.
        let lj = LennardJones::new(1.0, 1.0, 2.5);
        let dt = 0.01;
        let mut positions = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.5, 0.0, 0.0)];
        let mut velocities = vec![Vec3::zeros(); 2];

        let s_start = lj.shifted_force(1.5);
        let eval = velocity_verlet_step(&mut positions, &mut velocities, &lj, 20.0, 1.0, dt);

        let x0 = -s_start * dt * dt / 2.0;
        let x1 = 1.5 + s_start * dt * dt / 2.0;
        assert!((positions[0].x - x0).abs() < 1e-15);
        assert!((positions[1].x - x1).abs() < 1e-15);

        let s_end = lj.shifted_force(x1 - x0);
        let v0 = -(s_start + s_end) * dt / 2.0;
        assert!((velocities[0].x - v0).abs() < 1e-15);
        assert!((velocities[1].x + v0).abs() < 1e-15);
        assert!((eval.potential_energy - lj.shifted_energy(x1 - x0)).abs() < 1e-12);

        // The pair attracts at this separation, so they drift together.
        assert!(s_start < 0.0);
        assert!(positions[0].x > 0.0);
    }

    #[test]
    fn run_records_every_step() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(1);
        let result = run(&config, cube_positions(), &mut rng).unwrap();

        assert_eq!(result.observables.len(), 50);
        assert_eq!(result.observables.kinetic_energy.len(), 50);
        assert_eq!(result.observables.temperature.len(), 50);
        assert_eq!(result.positions.len(), 8);
        assert_eq!(result.velocities.len(), 8);
        assert!(result.observables.total_energy.iter().all(|e| e.is_finite()));
    }

    #[test]
    fn momentum_stays_zero_throughout() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(2);
        let result = run(&config, cube_positions(), &mut rng).unwrap();

        for i in 0..result.observables.len() {
            assert!(result.observables.momentum_x[i].abs() < 1e-9);
            assert!(result.observables.momentum_y[i].abs() < 1e-9);
            assert!(result.observables.momentum_z[i].abs() < 1e-9);
        }
    }

    #[test]
    fn total_energy_is_kinetic_plus_potential() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(3);
        let result = run(&config, cube_positions(), &mut rng).unwrap();

        for i in 0..result.observables.len() {
            let sum = result.observables.kinetic_energy[i] + result.observables.potential_energy[i];
            assert!((result.observables.total_energy[i] - sum).abs() < 1e-12);
        }
    }

    #[test]
    fn loose_criterion_fires_on_first_step() {
        let mut config = config();
        config.equilibration_window = 1;
        config.equilibration_mean_tol = 100.0;
        config.equilibration_std_tol = 100.0;
        let mut rng = StdRng::seed_from_u64(4);
        let result = run(&config, cube_positions(), &mut rng).unwrap();
        assert_eq!(result.equilibrated_at, Some(1));
    }

    #[test]
    fn strict_criterion_never_fires() {
        let mut config = config();
        config.equilibration_mean_tol = 1e-12;
        config.equilibration_std_tol = 1e-12;
        let mut rng = StdRng::seed_from_u64(5);
        let result = run(&config, cube_positions(), &mut rng).unwrap();
        assert_eq!(result.equilibrated_at, None);
    }

    #[test]
    fn rejects_mismatched_position_count() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(6);
        let mut positions = cube_positions();
        positions.pop();
        let err = run(&config, positions, &mut rng).unwrap_err();
        assert!(err.to_string().contains("expected 8 initial positions"));
    }
}
