//! Initial velocity generation.
//!
//! Velocities are drawn randomly, stripped of centre-of-mass drift, then
//! rescaled so the kinetic energy matches the target temperature exactly.
//! The NVE integrator never rescales again; temperature control exists only
//! in this initial condition.

use super::config::MdConfig;
use crate::error::{Error, Result};
use crate::types::Vec3;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Draw velocities uniformly from [−1, 1]³, remove drift, and rescale to the
/// target temperature.
///
/// # Errors
///
/// Returns [`Error::Config`] if the drift-free velocities carry no kinetic
/// energy, which leaves no scale to rescale from.
pub fn initialize_velocities<R: Rng + ?Sized>(
    config: &MdConfig,
    rng: &mut R,
) -> Result<Vec<Vec3>> {
    let raw: Vec<Vec3> = (0..config.n_particles)
        .map(|_| {
            Vec3::new(
                rng.random_range(-1.0..=1.0),
                rng.random_range(-1.0..=1.0),
                rng.random_range(-1.0..=1.0),
            )
        })
        .collect();
    finalize(raw, config)
}

/// Draw velocities from the Maxwell-Boltzmann distribution at the target
/// temperature, remove drift, and rescale.
///
/// After drift removal the sampled kinetic energy no longer matches the
/// target exactly, so the same rescaling as [`initialize_velocities`] is
/// applied on top.
pub fn maxwell_boltzmann_velocities<R: Rng + ?Sized>(
    config: &MdConfig,
    rng: &mut R,
) -> Result<Vec<Vec3>> {
    let width = (config.boltzmann * config.target_temperature / config.mass).sqrt();
    let normal = Normal::new(0.0, width)
        .map_err(|e| Error::Config(format!("invalid Maxwell-Boltzmann width {}: {}", width, e)))?;
    let raw: Vec<Vec3> = (0..config.n_particles)
        .map(|_| {
            Vec3::new(
                normal.sample(rng),
                normal.sample(rng),
                normal.sample(rng),
            )
        })
        .collect();
    finalize(raw, config)
}

/// Remove centre-of-mass drift and rescale to the target kinetic energy
/// (3/2)·N·k_B·T.
fn finalize(mut velocities: Vec<Vec3>, config: &MdConfig) -> Result<Vec<Vec3>> {
    let n = velocities.len();
    let drift: Vec3 = velocities.iter().sum::<Vec3>() / n as f64;
    for v in &mut velocities {
        *v -= drift;
    }

    let kinetic: f64 = velocities
        .iter()
        .map(|v| 0.5 * config.mass * v.norm_squared())
        .sum();
    if kinetic <= 0.0 {
        return Err(Error::Config(
            "sampled velocities have zero kinetic energy after drift removal; \
             cannot rescale to the target temperature"
                .to_string(),
        ));
    }

    let target = 1.5 * n as f64 * config.boltzmann * config.target_temperature;
    let scale = (target / kinetic).sqrt();
    for v in &mut velocities {
        *v *= scale;
    }
    Ok(velocities)
}
