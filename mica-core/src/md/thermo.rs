//! Thermodynamic observables and the equilibration criterion.

use crate::types::Vec3;

/// Total kinetic energy, (1/2)·m·Σ|v|².
pub fn kinetic_energy(velocities: &[Vec3], mass: f64) -> f64 {
    velocities.iter().map(|v| 0.5 * mass * v.norm_squared()).sum()
}

/// Instantaneous temperature from equipartition, T = (2/3)·KE/(N·k_B).
pub fn temperature(velocities: &[Vec3], mass: f64, boltzmann: f64) -> f64 {
    if velocities.is_empty() {
        return 0.0;
    }
    let n = velocities.len() as f64;
    2.0 * kinetic_energy(velocities, mass) / (3.0 * n * boltzmann)
}

/// Total linear momentum, m·Σv.
pub fn total_momentum(velocities: &[Vec3], mass: f64) -> Vec3 {
    velocities.iter().sum::<Vec3>() * mass
}

/// Decide whether a temperature series has settled near its target.
///
/// Inspects the trailing `window` samples; the series qualifies when their
/// mean lies within `mean_tol` of the target and their population standard
/// deviation is below `std_tol`. Shorter series never qualify.
pub fn is_equilibrated(
    temperatures: &[f64],
    target: f64,
    window: usize,
    mean_tol: f64,
    std_tol: f64,
) -> bool {
    if temperatures.len() < window || window == 0 {
        return false;
    }
    let tail = &temperatures[temperatures.len() - window..];
    let mean = tail.iter().sum::<f64>() / window as f64;
    let variance = tail.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / window as f64;
    (mean - target).abs() < mean_tol && variance.sqrt() < std_tol
}
