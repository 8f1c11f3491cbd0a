//! Run parameters for a molecular dynamics simulation.

use crate::error::{Error, Result};

/// Parameters controlling an NVE Lennard-Jones run.
///
/// All quantities are in a single consistent unit system; the library never
/// converts units. With ε = σ = m = k_B = 1 the fields read as standard
/// reduced Lennard-Jones units.
#[derive(Debug, Clone, PartialEq)]
pub struct MdConfig {
    /// Number of particles.
    pub n_particles: usize,
    /// Lennard-Jones well depth ε.
    pub epsilon: f64,
    /// Lennard-Jones diameter σ.
    pub sigma: f64,
    /// Particle mass.
    pub mass: f64,
    /// Boltzmann constant in the chosen unit system.
    pub boltzmann: f64,
    /// Temperature the initial velocities are rescaled to.
    pub target_temperature: f64,
    /// Cubic box edge length.
    pub box_length: f64,
    /// Integration time step.
    pub time_step: f64,
    /// Number of velocity-Verlet steps to take.
    pub n_steps: usize,
    /// Interaction cutoff as a multiple of σ.
    pub cutoff_factor: f64,
    /// Number of trailing temperature samples the equilibration test inspects.
    pub equilibration_window: usize,
    /// Allowed |mean(T) − T_target| over the window.
    pub equilibration_mean_tol: f64,
    /// Allowed std(T) over the window.
    pub equilibration_std_tol: f64,
}

impl MdConfig {
    /// Check the configuration and return it unchanged if usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if any parameter is non-physical or if the
    /// cutoff radius exceeds half the box length, which would break the
    /// minimum-image convention.
    pub fn validated(self) -> Result<Self> {
        if self.n_particles < 2 {
            return Err(Error::Config(format!(
                "need at least 2 particles, got {}",
                self.n_particles
            )));
        }
        for (name, value) in [
            ("epsilon", self.epsilon),
            ("sigma", self.sigma),
            ("mass", self.mass),
            ("boltzmann", self.boltzmann),
            ("target_temperature", self.target_temperature),
            ("box_length", self.box_length),
            ("time_step", self.time_step),
            ("cutoff_factor", self.cutoff_factor),
            ("equilibration_mean_tol", self.equilibration_mean_tol),
            ("equilibration_std_tol", self.equilibration_std_tol),
        ] {
            if !(value > 0.0) {
                return Err(Error::Config(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if self.n_steps == 0 {
            return Err(Error::Config("n_steps must be at least 1".to_string()));
        }
        if self.equilibration_window == 0 {
            return Err(Error::Config(
                "equilibration_window must be at least 1".to_string(),
            ));
        }
        let r_cut = self.cutoff_radius();
        if r_cut > 0.5 * self.box_length {
            return Err(Error::Config(format!(
                "cutoff radius {} exceeds half the box length {}; minimum-image \
                 distances are only valid up to L/2",
                r_cut,
                0.5 * self.box_length
            )));
        }
        Ok(self)
    }

    /// Interaction cutoff radius, `cutoff_factor * sigma`.
    pub fn cutoff_radius(&self) -> f64 {
        self.cutoff_factor * self.sigma
    }
}
