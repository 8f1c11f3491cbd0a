//! Lennard-Jones pair potential with shifted-force truncation.

use super::config::MdConfig;

/// Truncated Lennard-Jones interaction.
///
/// The bare potential is u(r) = 4ε((σ/r)¹² − (σ/r)⁶) with the scalar force
/// f(r) = −du/dr = 24ε(2σ¹²/r¹³ − σ⁶/r⁷), positive when repulsive.
///
/// Beyond the cutoff both are taken as zero. Inside it the shifted-force
/// scheme subtracts f(r_cut) from the force and tilts the potential by the
/// matching linear term, so force and potential both reach zero continuously
/// at r_cut and the force stays the exact derivative of the recorded energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LennardJones {
    epsilon: f64,
    sigma: f64,
    r_cut: f64,
    r_cut_squared: f64,
    force_at_cutoff: f64,
    energy_at_cutoff: f64,
}

impl LennardJones {
    /// Create an interaction with well depth `epsilon`, diameter `sigma`,
    /// and cutoff radius `r_cut`.
    ///
    /// # Panics
    ///
    /// Panics if any argument is not strictly positive. Run-level inputs are
    /// validated by [`MdConfig::validated`] before reaching this point.
    pub fn new(epsilon: f64, sigma: f64, r_cut: f64) -> Self {
        assert!(epsilon > 0.0, "epsilon must be positive");
        assert!(sigma > 0.0, "sigma must be positive");
        assert!(r_cut > 0.0, "cutoff radius must be positive");
        let mut lj = Self {
            epsilon,
            sigma,
            r_cut,
            r_cut_squared: r_cut * r_cut,
            force_at_cutoff: 0.0,
            energy_at_cutoff: 0.0,
        };
        lj.force_at_cutoff = lj.force(r_cut);
        lj.energy_at_cutoff = lj.energy(r_cut);
        lj
    }

    /// Build the interaction from a validated run configuration.
    pub fn from_config(config: &MdConfig) -> Self {
        Self::new(config.epsilon, config.sigma, config.cutoff_radius())
    }

    /// Bare pair potential u(r).
    pub fn energy(&self, r: f64) -> f64 {
        let sr6 = (self.sigma / r).powi(6);
        4.0 * self.epsilon * (sr6 * sr6 - sr6)
    }

    /// Bare scalar force f(r) = −du/dr, positive when repulsive.
    pub fn force(&self, r: f64) -> f64 {
        let sr6 = (self.sigma / r).powi(6);
        24.0 * self.epsilon * (2.0 * sr6 * sr6 - sr6) / r
    }

    /// Shifted force, zero at the cutoff: f(r) − f(r_cut).
    pub fn shifted_force(&self, r: f64) -> f64 {
        self.force(r) - self.force_at_cutoff
    }

    /// Potential consistent with [`shifted_force`](Self::shifted_force):
    /// u(r) − u(r_cut) + (r − r_cut)·f(r_cut). Zero at the cutoff.
    pub fn shifted_energy(&self, r: f64) -> f64 {
        self.energy(r) - self.energy_at_cutoff + (r - self.r_cut) * self.force_at_cutoff
    }

    /// Cutoff radius.
    pub fn cutoff(&self) -> f64 {
        self.r_cut
    }

    /// Squared cutoff radius, for comparison against squared distances.
    pub fn cutoff_squared(&self) -> f64 {
        self.r_cut_squared
    }
}
