//! Molecular dynamics of a Lennard-Jones fluid.
//!
//! Implements a velocity-Verlet NVE simulation of identical point particles
//! in a cubic box with periodic boundaries. Pair interactions use the
//! shifted-force Lennard-Jones potential, so both the force and the recorded
//! potential energy go smoothly to zero at the cutoff.
//!
//! The submodules mirror the stages of a run:
//!
//! - [`config`]: run parameters and their validation.
//! - [`input`]: reading initial particle positions from disk.
//! - [`velocity`]: initial velocity generation and rescaling to a target
//!   temperature.
//! - [`potential`]: the Lennard-Jones pair potential with shifted-force
//!   truncation.
//! - [`boundary`]: minimum-image displacement under periodic boundaries.
//! - [`forces`]: the O(N²) pair loop producing forces and potential energy.
//! - [`integrate`]: the velocity-Verlet step and the [`run`] driver that
//!   records observables and detects equilibration.
//! - [`thermo`]: kinetic energy, instantaneous temperature, momentum, and
//!   the equilibration criterion.

pub mod boundary;
pub mod config;
pub mod forces;
pub mod input;
pub mod integrate;
pub mod potential;
pub mod thermo;
pub mod velocity;

pub use config::MdConfig;
pub use forces::{compute_forces, ForceEvaluation};
pub use input::{load_positions, read_positions};
pub use integrate::{run, velocity_verlet_step, MdRun, Observables};
pub use potential::LennardJones;
pub use thermo::{is_equilibrated, kinetic_energy, temperature, total_momentum};
pub use velocity::initialize_velocities;
