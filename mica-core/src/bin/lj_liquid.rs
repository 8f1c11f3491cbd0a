//! NVE simulation of a Lennard-Jones liquid.
//!
//! Runs 256 particles in reduced units from a lattice start, then writes
//! energy, temperature, and momentum figures to `figures/`.

use anyhow::{Context, Result};
use mica_core::figures;
use mica_core::md::{self, MdConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::Path;

const N_PARTICLES: usize = 256;
const BOX_LENGTH: f64 = 6.8;
const TARGET_TEMPERATURE: f64 = 1.0;
const TIME_STEP: f64 = 0.01;
const N_STEPS: usize = 200;
const CUTOFF_FACTOR: f64 = 2.5;
const EQUILIBRATION_WINDOW: usize = 100;
const SEED: u64 = 42;

const POSITION_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/liquid256.txt");

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = MdConfig {
        n_particles: N_PARTICLES,
        epsilon: 1.0,
        sigma: 1.0,
        mass: 1.0,
        boltzmann: 1.0,
        target_temperature: TARGET_TEMPERATURE,
        box_length: BOX_LENGTH,
        time_step: TIME_STEP,
        n_steps: N_STEPS,
        cutoff_factor: CUTOFF_FACTOR,
        equilibration_window: EQUILIBRATION_WINDOW,
        equilibration_mean_tol: 0.05,
        equilibration_std_tol: 0.05,
    }
    .validated()?;

    let positions = md::load_positions(POSITION_FILE, config.n_particles)?;
    let mut rng = StdRng::seed_from_u64(SEED);
    let result = md::run(&config, positions, &mut rng)?;

    let obs = &result.observables;
    if let (Some(&first), Some(&last)) = (obs.total_energy.first(), obs.total_energy.last()) {
        let drift = 100.0 * (last - first).abs() / first.abs();
        log::info!("total energy: {:.6} -> {:.6} ({:.4}% drift)", first, last, drift);
    }
    if let Some(&temp) = obs.temperature.last() {
        log::info!("final temperature: {:.4} (target {})", temp, TARGET_TEMPERATURE);
    }
    match result.equilibrated_at {
        Some(step) => log::info!("equilibration criterion met at step {}", step),
        None => log::info!("equilibration criterion not met within {} steps", N_STEPS),
    }

    let fig_dir = Path::new("figures");
    fs::create_dir_all(fig_dir)
        .with_context(|| format!("creating {}", fig_dir.display()))?;
    figures::plot_energy_series(
        &fig_dir.join("lj_energy.svg"),
        &obs.kinetic_energy,
        &obs.potential_energy,
        &obs.total_energy,
        config.time_step,
    )?;
    figures::plot_temperature_series(
        &fig_dir.join("lj_temperature.svg"),
        &obs.temperature,
        config.target_temperature,
        config.time_step,
    )?;
    figures::plot_momentum_series(
        &fig_dir.join("lj_momentum.svg"),
        &obs.momentum_x,
        &obs.momentum_y,
        &obs.momentum_z,
        config.time_step,
    )?;
    log::info!("figures written to {}", fig_dir.display());

    Ok(())
}
