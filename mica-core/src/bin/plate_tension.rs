//! Plane-stress plate under uniaxial tension.
//!
//! A rectangular plate is fixed vertically along its bottom edge, pinned
//! horizontally at the origin, and pulled upward by a uniform traction on
//! its top edge. The traction is swept over a load multiplier range with a
//! single stiffness factorization; displacement, stress, and strain fields
//! plus the force-displacement and stress-strain curves go to `figures/`.

use anyhow::{Context, Result};
use mica_core::assembly::{assemble, BoundaryCondition, EdgeLoad, ReducedSystem};
use mica_core::figures;
use mica_core::recovery::{self, recover_field};
use mica_core::solver::CholeskyFactorization;
use mica_core::{Material, Mesh, Quad4};
use nalgebra::Vector2;
use std::fs;
use std::path::Path;

const YOUNGS_MODULUS: f64 = 120.0e9;
const POISSONS_RATIO: f64 = 0.33;
const PLATE_LENGTH: f64 = 0.04;
const PLATE_HEIGHT: f64 = 0.03;
const NX: usize = 5;
const NY: usize = 10;
const THICKNESS: f64 = 1.0;
const TRACTION_SCALE: f64 = 1.0e6;
const N_LOAD_STEPS: usize = 50;
const MAX_MULTIPLIER: f64 = 50.0;
const GEOM_TOL: f64 = 1e-9;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mesh = Mesh::rectangle(PLATE_LENGTH, PLATE_HEIGHT, NX, NY)?;
    let material = Material::new(YOUNGS_MODULUS, POISSONS_RATIO)?;
    let element = Quad4::new(THICKNESS);
    log::info!(
        "plate {}x{} m, {} nodes, {} elements",
        PLATE_LENGTH,
        PLATE_HEIGHT,
        mesh.n_nodes(),
        mesh.n_elements()
    );

    // Bottom edge cannot move vertically; the origin node is also pinned
    // horizontally to remove the remaining rigid-body mode.
    let mut bcs = Vec::new();
    for node in mesh.nodes_where(|p| p.y.abs() < GEOM_TOL) {
        bcs.push(BoundaryCondition::Displacement {
            node,
            dof: 1,
            value: 0.0,
        });
    }
    for node in mesh.nodes_where(|p| p.x.abs() < GEOM_TOL && p.y.abs() < GEOM_TOL) {
        bcs.push(BoundaryCondition::Displacement {
            node,
            dof: 0,
            value: 0.0,
        });
    }

    // Unit-multiplier traction on the top boundary edges.
    let top_edges = mesh.boundary_edges_where(|p| (p.y - PLATE_HEIGHT).abs() < GEOM_TOL);
    anyhow::ensure!(!top_edges.is_empty(), "no boundary edges found on the top face");
    let edge_loads: Vec<EdgeLoad> = top_edges
        .iter()
        .map(|&(element, edge)| EdgeLoad {
            element,
            edge,
            traction: Vector2::new(0.0, TRACTION_SCALE),
        })
        .collect();

    let system = assemble(&mesh, &element, &material, &bcs, &edge_loads)?;
    let reduced = ReducedSystem::new(&system)?;
    let factorization = CholeskyFactorization::new(&reduced.stiffness)?;
    log::info!(
        "factorized {} free DOFs once for {} load steps",
        reduced.n_free(),
        N_LOAD_STEPS
    );

    let solve_at = |multiplier: f64| -> Result<Vec<f64>> {
        let scaled: Vec<f64> = system.rhs.iter().map(|f| f * multiplier).collect();
        let reduced_rhs = reduced.reduce_rhs(&scaled)?;
        let free = factorization.solve(&reduced_rhs)?;
        Ok(reduced.expand(&free))
    };

    let fig_dir = Path::new("figures");
    fs::create_dir_all(fig_dir).with_context(|| format!("creating {}", fig_dir.display()))?;

    // Displacement-magnitude field maps at two load levels.
    for multiplier in [25.0, 50.0] {
        let u = solve_at(multiplier)?;
        let nodal_umag: Vec<f64> = (0..mesh.n_nodes())
            .map(|n| (u[2 * n].powi(2) + u[2 * n + 1].powi(2)).sqrt())
            .collect();
        let cells = element_cell_means(&mesh, &nodal_umag);
        let max_umag = nodal_umag.iter().cloned().fold(0.0, f64::max);
        log::info!("t = {}: max |u| = {:.4e} m", multiplier, max_umag);

        figures::plot_element_field(
            &fig_dir.join(format!("plate_umag_t{:.0}.svg", multiplier)),
            &mesh,
            &cells,
            &format!("Displacement magnitude, t = {:.0}", multiplier),
        )?;
    }

    // Stress and strain magnitude maps at full load.
    let u_full = solve_at(MAX_MULTIPLIER)?;
    let field = recover_field(&mesh, &element, &material, &u_full)?;
    figures::plot_element_field(
        &fig_dir.join("plate_stress.svg"),
        &mesh,
        &field.stress_magnitudes(),
        "Average stress magnitude, t = 50",
    )?;
    figures::plot_element_field(
        &fig_dir.join("plate_strain.svg"),
        &mesh,
        &field.strain_magnitudes(),
        "Average strain magnitude, t = 50",
    )?;
    log::info!("max von Mises stress at t = 50: {:.4e} Pa", field.max_von_mises());

    // Load sweep with the cached factorization: force-displacement and
    // stress-strain responses tracked at the loaded edge.
    let top_nodes = mesh.nodes_where(|p| (p.y - PLATE_HEIGHT).abs() < GEOM_TOL);
    let base_fy: f64 = system.rhs.iter().skip(1).step_by(2).sum();

    let mut force_displacement = Vec::with_capacity(N_LOAD_STEPS);
    let mut stress_strain = Vec::with_capacity(N_LOAD_STEPS);
    for i in 0..N_LOAD_STEPS {
        let multiplier = MAX_MULTIPLIER * i as f64 / (N_LOAD_STEPS - 1) as f64;
        let u = solve_at(multiplier)?;

        let mean_umag = top_nodes
            .iter()
            .map(|&n| (u[2 * n].powi(2) + u[2 * n + 1].powi(2)).sqrt())
            .sum::<f64>()
            / top_nodes.len() as f64;
        force_displacement.push((mean_umag, base_fy * multiplier));

        let field = recover_field(&mesh, &element, &material, &u)?;
        let stresses = recovery::nodal_stresses(&mesh, &field);
        let strains = recovery::nodal_strains(&mesh, &field);
        let mean_stress = top_nodes
            .iter()
            .map(|&n| stresses[n].magnitude())
            .sum::<f64>()
            / top_nodes.len() as f64;
        let mean_strain = top_nodes
            .iter()
            .map(|&n| strains[n].magnitude())
            .sum::<f64>()
            / top_nodes.len() as f64;
        stress_strain.push((mean_strain, mean_stress));
    }

    figures::plot_curve(
        &fig_dir.join("plate_force_displacement.svg"),
        &force_displacement,
        "Applied force vs edge displacement",
        "Mean top-edge |u| (m)",
        "Total F_y (N)",
    )?;
    figures::plot_curve(
        &fig_dir.join("plate_stress_strain.svg"),
        &stress_strain,
        "Stress vs strain at the loaded edge",
        "Mean strain magnitude",
        "Mean stress magnitude (Pa)",
    )?;

    if let Some(slope) = linear_fit_slope(&stress_strain) {
        log::info!(
            "stress-strain slope {:.4e} Pa (E = {:.4e} Pa)",
            slope,
            YOUNGS_MODULUS
        );
    }
    log::info!("figures written to {}", fig_dir.display());

    Ok(())
}

/// Mean of the nodal values over each element's corners.
fn element_cell_means(mesh: &Mesh, nodal_values: &[f64]) -> Vec<f64> {
    mesh.elements()
        .iter()
        .map(|conn| conn.iter().map(|&n| nodal_values[n]).sum::<f64>() / 4.0)
        .collect()
}

/// Least-squares slope of y against x through the data's centroid.
fn linear_fit_slope(points: &[(f64, f64)]) -> Option<f64> {
    let n = points.len() as f64;
    if points.len() < 2 {
        return None;
    }
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let sxx: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    if sxx <= 0.0 {
        return None;
    }
    let sxy: f64 = points
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    Some(sxy / sxx)
}
