//! Integration tests for the plane-stress solver: a rectangular plate under
//! uniform uniaxial tension, checked against the exact elasticity solution.
//!
//! With the bottom edge held vertically, the origin pinned, and traction σ
//! on the top edge, the exact fields are σ_yy = σ uniformly, u_y = σ·y/E,
//! and u_x = −ν·σ·x/E. Bilinear quads reproduce linear displacement fields
//! exactly, so tolerances are solver precision, not discretization error.

use approx::assert_relative_eq;
use mica_core::assembly::{assemble, BoundaryCondition, EdgeLoad, ReducedSystem};
use mica_core::recovery::{self, recover_field};
use mica_core::solver::{CholeskyFactorization, DenseLuSolver, Solver};
use mica_core::{Material, Mesh, Quad4};
use nalgebra::Vector2;

const YOUNGS_MODULUS: f64 = 120.0e9;
const POISSONS_RATIO: f64 = 0.33;
const LENGTH: f64 = 0.04;
const HEIGHT: f64 = 0.03;
const THICKNESS: f64 = 1.0;
const TRACTION: f64 = 5.0e7;
const TOL: f64 = 1e-9;

struct Plate {
    mesh: Mesh,
    material: Material,
    element: Quad4,
}

fn build_plate(nx: usize, ny: usize) -> Plate {
    Plate {
        mesh: Mesh::rectangle(LENGTH, HEIGHT, nx, ny).unwrap(),
        material: Material::new(YOUNGS_MODULUS, POISSONS_RATIO).unwrap(),
        element: Quad4::new(THICKNESS),
    }
}

fn tension_bcs(mesh: &Mesh) -> Vec<BoundaryCondition> {
    let mut bcs = Vec::new();
    for node in mesh.nodes_where(|p| p.y.abs() < TOL) {
        bcs.push(BoundaryCondition::Displacement {
            node,
            dof: 1,
            value: 0.0,
        });
    }
    for node in mesh.nodes_where(|p| p.x.abs() < TOL && p.y.abs() < TOL) {
        bcs.push(BoundaryCondition::Displacement {
            node,
            dof: 0,
            value: 0.0,
        });
    }
    bcs
}

fn top_edge_loads(mesh: &Mesh, traction: f64) -> Vec<EdgeLoad> {
    mesh.boundary_edges_where(|p| (p.y - HEIGHT).abs() < TOL)
        .into_iter()
        .map(|(element, edge)| EdgeLoad {
            element,
            edge,
            traction: Vector2::new(0.0, traction),
        })
        .collect()
}

fn solve_plate(plate: &Plate, traction: f64) -> Vec<f64> {
    let system = assemble(
        &plate.mesh,
        &plate.element,
        &plate.material,
        &tension_bcs(&plate.mesh),
        &top_edge_loads(&plate.mesh, traction),
    )
    .unwrap();
    let reduced = ReducedSystem::new(&system).unwrap();
    let factorization = CholeskyFactorization::new(&reduced.stiffness).unwrap();
    let free = factorization.solve(&reduced.rhs).unwrap();
    reduced.expand(&free)
}

#[test]
fn displacements_match_uniaxial_solution() {
    let plate = build_plate(5, 10);
    let u = solve_plate(&plate, TRACTION);

    for (n, p) in plate.mesh.nodes().iter().enumerate() {
        let expected_ux = -POISSONS_RATIO * TRACTION * p.x / YOUNGS_MODULUS;
        let expected_uy = TRACTION * p.y / YOUNGS_MODULUS;
        assert!(
            (u[2 * n] - expected_ux).abs() < 1e-12,
            "node {} at ({}, {}): u_x = {:.6e}, expected {:.6e}",
            n,
            p.x,
            p.y,
            u[2 * n],
            expected_ux
        );
        assert!(
            (u[2 * n + 1] - expected_uy).abs() < 1e-12,
            "node {} at ({}, {}): u_y = {:.6e}, expected {:.6e}",
            n,
            p.x,
            p.y,
            u[2 * n + 1],
            expected_uy
        );
    }

    // Top edge stretch in absolute terms: σH/E = 1.25e-5 m.
    let top = plate
        .mesh
        .nodes_where(|p| (p.y - HEIGHT).abs() < TOL);
    for &n in &top {
        assert_relative_eq!(u[2 * n + 1], 1.25e-5, epsilon = 1e-12);
    }
}

#[test]
fn recovered_stress_is_uniform_uniaxial() {
    let plate = build_plate(4, 6);
    let u = solve_plate(&plate, TRACTION);
    let field = recover_field(&plate.mesh, &plate.element, &plate.material, &u).unwrap();

    for elem in &field.elements {
        let avg = elem.average_stress();
        assert!(
            (avg.0[1] - TRACTION).abs() < 1e-4 * TRACTION,
            "element {}: σ_yy = {:.6e}",
            elem.element_id,
            avg.0[1]
        );
        assert!(avg.0[0].abs() < 1e-4 * TRACTION, "σ_xx = {:.3e}", avg.0[0]);
        assert!(avg.0[2].abs() < 1e-4 * TRACTION, "τ_xy = {:.3e}", avg.0[2]);

        // Corner recovery agrees with the Gauss points for a constant field.
        for corner in &elem.corner_stresses {
            assert!((corner.0[1] - TRACTION).abs() < 1e-4 * TRACTION);
        }
    }

    assert!((field.max_von_mises() - TRACTION).abs() < 1e-4 * TRACTION);
}

#[test]
fn nodal_averages_match_the_uniform_field() {
    let plate = build_plate(3, 5);
    let u = solve_plate(&plate, TRACTION);
    let field = recover_field(&plate.mesh, &plate.element, &plate.material, &u).unwrap();

    let stresses = recovery::nodal_stresses(&plate.mesh, &field);
    let strains = recovery::nodal_strains(&plate.mesh, &field);
    let expected_eyy = TRACTION / YOUNGS_MODULUS;
    let expected_exx = -POISSONS_RATIO * expected_eyy;

    for n in 0..plate.mesh.n_nodes() {
        assert!((stresses[n].0[1] - TRACTION).abs() < 1e-4 * TRACTION);
        assert!((strains[n].0[1] - expected_eyy).abs() < 1e-4 * expected_eyy.abs());
        assert!((strains[n].0[0] - expected_exx).abs() < 1e-4 * expected_eyy.abs());
    }
}

#[test]
fn response_scales_linearly_with_load() {
    let plate = build_plate(4, 6);
    let system = assemble(
        &plate.mesh,
        &plate.element,
        &plate.material,
        &tension_bcs(&plate.mesh),
        &top_edge_loads(&plate.mesh, 1.0e6),
    )
    .unwrap();
    let reduced = ReducedSystem::new(&system).unwrap();
    let factorization = CholeskyFactorization::new(&reduced.stiffness).unwrap();

    let solve_at = |multiplier: f64| {
        let scaled: Vec<f64> = system.rhs.iter().map(|f| f * multiplier).collect();
        let reduced_rhs = reduced.reduce_rhs(&scaled).unwrap();
        let free = factorization.solve(&reduced_rhs).unwrap();
        reduced.expand(&free)
    };

    let u1 = solve_at(10.0);
    let u2 = solve_at(20.0);
    for (a, b) in u1.iter().zip(&u2) {
        assert!((2.0 * a - b).abs() < 1e-12 + 1e-9 * b.abs());
    }
}

#[test]
fn total_applied_force_matches_traction_resultant() {
    let plate = build_plate(5, 10);
    let system = assemble(
        &plate.mesh,
        &plate.element,
        &plate.material,
        &tension_bcs(&plate.mesh),
        &top_edge_loads(&plate.mesh, TRACTION),
    )
    .unwrap();

    let total_fy: f64 = system.rhs.iter().skip(1).step_by(2).sum();
    let expected = TRACTION * LENGTH * THICKNESS;
    assert_relative_eq!(total_fy, expected, max_relative = 1e-9);
}

#[test]
fn sparse_and_dense_solvers_agree() {
    let plate = build_plate(3, 4);
    let system = assemble(
        &plate.mesh,
        &plate.element,
        &plate.material,
        &tension_bcs(&plate.mesh),
        &top_edge_loads(&plate.mesh, TRACTION),
    )
    .unwrap();
    let reduced = ReducedSystem::new(&system).unwrap();

    let dense = DenseLuSolver::new()
        .solve(&reduced.stiffness, &reduced.rhs)
        .unwrap();
    let factorization = CholeskyFactorization::new(&reduced.stiffness).unwrap();
    let sparse = factorization.solve(&reduced.rhs).unwrap();

    let scale = dense.iter().cloned().fold(0.0f64, |a, b| a.max(b.abs()));
    for (a, b) in dense.iter().zip(&sparse) {
        assert!((a - b).abs() < 1e-9 * scale.max(1e-30));
    }
}
