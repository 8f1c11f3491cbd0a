//! Finite element assembly.
//!
//! Assembles the global stiffness matrix and load vector from element
//! contributions, then eliminates prescribed displacements by free-DOF
//! reduction so the solver only sees the unconstrained partition.

use std::collections::HashMap;

use nalgebra::Vector2;

use crate::element::{Element, Quad4};
use crate::error::{Error, Result};
use crate::material::Material;
use crate::mesh::Mesh;
use crate::sparse::{CsrMatrix, LoadVector, TripletMatrix};
use crate::types::Point2;

/// Degrees of freedom per node (u, v displacements).
pub const DOFS_PER_NODE: usize = 2;

/// Global DOF index for a node's displacement component.
pub fn global_dof(node: usize, dof: usize) -> usize {
    node * DOFS_PER_NODE + dof
}

/// Boundary condition types.
#[derive(Debug, Clone)]
pub enum BoundaryCondition {
    /// Fixed displacement (Dirichlet).
    Displacement { node: usize, dof: usize, value: f64 },
    /// Applied nodal force (Neumann).
    Force { node: usize, dof: usize, value: f64 },
}

/// Distributed traction applied to one element edge.
#[derive(Debug, Clone)]
pub struct EdgeLoad {
    /// Element index.
    pub element: usize,
    /// Local edge index (edge `e` runs from local node `e` to `(e+1) % 4`).
    pub edge: usize,
    /// Traction vector (force per unit area).
    pub traction: Vector2<f64>,
}

/// Assembled system ready for constraint reduction.
pub struct AssembledSystem {
    /// Global stiffness matrix.
    pub stiffness: CsrMatrix,
    /// Right-hand side (load) vector.
    pub rhs: Vec<f64>,
    /// Number of DOFs in the system.
    pub n_dofs: usize,
    /// Constrained DOF indices and their prescribed values.
    pub constraints: HashMap<usize, f64>,
}

/// Assemble the global stiffness matrix for a uniform-element mesh.
pub fn assemble_stiffness(
    mesh: &Mesh,
    element: &dyn Element,
    material: &Material,
) -> Result<CsrMatrix> {
    let dofs_per_node = element.dofs_per_node();
    let n_dofs = mesh.n_nodes() * dofs_per_node;

    // ~9-node stencil on a structured quad grid
    let nnz_estimate = n_dofs * 9 * dofs_per_node;
    let mut triplet = TripletMatrix::with_capacity(n_dofs, n_dofs, nnz_estimate);

    for connectivity in mesh.elements() {
        let coords: Vec<Point2> = connectivity.iter().map(|&i| mesh.nodes()[i]).collect();

        let ke = element.stiffness(&coords, material)?;

        let dof_indices: Vec<usize> = connectivity
            .iter()
            .flat_map(|&node| (0..dofs_per_node).map(move |d| node * dofs_per_node + d))
            .collect();

        triplet.add_submatrix(&dof_indices, &ke);
    }

    triplet.to_csr()
}

/// Assemble global stiffness matrix, load vector and constraint table.
///
/// This is the main entry point for plane stress assembly. It:
/// 1. Computes element stiffness matrices and scatters them into the
///    global sparse matrix
/// 2. Integrates edge tractions into the load vector
/// 3. Records nodal forces and prescribed displacements
///
/// # Arguments
///
/// * `mesh` - Finite element mesh
/// * `element` - Element formulation (uniform for all elements)
/// * `material` - Material properties (uniform for all elements)
/// * `boundary_conditions` - Nodal BCs (displacements and forces)
/// * `edge_loads` - Distributed tractions on element edges
pub fn assemble(
    mesh: &Mesh,
    element: &Quad4,
    material: &Material,
    boundary_conditions: &[BoundaryCondition],
    edge_loads: &[EdgeLoad],
) -> Result<AssembledSystem> {
    let n_dofs = mesh.n_nodes() * DOFS_PER_NODE;

    let stiffness = assemble_stiffness(mesh, element, material)?;

    let mut rhs = LoadVector::zeros(n_dofs);
    let mut constraints = HashMap::new();

    for load in edge_loads {
        let connectivity = mesh.element(load.element).ok_or_else(|| {
            Error::Assembly(format!(
                "Edge load references element {} (mesh has {})",
                load.element,
                mesh.n_elements()
            ))
        })?;
        let coords: Vec<Point2> = connectivity.iter().map(|&i| mesh.nodes()[i]).collect();

        let fe = element.edge_traction(&coords, load.edge, load.traction)?;

        let dof_indices: Vec<usize> = connectivity
            .iter()
            .flat_map(|&node| (0..DOFS_PER_NODE).map(move |d| global_dof(node, d)))
            .collect();

        rhs.add_subvector(&dof_indices, &fe);
    }

    for bc in boundary_conditions {
        let (node, dof) = match bc {
            BoundaryCondition::Displacement { node, dof, .. }
            | BoundaryCondition::Force { node, dof, .. } => (*node, *dof),
        };
        if node >= mesh.n_nodes() || dof >= DOFS_PER_NODE {
            return Err(Error::Assembly(format!(
                "Boundary condition references node {} dof {} (mesh has {} nodes)",
                node,
                dof,
                mesh.n_nodes()
            )));
        }

        match bc {
            BoundaryCondition::Displacement { value, .. } => {
                constraints.insert(global_dof(node, dof), *value);
            }
            BoundaryCondition::Force { value, .. } => {
                rhs.add(global_dof(node, dof), *value);
            }
        }
    }

    Ok(AssembledSystem {
        stiffness,
        rhs: rhs.into_vec(),
        n_dofs,
        constraints,
    })
}

/// System restricted to the free (unconstrained) DOFs.
///
/// Prescribed displacements are eliminated by partitioning: with free DOFs
/// `f` and constrained DOFs `c`,
///
/// ```text
/// K_ff u_f = f_f - K_fc u_c
/// ```
///
/// The reduced stiffness is assembled once; [`ReducedSystem::reduce_rhs`]
/// maps any full-size load vector onto the free partition, so a load sweep
/// can reuse a single factorization.
pub struct ReducedSystem {
    /// Stiffness restricted to free DOFs (`K_ff`).
    pub stiffness: CsrMatrix,
    /// Reduced right-hand side for the assembled loads.
    pub rhs: Vec<f64>,
    free_dofs: Vec<usize>,
    prescribed: Vec<Option<f64>>,
    correction: Vec<f64>,
    n_dofs: usize,
}

impl ReducedSystem {
    /// Partition an assembled system into free and constrained DOFs.
    ///
    /// # Errors
    ///
    /// Returns an assembly error if a constraint references a DOF outside
    /// the system.
    pub fn new(system: &AssembledSystem) -> Result<Self> {
        let n_dofs = system.n_dofs;

        let mut prescribed: Vec<Option<f64>> = vec![None; n_dofs];
        for (&dof, &value) in &system.constraints {
            if dof >= n_dofs {
                return Err(Error::Assembly(format!(
                    "Constraint references DOF {} (system has {})",
                    dof, n_dofs
                )));
            }
            prescribed[dof] = Some(value);
        }

        let free_dofs: Vec<usize> = (0..n_dofs).filter(|&d| prescribed[d].is_none()).collect();
        let n_free = free_dofs.len();

        let mut full_to_free: Vec<Option<usize>> = vec![None; n_dofs];
        for (k, &dof) in free_dofs.iter().enumerate() {
            full_to_free[dof] = Some(k);
        }

        // Walk the CSR matrix once, routing each entry to K_ff or to the
        // -K_fc u_c correction
        let mut triplet = TripletMatrix::with_capacity(n_free, n_free, system.stiffness.nnz());
        let mut correction = vec![0.0; n_free];
        for (i, j, &value) in system.stiffness.triplet_iter() {
            match (full_to_free[i], full_to_free[j]) {
                (Some(fi), Some(fj)) => triplet.add(fi, fj, value),
                (Some(fi), None) => {
                    if let Some(u_c) = prescribed[j] {
                        correction[fi] -= value * u_c;
                    }
                }
                _ => {}
            }
        }

        let stiffness = triplet.to_csr()?;

        let mut reduced = Self {
            stiffness,
            rhs: Vec::new(),
            free_dofs,
            prescribed,
            correction,
            n_dofs,
        };
        reduced.rhs = reduced.reduce_rhs(&system.rhs)?;
        Ok(reduced)
    }

    /// Number of free DOFs.
    pub fn n_free(&self) -> usize {
        self.free_dofs.len()
    }

    /// Total number of DOFs in the full system.
    pub fn n_dofs(&self) -> usize {
        self.n_dofs
    }

    /// Map a full-size load vector onto the free partition, including the
    /// prescribed-displacement correction.
    ///
    /// # Errors
    ///
    /// Returns an assembly error on a length mismatch.
    pub fn reduce_rhs(&self, full_rhs: &[f64]) -> Result<Vec<f64>> {
        if full_rhs.len() != self.n_dofs {
            return Err(Error::Assembly(format!(
                "Load vector has {} entries, system has {} DOFs",
                full_rhs.len(),
                self.n_dofs
            )));
        }

        Ok(self
            .free_dofs
            .iter()
            .enumerate()
            .map(|(k, &dof)| full_rhs[dof] + self.correction[k])
            .collect())
    }

    /// Expand a free-DOF solution back to the full displacement vector,
    /// filling in prescribed values at constrained DOFs.
    pub fn expand(&self, free_solution: &[f64]) -> Vec<f64> {
        debug_assert_eq!(free_solution.len(), self.free_dofs.len());

        let mut full = vec![0.0; self.n_dofs];
        for (dof, value) in self.prescribed.iter().enumerate() {
            if let Some(u_c) = value {
                full[dof] = *u_c;
            }
        }
        for (k, &dof) in self.free_dofs.iter().enumerate() {
            full[dof] = free_solution[k];
        }
        full
    }
}
