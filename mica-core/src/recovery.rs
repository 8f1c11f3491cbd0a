//! Strain and stress recovery from the displacement solution.
//!
//! After solving K u = f, this module walks the mesh and evaluates
//! ε = B u_e and σ = D ε per element, both at the 2×2 Gauss points and at
//! the four corner natural coordinates (±1, ±1). Element averages use the
//! corner values; nodal fields average the corner evaluations of every
//! element adjacent to a node.

use nalgebra::Vector3;

use crate::element::{Element, Quad4};
use crate::error::{Error, Result};
use crate::material::Material;
use crate::mesh::Mesh;
use crate::types::{Point2, StrainTensor, StressTensor};

/// Recovered strains and stresses for a single element.
#[derive(Debug, Clone)]
pub struct ElementRecovery {
    /// Element index in the mesh.
    pub element_id: usize,
    /// Strain at each Gauss point.
    pub gauss_strains: Vec<StrainTensor>,
    /// Stress at each Gauss point.
    pub gauss_stresses: Vec<StressTensor>,
    /// Strain at the element corners, in connectivity order.
    pub corner_strains: [StrainTensor; 4],
    /// Stress at the element corners, in connectivity order.
    pub corner_stresses: [StressTensor; 4],
}

impl ElementRecovery {
    /// Element strain, averaged over the corner evaluations.
    pub fn average_strain(&self) -> StrainTensor {
        let sum: Vector3<f64> = self.corner_strains.iter().map(|s| s.0).sum();
        StrainTensor(sum / 4.0)
    }

    /// Element stress, averaged over the corner evaluations.
    pub fn average_stress(&self) -> StressTensor {
        let sum: Vector3<f64> = self.corner_stresses.iter().map(|s| s.0).sum();
        StressTensor(sum / 4.0)
    }

    /// Maximum von Mises stress among the Gauss points.
    pub fn max_von_mises(&self) -> f64 {
        self.gauss_stresses
            .iter()
            .map(|s| s.von_mises())
            .fold(0.0, f64::max)
    }
}

/// Recovered strain/stress results for the entire mesh.
#[derive(Debug, Clone)]
pub struct RecoveredField {
    /// Per-element recovery, indexed by element ID.
    pub elements: Vec<ElementRecovery>,
}

impl RecoveredField {
    /// Get recovery results for a specific element.
    pub fn element(&self, elem_id: usize) -> Option<&ElementRecovery> {
        self.elements.get(elem_id)
    }

    /// Number of elements with recovery data.
    pub fn n_elements(&self) -> usize {
        self.elements.len()
    }

    /// Maximum von Mises stress across all elements.
    pub fn max_von_mises(&self) -> f64 {
        self.elements
            .iter()
            .map(|e| e.max_von_mises())
            .fold(0.0, f64::max)
    }

    /// Average stress per element.
    pub fn average_stresses(&self) -> Vec<StressTensor> {
        self.elements.iter().map(|e| e.average_stress()).collect()
    }

    /// Average strain per element.
    pub fn average_strains(&self) -> Vec<StrainTensor> {
        self.elements.iter().map(|e| e.average_strain()).collect()
    }

    /// Von Mises stress per element (from the element average).
    pub fn von_mises_stresses(&self) -> Vec<f64> {
        self.elements
            .iter()
            .map(|e| e.average_stress().von_mises())
            .collect()
    }

    /// Stress magnitude per element (from the element average).
    pub fn stress_magnitudes(&self) -> Vec<f64> {
        self.elements
            .iter()
            .map(|e| e.average_stress().magnitude())
            .collect()
    }

    /// Strain magnitude per element (from the element average).
    pub fn strain_magnitudes(&self) -> Vec<f64> {
        self.elements
            .iter()
            .map(|e| e.average_strain().magnitude())
            .collect()
    }
}

/// Extract one element's local displacement vector from the global solution.
fn element_displacements(connectivity: &[usize; 4], displacements: &[f64]) -> [f64; 8] {
    let mut local = [0.0; 8];
    for (local_node, &global_node) in connectivity.iter().enumerate() {
        local[2 * local_node] = displacements[2 * global_node];
        local[2 * local_node + 1] = displacements[2 * global_node + 1];
    }
    local
}

/// Recover strains and stresses from the displacement solution.
///
/// # Arguments
///
/// * `mesh` - The finite element mesh
/// * `element` - Element formulation (uniform for all elements)
/// * `material` - Material properties (uniform for all elements)
/// * `displacements` - Global displacement vector (`n_nodes * 2` entries)
///
/// # Errors
///
/// Returns an assembly error on a displacement-vector length mismatch, or
/// an element error for degenerate geometry.
pub fn recover_field(
    mesh: &Mesh,
    element: &Quad4,
    material: &Material,
    displacements: &[f64],
) -> Result<RecoveredField> {
    let expected = mesh.n_nodes() * 2;
    if displacements.len() != expected {
        return Err(Error::Assembly(format!(
            "Displacement vector has {} entries, expected {}",
            displacements.len(),
            expected
        )));
    }

    let d = material.constitutive_plane_stress();

    let mut elements = Vec::with_capacity(mesh.n_elements());
    for (elem_idx, connectivity) in mesh.elements().iter().enumerate() {
        let coords: Vec<Point2> = connectivity.iter().map(|&i| mesh.nodes()[i]).collect();
        let local_u = element_displacements(connectivity, displacements);

        let gauss_strains = element.strain(&coords, &local_u)?;
        let gauss_stresses = element.stress(&coords, &local_u, material)?;

        let mut corner_strains = [StrainTensor::zero(); 4];
        let mut corner_stresses = [StressTensor::zero(); 4];
        for (k, (xi, eta)) in Quad4::NODE_COORDS.iter().enumerate() {
            let eps = Quad4::strain_at(&coords, &local_u, *xi, *eta)?;
            corner_strains[k] = eps;
            corner_stresses[k] = StressTensor(d * eps.0);
        }

        elements.push(ElementRecovery {
            element_id: elem_idx,
            gauss_strains,
            gauss_stresses,
            corner_strains,
            corner_stresses,
        });
    }

    Ok(RecoveredField { elements })
}

/// Nodal stresses averaged over adjacent elements.
///
/// Each node receives the mean of the corner evaluations of every element
/// containing it, divided by the actual adjacency count (corner nodes of a
/// structured mesh have 1, edges 2, interior 4).
pub fn nodal_stresses(mesh: &Mesh, field: &RecoveredField) -> Vec<StressTensor> {
    let mut sums = vec![Vector3::zeros(); mesh.n_nodes()];
    let mut counts = vec![0usize; mesh.n_nodes()];

    for (elem_idx, connectivity) in mesh.elements().iter().enumerate() {
        if let Some(recovery) = field.element(elem_idx) {
            for (local, &node) in connectivity.iter().enumerate() {
                sums[node] += recovery.corner_stresses[local].0;
                counts[node] += 1;
            }
        }
    }

    sums.into_iter()
        .zip(counts)
        .map(|(sum, count)| {
            if count > 0 {
                StressTensor(sum / count as f64)
            } else {
                StressTensor::zero()
            }
        })
        .collect()
}

/// Nodal strains averaged over adjacent elements.
pub fn nodal_strains(mesh: &Mesh, field: &RecoveredField) -> Vec<StrainTensor> {
    let mut sums = vec![Vector3::zeros(); mesh.n_nodes()];
    let mut counts = vec![0usize; mesh.n_nodes()];

    for (elem_idx, connectivity) in mesh.elements().iter().enumerate() {
        if let Some(recovery) = field.element(elem_idx) {
            for (local, &node) in connectivity.iter().enumerate() {
                sums[node] += recovery.corner_strains[local].0;
                counts[node] += 1;
            }
        }
    }

    sums.into_iter()
        .zip(counts)
        .map(|(sum, count)| {
            if count > 0 {
                StrainTensor(sum / count as f64)
            } else {
                StrainTensor::zero()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_material() -> Material {
        Material::new(1e6, 0.25).unwrap()
    }

    #[test]
    fn test_recovery_zero_displacement() {
        let mesh = Mesh::rectangle(1.0, 1.0, 2, 2).unwrap();
        let quad = Quad4::new(1.0);

        let displacements = vec![0.0; mesh.n_nodes() * 2];
        let field = recover_field(&mesh, &quad, &test_material(), &displacements).unwrap();

        assert_eq!(field.n_elements(), 4);
        for recovery in &field.elements {
            assert_eq!(recovery.gauss_strains.len(), 4);
            assert_eq!(recovery.gauss_stresses.len(), 4);
            assert_relative_eq!(recovery.max_von_mises(), 0.0, epsilon = 1e-12);
        }
        assert_relative_eq!(field.max_von_mises(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_recovery_length_mismatch() {
        let mesh = Mesh::rectangle(1.0, 1.0, 1, 1).unwrap();
        let quad = Quad4::new(1.0);

        assert!(recover_field(&mesh, &quad, &test_material(), &[0.0; 3]).is_err());
    }

    #[test]
    fn test_recovery_uniform_extension() {
        // u = ε x on a 2x2 mesh: constant strain everywhere
        let mesh = Mesh::rectangle(1.0, 1.0, 2, 2).unwrap();
        let quad = Quad4::new(1.0);
        let mat = test_material();

        let strain = 0.001;
        let displacements: Vec<f64> = mesh
            .nodes()
            .iter()
            .flat_map(|p| [strain * p[0], 0.0])
            .collect();

        let field = recover_field(&mesh, &quad, &mat, &displacements).unwrap();

        let d = mat.constitutive_plane_stress();
        let expected_sigma_xx = d[(0, 0)] * strain;
        let expected_sigma_yy = d[(1, 0)] * strain;

        for recovery in &field.elements {
            let avg = recovery.average_stress();
            assert_relative_eq!(avg.0[0], expected_sigma_xx, epsilon = 1e-6);
            assert_relative_eq!(avg.0[1], expected_sigma_yy, epsilon = 1e-6);
            assert_relative_eq!(avg.0[2], 0.0, epsilon = 1e-9);

            // Corner and Gauss evaluations agree for a constant field
            for (corner, gauss) in recovery
                .corner_stresses
                .iter()
                .zip(recovery.gauss_stresses.iter())
            {
                assert_relative_eq!(corner.0[0], gauss.0[0], epsilon = 1e-6);
            }

            let avg_strain = recovery.average_strain();
            assert_relative_eq!(avg_strain.0[0], strain, epsilon = 1e-12);
            assert_relative_eq!(avg_strain.0[1], 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_nodal_averaging_constant_field() {
        // Adjacent elements see the same constant field, so nodal averages
        // reproduce it regardless of adjacency count
        let mesh = Mesh::rectangle(2.0, 1.0, 2, 1).unwrap();
        let quad = Quad4::new(1.0);
        let mat = test_material();

        let strain = 0.002;
        let displacements: Vec<f64> = mesh
            .nodes()
            .iter()
            .flat_map(|p| [strain * p[0], 0.0])
            .collect();

        let field = recover_field(&mesh, &quad, &mat, &displacements).unwrap();

        let stresses = nodal_stresses(&mesh, &field);
        let strains = nodal_strains(&mesh, &field);
        assert_eq!(stresses.len(), mesh.n_nodes());
        assert_eq!(strains.len(), mesh.n_nodes());

        let d = mat.constitutive_plane_stress();
        let expected_sigma_xx = d[(0, 0)] * strain;
        for stress in &stresses {
            assert_relative_eq!(stress.0[0], expected_sigma_xx, epsilon = 1e-6);
        }
        for eps in &strains {
            assert_relative_eq!(eps.0[0], strain, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_field_magnitudes() {
        let mesh = Mesh::rectangle(1.0, 1.0, 2, 2).unwrap();
        let quad = Quad4::new(1.0);

        let displacements = vec![0.0; mesh.n_nodes() * 2];
        let field = recover_field(&mesh, &quad, &test_material(), &displacements).unwrap();

        assert_eq!(field.stress_magnitudes().len(), 4);
        assert_eq!(field.strain_magnitudes().len(), 4);
        assert_eq!(field.von_mises_stresses().len(), 4);
        assert!(field.stress_magnitudes().iter().all(|&m| m == 0.0));
    }
}
