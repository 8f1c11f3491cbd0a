//! Finite element trait and implementations.

pub mod gauss;
pub mod quad4;

pub use quad4::Quad4;

use crate::error::Result;
use crate::material::Material;
use crate::types::{Point2, StrainTensor, StressTensor};
use nalgebra::DMatrix;

/// Common interface for all plane finite element types.
pub trait Element: Send + Sync {
    /// Number of nodes in this element.
    fn n_nodes(&self) -> usize;

    /// Number of degrees of freedom per node.
    fn dofs_per_node(&self) -> usize;

    /// Total number of DOFs for this element.
    fn n_dofs(&self) -> usize {
        self.n_nodes() * self.dofs_per_node()
    }

    /// Compute the element stiffness matrix.
    ///
    /// # Arguments
    ///
    /// * `coords` - Nodal coordinates (one [`Point2`] per node)
    /// * `material` - Material properties
    ///
    /// # Errors
    ///
    /// Returns an element error for degenerate geometry.
    fn stiffness(&self, coords: &[Point2], material: &Material) -> Result<DMatrix<f64>>;

    /// Compute strain at each integration point from nodal displacements.
    fn strain(&self, coords: &[Point2], displacements: &[f64]) -> Result<Vec<StrainTensor>>;

    /// Compute stress at each integration point from nodal displacements.
    fn stress(
        &self,
        coords: &[Point2],
        displacements: &[f64],
        material: &Material,
    ) -> Result<Vec<StressTensor>>;

    /// Compute the in-plane element area.
    fn area(&self, coords: &[Point2]) -> f64;
}
