//! 4-node bilinear quadrilateral plane stress element (Quad4).
//!
//! The workhorse element for thin plates loaded in their plane:
//! - 4 corner nodes, 2 DOFs per node (u, v displacements), 8 total DOFs
//! - Bilinear isoparametric shape functions
//! - 2×2 Gauss quadrature (4 integration points)
//! - Plane stress assumption: σ_z = τ_yz = τ_xz = 0
//!
//! # Node Numbering
//!
//! ```text
//! 4 --- 3
//! |     |
//! 1 --- 2
//! ```
//! Node 1: (-1, -1), Node 2: (+1, -1), Node 3: (+1, +1), Node 4: (-1, +1)
//! (counter-clockwise, local indices 0..3)
//!
//! # Shape Functions
//!
//! In natural coordinates (ξ, η) ∈ [-1, 1]²:
//! ```text
//! N_i = (1 + ξ_i*ξ)(1 + η_i*η) / 4
//! ```
//!
//! # Edge Loads
//!
//! [`Quad4::edge_traction`] integrates a constant traction vector over one
//! straight element edge into the 8-component element load vector, using the
//! 1-D 2-point Gauss rule with linear edge shape functions.

use crate::element::gauss::{gauss_1d, gauss_quad};
use crate::element::Element;
use crate::error::{Error, Result};
use crate::material::Material;
use crate::types::{Point2, StrainTensor, StressTensor};
use nalgebra::{DMatrix, Matrix2, Vector2};

/// 4-node bilinear quadrilateral plane stress element.
#[derive(Debug, Clone, Copy)]
pub struct Quad4 {
    /// Element thickness.
    thickness: f64,
}

impl Quad4 {
    /// Node positions in natural coordinates, counter-clockwise.
    pub const NODE_COORDS: [(f64, f64); 4] = [
        (-1.0, -1.0), // Node 1
        (1.0, -1.0),  // Node 2
        (1.0, 1.0),   // Node 3
        (-1.0, 1.0),  // Node 4
    ];

    /// Create a new Quad4 element with specified thickness.
    ///
    /// # Arguments
    ///
    /// * `thickness` - Element thickness (must be positive)
    ///
    /// # Panics
    ///
    /// Panics if thickness is not positive.
    pub fn new(thickness: f64) -> Self {
        assert!(thickness > 0.0, "Thickness must be positive");
        Self { thickness }
    }

    /// Element thickness.
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Evaluate shape functions at natural coordinates (ξ, η).
    pub fn shape_functions(xi: f64, eta: f64) -> [f64; 4] {
        [
            0.25 * (1.0 - xi) * (1.0 - eta), // N1
            0.25 * (1.0 + xi) * (1.0 - eta), // N2
            0.25 * (1.0 + xi) * (1.0 + eta), // N3
            0.25 * (1.0 - xi) * (1.0 + eta), // N4
        ]
    }

    /// Evaluate shape function derivatives with respect to natural coordinates.
    ///
    /// Returns (dN/dξ, dN/dη) for each node.
    fn shape_function_derivatives(xi: f64, eta: f64) -> [(f64, f64); 4] {
        [
            (
                -0.25 * (1.0 - eta), // dN1/dξ
                -0.25 * (1.0 - xi),  // dN1/dη
            ),
            (
                0.25 * (1.0 - eta), // dN2/dξ
                -0.25 * (1.0 + xi), // dN2/dη
            ),
            (
                0.25 * (1.0 + eta), // dN3/dξ
                0.25 * (1.0 + xi),  // dN3/dη
            ),
            (
                -0.25 * (1.0 + eta), // dN4/dξ
                0.25 * (1.0 - xi),   // dN4/dη
            ),
        ]
    }

    /// Compute Jacobian matrix and its determinant at (ξ, η).
    ///
    /// Returns (J, det(J)) where J maps natural to physical coordinates.
    fn jacobian(coords: &[Point2], xi: f64, eta: f64) -> (Matrix2<f64>, f64) {
        let dn_dnat = Self::shape_function_derivatives(xi, eta);

        // J = [[∂x/∂ξ, ∂y/∂ξ],
        //      [∂x/∂η, ∂y/∂η]]
        // where ∂x/∂ξ = Σ dN_i/dξ * x_i
        let mut j = Matrix2::zeros();
        for i in 0..4 {
            j[(0, 0)] += dn_dnat[i].0 * coords[i][0]; // ∂x/∂ξ
            j[(0, 1)] += dn_dnat[i].0 * coords[i][1]; // ∂y/∂ξ
            j[(1, 0)] += dn_dnat[i].1 * coords[i][0]; // ∂x/∂η
            j[(1, 1)] += dn_dnat[i].1 * coords[i][1]; // ∂y/∂η
        }

        let det_j = j.determinant();
        (j, det_j)
    }

    /// Compute the B-matrix (3x8 strain-displacement) at (ξ, η).
    ///
    /// # Errors
    ///
    /// Returns an element error if the Jacobian determinant is not positive
    /// (degenerate or inverted geometry).
    fn compute_b_at_point(coords: &[Point2], xi: f64, eta: f64) -> Result<DMatrix<f64>> {
        let dn_dnat = Self::shape_function_derivatives(xi, eta);
        let (j, det_j) = Self::jacobian(coords, xi, eta);

        if det_j <= 0.0 {
            return Err(Error::Element(format!(
                "non-positive Jacobian determinant {} at (xi={}, eta={})",
                det_j, xi, eta
            )));
        }

        // Invert Jacobian to get dN/dx, dN/dy from dN/dξ, dN/dη
        let j_inv = j.try_inverse().ok_or_else(|| {
            Error::Element("Jacobian is numerically singular".into())
        })?;

        let mut dn_dx = [(0.0, 0.0); 4];
        for i in 0..4 {
            let dnat = Vector2::new(dn_dnat[i].0, dn_dnat[i].1);
            let dphys = j_inv * dnat;
            dn_dx[i] = (dphys[0], dphys[1]);
        }

        // Build B-matrix (3x8)
        let mut b = DMatrix::zeros(3, 8);
        for i in 0..4 {
            let col = 2 * i;
            b[(0, col)] = dn_dx[i].0; // ε_xx = ∂u/∂x
            b[(1, col + 1)] = dn_dx[i].1; // ε_yy = ∂v/∂y
            b[(2, col)] = dn_dx[i].1; // γ_xy = ∂u/∂y + ∂v/∂x
            b[(2, col + 1)] = dn_dx[i].0;
        }

        Ok(b)
    }

    /// Evaluate strain at an arbitrary natural-coordinate point.
    ///
    /// Used by stress recovery both at Gauss points and at the element
    /// corners ((ξ, η) = (±1, ±1)).
    pub fn strain_at(
        coords: &[Point2],
        displacements: &[f64],
        xi: f64,
        eta: f64,
    ) -> Result<StrainTensor> {
        assert_eq!(displacements.len(), 8, "Quad4 requires 8 displacement DOFs");

        let b = Self::compute_b_at_point(coords, xi, eta)?;
        let u = nalgebra::DVector::from_row_slice(displacements);
        let strain = &b * &u;

        Ok(StrainTensor::new([strain[0], strain[1], strain[2]]))
    }

    /// Evaluate stress at an arbitrary natural-coordinate point.
    pub fn stress_at(
        coords: &[Point2],
        displacements: &[f64],
        material: &Material,
        xi: f64,
        eta: f64,
    ) -> Result<StressTensor> {
        let strain = Self::strain_at(coords, displacements, xi, eta)?;
        let d = material.constitutive_plane_stress();
        Ok(StressTensor(d * strain.0))
    }

    /// Integrate a constant traction over one element edge.
    ///
    /// Edge `e` runs from local node `e` to local node `(e+1) % 4`
    /// (edge 0 = bottom, 1 = right, 2 = top, 3 = left for the reference
    /// orientation). The traction vector is a force per unit area; the
    /// resulting load vector is scaled by edge length and thickness.
    ///
    /// Returns the 8-component element load vector with contributions only
    /// on the two edge nodes.
    ///
    /// # Errors
    ///
    /// Returns an element error if `edge` is not in 0..4.
    pub fn edge_traction(
        &self,
        coords: &[Point2],
        edge: usize,
        traction: Vector2<f64>,
    ) -> Result<[f64; 8]> {
        assert_eq!(coords.len(), 4, "Quad4 requires exactly 4 nodal coordinates");

        if edge >= 4 {
            return Err(Error::Element(format!(
                "edge index {} out of range for Quad4 (0..4)",
                edge
            )));
        }

        let a = edge;
        let b = (edge + 1) % 4;
        let edge_length = (coords[b] - coords[a]).norm();

        // Linear edge shape functions N_a = (1-ξ)/2, N_b = (1+ξ)/2 on [-1, 1];
        // the edge Jacobian for a straight edge is edge_length / 2.
        let mut fe = [0.0; 8];
        for (xi, w) in gauss_1d(2) {
            let n_a = 0.5 * (1.0 - xi);
            let n_b = 0.5 * (1.0 + xi);
            let scale = w * 0.5 * edge_length * self.thickness;

            for c in 0..2 {
                fe[2 * a + c] += n_a * traction[c] * scale;
                fe[2 * b + c] += n_b * traction[c] * scale;
            }
        }

        Ok(fe)
    }
}

impl Element for Quad4 {
    fn n_nodes(&self) -> usize {
        4
    }

    fn dofs_per_node(&self) -> usize {
        2
    }

    fn stiffness(&self, coords: &[Point2], material: &Material) -> Result<DMatrix<f64>> {
        assert_eq!(coords.len(), 4, "Quad4 requires exactly 4 nodal coordinates");

        let d = material.constitutive_plane_stress();
        let mut k = DMatrix::zeros(8, 8);

        // 2x2 Gauss quadrature
        for gp in &gauss_quad(2) {
            let xi = gp.xi();
            let eta = gp.eta();
            let weight = gp.weight;

            let b = Self::compute_b_at_point(coords, xi, eta)?;
            let (_, det_j) = Self::jacobian(coords, xi, eta);

            // K += w * t * det(J) * B^T * D * B
            let db = &d * &b;
            let k_contrib = b.transpose() * db * (weight * self.thickness * det_j);
            k += k_contrib;
        }

        Ok(k)
    }

    fn strain(&self, coords: &[Point2], displacements: &[f64]) -> Result<Vec<StrainTensor>> {
        assert_eq!(coords.len(), 4, "Quad4 requires exactly 4 nodal coordinates");

        gauss_quad(2)
            .iter()
            .map(|gp| Self::strain_at(coords, displacements, gp.xi(), gp.eta()))
            .collect()
    }

    fn stress(
        &self,
        coords: &[Point2],
        displacements: &[f64],
        material: &Material,
    ) -> Result<Vec<StressTensor>> {
        let d = material.constitutive_plane_stress();
        self.strain(coords, displacements)?
            .into_iter()
            .map(|eps| Ok(StressTensor(d * eps.0)))
            .collect()
    }

    fn area(&self, coords: &[Point2]) -> f64 {
        assert_eq!(coords.len(), 4, "Quad4 requires exactly 4 nodal coordinates");

        // Integrate det(J) with 2x2 Gauss quadrature
        gauss_quad(2)
            .iter()
            .map(|gp| {
                let (_, det_j) = Self::jacobian(coords, gp.xi(), gp.eta());
                gp.weight * det_j
            })
            .sum()
    }
}
