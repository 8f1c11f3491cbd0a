//! Core data types shared by the MD and FEM halves.
//!
//! - Geometric primitives (2-D points for meshes, 3-D vectors for particles)
//! - Plane stress and strain tensors in Voigt notation

use nalgebra::{Matrix2, Matrix3, Vector2, Vector3};

/// A point in the 2-D analysis plane.
pub type Point2 = Vector2<f64>;

/// A 3-D vector (particle position, velocity, force).
pub type Vec3 = Vector3<f64>;

/// In-plane stress tensor in Voigt notation.
///
/// Components are ordered as: [σ_xx, σ_yy, τ_xy]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressTensor(pub Vector3<f64>);

impl StressTensor {
    /// Create a new stress tensor from Voigt components.
    pub fn new(components: [f64; 3]) -> Self {
        Self(Vector3::from_row_slice(&components))
    }

    /// Zero stress state.
    pub fn zero() -> Self {
        Self(Vector3::zeros())
    }

    /// Euclidean norm of the Voigt components, sqrt(σ_xx² + σ_yy² + τ_xy²).
    ///
    /// This is the scalar used for the field maps and stress-strain curves.
    pub fn magnitude(&self) -> f64 {
        self.0.norm()
    }

    /// Von Mises equivalent stress for plane stress (σ_zz = 0).
    pub fn von_mises(&self) -> f64 {
        let s_xx = self.0[0];
        let s_yy = self.0[1];
        let t_xy = self.0[2];
        (s_xx * s_xx - s_xx * s_yy + s_yy * s_yy + 3.0 * t_xy * t_xy).sqrt()
    }

    /// Extract the full 2x2 symmetric stress matrix.
    pub fn to_matrix(&self) -> Matrix2<f64> {
        let s = &self.0;
        Matrix2::new(s[0], s[2], s[2], s[1])
    }
}

/// In-plane strain tensor in Voigt notation.
///
/// Components are ordered as: [ε_xx, ε_yy, γ_xy]
/// where γ = 2ε for engineering shear strain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrainTensor(pub Vector3<f64>);

impl StrainTensor {
    /// Create a new strain tensor from Voigt components.
    pub fn new(components: [f64; 3]) -> Self {
        Self(Vector3::from_row_slice(&components))
    }

    /// Zero strain state.
    pub fn zero() -> Self {
        Self(Vector3::zeros())
    }

    /// Euclidean norm of the Voigt components, sqrt(ε_xx² + ε_yy² + γ_xy²).
    pub fn magnitude(&self) -> f64 {
        self.0.norm()
    }

    /// In-plane area strain ε_xx + ε_yy.
    pub fn areal(&self) -> f64 {
        self.0[0] + self.0[1]
    }

    /// Extract the full 2x2 symmetric strain matrix.
    pub fn to_matrix(&self) -> Matrix2<f64> {
        let e = &self.0;
        // Off-diagonal terms are γ/2 = ε
        Matrix2::new(e[0], e[2] / 2.0, e[2] / 2.0, e[1])
    }
}

/// Constitutive matrix (material stiffness) in Voigt notation.
///
/// Maps strain tensor to stress tensor: σ = D * ε
pub type ConstitutiveMatrix = Matrix3<f64>;
