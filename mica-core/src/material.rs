//! Material property definitions.
//!
//! Isotropic linear elastic materials under the plane stress idealization.

use crate::error::{Error, Result};
use crate::types::ConstitutiveMatrix;
use nalgebra::Matrix3;

/// Material properties for plane-stress analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Young's modulus (Pa).
    pub youngs_modulus: f64,
    /// Poisson's ratio (dimensionless).
    pub poissons_ratio: f64,
}

impl Material {
    /// Create a new isotropic linear elastic material.
    ///
    /// # Arguments
    ///
    /// * `youngs_modulus` - Young's modulus E (Pa)
    /// * `poissons_ratio` - Poisson's ratio ν (dimensionless, -1 < ν < 0.5)
    ///
    /// # Errors
    ///
    /// Returns error if material properties are physically invalid.
    pub fn new(youngs_modulus: f64, poissons_ratio: f64) -> Result<Self> {
        if youngs_modulus <= 0.0 {
            return Err(Error::InvalidMaterial(
                "Young's modulus must be positive".into(),
            ));
        }
        if poissons_ratio <= -1.0 || poissons_ratio >= 0.5 {
            return Err(Error::InvalidMaterial(
                "Poisson's ratio must be in range (-1, 0.5)".into(),
            ));
        }
        Ok(Self {
            youngs_modulus,
            poissons_ratio,
        })
    }

    /// Shear modulus G = E / (2(1 + ν)).
    pub fn shear_modulus(&self) -> f64 {
        self.youngs_modulus / (2.0 * (1.0 + self.poissons_ratio))
    }

    /// Plane stress constitutive matrix.
    ///
    /// Returns the 3x3 matrix D for [σ_xx, σ_yy, τ_xy] = D * [ε_xx, ε_yy, γ_xy].
    pub fn constitutive_plane_stress(&self) -> ConstitutiveMatrix {
        let e = self.youngs_modulus;
        let nu = self.poissons_ratio;

        let factor = e / (1.0 - nu * nu);

        Matrix3::new(
            factor,      factor * nu, 0.0,
            factor * nu, factor,      0.0,
            0.0,         0.0,         factor * (1.0 - nu) / 2.0,
        )
    }
}
