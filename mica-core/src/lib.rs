//! Mica Core - Micromechanics and Atomistics
//!
//! Computational mechanics library covering two solvers:
//! - NVE molecular dynamics of a Lennard-Jones fluid with shifted-force
//!   truncation and velocity-Verlet integration
//! - 2D plane-stress finite element analysis with bilinear quadrilateral
//!   elements and a sparse Cholesky direct solver
//!
//! # Architecture
//!
//! The finite element side is designed around these core abstractions:
//!
//! - [`Element`] trait: Defines element stiffness and stress recovery
//! - [`Mesh`]: Connectivity and nodal coordinates
//! - [`Material`]: Material property definitions
//! - [`Solver`] trait: Linear system solution strategies
//!
//! The molecular dynamics side lives in [`md`] and is driven by
//! [`md::run`] from an [`md::MdConfig`]. Both solvers report figures
//! through [`figures`] and share the [`error`] types.

pub mod assembly;
pub mod element;
pub mod error;
pub mod figures;
pub mod material;
pub mod md;
pub mod mesh;
pub mod recovery;
pub mod solver;
pub mod sparse;
pub mod types;

pub use element::{Element, Quad4};
pub use error::{Error, Result};
pub use material::Material;
pub use mesh::Mesh;
pub use solver::Solver;
pub use sparse::CsrMatrix;
pub use types::{Point2, StrainTensor, StressTensor, Vec3};
