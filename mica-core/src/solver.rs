//! Linear system solvers.
//!
//! Provides direct solvers for the reduced system K_ff u_f = f_f.
//!
//! # Solver Backends
//!
//! - [`FaerCholeskySolver`]: Sparse Cholesky factorization using the faer
//!   library. The production choice for the symmetric positive definite
//!   matrices that remain after constraint elimination.
//! - [`DenseLuSolver`]: nalgebra dense LU, for small cross-check problems.
//!
//! For a load sweep the same stiffness matrix is solved against many load
//! vectors; [`CholeskyFactorization`] factorizes once and reuses the
//! numeric factors for every subsequent right-hand side.

use crate::error::{Error, Result};
use crate::sparse::CsrMatrix;
use faer::linalg::cholesky::llt::factor::LltError;
use faer::prelude::*;
use faer::sparse::linalg::solvers::{Llt, SymbolicLlt};
use faer::sparse::linalg::LltError as SparseLltError;
use faer::sparse::{SparseColMat, SymbolicSparseColMat};

/// Linear solver interface.
pub trait Solver: Send + Sync {
    /// Solve the linear system Ax = b.
    fn solve(&self, matrix: &CsrMatrix, rhs: &[f64]) -> Result<Vec<f64>>;

    /// Solver name for diagnostics.
    fn name(&self) -> &str;
}

/// Direct solver using nalgebra dense LU factorization.
///
/// Densifies the matrix, so only suitable for small systems; used to
/// cross-check the sparse path.
pub struct DenseLuSolver;

impl DenseLuSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DenseLuSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver for DenseLuSolver {
    fn solve(&self, matrix: &CsrMatrix, rhs: &[f64]) -> Result<Vec<f64>> {
        use nalgebra::{DMatrix, DVector};

        let n = matrix.nrows();
        if n == 0 {
            return Ok(vec![]);
        }

        if n != matrix.ncols() {
            return Err(Error::Solver("Matrix must be square".into()));
        }

        if n != rhs.len() {
            return Err(Error::Solver("RHS size mismatch".into()));
        }

        let dense = DMatrix::from(matrix);
        let b = DVector::from_column_slice(rhs);

        let lu = dense.lu();
        let solution = lu
            .solve(&b)
            .ok_or_else(|| Error::SingularMatrix("LU factorization failed".into()))?;

        Ok(solution.as_slice().to_vec())
    }

    fn name(&self) -> &str {
        "Dense LU"
    }
}

/// Convert a nalgebra-sparse CSR matrix to faer's CSC format.
///
/// faer expects column-major storage, so each CSR row is scattered into its
/// column. For the symmetric stiffness matrices solved here the transpose
/// equals the original, but the conversion below is a true transpose and
/// does not rely on symmetry.
fn csr_to_csc(csr: &CsrMatrix) -> SparseColMat<usize, f64> {
    let nrows = csr.nrows();
    let ncols = csr.ncols();

    let row_offsets = csr.row_offsets();
    let col_indices = csr.col_indices();
    let values = csr.values();

    // Count entries per column, then prefix-sum into offsets
    let mut col_counts = vec![0usize; ncols];
    for &col in col_indices {
        col_counts[col] += 1;
    }

    let mut col_offsets = vec![0usize; ncols + 1];
    for i in 0..ncols {
        col_offsets[i + 1] = col_offsets[i] + col_counts[i];
    }

    // Scatter each CSR row into its destination columns
    let nnz = values.len();
    let mut csc_row_indices = vec![0usize; nnz];
    let mut csc_values = vec![0.0f64; nnz];
    let mut col_positions = col_offsets[..ncols].to_vec();

    for row in 0..nrows {
        for idx in row_offsets[row]..row_offsets[row + 1] {
            let col = col_indices[idx];
            let pos = col_positions[col];
            csc_row_indices[pos] = row;
            csc_values[pos] = values[idx];
            col_positions[col] += 1;
        }
    }

    // SAFETY: offsets are a monotone prefix sum over nnz and row indices
    // within each column are in bounds and sorted by construction
    unsafe {
        SparseColMat::new(
            SymbolicSparseColMat::new_unchecked(nrows, ncols, col_offsets, None, csc_row_indices),
            csc_values,
        )
    }
}

fn map_llt_error(e: SparseLltError) -> Error {
    match e {
        SparseLltError::Generic(err) => {
            Error::Solver(format!("Sparse Cholesky error: {:?}", err))
        }
        SparseLltError::Numeric(LltError::NonPositivePivot { index }) => {
            Error::SingularMatrix(format!("Matrix is not positive definite at pivot {}", index))
        }
    }
}

/// Sparse Cholesky solver using the faer library.
///
/// Uses faer's sparse LLᵀ factorization, which suits the symmetric positive
/// definite matrices produced by stiffness assembly after constraint
/// elimination.
pub struct FaerCholeskySolver;

impl FaerCholeskySolver {
    /// Create a new sparse Cholesky solver.
    pub fn new() -> Self {
        Self
    }
}

impl Default for FaerCholeskySolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver for FaerCholeskySolver {
    fn solve(&self, matrix: &CsrMatrix, rhs: &[f64]) -> Result<Vec<f64>> {
        if matrix.nrows() == 0 && rhs.is_empty() {
            return Ok(vec![]);
        }
        let factorization = CholeskyFactorization::new(matrix)?;
        factorization.solve(rhs)
    }

    fn name(&self) -> &str {
        "faer Sparse Cholesky (LLᵀ)"
    }
}

/// Reusable sparse Cholesky factorization.
///
/// Factorizes K once; [`CholeskyFactorization::solve`] then performs only
/// forward/backward substitution per right-hand side.
pub struct CholeskyFactorization {
    n: usize,
    llt: Llt<usize, f64>,
}

impl CholeskyFactorization {
    /// Factorize a square SPD matrix.
    ///
    /// # Errors
    ///
    /// Returns a solver error if the matrix is not square, or a singular
    /// matrix error if it is not positive definite.
    pub fn new(matrix: &CsrMatrix) -> Result<Self> {
        let n = matrix.nrows();
        if n != matrix.ncols() {
            return Err(Error::Solver("Matrix must be square".into()));
        }

        let csc = csr_to_csc(matrix);
        let csc_ref = csc.as_ref();

        let symbolic = SymbolicLlt::try_new(csc_ref.symbolic(), faer::Side::Lower)
            .map_err(|_| Error::Solver("Symbolic Cholesky analysis failed".into()))?;

        let llt = Llt::try_new_with_symbolic(symbolic, csc_ref, faer::Side::Lower)
            .map_err(map_llt_error)?;

        Ok(Self { n, llt })
    }

    /// Dimension of the factorized system.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Solve against one right-hand side using the stored factors.
    ///
    /// # Errors
    ///
    /// Returns a solver error on a size mismatch.
    pub fn solve(&self, rhs: &[f64]) -> Result<Vec<f64>> {
        if rhs.len() != self.n {
            return Err(Error::Solver("RHS size mismatch".into()));
        }
        if self.n == 0 {
            return Ok(vec![]);
        }

        let mut x = faer::Mat::from_fn(self.n, 1, |i, _| rhs[i]);
        self.llt.solve_in_place(x.as_mut());

        Ok((0..self.n).map(|i| x[(i, 0)]).collect())
    }
}
