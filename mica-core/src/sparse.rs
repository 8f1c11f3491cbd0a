//! Sparse matrix assembly primitives.
//!
//! Global stiffness matrices are accumulated as (row, col, value) triplets
//! during element assembly and converted to CSR (Compressed Sparse Row) for
//! the solver stage.

use nalgebra_sparse::csr::CsrMatrix as NalgebraCsr;

use crate::error::{Error, Result};

/// Compressed Sparse Row matrix.
pub type CsrMatrix = NalgebraCsr<f64>;

/// Builder for assembling a sparse matrix from triplets (COO format).
///
/// Accumulates (row, col, value) triplets and converts to CSR when complete.
pub struct TripletMatrix {
    n_rows: usize,
    n_cols: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
}

impl TripletMatrix {
    /// Create a new triplet matrix builder.
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            rows: Vec::new(),
            cols: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Create with estimated capacity.
    pub fn with_capacity(n_rows: usize, n_cols: usize, nnz_estimate: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            rows: Vec::with_capacity(nnz_estimate),
            cols: Vec::with_capacity(nnz_estimate),
            values: Vec::with_capacity(nnz_estimate),
        }
    }

    /// Add a value at (row, col). Duplicates are summed during conversion.
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.n_rows, "Row index out of bounds");
        debug_assert!(col < self.n_cols, "Column index out of bounds");

        if value.abs() > f64::EPSILON {
            self.rows.push(row);
            self.cols.push(col);
            self.values.push(value);
        }
    }

    /// Add a dense element matrix at the specified global DOF indices.
    ///
    /// This is the scatter operation of finite element assembly: entry
    /// `(i, j)` of the element matrix lands at global
    /// `(dof_indices[i], dof_indices[j])`.
    pub fn add_submatrix(&mut self, dof_indices: &[usize], submatrix: &nalgebra::DMatrix<f64>) {
        let n = dof_indices.len();
        debug_assert_eq!(submatrix.nrows(), n);
        debug_assert_eq!(submatrix.ncols(), n);

        for i in 0..n {
            for j in 0..n {
                let value = submatrix[(i, j)];
                if value.abs() > f64::EPSILON {
                    self.rows.push(dof_indices[i]);
                    self.cols.push(dof_indices[j]);
                    self.values.push(value);
                }
            }
        }
    }

    /// Number of stored triplets.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Convert to CSR format, summing duplicate entries.
    ///
    /// # Errors
    ///
    /// Returns an assembly error if any triplet index is out of bounds.
    pub fn to_csr(self) -> Result<CsrMatrix> {
        use nalgebra_sparse::coo::CooMatrix;

        let coo = CooMatrix::try_from_triplets(
            self.n_rows,
            self.n_cols,
            self.rows,
            self.cols,
            self.values,
        )
        .map_err(|e| Error::Assembly(format!("Invalid triplet data: {}", e)))?;

        // Conversion to CSR sums duplicate entries
        Ok(CsrMatrix::from(&coo))
    }
}

/// Dense global load vector assembled from element contributions.
pub struct LoadVector {
    values: Vec<f64>,
}

impl LoadVector {
    /// Create a zero vector of given size.
    pub fn zeros(size: usize) -> Self {
        Self {
            values: vec![0.0; size],
        }
    }

    /// Add a value at the given index.
    pub fn add(&mut self, index: usize, value: f64) {
        self.values[index] += value;
    }

    /// Scatter an element load vector at the given global DOF indices.
    pub fn add_subvector(&mut self, indices: &[usize], values: &[f64]) {
        debug_assert_eq!(indices.len(), values.len());
        for (&idx, &val) in indices.iter().zip(values.iter()) {
            self.values[idx] += val;
        }
    }

    /// Get the underlying dense vector.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Consume and return the dense vector.
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}
