//! In-memory matrices read from or written to MAT-files.
//!
//! - [`DenseMatrix`] - full storage, one `ndarray` plane per part
//! - [`SparseMatrix`] - compressed sparse row storage
//! - [`Matrix`] - either of the two, as stored in a file

mod dense;
mod sparse;

pub(crate) use dense::column_major;
pub use dense::DenseMatrix;
pub use sparse::SparseMatrix;

use ndarray::Array2;
use num_complex::Complex64;

use crate::kind::ElementKind;

/// A numeric matrix, dense or sparse.
#[derive(Debug, Clone, PartialEq)]
pub enum Matrix {
    /// Full storage.
    Dense(DenseMatrix),
    /// Compressed sparse storage.
    Sparse(SparseMatrix),
}

impl Matrix {
    /// Number of rows.
    pub fn rows(&self) -> usize {
        match self {
            Matrix::Dense(m) => m.rows(),
            Matrix::Sparse(m) => m.rows(),
        }
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        match self {
            Matrix::Dense(m) => m.cols(),
            Matrix::Sparse(m) => m.cols(),
        }
    }

    /// Dimensions as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    /// Element kind.
    pub fn kind(&self) -> ElementKind {
        match self {
            Matrix::Dense(m) => m.kind(),
            Matrix::Sparse(m) => m.kind(),
        }
    }

    /// Check if the matrix has an imaginary part.
    pub fn is_complex(&self) -> bool {
        self.kind().is_complex()
    }

    /// Check if the matrix uses sparse storage.
    pub fn is_sparse(&self) -> bool {
        matches!(self, Matrix::Sparse(_))
    }

    /// Value at `(row, col)`, or `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Complex64> {
        match self {
            Matrix::Dense(m) => m.get(row, col),
            Matrix::Sparse(m) => m.get(row, col),
        }
    }

    /// Number of non-zero cells.
    pub fn nnz(&self) -> usize {
        match self {
            Matrix::Dense(m) => m.count_nonzero(),
            Matrix::Sparse(m) => m.nnz(),
        }
    }

    /// The dense matrix, if stored densely.
    pub fn as_dense(&self) -> Option<&DenseMatrix> {
        match self {
            Matrix::Dense(m) => Some(m),
            Matrix::Sparse(_) => None,
        }
    }

    /// The sparse matrix, if stored sparsely.
    pub fn as_sparse(&self) -> Option<&SparseMatrix> {
        match self {
            Matrix::Sparse(m) => Some(m),
            Matrix::Dense(_) => None,
        }
    }

    /// A dense copy, expanding sparse storage.
    pub fn to_dense(&self) -> DenseMatrix {
        match self {
            Matrix::Dense(m) => m.clone(),
            Matrix::Sparse(m) => m.to_dense(),
        }
    }

    /// Storage name for display.
    pub fn storage(&self) -> &'static str {
        match self {
            Matrix::Dense(_) => "dense",
            Matrix::Sparse(_) => "sparse",
        }
    }
}

impl From<DenseMatrix> for Matrix {
    fn from(m: DenseMatrix) -> Self {
        Matrix::Dense(m)
    }
}

impl From<SparseMatrix> for Matrix {
    fn from(m: SparseMatrix) -> Self {
        Matrix::Sparse(m)
    }
}

impl From<Array2<f64>> for Matrix {
    fn from(array: Array2<f64>) -> Self {
        Matrix::Dense(DenseMatrix::from_real(array))
    }
}
