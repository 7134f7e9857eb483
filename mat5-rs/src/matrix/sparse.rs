//! Sparse matrices in compressed sparse row (CSR) form.
//!
//! MAT-files store sparse arrays column-compressed. The CSR arrays of a
//! matrix's transpose are exactly its CSC arrays, so [`SparseMatrix::transpose`]
//! is the only conversion the codec needs.

use num_complex::Complex64;

use super::dense::DenseMatrix;
use crate::error::{Error, Result};
use crate::kind::ElementKind;

/// A sparse 2-D numeric matrix in CSR layout.
///
/// Within each row, column indices are strictly increasing. Matrices built
/// through the public constructors never store explicit zeros.
///
/// # Example
///
/// ```
/// use mat5_rs::SparseMatrix;
///
/// let m = SparseMatrix::from_real_triplets(3, 3, [(0, 0, 2.5), (2, 1, -1.0)])?;
/// assert_eq!(m.nnz(), 2);
/// assert_eq!(m.get(2, 1).unwrap().re, -1.0);
/// assert_eq!(m.get(1, 1).unwrap().re, 0.0);
/// # Ok::<(), mat5_rs::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    rows: usize,
    cols: usize,
    kind: ElementKind,
    /// Start of each row in `col_idx`; `rows + 1` entries.
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    re: Vec<f64>,
    im: Option<Vec<f64>>,
}

impl SparseMatrix {
    /// Create an all-zero sparse matrix.
    pub fn new(rows: usize, cols: usize, kind: ElementKind) -> Self {
        SparseMatrix {
            rows,
            cols,
            kind,
            row_ptr: vec![0; rows + 1],
            col_idx: Vec::new(),
            re: Vec::new(),
            im: kind.is_complex().then(Vec::new),
        }
    }

    /// Build from `(row, col, value)` entries.
    ///
    /// Duplicate positions are summed and entries that end up zero are
    /// dropped. Imaginary parts are ignored for real kinds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] for an entry outside the matrix.
    pub fn from_triplets<I>(rows: usize, cols: usize, kind: ElementKind, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, Complex64)>,
    {
        let mut entries: Vec<(usize, usize, Complex64)> = entries.into_iter().collect();
        if let Some(&(row, col, _)) = entries.iter().find(|(r, c, _)| *r >= rows || *c >= cols) {
            return Err(Error::IndexOutOfBounds { row, col, rows, cols });
        }
        entries.sort_by_key(|&(r, c, _)| (r, c));

        let mut matrix = SparseMatrix::new(rows, cols, kind);
        let mut iter = entries.into_iter().peekable();
        while let Some((row, col, mut value)) = iter.next() {
            while let Some(&(r, c, v)) = iter.peek() {
                if (r, c) != (row, col) {
                    break;
                }
                value += v;
                iter.next();
            }
            matrix.push_sorted(row, col, value);
        }
        matrix.finish_rows();
        Ok(matrix)
    }

    /// Build a real double-precision matrix from `(row, col, value)` entries.
    pub fn from_real_triplets<I>(rows: usize, cols: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        Self::from_triplets(
            rows,
            cols,
            ElementKind::Real64,
            entries
                .into_iter()
                .map(|(r, c, v)| (r, c, Complex64::new(v, 0.0))),
        )
    }

    /// Keep the non-zero cells of a dense matrix.
    pub fn from_dense(dense: &DenseMatrix) -> Self {
        let (rows, cols) = dense.shape();
        let mut matrix = SparseMatrix::new(rows, cols, dense.kind());
        for row in 0..rows {
            for col in 0..cols {
                if let Some(value) = dense.get(row, col) {
                    matrix.push_sorted(row, col, value);
                }
            }
        }
        matrix.finish_rows();
        matrix
    }

    /// Assemble from raw CSR arrays, checking their consistency.
    pub(crate) fn from_csr_parts(
        rows: usize,
        cols: usize,
        kind: ElementKind,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        re: Vec<f64>,
        im: Option<Vec<f64>>,
    ) -> Result<Self> {
        if row_ptr.len() != rows + 1 || row_ptr[0] != 0 {
            return Err(Error::malformed_sparse(format!(
                "expected {} row pointers starting at 0",
                rows + 1
            )));
        }
        if row_ptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::malformed_sparse("pointers are not non-decreasing"));
        }
        let nnz = row_ptr[rows];
        if col_idx.len() != nnz || re.len() != nnz || im.as_ref().map_or(false, |im| im.len() != nnz) {
            return Err(Error::malformed_sparse(format!(
                "{} non-zeros declared but {} indices and {} values present",
                nnz,
                col_idx.len(),
                re.len()
            )));
        }
        if let Some(&bad) = col_idx.iter().find(|&&c| c >= cols) {
            return Err(Error::malformed_sparse(format!(
                "index {} out of range for dimension {}",
                bad, cols
            )));
        }
        if let Some(row) = (0..rows).find(|&r| {
            col_idx[row_ptr[r]..row_ptr[r + 1]]
                .windows(2)
                .any(|w| w[0] >= w[1])
        }) {
            return Err(Error::malformed_sparse(format!(
                "indices of segment {} are not strictly increasing",
                row
            )));
        }

        let im = match (kind.is_complex(), im) {
            (true, Some(im)) => Some(im),
            (true, None) => Some(vec![0.0; nnz]),
            (false, _) => None,
        };
        let mut matrix = SparseMatrix {
            rows,
            cols,
            kind,
            row_ptr,
            col_idx,
            re,
            im,
        };
        matrix.re.iter_mut().for_each(|v| *v = kind.reconstruct(*v));
        if let Some(im) = matrix.im.as_mut() {
            im.iter_mut().for_each(|v| *v = kind.reconstruct(*v));
        }
        Ok(matrix)
    }

    /// Append an entry that sorts after every stored entry, skipping zeros.
    ///
    /// `row_ptr` holds per-row counts until [`finish_rows`](Self::finish_rows).
    fn push_sorted(&mut self, row: usize, col: usize, value: Complex64) {
        let re = self.kind.reconstruct(value.re);
        let im = self.kind.reconstruct(value.im);
        let is_zero = re == 0.0 && (!self.kind.is_complex() || im == 0.0);
        if is_zero {
            return;
        }
        self.row_ptr[row + 1] += 1;
        self.col_idx.push(col);
        self.re.push(re);
        if let Some(imag) = self.im.as_mut() {
            imag.push(im);
        }
    }

    fn finish_rows(&mut self) {
        for row in 0..self.rows {
            self.row_ptr[row + 1] += self.row_ptr[row];
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Dimensions as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Element kind.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Check if the matrix has an imaginary part.
    pub fn is_complex(&self) -> bool {
        self.im.is_some()
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.col_idx.len()
    }

    /// Row pointers (`rows + 1` entries).
    pub fn row_pointers(&self) -> &[usize] {
        &self.row_ptr
    }

    /// Column index of each stored entry.
    pub fn column_indices(&self) -> &[usize] {
        &self.col_idx
    }

    /// Real part of each stored entry.
    pub fn real_values(&self) -> &[f64] {
        &self.re
    }

    /// Imaginary part of each stored entry, for complex matrices.
    pub fn imag_values(&self) -> Option<&[f64]> {
        self.im.as_deref()
    }

    fn value_at(&self, k: usize) -> Complex64 {
        let im = self.im.as_ref().map_or(0.0, |im| im[k]);
        Complex64::new(self.re[k], im)
    }

    fn find(&self, row: usize, col: usize) -> std::result::Result<usize, usize> {
        let start = self.row_ptr[row];
        let end = self.row_ptr[row + 1];
        self.col_idx[start..end]
            .binary_search(&col)
            .map(|k| start + k)
            .map_err(|k| start + k)
    }

    /// Value at `(row, col)`, or `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Complex64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(match self.find(row, col) {
            Ok(k) => self.value_at(k),
            Err(_) => Complex64::new(0.0, 0.0),
        })
    }

    /// Set the value at `(row, col)`, inserting or removing the entry as needed.
    pub fn set(&mut self, row: usize, col: usize, value: Complex64) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let re = self.kind.reconstruct(value.re);
        let im = self.kind.reconstruct(value.im);
        let is_zero = re == 0.0 && (!self.kind.is_complex() || im == 0.0);

        match (self.find(row, col), is_zero) {
            (Ok(k), false) => {
                self.re[k] = re;
                if let Some(imag) = self.im.as_mut() {
                    imag[k] = im;
                }
            }
            (Ok(k), true) => {
                self.col_idx.remove(k);
                self.re.remove(k);
                if let Some(imag) = self.im.as_mut() {
                    imag.remove(k);
                }
                self.row_ptr[row + 1..].iter_mut().for_each(|p| *p -= 1);
            }
            (Err(k), false) => {
                self.col_idx.insert(k, col);
                self.re.insert(k, re);
                if let Some(imag) = self.im.as_mut() {
                    imag.insert(k, im);
                }
                self.row_ptr[row + 1..].iter_mut().for_each(|p| *p += 1);
            }
            (Err(_), true) => {}
        }
        Ok(())
    }

    /// Iterate over stored entries as `(row, col, value)`, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Complex64)> + '_ {
        (0..self.rows).flat_map(move |row| {
            (self.row_ptr[row]..self.row_ptr[row + 1])
                .map(move |k| (row, self.col_idx[k], self.value_at(k)))
        })
    }

    /// Transpose by counting sort over the column indices.
    ///
    /// Row `i` of the result lists, in increasing order, the rows of `self`
    /// that have an entry in column `i`.
    pub fn transpose(&self) -> SparseMatrix {
        let nnz = self.nnz();
        let mut row_ptr = vec![0usize; self.cols + 1];
        for &col in &self.col_idx {
            row_ptr[col + 1] += 1;
        }
        for col in 0..self.cols {
            row_ptr[col + 1] += row_ptr[col];
        }

        let mut next = row_ptr.clone();
        let mut col_idx = vec![0usize; nnz];
        let mut re = vec![0.0; nnz];
        let mut im = self.im.as_ref().map(|_| vec![0.0; nnz]);

        for row in 0..self.rows {
            for k in self.row_ptr[row]..self.row_ptr[row + 1] {
                let col = self.col_idx[k];
                let dst = next[col];
                next[col] += 1;
                col_idx[dst] = row;
                re[dst] = self.re[k];
                if let (Some(dst_im), Some(src_im)) = (im.as_mut(), self.im.as_ref()) {
                    dst_im[dst] = src_im[k];
                }
            }
        }

        SparseMatrix {
            rows: self.cols,
            cols: self.rows,
            kind: self.kind,
            row_ptr,
            col_idx,
            re,
            im,
        }
    }

    /// Expand to a dense matrix of the same kind.
    pub fn to_dense(&self) -> DenseMatrix {
        let mut dense = DenseMatrix::zeros(self.rows, self.cols, self.kind);
        let (re, mut im) = dense.planes_mut();
        for row in 0..self.rows {
            for k in self.row_ptr[row]..self.row_ptr[row + 1] {
                let col = self.col_idx[k];
                re[[row, col]] = self.re[k];
                if let (Some(dst), Some(src)) = (im.as_deref_mut(), self.im.as_ref()) {
                    dst[[row, col]] = src[k];
                }
            }
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SparseMatrix {
        // [ 1 0 2 ]
        // [ 0 0 3 ]
        SparseMatrix::from_real_triplets(2, 3, [(1, 2, 3.0), (0, 0, 1.0), (0, 2, 2.0)]).unwrap()
    }

    #[test]
    fn test_from_triplets_layout() {
        let m = sample();
        assert_eq!(m.row_pointers(), &[0, 2, 3]);
        assert_eq!(m.column_indices(), &[0, 2, 2]);
        assert_eq!(m.real_values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_duplicates_sum_and_zeros_drop() {
        let m = SparseMatrix::from_real_triplets(2, 2, [(0, 0, 1.0), (0, 0, 2.0), (1, 1, 0.0)]).unwrap();
        assert_eq!(m.nnz(), 1);
        assert_eq!(m.get(0, 0).unwrap().re, 3.0);
    }

    #[test]
    fn test_out_of_bounds_triplet() {
        let err = SparseMatrix::from_real_triplets(2, 2, [(2, 0, 1.0)]).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfBounds { row: 2, .. }));
    }

    #[test]
    fn test_transpose() {
        let t = sample().transpose();
        assert_eq!(t.shape(), (3, 2));
        // [ 1 0 ]
        // [ 0 0 ]
        // [ 2 3 ]
        assert_eq!(t.row_pointers(), &[0, 1, 1, 3]);
        assert_eq!(t.column_indices(), &[0, 0, 1]);
        assert_eq!(t.real_values(), &[1.0, 2.0, 3.0]);
        assert_eq!(t.transpose(), sample());
    }

    #[test]
    fn test_transpose_complex() {
        let m = SparseMatrix::from_triplets(
            2,
            2,
            ElementKind::Complex64,
            [(0, 1, Complex64::new(1.0, 2.0)), (1, 0, Complex64::new(0.0, -1.0))],
        )
        .unwrap();
        let t = m.transpose();
        assert_eq!(t.get(1, 0), Some(Complex64::new(1.0, 2.0)));
        assert_eq!(t.get(0, 1), Some(Complex64::new(0.0, -1.0)));
    }

    #[test]
    fn test_from_dense_drops_zeros() {
        let dense = DenseMatrix::from_row_major(2, 2, ElementKind::Real64, &[0.0, 4.0, 0.0, 0.0]).unwrap();
        let m = SparseMatrix::from_dense(&dense);
        assert_eq!(m.nnz(), 1);
        assert_eq!(m.iter().collect::<Vec<_>>(), vec![(0, 1, Complex64::new(4.0, 0.0))]);
        assert_eq!(m.to_dense(), dense);
    }

    #[test]
    fn test_set_insert_update_remove() {
        let mut m = sample();
        m.set(1, 0, Complex64::new(5.0, 0.0)).unwrap();
        assert_eq!(m.row_pointers(), &[0, 2, 4]);
        assert_eq!(m.column_indices(), &[0, 2, 0, 2]);

        m.set(0, 2, Complex64::new(7.0, 0.0)).unwrap();
        assert_eq!(m.get(0, 2).unwrap().re, 7.0);

        m.set(0, 0, Complex64::new(0.0, 0.0)).unwrap();
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.row_pointers(), &[0, 1, 3]);
        assert!(m.set(9, 0, Complex64::new(1.0, 0.0)).is_err());
    }

    #[test]
    fn test_csr_parts_validation() {
        let ok = SparseMatrix::from_csr_parts(
            1,
            2,
            ElementKind::Real64,
            vec![0, 1],
            vec![1],
            vec![1.0],
            None,
        );
        assert!(ok.is_ok());

        let bad_index = SparseMatrix::from_csr_parts(1, 2, ElementKind::Real64, vec![0, 1], vec![2], vec![1.0], None);
        assert!(matches!(bad_index, Err(Error::MalformedSparseLayout { .. })));

        let decreasing = SparseMatrix::from_csr_parts(
            2,
            2,
            ElementKind::Real64,
            vec![0, 1, 0],
            vec![0],
            vec![1.0],
            None,
        );
        assert!(decreasing.is_err());

        let repeated = SparseMatrix::from_csr_parts(
            2,
            1,
            ElementKind::Real64,
            vec![0, 2, 2],
            vec![0, 0],
            vec![1.0, 5.0],
            None,
        );
        assert!(matches!(repeated, Err(Error::MalformedSparseLayout { .. })));

        let unsorted = SparseMatrix::from_csr_parts(
            1,
            3,
            ElementKind::Real64,
            vec![0, 2],
            vec![2, 1],
            vec![1.0, 5.0],
            None,
        );
        assert!(matches!(unsorted, Err(Error::MalformedSparseLayout { .. })));
    }

    #[test]
    fn test_to_dense_complex_single() {
        let m = SparseMatrix::from_triplets(
            2,
            3,
            ElementKind::Complex32,
            [(1, 2, Complex64::new(0.1, -0.2)), (0, 0, Complex64::new(3.0, 0.0))],
        )
        .unwrap();
        let dense = m.to_dense();
        assert_eq!(dense.kind(), ElementKind::Complex32);
        assert_eq!(dense.get(1, 2), m.get(1, 2));
        assert_eq!(dense.get(0, 0), Some(Complex64::new(3.0, 0.0)));
        assert_eq!(dense.count_nonzero(), 2);
        assert_eq!(SparseMatrix::from_dense(&dense), m);
    }
}
