//! Dense matrices backed by `ndarray`.

use ndarray::{Array2, ShapeBuilder};
use num_complex::Complex64;

use crate::error::{Error, Result};
use crate::kind::ElementKind;

/// A dense 2-D numeric matrix.
///
/// Real and imaginary parts are kept as separate `Array2<f64>` planes, the
/// way MAT-files store them. Values of single-precision kinds are rounded to
/// `f32` precision on entry, so what is held is exactly what will be written.
///
/// # Example
///
/// ```
/// use mat5_rs::DenseMatrix;
/// use ndarray::array;
///
/// let m = DenseMatrix::from_real(array![[1.0, 2.0], [3.0, 4.0]]);
/// assert_eq!(m.shape(), (2, 2));
/// assert_eq!(m.get(1, 0).unwrap().re, 3.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    kind: ElementKind,
    re: Array2<f64>,
    im: Option<Array2<f64>>,
}

impl DenseMatrix {
    /// Create a matrix from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if an imaginary plane is missing
    /// for a complex kind, present for a real kind, or shaped differently
    /// from the real plane.
    pub fn new(kind: ElementKind, mut re: Array2<f64>, im: Option<Array2<f64>>) -> Result<Self> {
        let (rows, cols) = re.dim();
        let im = match (kind.is_complex(), im) {
            (true, Some(mut im)) if im.dim() == (rows, cols) => {
                im.mapv_inplace(|v| kind.reconstruct(v));
                Some(im)
            }
            (false, None) => None,
            _ => return Err(Error::InvalidDimensions { rows, cols }),
        };
        re.mapv_inplace(|v| kind.reconstruct(v));
        Ok(DenseMatrix { kind, re, im })
    }

    /// Create an all-zero matrix of the given shape and kind.
    pub fn zeros(rows: usize, cols: usize, kind: ElementKind) -> Self {
        DenseMatrix {
            kind,
            re: Array2::zeros((rows, cols)),
            im: kind.is_complex().then(|| Array2::zeros((rows, cols))),
        }
    }

    /// Wrap a real double-precision array.
    pub fn from_real(re: Array2<f64>) -> Self {
        DenseMatrix {
            kind: ElementKind::Real64,
            re,
            im: None,
        }
    }

    /// Wrap real and imaginary double-precision planes.
    pub fn from_complex(re: Array2<f64>, im: Array2<f64>) -> Result<Self> {
        Self::new(ElementKind::Complex64, re, Some(im))
    }

    /// Split an array of complex values into a complex double matrix.
    pub fn from_complex_array(values: &Array2<Complex64>) -> Self {
        DenseMatrix {
            kind: ElementKind::Complex64,
            re: values.mapv(|z| z.re),
            im: Some(values.mapv(|z| z.im)),
        }
    }

    /// Build from row-major real data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len() != rows * cols`.
    pub fn from_row_major(rows: usize, cols: usize, kind: ElementKind, data: &[f64]) -> Result<Self> {
        let re = Array2::from_shape_vec((rows, cols), data.to_vec())
            .map_err(|_| Error::InvalidDimensions { rows, cols })?;
        let im = kind.is_complex().then(|| Array2::zeros((rows, cols)));
        Self::new(kind, re, im)
    }

    /// Build from column-major planes, as they appear in a MAT-file.
    pub(crate) fn from_column_major(
        rows: usize,
        cols: usize,
        kind: ElementKind,
        re: Vec<f64>,
        im: Option<Vec<f64>>,
    ) -> Result<Self> {
        let plane = |values: Vec<f64>| {
            Array2::from_shape_vec((rows, cols).f(), values)
                .map_err(|_| Error::InvalidDimensions { rows, cols })
        };
        let re = plane(re)?;
        let im = match (kind.is_complex(), im) {
            (true, Some(im)) => Some(plane(im)?),
            (true, None) => Some(Array2::zeros((rows, cols))),
            (false, _) => None,
        };
        Self::new(kind, re, im)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.re.nrows()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.re.ncols()
    }

    /// Dimensions as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.re.dim()
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.re.len()
    }

    /// Check if the matrix has no cells.
    pub fn is_empty(&self) -> bool {
        self.re.is_empty()
    }

    /// Element kind.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Check if the matrix has an imaginary part.
    pub fn is_complex(&self) -> bool {
        self.im.is_some()
    }

    /// Value at `(row, col)`, or `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Complex64> {
        let re = *self.re.get((row, col))?;
        let im = self
            .im
            .as_ref()
            .and_then(|im| im.get((row, col)).copied())
            .unwrap_or(0.0);
        Some(Complex64::new(re, im))
    }

    /// Set the value at `(row, col)`.
    ///
    /// The imaginary part is ignored for real kinds.
    pub fn set(&mut self, row: usize, col: usize, value: Complex64) -> Result<()> {
        let (rows, cols) = self.shape();
        let kind = self.kind;
        let cell = self
            .re
            .get_mut((row, col))
            .ok_or(Error::IndexOutOfBounds { row, col, rows, cols })?;
        *cell = kind.reconstruct(value.re);
        if let Some(im) = self.im.as_mut() {
            im[(row, col)] = kind.reconstruct(value.im);
        }
        Ok(())
    }

    /// Real plane.
    pub fn real(&self) -> &Array2<f64> {
        &self.re
    }

    /// Imaginary plane, for complex matrices.
    pub fn imag(&self) -> Option<&Array2<f64>> {
        self.im.as_ref()
    }

    /// Combine both planes into complex values.
    pub fn to_complex(&self) -> Array2<Complex64> {
        match &self.im {
            Some(im) => Array2::from_shape_fn(self.shape(), |idx| Complex64::new(self.re[idx], im[idx])),
            None => self.re.mapv(|re| Complex64::new(re, 0.0)),
        }
    }

    /// Count of cells that are not zero.
    pub fn count_nonzero(&self) -> usize {
        match &self.im {
            Some(im) => self
                .re
                .iter()
                .zip(im.iter())
                .filter(|(re, im)| **re != 0.0 || **im != 0.0)
                .count(),
            None => self.re.iter().filter(|re| **re != 0.0).count(),
        }
    }

    /// Both planes, for callers that already hold reconstructed values.
    pub(super) fn planes_mut(&mut self) -> (&mut Array2<f64>, Option<&mut Array2<f64>>) {
        (&mut self.re, self.im.as_mut())
    }
}

/// Visit a plane column by column, rows inner.
pub(crate) fn column_major(plane: &Array2<f64>) -> impl ExactSizeIterator<Item = f64> + '_ {
    plane.t().into_iter().copied()
}
