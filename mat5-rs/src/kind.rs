//! Element kinds of numeric matrices.
//!
//! A kind fixes two things at once: the floating-point type values take on
//! the wire, and whether a matrix carries an imaginary part. All codec
//! paths dispatch on this enum.

use std::fmt;

use crate::data_type::DataType;

/// Numeric element kind of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementKind {
    /// Real, double precision.
    #[default]
    Real64,
    /// Real, single precision.
    Real32,
    /// Complex, double precision real and imaginary parts.
    Complex64,
    /// Complex, single precision real and imaginary parts.
    Complex32,
}

impl ElementKind {
    /// Build a kind from its two properties.
    pub const fn new(complex: bool, double: bool) -> Self {
        match (complex, double) {
            (false, true) => ElementKind::Real64,
            (false, false) => ElementKind::Real32,
            (true, true) => ElementKind::Complex64,
            (true, false) => ElementKind::Complex32,
        }
    }

    /// Whether matrices of this kind carry an imaginary part.
    pub const fn is_complex(self) -> bool {
        matches!(self, ElementKind::Complex64 | ElementKind::Complex32)
    }

    /// Whether values are stored in double precision.
    pub const fn is_double(self) -> bool {
        matches!(self, ElementKind::Real64 | ElementKind::Complex64)
    }

    /// Floating-point type values are written as.
    pub const fn wire_type(self) -> DataType {
        if self.is_double() {
            DataType::Double
        } else {
            DataType::Single
        }
    }

    /// Same precision, real or complex as requested.
    pub const fn with_complex(self, complex: bool) -> Self {
        Self::new(complex, self.is_double())
    }

    /// Same complexity, double or single precision as requested.
    pub const fn with_double(self, double: bool) -> Self {
        Self::new(self.is_complex(), double)
    }

    /// Round a value to the precision of this kind.
    ///
    /// Single-precision kinds keep exactly what survives a trip through `f32`.
    pub fn reconstruct(self, value: f64) -> f64 {
        if self.is_double() {
            value
        } else {
            f64::from(value as f32)
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Real64 => "double",
            ElementKind::Real32 => "single",
            ElementKind::Complex64 => "complex double",
            ElementKind::Complex32 => "complex single",
        };
        f.write_str(name)
    }
}
