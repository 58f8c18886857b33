//! Point set adapter.
//!
//! Every input shape is normalized into a [`PointSet`]: a dense, row-major
//! buffer of `f64` coordinates with a fixed dimensionality. All validation
//! happens here, so the clustering engines only ever see well-formed data.

use std::io::BufRead;

use crate::error::{Error, Result};

/// A numeric element type accepted as a coordinate.
///
/// Integers and floats of any width are converted to `f64` for distance math.
pub trait Coordinate: Copy {
    /// Convert to the common floating-point representation.
    fn to_f64(self) -> f64;
}

macro_rules! impl_coordinate {
    ($($t:ty),*) => {
        $(
            impl Coordinate for $t {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_coordinate!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// An immutable set of `N` points in `D` dimensions, addressed by 0-based index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointSet {
    coords: Vec<f64>,
    dim: usize,
}

impl PointSet {
    /// Build from a sequence of rows (nested `Vec`s, slices, or fixed-size arrays).
    ///
    /// Zero rows is valid and yields an empty set. Otherwise every row must have
    /// the same, non-zero length and every coordinate must be finite.
    pub fn from_rows<T, R>(rows: &[R]) -> Result<Self>
    where
        T: Coordinate,
        R: AsRef<[T]>,
    {
        let Some(first) = rows.first() else {
            return Ok(Self::default());
        };
        let dim = first.as_ref().len();
        if dim == 0 {
            return Err(Error::ZeroDimension);
        }

        let mut coords = Vec::with_capacity(rows.len() * dim);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != dim {
                return Err(Error::DimensionMismatch {
                    row,
                    expected: dim,
                    found: values.len(),
                });
            }
            for (column, &v) in values.iter().enumerate() {
                coords.push(finite(v.to_f64(), row, column)?);
            }
        }
        Ok(Self { coords, dim })
    }

    /// Build from a row-major buffer holding `data.len() / dim` points.
    pub fn from_flat<T: Coordinate>(data: &[T], dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::ZeroDimension);
        }
        if data.len() % dim != 0 {
            return Err(Error::FlatLength {
                len: data.len(),
                dim,
            });
        }

        let coords = data
            .iter()
            .enumerate()
            .map(|(i, &v)| finite(v.to_f64(), i / dim, i % dim))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { coords, dim })
    }

    /// Build from a two-dimensional array view (rows = points).
    #[cfg(feature = "ndarray")]
    pub fn from_array<T: Coordinate>(view: ndarray::ArrayView2<'_, T>) -> Result<Self> {
        let (n, dim) = view.dim();
        if n == 0 {
            return Ok(Self {
                coords: Vec::new(),
                dim,
            });
        }
        if dim == 0 {
            return Err(Error::ZeroDimension);
        }

        let mut coords = Vec::with_capacity(n * dim);
        for (row, values) in view.outer_iter().enumerate() {
            for (column, &v) in values.iter().enumerate() {
                coords.push(finite(v.to_f64(), row, column)?);
            }
        }
        Ok(Self { coords, dim })
    }

    /// Parse whitespace- or comma-separated rows of numbers.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn read_text<B: BufRead>(reader: B) -> Result<Self> {
        let mut rows: Vec<Vec<f64>> = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let row = rows.len();
            let values = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|tok| !tok.is_empty())
                .enumerate()
                .map(|(column, tok)| {
                    tok.parse::<f64>().map_err(|_| Error::NonNumeric {
                        row,
                        column,
                        token: tok.to_string(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(values);
        }
        Self::from_rows(&rows)
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.coords.len() / self.dim
        }
    }

    /// Whether the set holds no points.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Dimensionality `D` (0 only for a set built from zero rows).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Coordinates of point `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    #[inline]
    pub fn point(&self, i: usize) -> &[f64] {
        &self.coords[i * self.dim..(i + 1) * self.dim]
    }

    /// Iterate over points in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        // `chunks_exact(0)` panics, and an empty set has nothing to yield anyway.
        self.coords.chunks_exact(self.dim.max(1))
    }

    /// The row-major coordinate buffer.
    pub fn as_flat(&self) -> &[f64] {
        &self.coords
    }

    /// A copy of this set with `extra` zero-valued axes appended to every point.
    pub fn padded(&self, extra: usize) -> Self {
        let dim = self.dim + extra;
        let mut coords = Vec::with_capacity(self.len() * dim);
        for p in self.iter() {
            coords.extend_from_slice(p);
            coords.extend(std::iter::repeat(0.0).take(extra));
        }
        Self { coords, dim }
    }
}

#[inline]
fn finite(v: f64, row: usize, column: usize) -> Result<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(Error::NonFinite { row, column })
    }
}
