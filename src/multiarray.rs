//! Owned two and three dimensional arrays backed by flat row-major vectors.

use crate::definitions::Image;
use crate::error::HogError;
use image::{Luma, Primitive};
use num::Zero;
use std::ops::{Index, IndexMut};

/// A 2d array that owns its data, indexed by `(row, column)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Array2d<T> {
    data: Vec<T>,
    rows: usize,
    columns: usize,
}

impl<T: Zero + Clone> Array2d<T> {
    /// Allocates a new zero-filled Array2d with the given dimensions.
    pub fn new(rows: usize, columns: usize) -> Array2d<T> {
        Array2d {
            data: vec![Zero::zero(); rows * columns],
            rows,
            columns,
        }
    }
}

impl<T> Array2d<T> {
    /// Wraps existing row-major data. Fails if `data.len() != rows * columns`.
    pub fn from_raw(rows: usize, columns: usize, data: Vec<T>) -> Result<Array2d<T>, HogError> {
        check_length(rows * columns, data.len())?;
        Ok(Array2d {
            data,
            rows,
            columns,
        })
    }

    /// Builds an array by evaluating `f(row, column)` at every position.
    pub fn from_fn<F>(rows: usize, columns: usize, mut f: F) -> Array2d<T>
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(rows * columns);
        for r in 0..rows {
            for c in 0..columns {
                data.push(f(r, c));
            }
        }
        Array2d {
            data,
            rows,
            columns,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// `(rows, columns)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// Row-major backing storage.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable row-major backing storage.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the array, returning its row-major storage.
    pub fn into_raw(self) -> Vec<T> {
        self.data
    }

    /// Returns the element at `(row, column)`, or `None` if out of bounds.
    pub fn get(&self, row: usize, column: usize) -> Option<&T> {
        if row < self.rows && column < self.columns {
            self.data.get(row * self.columns + column)
        } else {
            None
        }
    }

    /// All elements of a single row.
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.columns;
        &self.data[start..start + self.columns]
    }
}

impl Array2d<f64> {
    /// Copies a single channel image into an array with one row per image row.
    ///
    /// Image width becomes the number of columns and height the number of rows.
    pub fn from_luma<S>(image: &Image<Luma<S>>) -> Array2d<f64>
    where
        S: Primitive,
    {
        let (width, height) = image.dimensions();
        Array2d {
            data: image
                .iter()
                .map(|p| p.to_f64().unwrap_or_default())
                .collect(),
            rows: height as usize,
            columns: width as usize,
        }
    }
}

impl<T> Index<(usize, usize)> for Array2d<T> {
    type Output = T;

    fn index(&self, (row, column): (usize, usize)) -> &T {
        assert!(
            column < self.columns,
            "column {} out of bounds for {} columns",
            column,
            self.columns
        );
        &self.data[row * self.columns + column]
    }
}

impl<T> IndexMut<(usize, usize)> for Array2d<T> {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut T {
        assert!(
            column < self.columns,
            "column {} out of bounds for {} columns",
            column,
            self.columns
        );
        &mut self.data[row * self.columns + column]
    }
}

/// A 3d array that owns its data.
///
/// Lengths are given outermost first, so the last index varies fastest
/// in the backing storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Array3d<T> {
    data: Vec<T>,
    lengths: [usize; 3],
}

impl<T: Zero + Clone> Array3d<T> {
    /// Allocates a new zero-filled Array3d with the given lengths.
    pub fn new(lengths: [usize; 3]) -> Array3d<T> {
        Array3d {
            data: vec![Zero::zero(); lengths.iter().product()],
            lengths,
        }
    }
}

impl<T> Array3d<T> {
    /// Wraps existing data. Fails if its length isn't the product of `lengths`.
    pub fn from_raw(lengths: [usize; 3], data: Vec<T>) -> Result<Array3d<T>, HogError> {
        check_length(lengths.iter().product(), data.len())?;
        Ok(Array3d { data, lengths })
    }

    /// Lengths of the three dimensions, outermost first.
    pub fn lengths(&self) -> [usize; 3] {
        self.lengths
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if any dimension has length zero.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Backing storage.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable backing storage.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the array, returning its storage.
    pub fn into_raw(self) -> Vec<T> {
        self.data
    }

    /// Returns the element at the given indices, or `None` if any is out of bounds.
    pub fn get(&self, indices: [usize; 3]) -> Option<&T> {
        if self.contains(indices) {
            Some(&self.data[self.offset(indices)])
        } else {
            None
        }
    }

    /// The innermost dimension at the given outer and middle indices.
    pub fn inner_slice(&self, x0: usize, x1: usize) -> &[T] {
        let start = self.offset([x0, x1, 0]);
        &self.data[start..start + self.lengths[2]]
    }

    /// Mutable access to the innermost dimension at the given outer and middle indices.
    pub fn inner_slice_mut(&mut self, x0: usize, x1: usize) -> &mut [T] {
        let start = self.offset([x0, x1, 0]);
        let len = self.lengths[2];
        &mut self.data[start..start + len]
    }

    fn contains(&self, indices: [usize; 3]) -> bool {
        indices.iter().zip(self.lengths.iter()).all(|(i, l)| i < l)
    }

    fn offset(&self, [x0, x1, x2]: [usize; 3]) -> usize {
        (x0 * self.lengths[1] + x1) * self.lengths[2] + x2
    }
}

impl<T> Index<[usize; 3]> for Array3d<T> {
    type Output = T;

    fn index(&self, indices: [usize; 3]) -> &T {
        assert!(
            self.contains(indices),
            "indices {:?} out of bounds for lengths {:?}",
            indices,
            self.lengths
        );
        &self.data[self.offset(indices)]
    }
}

impl<T> IndexMut<[usize; 3]> for Array3d<T> {
    fn index_mut(&mut self, indices: [usize; 3]) -> &mut T {
        assert!(
            self.contains(indices),
            "indices {:?} out of bounds for lengths {:?}",
            indices,
            self.lengths
        );
        let offset = self.offset(indices);
        &mut self.data[offset]
    }
}

fn check_length(expected: usize, actual: usize) -> Result<(), HogError> {
    if expected == actual {
        Ok(())
    } else {
        Err(HogError::DataLength { expected, actual })
    }
}
