use crate::error::{NetError, Result};

use serde::{Deserialize, Serialize};

/// Dense row-major matrix of `f64`.
/// Weight and gradient matrices are stored as `[neurons(l) x neurons(l - 1)]`,
/// so every row holds the incoming connections of one neuron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    storage: Box<[f64]>,
}

impl Matrix {
    pub fn zeroed(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            storage: vec![0.; rows * cols].into_boxed_slice(),
        }
    }

    /// The 0x0 matrix used as a placeholder for the input layer.
    pub fn empty() -> Self {
        Self::zeroed(0, 0)
    }

    /// Builds a matrix from row-major data. Fails if `data` doesn't hold exactly `rows * cols` values.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        NetError::check("matrix data", rows * cols, data.len())?;
        Ok(Self {
            rows,
            cols,
            storage: data.into_boxed_slice(),
        })
    }

    /// Builds a matrix from a list of equally long rows.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            NetError::check("matrix row", cols, row.len())?;
            data.extend_from_slice(row);
        }
        Self::from_vec(rows.len(), cols, data)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Panics if `row` is out of range.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.storage[row * self.cols..(row + 1) * self.cols]
    }

    /// Panics if `row` is out of range.
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        &mut self.storage[row * self.cols..(row + 1) * self.cols]
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.storage[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut f64> {
        if row < self.rows && col < self.cols {
            Some(&mut self.storage[row * self.cols + col])
        } else {
            None
        }
    }

    /// Iterate over the rows of the matrix.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // chunks_exact panics on a zero chunk size
        self.storage.chunks_exact(self.cols.max(1)).take(self.rows)
    }

    /// Get a reference to the raw row-major contents of the matrix
    pub fn raw(&self) -> &[f64] {
        &self.storage
    }

    /// Get a mutable reference to the raw row-major contents of the matrix
    pub fn raw_mut(&mut self) -> &mut [f64] {
        &mut self.storage
    }

    pub fn fill(&mut self, val: f64) {
        self.storage.iter_mut().for_each(|f| *f = val);
    }
}
