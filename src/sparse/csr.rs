//! Compressed sparse row matrix.
//!
//! Used by the CPU conjugate gradient solver for fast matrix-vector
//! products.

use nalgebra::DVector;
use rayon::prelude::*;

use super::CooMatrix;

/// Compressed Sparse Row (CSR) matrix.
#[derive(Debug, Clone)]
pub struct CsrMatrix {
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Row pointers: row_ptr[i] is the index in col_idx/values where row i starts.
    /// Length is rows + 1, with row_ptr[rows] = nnz.
    row_ptr: Vec<usize>,
    /// Column indices for each non-zero value.
    col_idx: Vec<usize>,
    /// Non-zero values.
    values: Vec<f64>,
}

impl CsrMatrix {
    /// Create a CSR matrix from triplets (row, col, value).
    ///
    /// Duplicate entries at the same (row, col) are summed.
    pub fn from_triplets(rows: usize, cols: usize, mut triplets: Vec<(usize, usize, f64)>) -> Self {
        if triplets.is_empty() {
            return Self {
                rows,
                cols,
                row_ptr: vec![0; rows + 1],
                col_idx: Vec::new(),
                values: Vec::new(),
            };
        }

        // Sorting is stable and cheap when the input is already row-sorted
        triplets.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut row_ptr = vec![0usize; rows + 1];
        let mut col_idx = Vec::with_capacity(triplets.len());
        let mut values: Vec<f64> = Vec::with_capacity(triplets.len());

        let mut prev_row = usize::MAX;
        let mut prev_col = usize::MAX;

        for (row, col, val) in triplets {
            if row == prev_row && col == prev_col {
                if let Some(last) = values.last_mut() {
                    *last += val;
                }
            } else {
                col_idx.push(col);
                values.push(val);
                // Update row pointers for any skipped rows
                for r in (prev_row.wrapping_add(1))..=row {
                    row_ptr[r] = col_idx.len() - 1;
                }
                prev_row = row;
                prev_col = col;
            }
        }

        let nnz = col_idx.len();
        for r in (prev_row + 1)..=rows {
            row_ptr[r] = nnz;
        }

        Self {
            rows,
            cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Get the number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// Get the number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Get the number of non-zero entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Diagonal entries (zero where no entry is stored).
    pub fn diagonal(&self) -> DVector<f64> {
        let n = self.rows.min(self.cols);
        DVector::from_iterator(
            n,
            (0..n).map(|i| {
                let row = self.row_ptr[i]..self.row_ptr[i + 1];
                self.col_idx[row.clone()]
                    .iter()
                    .zip(&self.values[row])
                    .filter(|&(&c, _)| c == i)
                    .map(|(_, &v)| v)
                    .sum()
            }),
        )
    }

    #[inline]
    fn row_dot(&self, i: usize, x: &DVector<f64>) -> f64 {
        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];

        let mut sum = 0.0;
        for k in start..end {
            sum += self.values[k] * x[self.col_idx[k]];
        }
        sum
    }

    /// Multiply matrix by vector: y = A * x.
    pub fn mul_vec(&self, x: &DVector<f64>) -> DVector<f64> {
        assert_eq!(x.len(), self.cols, "Vector dimension mismatch");

        DVector::from_iterator(self.rows, (0..self.rows).map(|i| self.row_dot(i, x)))
    }

    /// Multiply matrix by vector using all available threads.
    pub fn par_mul_vec(&self, x: &DVector<f64>) -> DVector<f64> {
        assert_eq!(x.len(), self.cols, "Vector dimension mismatch");

        let y: Vec<f64> = (0..self.rows)
            .into_par_iter()
            .map(|i| self.row_dot(i, x))
            .collect();
        DVector::from_vec(y)
    }
}

impl From<&CooMatrix> for CsrMatrix {
    fn from(coo: &CooMatrix) -> Self {
        CsrMatrix::from_triplets(coo.nrows(), coo.ncols(), coo.triplets().collect())
    }
}
