//! Real sparse matrix in coordinate (COO) form.

use nalgebra::DMatrix;

/// Real sparse matrix stored as parallel row/column/value arrays.
///
/// Matrices produced by [`QuaternionMatrix::to_real_coo`](super::QuaternionMatrix::to_real_coo)
/// are sorted by row, then by column, with no duplicate coordinates and no
/// explicitly stored zeros.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CooMatrix {
    rows: usize,
    cols: usize,
    row_indices: Vec<usize>,
    col_indices: Vec<usize>,
    values: Vec<f64>,
}

impl CooMatrix {
    /// Create an empty `rows × cols` matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Default::default()
        }
    }

    /// Create an empty matrix with room for `nnz` entries.
    pub fn with_capacity(rows: usize, cols: usize, nnz: usize) -> Self {
        Self {
            rows,
            cols,
            row_indices: Vec::with_capacity(nnz),
            col_indices: Vec::with_capacity(nnz),
            values: Vec::with_capacity(nnz),
        }
    }

    /// Append an entry.
    ///
    /// Callers are responsible for keeping the entries sorted if they need
    /// [`is_sorted_by_row`](Self::is_sorted_by_row) to hold.
    #[inline]
    pub fn push(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.rows && col < self.cols, "entry ({row}, {col}) out of bounds");
        self.row_indices.push(row);
        self.col_indices.push(col);
        self.values.push(value);
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

    /// Get the number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Row index of each stored entry.
    pub fn row_indices(&self) -> &[usize] {
        &self.row_indices
    }

    /// Column index of each stored entry.
    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    /// Value of each stored entry.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over `(row, col, value)` triplets in storage order.
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.row_indices
            .iter()
            .zip(&self.col_indices)
            .zip(&self.values)
            .map(|((&r, &c), &v)| (r, c, v))
    }

    /// Returns `true` if entries are strictly increasing by (row, column).
    pub fn is_sorted_by_row(&self) -> bool {
        self.row_indices
            .iter()
            .zip(&self.col_indices)
            .collect::<Vec<_>>()
            .windows(2)
            .all(|w| w[0] < w[1])
    }

    /// Expand to a dense matrix, summing duplicate coordinates.
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut dense = DMatrix::zeros(self.rows, self.cols);
        for (r, c, v) in self.triplets() {
            dense[(r, c)] += v;
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_dense() {
        let mut coo = CooMatrix::new(2, 3);
        coo.push(0, 1, 2.0);
        coo.push(1, 0, -1.0);
        coo.push(1, 2, 4.0);

        assert_eq!(coo.nnz(), 3);
        assert!(coo.is_sorted_by_row());
        assert_eq!(coo.row_indices(), &[0, 1, 1]);
        assert_eq!(coo.col_indices(), &[1, 0, 2]);
        assert_eq!(coo.values(), &[2.0, -1.0, 4.0]);

        let dense = coo.to_dense();
        assert_eq!(dense[(0, 1)], 2.0);
        assert_eq!(dense[(1, 0)], -1.0);
        assert_eq!(dense[(1, 2)], 4.0);
        assert_eq!(dense[(0, 0)], 0.0);
    }

    #[test]
    fn test_unsorted_detection() {
        let mut coo = CooMatrix::new(2, 2);
        coo.push(1, 0, 1.0);
        coo.push(0, 1, 1.0);
        assert!(!coo.is_sorted_by_row());

        let mut dup = CooMatrix::new(2, 2);
        dup.push(0, 0, 1.0);
        dup.push(0, 0, 1.0);
        assert!(!dup.is_sorted_by_row());
        assert_eq!(dup.to_dense()[(0, 0)], 2.0);
    }
}
