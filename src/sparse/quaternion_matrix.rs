//! Sparse matrices with quaternion entries.

use std::collections::BTreeMap;

use crate::math::Quaternion;

use super::CooMatrix;

/// Sparse `m × n` matrix whose entries are quaternions.
///
/// Absent entries are the zero quaternion. Reading never creates entries:
/// [`get`](Self::get) returns the zero quaternion by value for absent
/// coordinates, and only [`set`](Self::set) and
/// [`accumulate`](Self::accumulate) add entries to the map.
///
/// # Example
///
/// ```
/// use spinxform::math::Quaternion;
/// use spinxform::sparse::QuaternionMatrix;
///
/// let mut a = QuaternionMatrix::new(2, 2);
/// a.accumulate(0, 1, Quaternion::new(1.0, 0.0, 2.0, 0.0));
/// a.accumulate(0, 1, Quaternion::from_real(1.0));
///
/// assert_eq!(a.get(0, 1), Quaternion::new(2.0, 0.0, 2.0, 0.0));
/// assert_eq!(a.get(1, 0), Quaternion::ZERO);
/// assert_eq!(a.nnz(), 1);
///
/// // Each quaternion entry expands to a 4x4 real block.
/// let real = a.to_real_coo();
/// assert_eq!((real.nrows(), real.ncols()), (8, 8));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuaternionMatrix {
    rows: usize,
    cols: usize,
    /// Entries keyed by (row, col), so iteration is row-major.
    entries: BTreeMap<(usize, usize), Quaternion>,
}

impl QuaternionMatrix {
    /// Create an all-zero `rows × cols` matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            entries: BTreeMap::new(),
        }
    }

    /// Set the dimensions and clear every entry.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
        self.entries.clear();
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
        self.entries.len()
    }

    /// Value at (row, col), or zero if no entry is stored.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Quaternion {
        self.entries
            .get(&(row, col))
            .copied()
            .unwrap_or(Quaternion::ZERO)
    }

    /// Store `value` at (row, col), replacing any existing entry.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: Quaternion) {
        debug_assert!(row < self.rows && col < self.cols, "entry ({row}, {col}) out of bounds");
        self.entries.insert((row, col), value);
    }

    /// Add `delta` to the entry at (row, col), creating it if absent.
    #[inline]
    pub fn accumulate(&mut self, row: usize, col: usize, delta: Quaternion) {
        debug_assert!(row < self.rows && col < self.cols, "entry ({row}, {col}) out of bounds");
        *self.entries.entry((row, col)).or_insert(Quaternion::ZERO) += delta;
    }

    /// Iterate over stored entries as `(row, col, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Quaternion)> + '_ {
        self.entries.iter().map(|(&(r, c), &q)| (r, c, q))
    }

    /// Quaternionic matrix-vector product `y_i = Σ_j A_ij · x_j`.
    pub fn mul_vec(&self, x: &[Quaternion]) -> Vec<Quaternion> {
        assert_eq!(x.len(), self.cols, "Vector dimension mismatch");

        let mut y = vec![Quaternion::ZERO; self.rows];
        for (&(r, c), &q) in &self.entries {
            y[r] += q * x[c];
        }
        y
    }

    /// Expand to the equivalent `4m × 4n` real matrix.
    ///
    /// Entry (i, j) becomes the 4×4 block of left multiplication by the
    /// quaternion (see [`Quaternion::to_matrix`]) at rows `4i..4i+4` and
    /// columns `4j..4j+4`. Exactly-zero block entries are not stored. The
    /// result is sorted by row, then by column.
    pub fn to_real_coo(&self) -> CooMatrix {
        let mut coo = CooMatrix::with_capacity(4 * self.rows, 4 * self.cols, 16 * self.nnz());

        let blocks: Vec<(usize, usize, nalgebra::Matrix4<f64>)> =
            self.iter().map(|(r, c, q)| (r, c, q.to_matrix())).collect();

        // Within one block row, emit real row 4i+u across every block before
        // moving on to 4i+u+1.
        for row_blocks in blocks.chunk_by(|a, b| a.0 == b.0) {
            let i = row_blocks[0].0;
            for u in 0..4 {
                for &(_, j, ref block) in row_blocks {
                    for v in 0..4 {
                        let value = block[(u, v)];
                        if value != 0.0 {
                            coo.push(4 * i + u, 4 * j + v, value);
                        }
                    }
                }
            }
        }

        coo
    }
}
