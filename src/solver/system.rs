//! Quaternion-valued linear systems.
//!
//! A quaternion vector of length n maps to a real vector of length 4n by
//! interleaving each quaternion's components in `(re, i, j, k)` order, which
//! matches the block layout of [`QuaternionMatrix::to_real_coo`].

use nalgebra::DVector;

use crate::error::{Result, SpinError};
use crate::math::Quaternion;
use crate::sparse::QuaternionMatrix;

use super::LinearSolver;

/// Flatten quaternions into an interleaved real vector of length `4n`.
pub fn to_real(q: &[Quaternion]) -> DVector<f64> {
    DVector::from_iterator(4 * q.len(), q.iter().flat_map(|q| q.to_array()))
}

/// Write an interleaved real vector back into quaternions.
///
/// Returns [`SpinError::DimensionMismatch`] unless `real.len() == 4 * out.len()`.
pub fn to_quaternions(real: &DVector<f64>, out: &mut [Quaternion]) -> Result<()> {
    if real.len() != 4 * out.len() {
        return Err(SpinError::dimension("real solution", 4 * out.len(), real.len()));
    }
    for (q, c) in out.iter_mut().zip(real.as_slice().chunks_exact(4)) {
        *q = Quaternion::new(c[0], c[1], c[2], c[3]);
    }
    Ok(())
}

/// Solve the quaternionic system `a * x = b`, writing the result into `x`.
///
/// `a` is expanded to its real block form and handed to `solver` together
/// with the flattened right-hand side. No iteration happens here; the
/// solver owns convergence.
///
/// # Example
///
/// ```
/// use spinxform::math::Quaternion;
/// use spinxform::solver::{solve_quaternion_system, ConjugateGradient};
/// use spinxform::sparse::QuaternionMatrix;
///
/// let mut a = QuaternionMatrix::new(1, 1);
/// a.set(0, 0, Quaternion::from_real(2.0));
///
/// let b = [Quaternion::new(2.0, 4.0, 0.0, -2.0)];
/// let mut x = [Quaternion::ZERO];
/// solve_quaternion_system(&ConjugateGradient::default(), &a, &mut x, &b, false).unwrap();
/// assert!((x[0] - Quaternion::new(1.0, 2.0, 0.0, -1.0)).norm() < 1e-10);
/// ```
pub fn solve_quaternion_system<S: LinearSolver + ?Sized>(
    solver: &S,
    a: &QuaternionMatrix,
    x: &mut [Quaternion],
    b: &[Quaternion],
    precondition: bool,
) -> Result<()> {
    if b.len() != a.nrows() {
        return Err(SpinError::dimension("right-hand side", a.nrows(), b.len()));
    }
    if x.len() != a.ncols() {
        return Err(SpinError::dimension("solution", a.ncols(), x.len()));
    }

    let real_a = a.to_real_coo();
    let real_b = to_real(b);
    log::debug!(
        "solving {}x{} real system ({} non-zeros, precondition={})",
        real_a.nrows(),
        real_a.ncols(),
        real_a.nnz(),
        precondition
    );

    let real_x = solver.solve(&real_a, &real_b, precondition)?;
    to_quaternions(&real_x, x)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::sparse::CooMatrix;

    /// Records its inputs and answers with `2 * b`.
    #[derive(Default)]
    struct RecordingSolver {
        calls: RefCell<Vec<(usize, usize, Vec<f64>, bool)>>,
    }

    impl LinearSolver for RecordingSolver {
        fn solve(
            &self,
            a: &CooMatrix,
            b: &DVector<f64>,
            precondition: bool,
        ) -> Result<DVector<f64>> {
            self.calls.borrow_mut().push((
                a.nrows(),
                a.nnz(),
                b.as_slice().to_vec(),
                precondition,
            ));
            Ok(b * 2.0)
        }
    }

    /// Returns a vector of the wrong length.
    struct ShortSolver;

    impl LinearSolver for ShortSolver {
        fn solve(&self, _: &CooMatrix, b: &DVector<f64>, _: bool) -> Result<DVector<f64>> {
            Ok(DVector::zeros(b.len() - 1))
        }
    }

    #[test]
    fn test_interleaving_order() {
        let q = [Quaternion::new(1.0, 2.0, 3.0, 4.0), Quaternion::new(5.0, 6.0, 7.0, 8.0)];
        let real = to_real(&q);
        assert_eq!(real.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);

        let mut back = [Quaternion::ZERO; 2];
        to_quaternions(&real, &mut back).unwrap();
        assert_eq!(back, q);
    }

    #[test]
    fn test_to_quaternions_length_check() {
        let mut out = [Quaternion::ZERO; 2];
        let result = to_quaternions(&DVector::zeros(7), &mut out);
        assert!(matches!(result, Err(SpinError::DimensionMismatch { expected: 8, actual: 7, .. })));
    }

    #[test]
    fn test_adapter_passes_block_system() {
        let mut a = QuaternionMatrix::new(2, 2);
        a.set(0, 0, Quaternion::from_real(3.0));
        a.set(1, 1, Quaternion::new(1.0, 1.0, 0.0, 0.0));

        let b = [Quaternion::new(1.0, 0.0, 0.0, 0.5), Quaternion::new(0.0, -1.0, 2.0, 0.0)];
        let mut x = [Quaternion::ZERO; 2];

        let solver = RecordingSolver::default();
        solve_quaternion_system(&solver, &a, &mut x, &b, true).unwrap();

        let calls = solver.calls.borrow();
        assert_eq!(calls.len(), 1);
        let (n, nnz, rhs, precondition) = &calls[0];
        assert_eq!(*n, 8);
        assert_eq!(*nnz, 4 + 8);
        assert_eq!(rhs.as_slice(), &[1.0, 0.0, 0.0, 0.5, 0.0, -1.0, 2.0, 0.0]);
        assert!(*precondition);

        assert_eq!(x[0], b[0] * 2.0);
        assert_eq!(x[1], b[1] * 2.0);
    }

    #[test]
    fn test_adapter_rejects_short_solution() {
        let mut a = QuaternionMatrix::new(1, 1);
        a.set(0, 0, Quaternion::ONE);
        let mut x = [Quaternion::ZERO];
        let result = solve_quaternion_system(&ShortSolver, &a, &mut x, &[Quaternion::ONE], false);
        assert!(matches!(result, Err(SpinError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_adapter_rejects_wrong_rhs_length() {
        let a = QuaternionMatrix::new(2, 2);
        let mut x = [Quaternion::ZERO; 2];
        let result = solve_quaternion_system(
            &RecordingSolver::default(),
            &a,
            &mut x,
            &[Quaternion::ONE],
            false,
        );
        assert!(matches!(result, Err(SpinError::DimensionMismatch { .. })));
    }
}
