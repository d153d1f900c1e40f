//! Inverse power iteration for the smallest eigenvector of a quaternionic
//! operator.

use crate::error::{Result, SpinError};
use crate::math::Quaternion;
use crate::progress::Progress;
use crate::sparse::QuaternionMatrix;

use super::{solve_quaternion_system, LinearSolver};

/// Options for [`inverse_power_iteration`].
#[derive(Debug, Clone)]
pub struct EigenOptions {
    /// Number of inverse power iterations. There is no convergence test.
    pub iterations: usize,

    /// Added to the diagonal before solving, i.e. iterate with `A + shift·I`.
    ///
    /// Eigenvectors are unchanged. A small positive shift makes exactly
    /// singular semidefinite operators solvable by iterative methods.
    pub shift: f64,
}

impl Default for EigenOptions {
    fn default() -> Self {
        Self {
            iterations: 3,
            shift: 1e-8,
        }
    }
}

impl EigenOptions {
    /// Set the number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the diagonal shift.
    pub fn with_shift(mut self, shift: f64) -> Self {
        self.shift = shift;
        self
    }
}

/// Euclidean norm of quaternions stacked into one `4n` real vector.
pub fn stacked_norm(x: &[Quaternion]) -> f64 {
    x.iter().map(Quaternion::norm_squared).sum::<f64>().sqrt()
}

/// Rescale `x` to unit [`stacked_norm`].
pub fn normalize(x: &mut [Quaternion]) {
    let norm = stacked_norm(x);
    for q in x.iter_mut() {
        *q /= norm;
    }
}

/// Approximate the eigenvector of `a` with the smallest eigenvalue.
///
/// Starting from the all-ones vector `(1, 0, 0, 0)` per entry, repeats a
/// fixed number of times: normalize `b`, solve `a * x = b` without
/// preconditioning, set `b = x`. The result in `x` has unit
/// [`stacked_norm`]. The initial contents of `x` are ignored.
///
/// Returns the Rayleigh quotient `xᵀ a x` of the (unshifted) operator, an
/// estimate of the smallest eigenvalue.
///
/// Solver failures are returned unchanged.
///
/// # Example
///
/// ```
/// use spinxform::math::Quaternion;
/// use spinxform::solver::{inverse_power_iteration, stacked_norm, ConjugateGradient, EigenOptions};
/// use spinxform::sparse::QuaternionMatrix;
///
/// let mut a = QuaternionMatrix::new(2, 2);
/// a.set(0, 0, Quaternion::from_real(1.0));
/// a.set(1, 1, Quaternion::from_real(50.0));
///
/// let mut x = vec![Quaternion::ZERO; 2];
/// let options = EigenOptions::default().with_shift(0.0);
/// let eigenvalue =
///     inverse_power_iteration(&ConjugateGradient::default(), &a, &mut x, &options).unwrap();
///
/// assert!((stacked_norm(&x) - 1.0).abs() < 1e-12);
/// assert!(x[0].norm() > 0.99);
/// assert!((eigenvalue - 1.0).abs() < 1e-3);
/// ```
pub fn inverse_power_iteration<S: LinearSolver + ?Sized>(
    solver: &S,
    a: &QuaternionMatrix,
    x: &mut [Quaternion],
    options: &EigenOptions,
) -> Result<f64> {
    inverse_power_iteration_with_progress(solver, a, x, options, &Progress::none())
}

/// Like [`inverse_power_iteration`], reporting each iteration to `progress`.
pub fn inverse_power_iteration_with_progress<S: LinearSolver + ?Sized>(
    solver: &S,
    a: &QuaternionMatrix,
    x: &mut [Quaternion],
    options: &EigenOptions,
    progress: &Progress,
) -> Result<f64> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(SpinError::dimension("operator columns", n, a.ncols()));
    }
    if x.len() != n {
        return Err(SpinError::dimension("eigenvector", n, x.len()));
    }
    if options.iterations == 0 {
        return Err(SpinError::invalid_param(
            "iterations",
            options.iterations,
            "at least one inverse power iteration is required",
        ));
    }

    let shifted;
    let operator = if options.shift != 0.0 {
        let mut m = a.clone();
        for i in 0..n {
            m.accumulate(i, i, Quaternion::from_real(options.shift));
        }
        shifted = m;
        &shifted
    } else {
        a
    };

    let mut b = vec![Quaternion::ONE; n];
    for iter in 0..options.iterations {
        progress.report(iter, options.iterations, "Inverse power iteration");
        normalize(&mut b);
        solve_quaternion_system(solver, operator, x, &b, false)?;
        b.copy_from_slice(x);
    }
    progress.report(options.iterations, options.iterations, "Inverse power iteration");

    normalize(x);

    let ax = a.mul_vec(x);
    let eigenvalue: f64 = x.iter().zip(&ax).map(|(xi, axi)| xi.dot(axi)).sum();
    log::debug!(
        "inverse power iteration: {} iterations, eigenvalue estimate {:e}",
        options.iterations,
        eigenvalue
    );

    Ok(eigenvalue)
}
