//! Conjugate gradient solver for symmetric positive-(semi)definite systems.

use nalgebra::DVector;

use crate::error::{Result, SpinError};
use crate::sparse::{CooMatrix, CsrMatrix};

use super::LinearSolver;

/// Conjugate gradient [`LinearSolver`] running on the CPU.
///
/// With preconditioning enabled, the diagonal of the matrix is used as a
/// Jacobi preconditioner.
///
/// Semidefinite systems are fine as long as the right-hand side lies in the
/// range of the matrix (as for a Laplacian with a mean-free right-hand side).
///
/// # Example
///
/// ```
/// use nalgebra::DVector;
/// use spinxform::solver::{ConjugateGradient, LinearSolver};
/// use spinxform::sparse::CooMatrix;
///
/// // [ 4  1 ]       [ 1 ]
/// // [ 1  3 ] * x = [ 2 ]
/// let mut a = CooMatrix::new(2, 2);
/// a.push(0, 0, 4.0);
/// a.push(0, 1, 1.0);
/// a.push(1, 0, 1.0);
/// a.push(1, 1, 3.0);
///
/// let solver = ConjugateGradient::default().with_tolerance(1e-12);
/// let x = solver.solve(&a, &DVector::from_vec(vec![1.0, 2.0]), true).unwrap();
/// assert!((x[0] - 1.0 / 11.0).abs() < 1e-10);
/// assert!((x[1] - 7.0 / 11.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct ConjugateGradient {
    /// Maximum number of iterations.
    pub max_iterations: usize,

    /// Convergence tolerance (relative residual norm).
    pub tolerance: f64,

    /// Whether to use parallel matrix-vector products (default: true).
    pub parallel: bool,
}

impl Default for ConjugateGradient {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            tolerance: 1e-10,
            parallel: true,
        }
    }
}

impl ConjugateGradient {
    /// Set maximum iterations.
    pub fn with_max_iterations(mut self, max_iter: usize) -> Self {
        self.max_iterations = max_iter;
        self
    }

    /// Set convergence tolerance.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create a solver for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl LinearSolver for ConjugateGradient {
    fn solve(&self, a: &CooMatrix, b: &DVector<f64>, precondition: bool) -> Result<DVector<f64>> {
        if a.nrows() != a.ncols() {
            return Err(SpinError::dimension("matrix columns", a.nrows(), a.ncols()));
        }
        if b.len() != a.nrows() {
            return Err(SpinError::dimension("right-hand side", a.nrows(), b.len()));
        }
        if !(self.tolerance > 0.0) {
            return Err(SpinError::invalid_param(
                "tolerance",
                self.tolerance,
                "must be positive",
            ));
        }

        let csr = CsrMatrix::from(a);
        let inv_diagonal = precondition.then(|| {
            csr.diagonal()
                .map(|d| if d.abs() > f64::MIN_POSITIVE { 1.0 / d } else { 1.0 })
        });

        conjugate_gradient(
            &csr,
            b,
            None,
            inv_diagonal.as_ref(),
            self.max_iterations,
            self.tolerance,
            self.parallel,
        )
    }
}

/// Solve A*x = b using the (optionally Jacobi-preconditioned) Conjugate
/// Gradient method.
///
/// # Arguments
///
/// * `a` - The system matrix (must be symmetric positive semidefinite)
/// * `b` - The right-hand side vector
/// * `x0` - Optional initial guess (zeros if None)
/// * `inv_diagonal` - Inverse diagonal for Jacobi preconditioning, if any
/// * `max_iter` - Maximum number of iterations
/// * `tolerance` - Convergence tolerance (relative residual norm)
/// * `parallel` - Whether to use parallel matrix-vector products
///
/// # Returns
///
/// The solution vector x, or an error if convergence fails.
pub(crate) fn conjugate_gradient(
    a: &CsrMatrix,
    b: &DVector<f64>,
    x0: Option<&DVector<f64>>,
    inv_diagonal: Option<&DVector<f64>>,
    max_iter: usize,
    tolerance: f64,
    parallel: bool,
) -> Result<DVector<f64>> {
    let n = b.len();
    let mul = |v: &DVector<f64>| {
        if parallel {
            a.par_mul_vec(v)
        } else {
            a.mul_vec(v)
        }
    };
    let precondition = |r: &DVector<f64>| match inv_diagonal {
        Some(d) => r.component_mul(d),
        None => r.clone(),
    };

    let mut x = match x0 {
        Some(x0) => x0.clone(),
        None => DVector::zeros(n),
    };

    let b_norm = b.norm();
    if b_norm < 1e-300 {
        return Ok(DVector::zeros(n));
    }

    // r = b - A*x
    let mut r = b - mul(&x);
    let mut residual = r.norm() / b_norm;
    if residual < tolerance {
        return Ok(x);
    }

    let mut z = precondition(&r);
    let mut p = z.clone();
    let mut rz = r.dot(&z);

    for iter in 0..max_iter {
        let ap = mul(&p);

        // A zero or negative curvature direction means the system is
        // singular (or indefinite) along p and b is not in the range.
        let p_ap = p.dot(&ap);
        if !(p_ap > 0.0) {
            log::debug!(
                "conjugate gradient broke down at iteration {} (p·Ap = {:e})",
                iter,
                p_ap
            );
            return Err(SpinError::ConvergenceFailed {
                iterations: iter,
                residual,
            });
        }
        let alpha = rz / p_ap;

        x.axpy(alpha, &p, 1.0);
        r.axpy(-alpha, &ap, 1.0);

        residual = r.norm() / b_norm;
        if residual < tolerance {
            log::debug!(
                "conjugate gradient converged in {} iterations (residual {:e})",
                iter + 1,
                residual
            );
            return Ok(x);
        }

        z = precondition(&r);
        let rz_new = r.dot(&z);
        let beta = rz_new / rz;

        // p = z + beta * p
        p.axpy(1.0, &z, beta);
        rz = rz_new;
    }

    Err(SpinError::ConvergenceFailed {
        iterations: max_iter,
        residual,
    })
}
