//! Linear and eigenvalue solvers.
//!
//! The deformation pipeline only needs one capability from a linear solver:
//! solve a symmetric positive-(semi)definite real sparse system, optionally
//! preconditioned, and return the dense solution. That capability is the
//! [`LinearSolver`] trait, so CPU iterative, direct, or device-offloaded
//! implementations can be swapped in freely. [`ConjugateGradient`] is the
//! implementation shipped with the crate.
//!
//! On top of it:
//!
//! - [`solve_quaternion_system`] solves quaternion-valued systems by
//!   expanding them to real block form
//! - [`inverse_power_iteration`] finds the eigenvector of the smallest
//!   eigenvalue of a quaternionic operator

mod cg;
mod eigen;
mod system;

pub use cg::ConjugateGradient;
pub use eigen::{
    inverse_power_iteration, inverse_power_iteration_with_progress, normalize, stacked_norm,
    EigenOptions,
};
pub use system::{solve_quaternion_system, to_quaternions, to_real};

use nalgebra::DVector;

use crate::error::Result;
use crate::sparse::CooMatrix;

/// A solver for symmetric positive-(semi)definite sparse linear systems.
pub trait LinearSolver {
    /// Solve `a * x = b` and return `x`.
    ///
    /// `a` is square and sorted by row. When `precondition` is set the
    /// solver may use a preconditioner, but must converge to the same
    /// solution within its tolerance.
    fn solve(&self, a: &CooMatrix, b: &DVector<f64>, precondition: bool) -> Result<DVector<f64>>;
}

impl<S: LinearSolver + ?Sized> LinearSolver for &S {
    fn solve(&self, a: &CooMatrix, b: &DVector<f64>, precondition: bool) -> Result<DVector<f64>> {
        (**self).solve(a, b, precondition)
    }
}

impl<S: LinearSolver + ?Sized> LinearSolver for Box<S> {
    fn solve(&self, a: &CooMatrix, b: &DVector<f64>, precondition: bool) -> Result<DVector<f64>> {
        (**self).solve(a, b, precondition)
    }
}
