//! Conformal deformation by discrete spin transformations.
//!
//! Given a curvature change `ρ` per face, [`SpinTransform`] finds a
//! similarity transformation `λ` per vertex (the smallest eigenvector of the
//! spin energy `E`), then integrates the transformed edges by solving the
//! Poisson problem `L x = ω` for the new vertex positions.
//!
//! # Example
//!
//! ```
//! use spinxform::deform::{SpinOptions, SpinTransform};
//! use spinxform::mesh::Mesh;
//! use spinxform::solver::ConjugateGradient;
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(-1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, -1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//!     Point3::new(0.0, 0.0, -1.0),
//! ];
//! let faces = vec![
//!     [0, 2, 4], [2, 1, 4], [1, 3, 4], [3, 0, 4],
//!     [2, 0, 5], [1, 2, 5], [3, 1, 5], [0, 3, 5],
//! ];
//! let mesh = Mesh::from_triangles(&positions, &faces).unwrap();
//!
//! let mut spin = SpinTransform::new(mesh, ConjugateGradient::default(), SpinOptions::default());
//! spin.rho_mut()[0] = 0.5;
//! spin.update_deformation().unwrap();
//!
//! let result = spin.mesh().deformed_positions();
//! assert_eq!(result.len(), 6);
//! ```
//!
//! # References
//!
//! - Crane, K., Pinkall, U., & Schröder, P. (2011). "Spin transformations
//!   of discrete surfaces." ACM SIGGRAPH.

mod assembly;

pub use assembly::{build_divergence, build_laplacian, build_spin_energy};

use std::time::Instant;

use crate::error::{Result, SpinError};
use crate::io::tga::Bitmap;
use crate::math::Quaternion;
use crate::mesh::Mesh;
use crate::progress::Progress;
use crate::solver::{
    inverse_power_iteration_with_progress, solve_quaternion_system, ConjugateGradient,
    EigenOptions, LinearSolver,
};
use crate::sparse::QuaternionMatrix;

/// Options for [`SpinTransform`].
#[derive(Debug, Clone)]
pub struct SpinOptions {
    /// Options for the eigenvalue problem.
    pub eigen: EigenOptions,

    /// Whether to precondition the Poisson solve (default: true).
    pub precondition_poisson: bool,
}

impl Default for SpinOptions {
    fn default() -> Self {
        Self {
            eigen: EigenOptions::default(),
            precondition_poisson: true,
        }
    }
}

impl SpinOptions {
    /// Set the eigenvalue problem options.
    pub fn with_eigen(mut self, eigen: EigenOptions) -> Self {
        self.eigen = eigen;
        self
    }

    /// Set whether to precondition the Poisson solve.
    pub fn with_precondition_poisson(mut self, precondition: bool) -> Self {
        self.precondition_poisson = precondition;
        self
    }
}

/// Deformation state for one mesh.
///
/// Owns the mesh, the per-face curvature change `rho`, the per-vertex
/// similarity transformations `lambda` and divergence `omega`, and the two
/// operators. Both operators are rebuilt from scratch on every
/// [`update_deformation`](Self::update_deformation).
pub struct SpinTransform<S = ConjugateGradient> {
    mesh: Mesh,
    solver: S,
    options: SpinOptions,
    rho: Vec<f64>,
    lambda: Vec<Quaternion>,
    omega: Vec<Quaternion>,
    energy: QuaternionMatrix,
    laplacian: QuaternionMatrix,
}

impl SpinTransform<ConjugateGradient> {
    /// Create the deformation state for `mesh` with the default solver and
    /// options.
    pub fn from_mesh(mesh: Mesh) -> Self {
        Self::new(mesh, ConjugateGradient::default(), SpinOptions::default())
    }
}

impl<S: LinearSolver> SpinTransform<S> {
    /// Create the deformation state for `mesh`, with zero curvature change.
    pub fn new(mesh: Mesh, solver: S, options: SpinOptions) -> Self {
        let nv = mesh.num_vertices();
        let nf = mesh.num_faces();
        Self {
            mesh,
            solver,
            options,
            rho: vec![0.0; nf],
            lambda: vec![Quaternion::ZERO; nv],
            omega: vec![Quaternion::ZERO; nv],
            energy: QuaternionMatrix::new(nv, nv),
            laplacian: QuaternionMatrix::new(nv, nv),
        }
    }

    /// The mesh, including the current deformed vertices.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Give back the mesh.
    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }

    /// The options in use.
    pub fn options(&self) -> &SpinOptions {
        &self.options
    }

    /// Curvature change per face.
    pub fn rho(&self) -> &[f64] {
        &self.rho
    }

    /// Mutable curvature change per face.
    pub fn rho_mut(&mut self) -> &mut [f64] {
        &mut self.rho
    }

    /// Replace the curvature change.
    pub fn set_rho(&mut self, rho: Vec<f64>) -> Result<()> {
        if rho.len() != self.mesh.num_faces() {
            return Err(SpinError::dimension("rho", self.mesh.num_faces(), rho.len()));
        }
        self.rho = rho;
        Ok(())
    }

    /// Per-vertex similarity transformations from the last eigensolve.
    pub fn lambda(&self) -> &[Quaternion] {
        &self.lambda
    }

    /// Divergence field from the last Poisson assembly.
    pub fn omega(&self) -> &[Quaternion] {
        &self.omega
    }

    /// Spin energy operator from the last assembly.
    pub fn energy(&self) -> &QuaternionMatrix {
        &self.energy
    }

    /// Cotangent Laplacian from the last assembly.
    pub fn laplacian(&self) -> &QuaternionMatrix {
        &self.laplacian
    }

    /// Set the curvature change from a grayscale image.
    ///
    /// The image covers `[0,1] x [0,1]` in texture space. Each face takes the
    /// average of the samples at its corners' texture coordinates, and gray
    /// values `[0,1]` map linearly to `[-scale, scale]`.
    pub fn set_curvature_change(&mut self, image: &Bitmap, scale: f64) {
        let w = image.width() as f64;
        let h = image.height() as f64;

        for (rho, face) in self.rho.iter_mut().zip(self.mesh.faces()) {
            let average: f64 = face
                .uv
                .iter()
                .map(|uv| image.sample(uv.x * w, uv.y * h) / 3.0)
                .sum();
            *rho = (2.0 * (average - 0.5)) * scale;
        }
    }

    /// Assemble the spin energy operator for the current `rho`.
    pub fn build_eigenvalue_problem(&mut self) -> Result<()> {
        build_spin_energy(&self.mesh, &self.rho, &mut self.energy)
    }

    /// Assemble the Laplacian and the divergence for the current `lambda`.
    pub fn build_poisson_problem(&mut self) -> Result<()> {
        build_laplacian(&self.mesh, &mut self.laplacian);
        build_divergence(&self.mesh, &self.lambda, &mut self.omega)
    }

    /// Run a full deformation for the current `rho`.
    ///
    /// Solves the eigenvalue problem for `lambda`, then the Poisson problem
    /// for the new vertex positions, and normalizes the result.
    pub fn update_deformation(&mut self) -> Result<()> {
        self.update_deformation_with_progress(&Progress::none())
    }

    /// Like [`update_deformation`](Self::update_deformation), with progress
    /// reporting.
    pub fn update_deformation_with_progress(&mut self, progress: &Progress) -> Result<()> {
        const STEPS: usize = 4;
        let start = Instant::now();

        progress.report(0, STEPS, "Building spin energy");
        self.build_eigenvalue_problem()?;

        progress.report(1, STEPS, "Solving eigenvalue problem");
        let eigen_progress = Progress::new(|current, total, _| {
            progress.report_sub(current, total, 1, STEPS, "Solving eigenvalue problem")
        });
        let eigenvalue = inverse_power_iteration_with_progress(
            &self.solver,
            &self.energy,
            &mut self.lambda,
            &self.options.eigen,
            &eigen_progress,
        )?;

        progress.report(2, STEPS, "Building Poisson problem");
        self.build_poisson_problem()?;

        progress.report(3, STEPS, "Solving Poisson problem");
        solve_quaternion_system(
            &self.solver,
            &self.laplacian,
            self.mesh.new_vertices_mut(),
            &self.omega,
            self.options.precondition_poisson,
        )?;
        self.mesh.normalize_solution();
        progress.report(STEPS, STEPS, "Done");

        log::info!(
            "deformed {} vertices, {} faces in {:.2?} (eigenvalue {:e})",
            self.mesh.num_vertices(),
            self.mesh.num_faces(),
            start.elapsed(),
            eigenvalue
        );
        Ok(())
    }

    /// Discard the deformation and restore the normalized original mesh.
    pub fn reset_deformation(&mut self) {
        self.mesh.reset_deformation();
    }
}
