//! # spinxform
//!
//! Conformal deformation of triangle meshes with discrete spin
//! transformations.
//!
//! A spin transformation changes the mean curvature half-density of a surface
//! by a prescribed amount `ρ` per face while keeping the map conformal. The
//! deformation is found in two sparse solves:
//!
//! 1. the smallest eigenvector `λ` of the spin energy operator `E(ρ)` gives a
//!    similarity transformation (rotation and scale) per vertex
//! 2. a Poisson problem `L x = ω` integrates the transformed edges into new
//!    vertex positions
//!
//! ## Features
//!
//! - **Quaternion algebra**: [`math::Quaternion`] with the full Hamilton product
//! - **Sparse quaternion matrices**: expanded to real block form for the solver
//! - **Pluggable linear solver**: [`solver::LinearSolver`], with a parallel
//!   conjugate gradient solver included
//! - **File formats**: OBJ, STL, PLY meshes and TGA curvature maps
//!
//! ## Quick Start
//!
//! ```no_run
//! use spinxform::prelude::*;
//!
//! let mesh = spinxform::io::load("sphere.obj").unwrap();
//! let bitmap = Bitmap::load("bumpy.tga").unwrap();
//!
//! let mut spin = SpinTransform::from_mesh(mesh);
//! spin.set_curvature_change(&bitmap, 5.0);
//! spin.update_deformation().unwrap();
//!
//! spinxform::io::save(spin.mesh(), "deformed.obj").unwrap();
//! ```
//!
//! ## Programmatic Curvature
//!
//! ```
//! use spinxform::prelude::*;
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
//! let mut spin = SpinTransform::from_mesh(mesh);
//! spin.set_rho(vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]).unwrap();
//! spin.update_deformation().unwrap();
//!
//! // The result is centered with its farthest vertex at unit distance
//! let max = spin
//!     .mesh()
//!     .new_vertices()
//!     .iter()
//!     .map(|q| q.norm())
//!     .fold(0.0, f64::max);
//! assert!((max - 1.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod deform;
pub mod error;
pub mod io;
pub mod math;
pub mod mesh;
pub mod progress;
pub mod solver;
pub mod sparse;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use spinxform::prelude::*;
/// ```
pub mod prelude {
    pub use crate::deform::{SpinOptions, SpinTransform};
    pub use crate::error::{Result, SpinError};
    pub use crate::io::tga::Bitmap;
    pub use crate::math::Quaternion;
    pub use crate::mesh::{Face, Mesh};
    pub use crate::progress::Progress;
    pub use crate::solver::{ConjugateGradient, EigenOptions, LinearSolver};
    pub use crate::sparse::QuaternionMatrix;
}

// Re-export nalgebra types for convenience
pub use nalgebra;
