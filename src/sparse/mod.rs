//! Sparse matrices.
//!
//! - [`QuaternionMatrix`]: quaternion-valued operators assembled from mesh
//!   geometry, expandable to real block form
//! - [`CooMatrix`]: row-sorted real coordinate matrices, the format handed to
//!   linear solvers
//! - [`CsrMatrix`]: compressed rows for fast matrix-vector products

mod coo;
mod csr;
mod quaternion_matrix;

pub use coo::CooMatrix;
pub use csr::CsrMatrix;
pub use quaternion_matrix::QuaternionMatrix;
