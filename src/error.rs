//! Error types for spinxform.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`SpinError`].
pub type Result<T> = std::result::Result<T, SpinError>;

/// Errors that can occur while loading, deforming, or saving a mesh.
#[derive(Error, Debug)]
pub enum SpinError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face references an invalid texture coordinate index.
    #[error("face {face} references invalid texture coordinate index {texcoord}")]
    InvalidTexCoordIndex {
        /// The face index.
        face: usize,
        /// The invalid texture coordinate index.
        texcoord: usize,
    },

    /// A face has duplicate vertex indices (degenerate triangle).
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed line in a text mesh file.
    #[error("{path}:{line}: {message}")]
    Parse {
        /// The file path.
        path: PathBuf,
        /// The 1-based line number.
        line: usize,
        /// Error message.
        message: String,
    },

    /// Error reading a mesh or bitmap file.
    #[error("failed to load {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error writing a mesh file.
    #[error("failed to save {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// The bitmap is not an uncompressed 8-bit grayscale image.
    #[error("unsupported image {path}: {message}")]
    UnsupportedImage {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Two quantities that must agree in size do not.
    #[error("dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// What was being compared.
        what: &'static str,
        /// The expected size.
        expected: usize,
        /// The actual size.
        actual: usize,
    },

    /// Linear solver failed to converge.
    #[error("solver failed to converge after {iterations} iterations (relative residual {residual:e})")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: usize,
        /// Relative residual norm when the solver stopped.
        residual: f64,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl SpinError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        SpinError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    pub(crate) fn dimension(what: &'static str, expected: usize, actual: usize) -> Self {
        SpinError::DimensionMismatch {
            what,
            expected,
            actual,
        }
    }
}
