//! Mesh and bitmap file I/O.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | Texture coordinates on load |
//! | STL | `.stl` | ✓ | ✓ | Binary and ASCII, positions only |
//! | PLY | `.ply` | ✓ | ✓ | Positions only |
//! | Truevision TGA | `.tga` | ✓ | ✗ | 8-bit grayscale curvature maps |
//!
//! Meshes are saved with their deformed vertex positions.
//!
//! # Usage
//!
//! ```no_run
//! use spinxform::io::{load, save};
//! use spinxform::io::tga::Bitmap;
//!
//! let mesh = load("sphere.obj").unwrap();
//! let bitmap = Bitmap::load("bumpy.tga").unwrap();
//!
//! save(&mesh, "output.ply").unwrap();
//! ```

pub mod obj;
pub mod ply;
pub mod stl;
pub mod tga;

use std::fs::File;
use std::path::Path;

use crate::error::{Result, SpinError};
use crate::mesh::Mesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// STL (stereolithography) format.
    Stl,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "stl" => Some(Format::Stl),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }

    fn of(path: &Path) -> Result<Format> {
        Format::from_path(path).ok_or_else(|| SpinError::UnsupportedFormat {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
                .to_string(),
        })
    }
}

/// Load a mesh, choosing the format from the file extension.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let mesh = match Format::of(path)? {
        Format::Obj => obj::load(path),
        Format::Stl => stl::load(path),
        Format::Ply => ply::load(path),
    }?;

    log::info!(
        "loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(mesh)
}

/// Save the deformed mesh, choosing the format from the file extension.
pub fn save<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match Format::of(path)? {
        Format::Obj => obj::save(mesh, path),
        Format::Stl => stl::save(mesh, path),
        Format::Ply => ply::save(mesh, path),
    }
}

/// Open `path` for reading, naming the file in the error.
pub(crate) fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| SpinError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Create `path` for writing, naming the file in the error.
pub(crate) fn create(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| SpinError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
