//! STL (stereolithography) format support.
//!
//! STL stores positions per triangle; `stl_io` merges identical corners into
//! shared vertices on load. Faces carry zero texture coordinates. Saving
//! writes binary STL with the deformed positions.

use std::io::BufWriter;
use std::path::Path;

use nalgebra::Point3;

use crate::error::{Result, SpinError};
use crate::mesh::Mesh;

/// Load a mesh from an STL file (binary or ASCII).
///
/// Triangles that collapse to fewer than three distinct vertices are
/// skipped.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let mut file = super::open(path)?;

    let stl = stl_io::read_stl(&mut file).map_err(|e| SpinError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let positions: Vec<Point3<f64>> = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();

    let triangles: Vec<[usize; 3]> = stl
        .faces
        .iter()
        .map(|tri| tri.vertices)
        .filter(|[a, b, c]| a != b && b != c && a != c)
        .collect();

    if triangles.len() < stl.faces.len() {
        log::warn!(
            "{}: skipped {} degenerate triangles",
            path.display(),
            stl.faces.len() - triangles.len()
        );
    }

    Mesh::from_triangles(&positions, &triangles)
}

/// Save the deformed mesh to a binary STL file.
pub fn save<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = super::create(path)?;
    let mut writer = BufWriter::new(file);

    let vertex = |i: usize| {
        let p = mesh.new_vertices()[i].im;
        stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32])
    };

    let triangles: Vec<stl_io::Triangle> = mesh
        .faces()
        .iter()
        .map(|face| {
            let [a, b, c] = face.vertices.map(|i| mesh.new_vertices()[i].im);
            let n = (b - a).cross(&(c - a)).try_normalize(0.0).unwrap_or_default();

            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: face.vertices.map(vertex),
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| SpinError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}
