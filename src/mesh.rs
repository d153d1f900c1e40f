//! Triangle meshes with an original and a deformed vertex set.
//!
//! Positions are stored as pure-imaginary [`Quaternion`]s so that edge
//! vectors can be transformed directly by quaternion products. The original
//! `vertices` never change after construction; deformations write into
//! `new_vertices`.

use nalgebra::{Point3, Vector2};

use crate::error::{Result, SpinError};
use crate::math::{remove_mean, Quaternion, Vector};

/// A triangle: three vertex indices and a texture coordinate per corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Vertex indices, counter-clockwise.
    pub vertices: [usize; 3],
    /// Texture coordinate of each corner.
    pub uv: [Vector2<f64>; 3],
}

impl Face {
    /// Create a face with zero texture coordinates.
    pub fn new(vertices: [usize; 3]) -> Self {
        Self {
            vertices,
            uv: [Vector2::zeros(); 3],
        }
    }

    /// Create a face with per-corner texture coordinates.
    pub fn with_uv(vertices: [usize; 3], uv: [Vector2<f64>; 3]) -> Self {
        Self { vertices, uv }
    }
}

/// A triangle mesh being deformed.
///
/// # Example
///
/// ```
/// use spinxform::mesh::Mesh;
/// use nalgebra::Point3;
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh = Mesh::from_triangles(&positions, &[[0, 1, 2]]).unwrap();
///
/// assert_eq!(mesh.num_vertices(), 3);
/// assert!((mesh.area(0) - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Mesh {
    faces: Vec<Face>,
    vertices: Vec<Quaternion>,
    new_vertices: Vec<Quaternion>,
}

impl Mesh {
    /// Build a mesh from vertex positions and faces.
    ///
    /// `new_vertices` starts as the normalized copy of the input (see
    /// [`reset_deformation`](Self::reset_deformation)).
    ///
    /// # Errors
    ///
    /// - [`SpinError::EmptyMesh`] if there are no faces
    /// - [`SpinError::InvalidVertexIndex`] if a face index is out of range
    /// - [`SpinError::DegenerateFace`] if a face repeats a vertex
    pub fn new(positions: &[Point3<f64>], faces: Vec<Face>) -> Result<Self> {
        if faces.is_empty() {
            return Err(SpinError::EmptyMesh);
        }

        for (fi, face) in faces.iter().enumerate() {
            let [a, b, c] = face.vertices;
            for vi in [a, b, c] {
                if vi >= positions.len() {
                    return Err(SpinError::InvalidVertexIndex {
                        face: fi,
                        vertex: vi,
                    });
                }
            }
            if a == b || b == c || a == c {
                return Err(SpinError::DegenerateFace { face: fi });
            }
        }

        let vertices: Vec<Quaternion> = positions
            .iter()
            .map(|p| Quaternion::from_vector(p.coords))
            .collect();

        let mut mesh = Self {
            faces,
            new_vertices: vertices.clone(),
            vertices,
        };
        mesh.normalize_solution();
        Ok(mesh)
    }

    /// Build a mesh from positions and vertex-index triangles (no texture
    /// coordinates).
    pub fn from_triangles(positions: &[Point3<f64>], triangles: &[[usize; 3]]) -> Result<Self> {
        Self::new(positions, triangles.iter().copied().map(Face::new).collect())
    }

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// All faces.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Original vertex positions as pure-imaginary quaternions.
    pub fn vertices(&self) -> &[Quaternion] {
        &self.vertices
    }

    /// Deformed vertex positions as pure-imaginary quaternions.
    pub fn new_vertices(&self) -> &[Quaternion] {
        &self.new_vertices
    }

    pub(crate) fn new_vertices_mut(&mut self) -> &mut [Quaternion] {
        &mut self.new_vertices
    }

    /// Original position of vertex `i`.
    #[inline]
    pub fn position(&self, i: usize) -> Vector {
        self.vertices[i].im
    }

    /// Original corner positions of face `i`.
    #[inline]
    pub fn face_positions(&self, i: usize) -> [Vector; 3] {
        self.faces[i].vertices.map(|v| self.position(v))
    }

    /// Area of face `i` in the original (undeformed) mesh.
    pub fn area(&self, i: usize) -> f64 {
        let [p1, p2, p3] = self.face_positions(i);
        0.5 * (p2 - p1).cross(&(p3 - p1)).norm()
    }

    /// Total area of the original mesh.
    pub fn total_area(&self) -> f64 {
        (0..self.num_faces()).map(|i| self.area(i)).sum()
    }

    /// Deformed positions as points.
    pub fn deformed_positions(&self) -> Vec<Point3<f64>> {
        self.new_vertices.iter().map(|q| Point3::from(q.im)).collect()
    }

    /// Original positions as points.
    pub fn original_positions(&self) -> Vec<Point3<f64>> {
        self.vertices.iter().map(|q| Point3::from(q.im)).collect()
    }

    /// Discard any deformation: copy the original vertices into
    /// `new_vertices` and normalize them.
    pub fn reset_deformation(&mut self) {
        self.new_vertices.copy_from_slice(&self.vertices);
        self.normalize_solution();
    }

    /// Center `new_vertices` at the origin and scale them so the farthest
    /// vertex lies at unit distance.
    ///
    /// Fixes translation and scale but not rotation. A mesh whose vertices
    /// all coincide is only recentered.
    pub fn normalize_solution(&mut self) {
        remove_mean(&mut self.new_vertices);

        let r = self
            .new_vertices
            .iter()
            .map(Quaternion::norm_squared)
            .fold(0.0, f64::max)
            .sqrt();
        if r > 0.0 {
            for v in &mut self.new_vertices {
                *v /= r;
            }
        }
    }
}
