//! Wavefront OBJ format support.
//!
//! Reads vertex positions, texture coordinates, and faces. Polygons are fan
//! triangulated. Normals, groups, materials, and any other statements are
//! ignored. Writing emits the deformed vertex positions and the triangles.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point3, Vector2};

use crate::error::{Result, SpinError};
use crate::mesh::{Face, Mesh};

/// Load a mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use spinxform::io::obj;
///
/// let mesh = obj::load("sphere.obj").unwrap();
/// println!("{} faces", mesh.num_faces());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let file = super::open(path)?;
    read(BufReader::new(file), path)
}

/// Parse an OBJ mesh from a reader. `path` is only used in errors.
pub fn read<R: BufRead>(reader: R, path: &Path) -> Result<Mesh> {
    let mut positions: Vec<Point3<f64>> = Vec::new();
    let mut texcoords: Vec<Vector2<f64>> = Vec::new();
    let mut faces: Vec<Face> = Vec::new();

    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        let parse_error = |message: String| SpinError::Parse {
            path: path.to_path_buf(),
            line: line_index + 1,
            message,
        };

        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let [x, y, z] = parse_floats::<3>(&mut tokens).map_err(parse_error)?;
                positions.push(Point3::new(x, y, z));
            }
            Some("vt") => {
                let [u, v] = parse_floats::<2>(&mut tokens).map_err(parse_error)?;
                texcoords.push(Vector2::new(u, v));
            }
            Some("f") => {
                let mut corners = Vec::with_capacity(4);
                for token in tokens {
                    let corner = parse_corner(token, positions.len(), texcoords.len())
                        .map_err(&parse_error)?;
                    corners.push(corner);
                }
                if corners.len() < 3 {
                    return Err(parse_error(format!(
                        "face has {} corners, expected at least 3",
                        corners.len()
                    )));
                }

                for i in 1..corners.len() - 1 {
                    let tri = [corners[0], corners[i], corners[i + 1]];
                    let face = faces.len();
                    let mut uv = [Vector2::zeros(); 3];
                    for (slot, (_, t)) in uv.iter_mut().zip(tri) {
                        if let Some(t) = t {
                            *slot = *texcoords
                                .get(t)
                                .ok_or(SpinError::InvalidTexCoordIndex { face, texcoord: t })?;
                        }
                    }
                    faces.push(Face::with_uv(tri.map(|(v, _)| v), uv));
                }
            }
            _ => {}
        }
    }

    log::debug!(
        "parsed {}: {} vertices, {} texture coordinates, {} triangles",
        path.display(),
        positions.len(),
        texcoords.len(),
        faces.len()
    );
    Mesh::new(&positions, faces)
}

fn parse_floats<const N: usize>(
    tokens: &mut std::str::SplitWhitespace<'_>,
) -> std::result::Result<[f64; N], String> {
    let mut values = [0.0; N];
    for (i, value) in values.iter_mut().enumerate() {
        let token = tokens
            .next()
            .ok_or_else(|| format!("expected {} coordinates, found {}", N, i))?;
        *value = token
            .parse()
            .map_err(|_| format!("invalid number '{}'", token))?;
    }
    Ok(values)
}

/// Parse `v`, `v/t`, `v//n` or `v/t/n` into 0-based vertex and texture
/// coordinate indices.
fn parse_corner(
    token: &str,
    num_positions: usize,
    num_texcoords: usize,
) -> std::result::Result<(usize, Option<usize>), String> {
    let mut parts = token.split('/');
    let vertex = match parts.next() {
        Some(v) if !v.is_empty() => resolve_index(v, num_positions)?,
        _ => return Err(format!("missing vertex index in '{}'", token)),
    };
    let texcoord = match parts.next() {
        Some(t) if !t.is_empty() => Some(resolve_index(t, num_texcoords)?),
        _ => None,
    };
    Ok((vertex, texcoord))
}

/// Resolve a 1-based or negative (relative to `count`) OBJ index.
fn resolve_index(token: &str, count: usize) -> std::result::Result<usize, String> {
    let index: i64 = token
        .parse()
        .map_err(|_| format!("invalid index '{}'", token))?;
    if index > 0 {
        Ok(index as usize - 1)
    } else if index < 0 && index.unsigned_abs() as usize <= count {
        Ok(count - index.unsigned_abs() as usize)
    } else {
        Err(format!("index {} out of range", index))
    }
}

/// Save the deformed mesh to an OBJ file.
///
/// # Example
///
/// ```no_run
/// use spinxform::io::obj;
///
/// let mesh = obj::load("sphere.obj").unwrap();
/// obj::save(&mesh, "out.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let file = super::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write the deformed mesh as OBJ text.
pub fn write<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<()> {
    for v in mesh.new_vertices() {
        writeln!(writer, "v {} {} {}", v.im.x, v.im.y, v.im.z)?;
    }
    for face in mesh.faces() {
        let [a, b, c] = face.vertices;
        writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }
    Ok(())
}
