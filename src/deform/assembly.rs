//! Per-face assembly of the spin energy, the cotangent Laplacian, and the
//! divergence of the transformed edge field.

use crate::error::{Result, SpinError};
use crate::math::{cotangent, remove_mean, Quaternion};
use crate::mesh::Mesh;
use crate::sparse::QuaternionMatrix;

/// Assemble the spin energy operator `E` into `e`.
///
/// For each face with area `A` and curvature change `ρ`, and edges
/// `e_i = p[(i+2)%3] - p[(i+1)%3]` opposite each corner, every ordered
/// corner pair (i, j) contributes
/// `-1/(4A)·e_i·e_j + ρ/6·(e_j - e_i) + A·ρ²/9`.
pub fn build_spin_energy(mesh: &Mesh, rho: &[f64], e: &mut QuaternionMatrix) -> Result<()> {
    if rho.len() != mesh.num_faces() {
        return Err(SpinError::dimension("rho", mesh.num_faces(), rho.len()));
    }

    let n = mesh.num_vertices();
    e.resize(n, n);

    for (k, face) in mesh.faces().iter().enumerate() {
        let area = mesh.area(k);
        let a = -1.0 / (4.0 * area);
        let b = rho[k] / 6.0;
        let c = area * rho[k] * rho[k] / 9.0;

        let vi = face.vertices;
        let edges: [Quaternion; 3] = std::array::from_fn(|i| {
            mesh.vertices()[vi[(i + 2) % 3]] - mesh.vertices()[vi[(i + 1) % 3]]
        });

        for i in 0..3 {
            for j in 0..3 {
                let value = a * edges[i] * edges[j] + b * (edges[j] - edges[i]) + c;
                e.accumulate(vi[i], vi[j], value);
            }
        }
    }

    log::debug!("spin energy: {}x{}, {} entries", n, n, e.nnz());
    Ok(())
}

/// Assemble the cotangent Laplacian into `l`.
///
/// Symmetric, positive semidefinite, with zero row sums.
pub fn build_laplacian(mesh: &Mesh, l: &mut QuaternionMatrix) {
    let n = mesh.num_vertices();
    l.resize(n, n);

    for face in mesh.faces() {
        for j in 0..3 {
            let k0 = face.vertices[j];
            let k1 = face.vertices[(j + 1) % 3];
            let k2 = face.vertices[(j + 2) % 3];

            // Angle at k0, across from edge (k1, k2)
            let u1 = mesh.position(k1) - mesh.position(k0);
            let u2 = mesh.position(k2) - mesh.position(k0);
            let w = Quaternion::from_real(cotangent(&u1, &u2) / 2.0);

            l.accumulate(k1, k2, -w);
            l.accumulate(k2, k1, -w);
            l.accumulate(k1, k1, w);
            l.accumulate(k2, k2, w);
        }
    }

    log::debug!("cotangent Laplacian: {}x{}, {} entries", n, n, l.nnz());
}

/// Assemble the divergence `omega` of the edge field transformed by the
/// per-vertex similarity transformations `lambda`.
///
/// Each edge is oriented from its smaller to its larger vertex index. Its
/// transformed vector blends `λ̄_a e λ_a`, `λ̄_a e λ_b`, `λ̄_b e λ_a`,
/// `λ̄_b e λ_b` with weights 1/3, 1/6, 1/6, 1/3. The result has its mean
/// removed.
pub fn build_divergence(mesh: &Mesh, lambda: &[Quaternion], omega: &mut [Quaternion]) -> Result<()> {
    let n = mesh.num_vertices();
    if lambda.len() != n {
        return Err(SpinError::dimension("lambda", n, lambda.len()));
    }
    if omega.len() != n {
        return Err(SpinError::dimension("omega", n, omega.len()));
    }

    omega.fill(Quaternion::ZERO);

    for face in mesh.faces() {
        let v = face.vertices;
        for j in 0..3 {
            let f0 = mesh.position(v[j]);
            let f1 = mesh.position(v[(j + 1) % 3]);
            let f2 = mesh.position(v[(j + 2) % 3]);

            let (mut a, mut b) = (v[(j + 1) % 3], v[(j + 2) % 3]);
            if a > b {
                std::mem::swap(&mut a, &mut b);
            }

            let (l1, l2) = (lambda[a], lambda[b]);
            let e = mesh.vertices()[b] - mesh.vertices()[a];
            let e_tilde = (1.0 / 3.0) * l1.conj() * e * l1
                + (1.0 / 6.0) * l1.conj() * e * l2
                + (1.0 / 6.0) * l2.conj() * e * l1
                + (1.0 / 3.0) * l2.conj() * e * l2;

            // Angle across from the edge
            let cot_alpha = cotangent(&(f1 - f0), &(f2 - f0));

            omega[a] -= cot_alpha * e_tilde / 2.0;
            omega[b] += cot_alpha * e_tilde / 2.0;
        }
    }

    remove_mean(omega);
    Ok(())
}

#[cfg(test)]
mod tests {
    use nalgebra::Point3;

    use super::*;
    use crate::mesh::fixtures::{icosphere, octahedron, unit_square};

    fn triangle(p1: [f64; 3], p2: [f64; 3]) -> Mesh {
        let positions = [
            Point3::origin(),
            Point3::from(p1),
            Point3::from(p2),
        ];
        Mesh::from_triangles(&positions, &[[0, 1, 2]]).unwrap()
    }

    fn assert_close(actual: Quaternion, expected: Quaternion) {
        assert!(
            (actual - expected).norm() < 1e-12,
            "got {}, expected {}",
            actual,
            expected
        );
    }

    #[test]
    fn test_laplacian_symmetric_with_zero_row_sums() {
        for mesh in [octahedron(), icosphere(1)] {
            let mut l = QuaternionMatrix::new(0, 0);
            build_laplacian(&mesh, &mut l);

            let n = mesh.num_vertices();
            for i in 0..n {
                let mut row_sum = Quaternion::ZERO;
                for j in 0..n {
                    assert_eq!(l.get(i, j), l.get(j, i));
                    row_sum += l.get(i, j);
                }
                assert!(row_sum.norm() < 1e-12, "row {} sums to {}", i, row_sum);
                assert!(l.get(i, i).re > 0.0);
            }
            // Entries are real
            assert!(l.iter().all(|(_, _, q)| q.im == crate::math::Vector::zeros()));
        }
    }

    #[test]
    fn test_laplacian_octahedron_weights() {
        // Every angle is 60 degrees, so each edge weight is 2 * cot(60°) / 2.
        let mesh = octahedron();
        let mut l = QuaternionMatrix::new(0, 0);
        build_laplacian(&mesh, &mut l);

        let w = 1.0 / 3.0_f64.sqrt();
        assert!((l.get(0, 2).re + w).abs() < 1e-12);
        assert!((l.get(0, 0).re - 4.0 * w).abs() < 1e-12);
        // Opposite vertices are not adjacent
        assert_eq!(l.get(0, 1), Quaternion::ZERO);
    }

    #[test]
    fn test_laplacian_rebuild_discards_previous_entries() {
        let mut l = QuaternionMatrix::new(0, 0);
        build_laplacian(&octahedron(), &mut l);
        let first = l.clone();
        build_laplacian(&octahedron(), &mut l);
        assert_eq!(l, first);
    }

    #[test]
    fn test_spin_energy_hermitian() {
        let mesh = icosphere(1);
        let rho: Vec<f64> = (0..mesh.num_faces()).map(|i| (i as f64 * 0.37).sin()).collect();

        let mut e = QuaternionMatrix::new(0, 0);
        build_spin_energy(&mesh, &rho, &mut e).unwrap();

        for (i, j, q) in e.iter() {
            assert!((q - e.get(j, i).conj()).norm() < 1e-12);
        }
    }

    #[test]
    fn test_spin_energy_kills_constants_without_curvature_change() {
        let mesh = octahedron();
        let rho = vec![0.0; mesh.num_faces()];

        let mut e = QuaternionMatrix::new(0, 0);
        build_spin_energy(&mesh, &rho, &mut e).unwrap();

        let constant = vec![Quaternion::new(0.3, -0.2, 0.5, 1.0); mesh.num_vertices()];
        for q in e.mul_vec(&constant) {
            assert!(q.norm() < 1e-12);
        }
    }

    #[test]
    fn test_spin_energy_single_triangle_entries() {
        // Area 1, edges e0 = (-2, 1, 0), e1 = (0, -1, 0), e2 = (2, 0, 0).
        // With rho = 0.6: a = -1/4, b = 0.1, c = 0.04.
        let mesh = triangle([2.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let mut e = QuaternionMatrix::new(0, 0);
        build_spin_energy(&mesh, &[0.6], &mut e).unwrap();

        assert_close(e.get(0, 0), Quaternion::from_real(1.29));
        assert_close(e.get(1, 1), Quaternion::from_real(0.29));
        assert_close(e.get(2, 2), Quaternion::from_real(1.04));
        assert_close(e.get(0, 1), Quaternion::new(-0.21, 0.2, -0.2, -0.5));
        assert_close(e.get(1, 0), Quaternion::new(-0.21, -0.2, 0.2, 0.5));
        assert_close(e.get(0, 2), Quaternion::new(-0.96, 0.4, -0.1, 0.5));
        assert_close(e.get(2, 0), Quaternion::new(-0.96, -0.4, 0.1, -0.5));
        assert_close(e.get(1, 2), Quaternion::new(0.04, 0.2, 0.1, -0.5));
        assert_close(e.get(2, 1), Quaternion::new(0.04, -0.2, -0.1, 0.5));
    }

    #[test]
    fn test_spin_energy_rho_length_checked() {
        let mesh = unit_square();
        let mut e = QuaternionMatrix::new(0, 0);
        let result = build_spin_energy(&mesh, &[0.0], &mut e);
        assert!(matches!(result, Err(SpinError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_divergence_of_identity_transform_is_laplacian_of_positions() {
        let mesh = icosphere(1);
        let n = mesh.num_vertices();
        let lambda = vec![Quaternion::ONE; n];
        let mut omega = vec![Quaternion::ZERO; n];
        build_divergence(&mesh, &lambda, &mut omega).unwrap();

        let mut l = QuaternionMatrix::new(0, 0);
        build_laplacian(&mesh, &mut l);
        let lp = l.mul_vec(mesh.vertices());

        for (o, expected) in omega.iter().zip(&lp) {
            assert!((*o - *expected).norm() < 1e-12);
            assert!(o.re.abs() < 1e-15);
        }

        let total: Quaternion = omega.iter().sum();
        assert!(total.norm() < 1e-12);
    }

    #[test]
    fn test_divergence_is_pure_for_general_transforms() {
        let mesh = octahedron();
        let lambda: Vec<Quaternion> = (0..mesh.num_vertices())
            .map(|i| {
                let t = i as f64;
                Quaternion::new(1.0 + 0.1 * t, 0.2 * t.sin(), -0.3, 0.1 * t)
            })
            .collect();
        let mut omega = vec![Quaternion::new(9.0, 9.0, 9.0, 9.0); mesh.num_vertices()];
        build_divergence(&mesh, &lambda, &mut omega).unwrap();

        for o in &omega {
            assert!(o.re.abs() < 1e-12);
        }
    }

    #[test]
    fn test_divergence_single_triangle_with_scalings() {
        // Right angle at vertex 0, so only edges (0, 1) and (0, 2) carry
        // weight, each with cot(45°) = 1. For real scalings s and t the
        // blended edge is e·(s² + st + t²)/3.
        let mesh = triangle([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let lambda = [
            Quaternion::from_real(1.0),
            Quaternion::from_real(2.0),
            Quaternion::from_real(3.0),
        ];
        let mut omega = vec![Quaternion::ZERO; 3];
        build_divergence(&mesh, &lambda, &mut omega).unwrap();

        assert_close(omega[0], Quaternion::new(0.0, -7.0 / 6.0, -13.0 / 6.0, 0.0));
        assert_close(omega[1], Quaternion::new(0.0, 7.0 / 6.0, 0.0, 0.0));
        assert_close(omega[2], Quaternion::new(0.0, 0.0, 13.0 / 6.0, 0.0));
    }

    #[test]
    fn test_divergence_single_triangle_with_rotation() {
        // Edge (0, 1) is i with lambda_0 = 1 and lambda_1 = k:
        // i/3 + (i k)/6 + (k̄ i)/6 + (k̄ i k)/3 = -j/3.
        // Edge (0, 2) is j and unchanged.
        let mesh = triangle([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let lambda = [Quaternion::ONE, Quaternion::new(0.0, 0.0, 0.0, 1.0), Quaternion::ONE];
        let mut omega = vec![Quaternion::ZERO; 3];
        build_divergence(&mesh, &lambda, &mut omega).unwrap();

        assert_close(omega[0], Quaternion::new(0.0, 0.0, -1.0 / 3.0, 0.0));
        assert_close(omega[1], Quaternion::new(0.0, 0.0, -1.0 / 6.0, 0.0));
        assert_close(omega[2], Quaternion::new(0.0, 0.0, 0.5, 0.0));
    }
}
