//! Benchmarks for operator assembly and the full deformation.

use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::{Point3, Vector2};
use spinxform::deform::{build_laplacian, build_spin_energy};
use spinxform::prelude::*;

/// An n x n grid over the unit square with matching texture coordinates.
fn create_grid_mesh(n: usize) -> Mesh {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64 / n as f64, j as f64 / n as f64, 0.0));
        }
    }

    let uv = |v: usize| Vector2::new(vertices[v].x, vertices[v].y);
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push(Face::with_uv([v00, v10, v11], [uv(v00), uv(v10), uv(v11)]));
            faces.push(Face::with_uv([v00, v11, v01], [uv(v00), uv(v11), uv(v01)]));
        }
    }

    Mesh::new(&vertices, faces).unwrap()
}

/// A radial bump: white in the middle, black at the border.
fn create_bump_bitmap(size: usize) -> Bitmap {
    let c = (size - 1) as f64 / 2.0;
    let pixels = (0..size * size)
        .map(|i| {
            let (x, y) = ((i % size) as f64 - c, (i / size) as f64 - c);
            (1.0 - (x * x + y * y).sqrt() / c).clamp(0.0, 1.0)
        })
        .collect();
    Bitmap::from_pixels(size, size, pixels).unwrap()
}

fn bench_assembly(c: &mut Criterion) {
    let mesh = create_grid_mesh(50);
    let rho = vec![0.5; mesh.num_faces()];

    c.bench_function("build_spin_energy_50x50", |b| {
        let mut e = QuaternionMatrix::new(0, 0);
        b.iter(|| build_spin_energy(&mesh, &rho, &mut e).unwrap());
    });

    c.bench_function("build_laplacian_50x50", |b| {
        let mut l = QuaternionMatrix::new(0, 0);
        b.iter(|| build_laplacian(&mesh, &mut l));
    });

    let mut l = QuaternionMatrix::new(0, 0);
    build_laplacian(&mesh, &mut l);
    c.bench_function("to_real_coo_50x50", |b| b.iter(|| l.to_real_coo()));
}

fn bench_deformation(c: &mut Criterion) {
    let mesh = create_grid_mesh(20);
    let bitmap = create_bump_bitmap(64);

    let mut group = c.benchmark_group("update_deformation_20x20");
    group.sample_size(10);
    for (name, parallel) in [("parallel", true), ("sequential", false)] {
        group.bench_function(name, |b| {
            let solver = ConjugateGradient::default().with_parallel(parallel);
            let mut spin = SpinTransform::new(mesh.clone(), solver, SpinOptions::default());
            spin.set_curvature_change(&bitmap, 5.0);
            b.iter(|| spin.update_deformation().unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_assembly, bench_deformation);
criterion_main!(benches);
