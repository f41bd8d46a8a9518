//! Benchmarks for header parsing and body decoding with synthetic
//! binary little-endian meshes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::io::Cursor;

/// Build a binary little-endian file: a grid of vertices with normals
/// (skipped by the loader) and a mix of triangle and quad faces.
fn generate_binary_ply(vertex_count: usize, face_count: usize) -> Vec<u8> {
    let header = format!(
        "ply\nformat binary_little_endian 1.0\n\
comment synthetic benchmark mesh\n\
element vertex {vertex_count}\n\
property float x\nproperty float y\nproperty float z\n\
property float nx\nproperty float ny\nproperty float nz\n\
element face {face_count}\n\
property list uchar uint vertex_indices\n\
end_header\n",
    );

    let mut data = header.into_bytes();

    for i in 0..vertex_count {
        let base = i as f32 * 0.01;
        for v in [base, base + 1.0, base + 2.0, 0.0, 0.0, 1.0] {
            data.extend_from_slice(&v.to_le_bytes());
        }
    }

    for i in 0..face_count {
        let a = (i % vertex_count.max(1)) as u32;
        let b = ((i + 1) % vertex_count.max(1)) as u32;
        let c = ((i + 2) % vertex_count.max(1)) as u32;
        if i % 4 == 0 {
            let d = ((i + 3) % vertex_count.max(1)) as u32;
            data.push(4);
            for v in [a, b, c, d] {
                data.extend_from_slice(&v.to_le_bytes());
            }
        } else {
            data.push(3);
            for v in [a, b, c] {
                data.extend_from_slice(&v.to_le_bytes());
            }
        }
    }

    data
}

fn bench_header_parse(c: &mut Criterion) {
    let data = generate_binary_ply(5000, 5000);

    c.bench_function("header_parse", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new(black_box(&data));
            let header = stanford_ply::Header::parse(&mut cursor).unwrap();
            black_box(header);
        })
    });
}

fn bench_full_decode(c: &mut Criterion) {
    let sizes = [1000, 5000, 25000];

    let mut group = c.benchmark_group("full_decode");
    for size in sizes {
        let data = generate_binary_ply(size, size);

        group.throughput(criterion::Throughput::Bytes(data.len() as u64));
        group.bench_function(format!("{}_vertices", size), |b| {
            b.iter(|| {
                let (header, vertices, indices) =
                    stanford_ply::from_reader(Cursor::new(black_box(&data))).unwrap();
                black_box((header, vertices, indices));
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_header_parse, bench_full_decode);
criterion_main!(benches);
