//! Region multiply throughput, per algorithm.
//!
//! Run: `cargo bench -p galois -- region`
//!
//! Every algorithm this machine can run is measured, plus the descriptor
//! `build_field` selects automatically, so tier preference can be checked
//! against measured numbers.

use core::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use galois::{AlignedBuffer, FieldType, GaloisField, build_field, list_algorithms};

const CASES: &[(&str, usize)] = &[("s", 256), ("m", 4 * 1024), ("l", 64 * 1024), ("xl", 1024 * 1024)];

/// Constant with every symbol slot nonzero and not one.
const fn constant_for(field: FieldType) -> u8 {
  match field {
    FieldType::Gf2 => 1,
    FieldType::Gf4 => 2,
    FieldType::Gf16 => 0x0B,
    FieldType::Gf256 => 0xA7,
  }
}

fn make_data(len: usize) -> AlignedBuffer {
  let data: Vec<u8> = (0..len)
    .map(|i| (i as u8).wrapping_mul(31).wrapping_add((i >> 8) as u8))
    .collect();
  AlignedBuffer::from_slice(&data)
}

fn descriptors(field: FieldType) -> Vec<(String, GaloisField)> {
  let mut all = Vec::new();
  if let Ok(gf) = build_field(field, None) {
    all.push((format!("auto/{}", gf.algorithm()), gf));
  }
  for desc in list_algorithms(field).into_iter().filter(|d| d.available) {
    if let Ok(gf) = GaloisField::with_algorithm(field, desc.id) {
      all.push((desc.name.to_string(), gf));
    }
  }
  all
}

fn bench_multiply_add(c: &mut Criterion) {
  for field in FieldType::ALL {
    let constant = constant_for(field);
    let mut group = c.benchmark_group(format!("region/madd/{}", field.name()));
    for &(label, size) in CASES {
      let src = make_data(size);
      let mut dst = AlignedBuffer::new(size);
      group.throughput(Throughput::Bytes(size as u64));
      for (name, gf) in descriptors(field) {
        group.bench_function(BenchmarkId::new(name, label), |b| {
          b.iter(|| gf.multiply_add_region(&mut dst, black_box(&src), black_box(constant), size));
        });
      }
    }
    group.finish();
  }
}

fn bench_multiply(c: &mut Criterion) {
  for field in [FieldType::Gf16, FieldType::Gf256] {
    let constant = constant_for(field);
    let mut group = c.benchmark_group(format!("region/mul/{}", field.name()));
    for &(label, size) in CASES {
      let mut region = make_data(size);
      group.throughput(Throughput::Bytes(size as u64));
      for (name, gf) in descriptors(field) {
        group.bench_function(BenchmarkId::new(name, label), |b| {
          b.iter(|| gf.multiply_region(black_box(&mut region), black_box(constant), size));
        });
      }
    }
    group.finish();
  }
}

criterion_group!(benches, bench_multiply_add, bench_multiply);
criterion_main!(benches);
