//! Differential fuzzing of every runnable kernel against the reference.

#![no_main]

use arbitrary::Arbitrary;
use galois::{AlgorithmId, FieldType, GaloisField, list_algorithms};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  field: u8,
  constant: u8,
  offset: u8,
  dst: Vec<u8>,
  src: Vec<u8>,
}

fuzz_target!(|input: Input| {
  let field = FieldType::ALL[usize::from(input.field) % FieldType::ALL.len()];
  let offset = usize::from(input.offset % 64);
  let len = input.dst.len().min(input.src.len()).saturating_sub(offset);
  let dst = input.dst.get(offset..offset + len).unwrap_or_default();
  let src = input.src.get(offset..offset + len).unwrap_or_default();

  let Ok(reference) = GaloisField::with_algorithm(field, AlgorithmId::Reference) else {
    return;
  };
  let mut expected_mul = dst.to_vec();
  reference.multiply_region(&mut expected_mul, input.constant, len);
  let mut expected_madd = dst.to_vec();
  reference.multiply_add_region(&mut expected_madd, src, input.constant, len);

  for desc in list_algorithms(field).into_iter().filter(|d| d.available) {
    let Ok(gf) = GaloisField::with_algorithm(field, desc.id) else {
      continue;
    };

    let mut actual = dst.to_vec();
    gf.multiply_region(&mut actual, input.constant, len);
    assert_eq!(
      actual, expected_mul,
      "{field} {} multiply mismatch: constant={:#04x}, len={len}",
      desc.name, input.constant
    );

    let mut actual = dst.to_vec();
    gf.multiply_add_region(&mut actual, src, input.constant, len);
    assert_eq!(
      actual, expected_madd,
      "{field} {} multiply-add mismatch: constant={:#04x}, len={len}",
      desc.name, input.constant
    );
  }
});
