//! Field axioms on fuzzer-chosen elements and regions.

#![no_main]

use galois::{FieldType, build_field};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
  let Some((&head, rest)) = data.split_first() else {
    return;
  };
  let Some((&a, rest)) = rest.split_first() else {
    return;
  };
  let Some((&b, region)) = rest.split_first() else {
    return;
  };
  let field = FieldType::ALL[usize::from(head) % FieldType::ALL.len()];
  let Ok(gf) = build_field(field, None) else {
    return;
  };
  let (a, b) = (a & gf.mask(), b & gf.mask());

  assert_eq!(gf.multiply(a, b), gf.multiply(b, a), "{field} commutativity");
  if a != 0 {
    assert_eq!(gf.multiply(a, gf.invert(a)), 1, "{field} inverse of {a}");
    assert_eq!(gf.multiply(gf.divide(b, a), a), b, "{field} division");
  }

  // (a + b)·r == a·r + b·r over the region.
  let len = region.len();
  let mut lhs = vec![0u8; len];
  gf.multiply_add_region(&mut lhs, region, gf.add(a, b), len);
  let mut rhs = vec![0u8; len];
  gf
    .linear_combination(&mut rhs, &[region, region], &[a, b], len)
    .expect("one coefficient per source");
  assert_eq!(lhs, rhs, "{field} distributivity a={a} b={b} len={len}");

  if a != 0 {
    let mut scaled = region.to_vec();
    gf.multiply_region(&mut scaled, a, len);
    gf.divide_region(&mut scaled, a, len);
    assert_eq!(scaled, region, "{field} region division a={a}");
  }
});
