extern crate std;

use alloc::vec::Vec;

use proptest::prelude::*;

use crate::{
  algorithm::{Algorithm, reference_for, registry},
  field::FieldType,
};

fn field_type() -> impl Strategy<Value = FieldType> {
  prop::sample::select(FieldType::ALL.to_vec())
}

fn available(field: FieldType) -> impl Iterator<Item = &'static Algorithm> {
  let caps = platform::caps();
  registry(field).iter().filter(move |a| a.is_available(caps))
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(256))]

  #[test]
  fn every_kernel_multiplies_like_reference(
    field in field_type(),
    constant in any::<u8>(),
    data in proptest::collection::vec(any::<u8>(), 0..=600),
    skip in 0usize..64,
  ) {
    let data = data.get(skip.min(data.len())..).unwrap_or(&[]);
    let mut expected = data.to_vec();
    (reference_for(field).mul)(&mut expected, constant);

    for algorithm in available(field) {
      let mut actual = data.to_vec();
      (algorithm.mul)(&mut actual, constant);
      prop_assert_eq!(&actual, &expected, "{} {}", field, algorithm.id);
    }
  }

  #[test]
  fn every_kernel_accumulates_like_reference(
    field in field_type(),
    constant in any::<u8>(),
    pair in proptest::collection::vec(any::<(u8, u8)>(), 0..=600),
  ) {
    let (src, acc): (Vec<u8>, Vec<u8>) = pair.into_iter().unzip();
    let mut expected = acc.clone();
    (reference_for(field).madd)(&mut expected, &src, constant);

    for algorithm in available(field) {
      let mut actual = acc.clone();
      (algorithm.madd)(&mut actual, &src, constant);
      prop_assert_eq!(&actual, &expected, "{} {}", field, algorithm.id);
    }
  }

  #[test]
  fn scalar_division_round_trips(field in field_type(), x in any::<u8>(), c in 1u8..=255) {
    let gf = crate::build_field(field, None).unwrap();
    let (x, c) = (x & gf.mask(), c & gf.mask());
    prop_assume!(c != 0);
    prop_assert_eq!(gf.multiply(gf.divide(x, c), c), x);
  }

  #[test]
  fn multiplication_distributes_over_addition(field in field_type(), a in any::<u8>(), b in any::<u8>(), c in any::<u8>()) {
    let gf = crate::build_field(field, None).unwrap();
    let (a, b, c) = (a & gf.mask(), b & gf.mask(), c & gf.mask());
    prop_assert_eq!(gf.multiply(gf.add(a, b), c), gf.add(gf.multiply(a, c), gf.multiply(b, c)));
  }

  #[test]
  fn region_division_undoes_multiplication(
    field in field_type(),
    c in 1u8..=255,
    data in proptest::collection::vec(any::<u8>(), 0..=300),
  ) {
    let gf = crate::build_field(field, None).unwrap();
    prop_assume!(c & gf.mask() != 0);
    let mut region = data.clone();
    gf.multiply_region(&mut region, c, data.len());
    gf.divide_region(&mut region, c, data.len());
    prop_assert_eq!(region, data);
  }
}
