//! Cross-check of kernels against the reference kernel.
//!
//! For every constant from `size - 1` down to `0` and every length in
//! [`LENGTHS`], both region operations run on identical random inputs through
//! the reference kernel and through the candidate; the outputs must match
//! byte for byte. Each run is repeated with the buffers starting one byte
//! past an aligned boundary, so vector kernels see both aligned and
//! misaligned data and every tail path.
//!
//! Inputs come from a `ChaCha8Rng` seeded by [`seed_for`], so any reported
//! mismatch can be replayed exactly.

use alloc::vec::Vec;

use backend::dispatch::TierUnavailable;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
  algorithm::{Algorithm, AlgorithmId, reference_for, registry},
  buffer::AlignedBuffer,
  error::{Error, MismatchReport, Operation},
  field::FieldType,
};

/// Region lengths exercised per constant: one byte, shorter than any
/// vector, and several vector strides with a ragged remainder.
pub const LENGTHS: [usize; 4] = [1, 31, 83, 269];

/// Start offsets from a 64-byte boundary.
const OFFSETS: [usize; 2] = [0, 1];

/// Seed of the inputs for one (field, algorithm, constant, length) run.
#[must_use]
pub fn seed_for(field: FieldType, algorithm: AlgorithmId, constant: u8, length: usize) -> u64 {
  let mut seed = 0x6766_6b69_745f_7374_u64;
  for word in [
    u64::from(field.exponent()),
    algorithm as u64,
    u64::from(constant),
    length as u64,
  ] {
    seed = (seed ^ word).wrapping_mul(0x0000_0100_0000_01B3);
  }
  seed
}

/// Verify one registered algorithm against the reference kernel.
///
/// # Errors
///
/// - [`Error::UnknownAlgorithm`] if `field` does not register `algorithm`.
/// - [`Error::UnsupportedCapability`] if this machine cannot run it.
/// - [`Error::SelfTestMismatch`] on the first output that differs from the
///   reference.
pub fn self_test(field: FieldType, algorithm: AlgorithmId) -> Result<(), Error> {
  let candidate = Algorithm::lookup(field, algorithm)?;
  let caps = platform::caps();
  if !candidate.is_available(caps) {
    return Err(Error::UnsupportedCapability {
      field,
      tier: algorithm.tier(),
      reason: TierUnavailable::MissingCaps(algorithm.requires().difference(caps)),
    });
  }
  verify(candidate)
}

/// Verify every algorithm of `field` this machine can run.
///
/// Returns the ids that were verified.
///
/// # Errors
///
/// The first [`Error::SelfTestMismatch`].
pub fn self_test_all(field: FieldType) -> Result<Vec<AlgorithmId>, Error> {
  let caps = platform::caps();
  let mut verified = Vec::new();
  for candidate in registry(field).iter().filter(|a| a.is_available(caps)) {
    verify(candidate)?;
    verified.push(candidate.id);
  }
  tracing::debug!(field = %field, count = verified.len(), "self-test passed");
  Ok(verified)
}

/// [`self_test_all`] for every field.
///
/// # Errors
///
/// The first [`Error::SelfTestMismatch`].
pub fn self_test_everything() -> Result<Vec<(FieldType, AlgorithmId)>, Error> {
  let mut verified = Vec::new();
  for field in FieldType::ALL {
    verified.extend(self_test_all(field)?.into_iter().map(|id| (field, id)));
  }
  Ok(verified)
}

fn verify(candidate: &Algorithm) -> Result<(), Error> {
  let field = candidate.field;
  let reference = reference_for(field);

  for constant in (0..=field.mask()).rev() {
    for length in LENGTHS {
      let seed = seed_for(field, candidate.id, constant, length);
      let mut rng = ChaCha8Rng::seed_from_u64(seed);
      let mut src = AlignedBuffer::new(length);
      let mut acc = AlignedBuffer::new(length);
      rng.fill_bytes(&mut src);
      rng.fill_bytes(&mut acc);

      let report = |operation, offset, expected, actual| MismatchReport {
        field,
        algorithm: candidate.id,
        operation,
        constant,
        length,
        offset,
        expected,
        actual,
        seed,
      };

      let mut expected = src.clone();
      (reference.mul)(&mut expected, constant);
      let mut expected_acc = acc.clone();
      (reference.madd)(&mut expected_acc, &src, constant);

      for shift in OFFSETS {
        let mut actual = AlignedBuffer::new(length + shift);
        actual[shift..].copy_from_slice(&src);
        (candidate.mul)(&mut actual[shift..], constant);
        if let Some((offset, e, a)) = first_difference(&expected, &actual[shift..]) {
          return Err(mismatch(report(Operation::Multiply, offset, e, a)));
        }

        let mut shifted_src = AlignedBuffer::new(length + shift);
        shifted_src[shift..].copy_from_slice(&src);
        let mut actual = AlignedBuffer::new(length + shift);
        actual[shift..].copy_from_slice(&acc);
        (candidate.madd)(&mut actual[shift..], &shifted_src[shift..], constant);
        if let Some((offset, e, a)) = first_difference(&expected_acc, &actual[shift..]) {
          return Err(mismatch(report(Operation::MultiplyAdd, offset, e, a)));
        }
      }
    }
  }

  tracing::debug!(field = %field, algorithm = %candidate.id, "self-test passed");
  Ok(())
}

fn first_difference(expected: &[u8], actual: &[u8]) -> Option<(usize, u8, u8)> {
  expected
    .iter()
    .zip(actual)
    .position(|(e, a)| e != a)
    .and_then(|i| Some((i, *expected.get(i)?, *actual.get(i)?)))
}

fn mismatch(report: MismatchReport) -> Error {
  tracing::error!(
    field = %report.field,
    algorithm = %report.algorithm,
    operation = %report.operation,
    constant = report.constant,
    length = report.length,
    offset = report.offset,
    expected = report.expected,
    actual = report.actual,
    seed = report.seed,
    "kernel disagrees with reference"
  );
  Error::SelfTestMismatch(report)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::kernels::{MaddFn, MulFn};

  #[test]
  fn seeds_differ_per_input() {
    let a = seed_for(FieldType::Gf16, AlgorithmId::ImulGpr64, 3, 31);
    assert_ne!(a, seed_for(FieldType::Gf256, AlgorithmId::ImulGpr64, 3, 31));
    assert_ne!(a, seed_for(FieldType::Gf16, AlgorithmId::ImulGpr32, 3, 31));
    assert_ne!(a, seed_for(FieldType::Gf16, AlgorithmId::ImulGpr64, 4, 31));
    assert_ne!(a, seed_for(FieldType::Gf16, AlgorithmId::ImulGpr64, 3, 83));
    assert_eq!(a, seed_for(FieldType::Gf16, AlgorithmId::ImulGpr64, 3, 31));
  }

  #[test]
  fn portable_kernels_pass() {
    for field in FieldType::ALL {
      for id in [AlgorithmId::Reference, AlgorithmId::ImulGpr64, AlgorithmId::XorGpr64] {
        if Algorithm::lookup(field, id).is_ok() {
          self_test(field, id).unwrap();
        }
      }
    }
  }

  fn broken_mul(region: &mut [u8], constant: u8) {
    crate::kernels::reference::mul::<crate::field::Gf16>(region, constant);
    if let Some(last) = region.last_mut() {
      *last ^= u8::from(constant == 9);
    }
  }

  #[test]
  fn mismatch_is_reported_with_inputs() {
    let broken = Algorithm {
      id: AlgorithmId::ImulScalar,
      field: FieldType::Gf16,
      mul: broken_mul as MulFn,
      madd: crate::kernels::reference::madd::<crate::field::Gf16> as MaddFn,
    };
    let Err(Error::SelfTestMismatch(report)) = verify(&broken) else {
      panic!("broken kernel passed self-test");
    };
    assert_eq!(report.field, FieldType::Gf16);
    assert_eq!(report.operation, Operation::Multiply);
    assert_eq!(report.constant, 9);
    assert_eq!(report.length, 1);
    assert_eq!(report.offset, 0);
    assert_eq!(report.expected ^ report.actual, 1);
  }

  #[test]
  fn foreign_algorithm_is_unknown() {
    #[cfg(target_arch = "x86_64")]
    let foreign = AlgorithmId::ShuffleNeon;
    #[cfg(not(target_arch = "x86_64"))]
    let foreign = AlgorithmId::ShuffleAvx2;
    assert!(matches!(
      self_test(FieldType::Gf256, foreign),
      Err(Error::UnknownAlgorithm { .. })
    ));
  }
}
