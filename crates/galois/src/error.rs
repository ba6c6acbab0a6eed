//! Error types.

use alloc::string::String;
use core::fmt;

use backend::{KernelTier, dispatch::TierUnavailable};

use crate::{algorithm::AlgorithmId, field::FieldType};

/// Errors reported by descriptor construction and self-test.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
  /// An explicit tier was requested that this machine, or this field, cannot provide.
  #[error("{field}: tier {tier} unavailable: {reason}")]
  UnsupportedCapability {
    field: FieldType,
    tier: KernelTier,
    reason: TierUnavailable,
  },

  /// The value does not name one of GF(2), GF(4), GF(16), GF(256).
  #[error("invalid field type: {0}")]
  InvalidFieldType(String),

  /// A kernel disagreed with the reference kernel.
  #[error("self-test failed: {0}")]
  SelfTestMismatch(MismatchReport),

  /// The algorithm exists but is not registered for this field.
  #[error("{field}: no algorithm {algorithm}")]
  UnknownAlgorithm { field: FieldType, algorithm: AlgorithmId },

  /// The string names no algorithm.
  #[error("unknown algorithm name: {0}")]
  UnknownAlgorithmName(String),

  /// A linear combination was given a different number of sources and coefficients.
  #[error("linear combination: {sources} sources but {coefficients} coefficients")]
  CoefficientCountMismatch { sources: usize, coefficients: usize },
}

impl From<core::convert::Infallible> for Error {
  fn from(never: core::convert::Infallible) -> Self {
    match never {}
  }
}

/// Which region operation a self-test exercised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
  Multiply,
  MultiplyAdd,
}

impl Operation {
  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Multiply => "multiply",
      Self::MultiplyAdd => "multiply_add",
    }
  }
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// First disagreement between a kernel and the reference kernel.
///
/// `seed` reproduces the exact buffers: see [`crate::seed_for`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MismatchReport {
  pub field: FieldType,
  pub algorithm: AlgorithmId,
  pub operation: Operation,
  pub constant: u8,
  pub length: usize,
  /// Byte offset of the first differing byte.
  pub offset: usize,
  /// Reference kernel output at `offset`.
  pub expected: u8,
  /// Tested kernel output at `offset`.
  pub actual: u8,
  pub seed: u64,
}

impl fmt::Display for MismatchReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} {} {} constant={:#04x} length={} offset={} expected={:#04x} actual={:#04x} seed={:#018x}",
      self.field,
      self.algorithm,
      self.operation,
      self.constant,
      self.length,
      self.offset,
      self.expected,
      self.actual,
      self.seed
    )
  }
}
