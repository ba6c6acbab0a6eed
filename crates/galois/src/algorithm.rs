//! Algorithm registry.
//!
//! Every field registers the algorithms that implement it, and binds
//! algorithms to each [`KernelTier`] it supports. Most tiers bind one
//! algorithm; GFNI binds its three encodings widest first. The registry is what
//! self-test and benchmarks enumerate; the bindings are what
//! [`build_field`](crate::build_field) selects from.
//!
//! | Field | Baseline | SSE2 | SSSE3 | SSE4.1 | AVX2 | AVX-512 | GFNI | NEON | VSX |
//! |-------|----------|------|-------|--------|------|---------|------|------|-----|
//! | GF(2) | `xor_gpr64` | `xor_sse2` | – | – | `xor_avx2` | `xor_avx512` | – | `xor_neon` | `xor_vsx` |
//! | GF(4) | `imul_gpr64` | `imul_sse2` | `shuffle_ssse3` | `shuffle_sse41` | `shuffle_avx2` | `shuffle_avx512` | `gfni_512`, `gfni_256`, `gfni_128` | `imul_neon` | – |
//! | GF(16) | `imul_gpr64` | `imul_sse2` | `shuffle_ssse3` | `shuffle_sse41` | `shuffle_avx2` | `shuffle_avx512` | `gfni_512`, `gfni_256`, `gfni_128` | `shuffle_neon` | – |
//! | GF(256) | `imul_gpr64` | `imul_sse2` | `shuffle_ssse3` | `shuffle_sse41` | `shuffle_avx2` | `shuffle_avx512` | `gfni_512`, `gfni_256`, `gfni_128` | `shuffle_neon` | – |
//!
//! Rows for other architectures are compiled out, so asking a descriptor for
//! a foreign tier reports it as not implemented rather than missing features.

use alloc::{string::String, vec::Vec};
use core::{fmt, str::FromStr};

use backend::{KernelFamily, KernelTier, dispatch::Candidate};
use platform::Caps;

#[cfg(target_arch = "aarch64")]
use crate::kernels::aarch64;
#[cfg(all(target_arch = "powerpc64", target_feature = "vsx"))]
use crate::kernels::powerpc64;
#[cfg(target_arch = "x86_64")]
use crate::kernels::x86_64;
use crate::{
  error::Error,
  field::{Field, FieldType, Gf2, Gf4, Gf16, Gf256},
  kernels::{MaddFn, MulFn, imul, mul_gf2, reference, table, xor},
};

// ─────────────────────────────────────────────────────────────────────────────
// Identifiers
// ─────────────────────────────────────────────────────────────────────────────

/// Name of a kernel variant, independent of field.
///
/// Not every id is registered for every field or compiled on every target;
/// [`list_algorithms`] reports what a field actually has.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum AlgorithmId {
  Reference,
  XorScalar,
  XorGpr32,
  XorGpr64,
  XorSse2,
  XorAvx2,
  XorAvx512,
  XorNeon,
  XorVsx,
  FlatTable,
  LogTable,
  ImulScalar,
  ImulGpr32,
  ImulGpr64,
  ImulSse2,
  ImulAvx2,
  ImulNeon,
  ImulNeon64,
  ShuffleSsse3,
  ShuffleSse41,
  ShuffleAvx2,
  ShuffleAvx512,
  ShuffleNeon,
  ShuffleNeon64,
  Gfni128,
  Gfni256,
  Gfni512,
}

impl AlgorithmId {
  pub const ALL: [Self; 27] = [
    Self::Reference,
    Self::XorScalar,
    Self::XorGpr32,
    Self::XorGpr64,
    Self::XorSse2,
    Self::XorAvx2,
    Self::XorAvx512,
    Self::XorNeon,
    Self::XorVsx,
    Self::FlatTable,
    Self::LogTable,
    Self::ImulScalar,
    Self::ImulGpr32,
    Self::ImulGpr64,
    Self::ImulSse2,
    Self::ImulAvx2,
    Self::ImulNeon,
    Self::ImulNeon64,
    Self::ShuffleSsse3,
    Self::ShuffleSse41,
    Self::ShuffleAvx2,
    Self::ShuffleAvx512,
    Self::ShuffleNeon,
    Self::ShuffleNeon64,
    Self::Gfni128,
    Self::Gfni256,
    Self::Gfni512,
  ];

  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Reference => "reference",
      Self::XorScalar => "xor_scalar",
      Self::XorGpr32 => "xor_gpr32",
      Self::XorGpr64 => "xor_gpr64",
      Self::XorSse2 => "xor_sse2",
      Self::XorAvx2 => "xor_avx2",
      Self::XorAvx512 => "xor_avx512",
      Self::XorNeon => "xor_neon",
      Self::XorVsx => "xor_vsx",
      Self::FlatTable => "flat_table",
      Self::LogTable => "log_table",
      Self::ImulScalar => "imul_scalar",
      Self::ImulGpr32 => "imul_gpr32",
      Self::ImulGpr64 => "imul_gpr64",
      Self::ImulSse2 => "imul_sse2",
      Self::ImulAvx2 => "imul_avx2",
      Self::ImulNeon => "imul_neon",
      Self::ImulNeon64 => "imul_neon_64",
      Self::ShuffleSsse3 => "shuffle_ssse3",
      Self::ShuffleSse41 => "shuffle_sse41",
      Self::ShuffleAvx2 => "shuffle_avx2",
      Self::ShuffleAvx512 => "shuffle_avx512",
      Self::ShuffleNeon => "shuffle_neon",
      Self::ShuffleNeon64 => "shuffle_neon_64",
      Self::Gfni128 => "gfni_128",
      Self::Gfni256 => "gfni_256",
      Self::Gfni512 => "gfni_512",
    }
  }

  #[must_use]
  pub const fn family(self) -> KernelFamily {
    match self {
      Self::Reference => KernelFamily::Reference,
      Self::XorScalar
      | Self::XorGpr32
      | Self::XorGpr64
      | Self::XorSse2
      | Self::XorAvx2
      | Self::XorAvx512
      | Self::XorNeon
      | Self::XorVsx => KernelFamily::Xor,
      Self::FlatTable => KernelFamily::FlatTable,
      Self::LogTable => KernelFamily::LogTable,
      Self::ImulScalar
      | Self::ImulGpr32
      | Self::ImulGpr64
      | Self::ImulSse2
      | Self::ImulAvx2
      | Self::ImulNeon
      | Self::ImulNeon64 => KernelFamily::Imul,
      Self::ShuffleSsse3
      | Self::ShuffleSse41
      | Self::ShuffleAvx2
      | Self::ShuffleAvx512
      | Self::ShuffleNeon
      | Self::ShuffleNeon64 => KernelFamily::Shuffle,
      Self::Gfni128 | Self::Gfni256 | Self::Gfni512 => KernelFamily::Gfni,
    }
  }

  /// Instruction-set level the kernel runs at.
  #[must_use]
  pub const fn tier(self) -> KernelTier {
    match self {
      Self::Reference
      | Self::XorScalar
      | Self::XorGpr32
      | Self::XorGpr64
      | Self::FlatTable
      | Self::LogTable
      | Self::ImulScalar
      | Self::ImulGpr32
      | Self::ImulGpr64 => KernelTier::Baseline,
      Self::XorSse2 | Self::ImulSse2 => KernelTier::Sse2,
      Self::ShuffleSsse3 => KernelTier::Ssse3,
      Self::ShuffleSse41 => KernelTier::Sse41,
      Self::XorAvx2 | Self::ImulAvx2 | Self::ShuffleAvx2 => KernelTier::Avx2,
      Self::XorAvx512 | Self::ShuffleAvx512 => KernelTier::Avx512,
      Self::Gfni128 | Self::Gfni256 | Self::Gfni512 => KernelTier::Gfni,
      Self::XorNeon | Self::ImulNeon | Self::ImulNeon64 | Self::ShuffleNeon | Self::ShuffleNeon64 => KernelTier::Neon,
      Self::XorVsx => KernelTier::Vsx,
    }
  }

  /// CPU features the kernel executes.
  ///
  /// Usually the tier's requirement; each GFNI encoding and the AVX-512 XOR
  /// need a different set than their tier names.
  #[must_use]
  pub const fn requires(self) -> Caps {
    match self {
      Self::XorAvx512 => Caps::AVX512F,
      Self::Gfni128 => Caps::GFNI.union(Caps::SSE2),
      Self::Gfni256 => Caps::GFNI.union(Caps::AVX).union(Caps::AVX2),
      Self::Gfni512 => Caps::GFNI.union(Caps::AVX512F).union(Caps::AVX512BW),
      other => other.tier().requires(),
    }
  }

  /// Bytes processed per step; also the buffer alignment the kernel prefers.
  #[must_use]
  pub const fn vector_width(self) -> usize {
    match self {
      Self::XorGpr32 | Self::ImulGpr32 => 4,
      Self::XorGpr64 | Self::ImulGpr64 | Self::ImulNeon64 | Self::ShuffleNeon64 => 8,
      Self::Gfni128 => 16,
      Self::Gfni256 => 32,
      Self::Gfni512 => 64,
      other => other.tier().vector_width(),
    }
  }

  /// Look up an id by its [`name`](Self::name), ASCII case-insensitively.
  #[must_use]
  pub fn from_name(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|id| id.name().eq_ignore_ascii_case(name.trim()))
  }
}

impl fmt::Display for AlgorithmId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for AlgorithmId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Error> {
    Self::from_name(s).ok_or_else(|| Error::UnknownAlgorithmName(String::from(s)))
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

/// One registered kernel variant for one field.
///
/// The kernel entry points stay private to the crate: running them needs the
/// capability check that [`GaloisField`](crate::GaloisField) performs.
#[derive(Clone, Copy)]
pub struct Algorithm {
  pub(crate) id: AlgorithmId,
  pub(crate) field: FieldType,
  pub(crate) mul: MulFn,
  pub(crate) madd: MaddFn,
}

impl fmt::Debug for Algorithm {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Algorithm")
      .field("id", &self.id)
      .field("field", &self.field)
      .finish_non_exhaustive()
  }
}

impl Algorithm {
  const fn new(id: AlgorithmId, field: FieldType, mul: MulFn, madd: MaddFn) -> Self {
    Self { id, field, mul, madd }
  }

  #[inline]
  #[must_use]
  pub const fn id(&self) -> AlgorithmId {
    self.id
  }

  #[inline]
  #[must_use]
  pub const fn field(&self) -> FieldType {
    self.field
  }

  /// Whether `caps` lets this algorithm run.
  #[inline]
  #[must_use]
  pub const fn is_available(&self, caps: Caps) -> bool {
    caps.has(self.id.requires())
  }

  /// Registered algorithm `id` for `field`.
  ///
  /// # Errors
  ///
  /// [`Error::UnknownAlgorithm`] if `field` does not register `id` on this target.
  pub fn lookup(field: FieldType, id: AlgorithmId) -> Result<&'static Self, Error> {
    registry(field)
      .iter()
      .find(|a| a.id == id)
      .ok_or(Error::UnknownAlgorithm { field, algorithm: id })
  }

  /// Registered algorithm for `field` named `name`.
  ///
  /// # Errors
  ///
  /// [`Error::UnknownAlgorithmName`] if no algorithm has that name, and
  /// [`Error::UnknownAlgorithm`] if the field does not register it.
  pub fn by_name(field: FieldType, name: &str) -> Result<&'static Self, Error> {
    Self::lookup(field, name.parse()?)
  }

  /// Static description, with availability judged against `caps`.
  #[must_use]
  pub fn describe(&self, caps: Caps) -> AlgorithmDescriptor {
    AlgorithmDescriptor {
      id: self.id,
      name: self.id.name(),
      field: self.field,
      tier: self.id.tier(),
      family: self.id.family(),
      requires: self.id.requires(),
      vector_width: self.id.vector_width(),
      available: self.is_available(caps),
    }
  }
}

/// Everything tooling needs to know about one registered algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlgorithmDescriptor {
  pub id: AlgorithmId,
  pub name: &'static str,
  pub field: FieldType,
  pub tier: KernelTier,
  pub family: KernelFamily,
  pub requires: Caps,
  pub vector_width: usize,
  /// Whether the detected hardware can run it.
  pub available: bool,
}

const fn reference_algorithm<F: Field>() -> Algorithm {
  Algorithm::new(AlgorithmId::Reference, F::TYPE, reference::mul::<F>, reference::madd::<F>)
}

const GF2_REFERENCE: Algorithm = reference_algorithm::<Gf2>();
const GF4_REFERENCE: Algorithm = reference_algorithm::<Gf4>();
const GF16_REFERENCE: Algorithm = reference_algorithm::<Gf16>();
const GF256_REFERENCE: Algorithm = reference_algorithm::<Gf256>();

macro_rules! multiply_registry {
  ($name:ident, $f:ty, $reference:expr, $field:expr $(, $extra:expr)* $(,)?) => {
    static $name: &[Algorithm] = &[
      $reference,
      Algorithm::new(AlgorithmId::FlatTable, $field, table::flat_mul::<$f>, table::flat_madd::<$f>),
      $($extra,)*
      Algorithm::new(AlgorithmId::ImulScalar, $field, imul::mul_scalar::<$f>, imul::madd_scalar::<$f>),
      Algorithm::new(AlgorithmId::ImulGpr32, $field, imul::mul_gpr32::<$f>, imul::madd_gpr32::<$f>),
      Algorithm::new(AlgorithmId::ImulGpr64, $field, imul::mul_gpr64::<$f>, imul::madd_gpr64::<$f>),
      #[cfg(target_arch = "x86_64")]
      Algorithm::new(AlgorithmId::ImulSse2, $field, x86_64::imul::mul_sse2::<$f>, x86_64::imul::madd_sse2::<$f>),
      #[cfg(target_arch = "x86_64")]
      Algorithm::new(AlgorithmId::ImulAvx2, $field, x86_64::imul::mul_avx2::<$f>, x86_64::imul::madd_avx2::<$f>),
      #[cfg(target_arch = "x86_64")]
      Algorithm::new(
        AlgorithmId::ShuffleSsse3,
        $field,
        x86_64::shuffle::mul_ssse3::<$f>,
        x86_64::shuffle::madd_ssse3::<$f>,
      ),
      #[cfg(target_arch = "x86_64")]
      Algorithm::new(
        AlgorithmId::ShuffleSse41,
        $field,
        x86_64::shuffle::mul_sse41::<$f>,
        x86_64::shuffle::madd_sse41::<$f>,
      ),
      #[cfg(target_arch = "x86_64")]
      Algorithm::new(
        AlgorithmId::ShuffleAvx2,
        $field,
        x86_64::shuffle::mul_avx2::<$f>,
        x86_64::shuffle::madd_avx2::<$f>,
      ),
      #[cfg(target_arch = "x86_64")]
      Algorithm::new(
        AlgorithmId::ShuffleAvx512,
        $field,
        x86_64::shuffle::mul_avx512::<$f>,
        x86_64::shuffle::madd_avx512::<$f>,
      ),
      #[cfg(target_arch = "x86_64")]
      Algorithm::new(AlgorithmId::Gfni128, $field, x86_64::gfni::mul_128::<$f>, x86_64::gfni::madd_128::<$f>),
      #[cfg(target_arch = "x86_64")]
      Algorithm::new(AlgorithmId::Gfni256, $field, x86_64::gfni::mul_256::<$f>, x86_64::gfni::madd_256::<$f>),
      #[cfg(target_arch = "x86_64")]
      Algorithm::new(AlgorithmId::Gfni512, $field, x86_64::gfni::mul_512::<$f>, x86_64::gfni::madd_512::<$f>),
      #[cfg(target_arch = "aarch64")]
      Algorithm::new(
        AlgorithmId::ImulNeon,
        $field,
        aarch64::mul_imul_neon::<$f>,
        aarch64::madd_imul_neon::<$f>,
      ),
      #[cfg(target_arch = "aarch64")]
      Algorithm::new(
        AlgorithmId::ImulNeon64,
        $field,
        aarch64::mul_imul_neon_64::<$f>,
        aarch64::madd_imul_neon_64::<$f>,
      ),
      #[cfg(target_arch = "aarch64")]
      Algorithm::new(
        AlgorithmId::ShuffleNeon,
        $field,
        aarch64::mul_shuffle_neon::<$f>,
        aarch64::madd_shuffle_neon::<$f>,
      ),
      #[cfg(target_arch = "aarch64")]
      Algorithm::new(
        AlgorithmId::ShuffleNeon64,
        $field,
        aarch64::mul_shuffle_neon_64::<$f>,
        aarch64::madd_shuffle_neon_64::<$f>,
      ),
    ];
  };
}

static GF2_ALGORITHMS: &[Algorithm] = &[
  GF2_REFERENCE,
  Algorithm::new(AlgorithmId::XorScalar, FieldType::Gf2, mul_gf2, xor::madd_scalar),
  Algorithm::new(AlgorithmId::XorGpr32, FieldType::Gf2, mul_gf2, xor::madd_gpr32),
  Algorithm::new(AlgorithmId::XorGpr64, FieldType::Gf2, mul_gf2, xor::madd_gpr64),
  #[cfg(target_arch = "x86_64")]
  Algorithm::new(AlgorithmId::XorSse2, FieldType::Gf2, mul_gf2, x86_64::xor::madd_sse2),
  #[cfg(target_arch = "x86_64")]
  Algorithm::new(AlgorithmId::XorAvx2, FieldType::Gf2, mul_gf2, x86_64::xor::madd_avx2),
  #[cfg(target_arch = "x86_64")]
  Algorithm::new(AlgorithmId::XorAvx512, FieldType::Gf2, mul_gf2, x86_64::xor::madd_avx512),
  #[cfg(target_arch = "aarch64")]
  Algorithm::new(AlgorithmId::XorNeon, FieldType::Gf2, mul_gf2, aarch64::madd_xor_neon),
  #[cfg(all(target_arch = "powerpc64", target_feature = "vsx"))]
  Algorithm::new(AlgorithmId::XorVsx, FieldType::Gf2, mul_gf2, powerpc64::madd_xor_vsx),
];

multiply_registry!(GF4_ALGORITHMS, Gf4, GF4_REFERENCE, FieldType::Gf4);
multiply_registry!(
  GF16_ALGORITHMS,
  Gf16,
  GF16_REFERENCE,
  FieldType::Gf16,
  Algorithm::new(AlgorithmId::LogTable, FieldType::Gf16, table::log_mul::<Gf16>, table::log_madd::<Gf16>),
);
multiply_registry!(
  GF256_ALGORITHMS,
  Gf256,
  GF256_REFERENCE,
  FieldType::Gf256,
  Algorithm::new(AlgorithmId::LogTable, FieldType::Gf256, table::log_mul::<Gf256>, table::log_madd::<Gf256>),
);

/// Every algorithm registered for `field` on this target, reference first.
#[must_use]
pub(crate) fn registry(field: FieldType) -> &'static [Algorithm] {
  match field {
    FieldType::Gf2 => GF2_ALGORITHMS,
    FieldType::Gf4 => GF4_ALGORITHMS,
    FieldType::Gf16 => GF16_ALGORITHMS,
    FieldType::Gf256 => GF256_ALGORITHMS,
  }
}

/// The reference algorithm for `field`.
#[must_use]
pub(crate) fn reference_for(field: FieldType) -> &'static Algorithm {
  match field {
    FieldType::Gf2 => &GF2_REFERENCE,
    FieldType::Gf4 => &GF4_REFERENCE,
    FieldType::Gf16 => &GF16_REFERENCE,
    FieldType::Gf256 => &GF256_REFERENCE,
  }
}

/// Describe every algorithm registered for `field`, judged against the
/// current capabilities.
#[must_use]
pub fn list_algorithms(field: FieldType) -> Vec<AlgorithmDescriptor> {
  let caps = platform::caps();
  registry(field).iter().map(|a| a.describe(caps)).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tier bindings
// ─────────────────────────────────────────────────────────────────────────────

const fn bind(tier: KernelTier, id: AlgorithmId) -> Candidate<AlgorithmId> {
  Candidate::new(id.name(), tier, tier.requires().union(id.requires()), id)
}

static GF2_BINDINGS: &[Candidate<AlgorithmId>] = &[
  #[cfg(target_arch = "x86_64")]
  bind(KernelTier::Avx512, AlgorithmId::XorAvx512),
  #[cfg(target_arch = "x86_64")]
  bind(KernelTier::Avx2, AlgorithmId::XorAvx2),
  #[cfg(target_arch = "x86_64")]
  bind(KernelTier::Sse2, AlgorithmId::XorSse2),
  #[cfg(target_arch = "aarch64")]
  bind(KernelTier::Neon, AlgorithmId::XorNeon),
  #[cfg(all(target_arch = "powerpc64", target_feature = "vsx"))]
  bind(KernelTier::Vsx, AlgorithmId::XorVsx),
  bind(KernelTier::Baseline, AlgorithmId::XorGpr64),
];

macro_rules! multiply_bindings {
  ($name:ident, $neon:expr) => {
    static $name: &[Candidate<AlgorithmId>] = &[
      #[cfg(target_arch = "x86_64")]
      bind(KernelTier::Gfni, AlgorithmId::Gfni512),
      #[cfg(target_arch = "x86_64")]
      bind(KernelTier::Gfni, AlgorithmId::Gfni256),
      #[cfg(target_arch = "x86_64")]
      bind(KernelTier::Gfni, AlgorithmId::Gfni128),
      #[cfg(target_arch = "x86_64")]
      bind(KernelTier::Avx512, AlgorithmId::ShuffleAvx512),
      #[cfg(target_arch = "x86_64")]
      bind(KernelTier::Avx2, AlgorithmId::ShuffleAvx2),
      #[cfg(target_arch = "x86_64")]
      bind(KernelTier::Sse41, AlgorithmId::ShuffleSse41),
      #[cfg(target_arch = "x86_64")]
      bind(KernelTier::Ssse3, AlgorithmId::ShuffleSsse3),
      #[cfg(target_arch = "x86_64")]
      bind(KernelTier::Sse2, AlgorithmId::ImulSse2),
      #[cfg(target_arch = "aarch64")]
      bind(KernelTier::Neon, $neon),
      bind(KernelTier::Baseline, AlgorithmId::ImulGpr64),
    ];
  };
}

multiply_bindings!(GF4_BINDINGS, AlgorithmId::ImulNeon);
multiply_bindings!(WIDE_BINDINGS, AlgorithmId::ShuffleNeon);

/// Tier-to-algorithm bindings for `field`, best tier first.
///
/// Within a tier, candidates run widest first and the first one the
/// capabilities satisfy is used. Only rows for this target are compiled in.
#[must_use]
pub(crate) fn bindings(field: FieldType) -> &'static [Candidate<AlgorithmId>] {
  match field {
    FieldType::Gf2 => GF2_BINDINGS,
    FieldType::Gf4 => GF4_BINDINGS,
    FieldType::Gf16 | FieldType::Gf256 => WIDE_BINDINGS,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn names_round_trip() {
    for id in AlgorithmId::ALL {
      assert_eq!(AlgorithmId::from_name(id.name()), Some(id));
      assert_eq!(id.name().parse::<AlgorithmId>().unwrap(), id);
    }
    assert_eq!(AlgorithmId::from_name("SHUFFLE_AVX2"), Some(AlgorithmId::ShuffleAvx2));
    assert!(matches!(
      "shuffle_sse9".parse::<AlgorithmId>(),
      Err(Error::UnknownAlgorithmName(_))
    ));
  }

  #[test]
  fn registries_start_with_reference_and_match_field() {
    fn check<F: Field>() {
      let algorithms = registry(F::TYPE);
      assert_eq!(algorithms[0].id, AlgorithmId::Reference, "{}", F::TYPE);
      for a in algorithms {
        assert_eq!(a.field, F::TYPE);
      }
      for (i, a) in algorithms.iter().enumerate() {
        assert!(algorithms[i + 1..].iter().all(|b| b.id != a.id), "{} duplicate {}", F::TYPE, a.id);
      }
    }
    check::<Gf2>();
    check::<Gf4>();
    check::<Gf16>();
    check::<Gf256>();
  }

  #[test]
  fn log_table_only_for_wide_fields() {
    assert!(Algorithm::lookup(FieldType::Gf16, AlgorithmId::LogTable).is_ok());
    assert!(Algorithm::lookup(FieldType::Gf256, AlgorithmId::LogTable).is_ok());
    assert_eq!(
      Algorithm::lookup(FieldType::Gf4, AlgorithmId::LogTable).unwrap_err(),
      Error::UnknownAlgorithm {
        field: FieldType::Gf4,
        algorithm: AlgorithmId::LogTable
      }
    );
  }

  #[test]
  fn baseline_binding_is_always_registered() {
    for field in FieldType::ALL {
      let baseline = bindings(field)
        .iter()
        .find(|c| c.tier == KernelTier::Baseline)
        .unwrap();
      assert!(Algorithm::lookup(field, baseline.func).is_ok(), "{field}");
      assert_eq!(baseline.requires, Caps::BASELINE);
    }
  }

  #[test]
  fn bindings_require_at_least_their_tier() {
    for field in FieldType::ALL {
      for c in bindings(field) {
        assert!(c.requires.has(c.tier.requires()), "{field} {}", c.name);
        assert!(c.requires.has(c.func.requires()), "{field} {}", c.name);
      }
    }
  }

  #[test]
  fn bindings_are_registered_on_this_target() {
    for field in FieldType::ALL {
      for c in bindings(field) {
        assert!(Algorithm::lookup(field, c.func).is_ok(), "{field} {}", c.name);
      }
    }
  }

  #[test]
  fn tiers_bind_distinct_algorithms() {
    for field in FieldType::ALL {
      let rows = bindings(field);
      for (i, a) in rows.iter().enumerate() {
        assert!(
          rows[i + 1..].iter().all(|b| b.func != a.func),
          "{field}: {} bound twice",
          a.name
        );
      }
    }
  }

  #[cfg(target_arch = "x86_64")]
  #[test]
  fn gfni_binds_every_width_widest_first() {
    for field in [FieldType::Gf4, FieldType::Gf16, FieldType::Gf256] {
      let gfni: Vec<AlgorithmId> = bindings(field)
        .iter()
        .filter(|c| c.tier == KernelTier::Gfni)
        .map(|c| c.func)
        .collect();
      assert_eq!(gfni, [AlgorithmId::Gfni512, AlgorithmId::Gfni256, AlgorithmId::Gfni128]);
    }
  }

  #[test]
  fn by_name_checks_field() {
    assert_eq!(
      Algorithm::by_name(FieldType::Gf256, "imul_gpr64").unwrap().id(),
      AlgorithmId::ImulGpr64
    );
    assert!(Algorithm::by_name(FieldType::Gf2, "imul_gpr64").is_err());
  }

  #[test]
  fn reference_is_first_in_registry() {
    for field in FieldType::ALL {
      assert_eq!(reference_for(field).field, field);
      assert_eq!(registry(field)[0].id, reference_for(field).id);
    }
  }

  #[test]
  fn descriptors_reflect_caps() {
    let reference = reference_for(FieldType::Gf16).describe(Caps::BASELINE);
    assert!(reference.available);
    assert_eq!(reference.family, KernelFamily::Reference);
    assert_eq!(reference.vector_width, 1);

    let gpr = Algorithm::lookup(FieldType::Gf16, AlgorithmId::ImulGpr64).unwrap();
    assert_eq!(gpr.describe(Caps::NONE).vector_width, 8);
    assert!(!gpr.describe(Caps::NONE).available);
  }
}
