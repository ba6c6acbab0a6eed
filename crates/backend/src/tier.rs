//! Capability tiers.
//!
//! A tier is a named instruction-set level that a kernel requires. Each
//! field binds one kernel per tier (GFNI binds one per encoding width), and
//! automatic selection walks the architecture's preference order until it
//! finds a tier the hardware provides and the field implements.
//!
//! # Tier Overview
//!
//! | Tier | Requires | Vector width | Typical kernel |
//! |------|----------|--------------|----------------|
//! | Baseline | nothing | 1 | 64-bit GPR bit-sliced multiply |
//! | Sse2 | SSE2 | 16 | bit-sliced multiply with `pmullw` |
//! | Ssse3 | SSSE3 | 16 | nibble shuffle with `pshufb` |
//! | Sse41 | SSE4.1 + SSSE3 | 16 | nibble shuffle, `ptest` skips zero blocks |
//! | Avx2 | AVX2 | 32 | 256-bit nibble shuffle |
//! | Avx512 | AVX-512F + BW | 64 | 512-bit nibble shuffle |
//! | Gfni | GFNI + SSE2 | 16-64 | affine transform, widest encoding the CPU has |
//! | Neon | NEON | 16 | `tbl` nibble shuffle |
//! | Vsx | VSX | 16 | POWER vector XOR |
//!
//! When a tier binds several widths, the widest one the capabilities allow
//! is chosen.

use core::fmt;

use platform::Caps;

/// Hardware capability tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KernelTier {
  /// Scalar and general-purpose register kernels. Always available.
  #[default]
  Baseline = 0,
  /// x86 SSE2.
  Sse2 = 1,
  /// x86 SSSE3.
  Ssse3 = 2,
  /// x86 SSE4.1 (with SSSE3).
  Sse41 = 3,
  /// x86 AVX2.
  Avx2 = 4,
  /// x86 AVX-512 Foundation + Byte/Word.
  Avx512 = 5,
  /// x86 GFNI, at whatever vector width the CPU supports.
  Gfni = 6,
  /// ARM Advanced SIMD.
  Neon = 7,
  /// POWER Vector-Scalar Extension.
  Vsx = 8,
}

impl KernelTier {
  /// All tiers in declaration order.
  pub const ALL: [Self; 9] = [
    Self::Baseline,
    Self::Sse2,
    Self::Ssse3,
    Self::Sse41,
    Self::Avx2,
    Self::Avx512,
    Self::Gfni,
    Self::Neon,
    Self::Vsx,
  ];

  /// Convert to numeric value.
  #[inline]
  #[must_use]
  pub const fn as_u8(self) -> u8 {
    self as u8
  }

  /// Human-readable tier name.
  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Baseline => "baseline",
      Self::Sse2 => "sse2",
      Self::Ssse3 => "ssse3",
      Self::Sse41 => "sse4.1",
      Self::Avx2 => "avx2",
      Self::Avx512 => "avx512",
      Self::Gfni => "gfni",
      Self::Neon => "neon",
      Self::Vsx => "vsx",
    }
  }

  /// Capabilities a machine must report for this tier to be legal.
  #[inline]
  #[must_use]
  pub const fn requires(self) -> Caps {
    match self {
      Self::Baseline => Caps::BASELINE,
      Self::Sse2 => Caps::SSE2,
      Self::Ssse3 => Caps::SSE2.union(Caps::SSSE3),
      Self::Sse41 => Caps::SSE2.union(Caps::SSSE3).union(Caps::SSE41),
      Self::Avx2 => Caps::AVX.union(Caps::AVX2),
      Self::Avx512 => Caps::AVX2.union(Caps::AVX512F).union(Caps::AVX512BW),
      Self::Gfni => Caps::GFNI.union(Caps::SSE2),
      Self::Neon => Caps::NEON,
      Self::Vsx => Caps::VSX,
    }
  }

  /// Buffer alignment, in bytes, callers must provide for this tier.
  #[inline]
  #[must_use]
  pub const fn vector_width(self) -> usize {
    match self {
      Self::Baseline => 1,
      Self::Sse2 | Self::Ssse3 | Self::Sse41 | Self::Neon | Self::Vsx => 16,
      Self::Avx2 => 32,
      Self::Avx512 | Self::Gfni => 64,
    }
  }

  /// Whether this tier uses vector registers.
  #[inline]
  #[must_use]
  pub const fn is_simd(self) -> bool {
    !matches!(self, Self::Baseline)
  }

  /// Whether `caps` satisfies this tier's requirements.
  #[inline]
  #[must_use]
  pub const fn is_available(self, caps: Caps) -> bool {
    caps.has(self.requires())
  }

  /// Automatic-selection order for the compilation target, best first.
  ///
  /// The order reflects measured throughput of the bound kernels, not the
  /// age of the instruction set: GFNI needs one instruction per vector and
  /// beats the 512-bit shuffle, which needs five.
  #[must_use]
  pub const fn preference_order() -> &'static [Self] {
    #[cfg(target_arch = "x86_64")]
    {
      &[
        Self::Gfni,
        Self::Avx512,
        Self::Avx2,
        Self::Sse41,
        Self::Ssse3,
        Self::Sse2,
        Self::Baseline,
      ]
    }

    #[cfg(target_arch = "aarch64")]
    {
      &[Self::Neon, Self::Baseline]
    }

    #[cfg(target_arch = "powerpc64")]
    {
      &[Self::Vsx, Self::Baseline]
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "powerpc64")))]
    {
      &[Self::Baseline]
    }
  }

  /// Parse a tier name, accepting common aliases.
  #[must_use]
  pub fn from_name(name: &str) -> Option<Self> {
    let name = name.trim();
    let eq = |s: &str| name.eq_ignore_ascii_case(s);

    if eq("baseline") || eq("portable") || eq("scalar") || eq("gpr") {
      return Some(Self::Baseline);
    }
    if eq("sse2") {
      return Some(Self::Sse2);
    }
    if eq("ssse3") {
      return Some(Self::Ssse3);
    }
    if eq("sse4.1") || eq("sse41") || eq("sse4_1") {
      return Some(Self::Sse41);
    }
    if eq("avx2") {
      return Some(Self::Avx2);
    }
    if eq("avx512") || eq("avx-512") || eq("avx512bw") {
      return Some(Self::Avx512);
    }
    if eq("gfni") {
      return Some(Self::Gfni);
    }
    if eq("neon") || eq("asimd") {
      return Some(Self::Neon);
    }
    if eq("vsx") {
      return Some(Self::Vsx);
    }
    None
  }
}

impl fmt::Display for KernelTier {
  #[inline]
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tier_values() {
    for (i, tier) in KernelTier::ALL.iter().enumerate() {
      assert_eq!(tier.as_u8() as usize, i);
    }
  }

  #[test]
  fn tier_names_round_trip() {
    for tier in KernelTier::ALL {
      assert_eq!(KernelTier::from_name(tier.name()), Some(tier));
    }
    assert_eq!(KernelTier::from_name("SCALAR"), Some(KernelTier::Baseline));
    assert_eq!(KernelTier::from_name("avx-512"), Some(KernelTier::Avx512));
    assert_eq!(KernelTier::from_name("VSX"), Some(KernelTier::Vsx));
    assert_eq!(KernelTier::from_name("mmx"), None);
  }

  #[test]
  fn baseline_always_available() {
    assert!(KernelTier::Baseline.is_available(Caps::BASELINE));
    assert!(!KernelTier::Baseline.is_simd());
    assert_eq!(KernelTier::Baseline.vector_width(), 1);
  }

  #[test]
  fn requirements_nest() {
    assert!(KernelTier::Sse41.requires().has(KernelTier::Ssse3.requires()));
    assert!(KernelTier::Ssse3.requires().has(KernelTier::Sse2.requires()));
    assert!(KernelTier::Avx512.requires().has(Caps::AVX2));
    assert!(KernelTier::Gfni.requires().has(Caps::GFNI | Caps::SSE2));
    assert!(!KernelTier::Gfni.requires().has(Caps::AVX2));
  }

  #[test]
  fn preference_order_ends_with_baseline() {
    let order = KernelTier::preference_order();
    assert_eq!(order.last(), Some(&KernelTier::Baseline));
  }

  #[test]
  fn default_is_baseline() {
    assert_eq!(KernelTier::default(), KernelTier::Baseline);
  }
}
