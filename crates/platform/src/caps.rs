//! Hardware capability representation.
//!
//! This module answers one question: "which instruction-set tiers may the
//! Galois field kernels use on this machine?"
//!
//! # Design
//!
//! [`Caps`] is a 32-bit bitset. Each bit names one ISA extension that some
//! kernel family depends on. [`Caps::BASELINE`] is always present in a
//! detected set: general-purpose registers are the floor every kernel can
//! fall back to.
//!
//! # Usage
//!
//! ```
//! use platform::Caps;
//!
//! let caps = platform::caps();
//! assert!(caps.has(Caps::BASELINE));
//! if caps.has(Caps::AVX2) {
//!   // 256-bit shuffle kernels are legal here.
//! }
//! ```

use core::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Core Capability Type
// ─────────────────────────────────────────────────────────────────────────────

/// Hardware capabilities: a bitset of instruction-set extensions.
///
/// `Caps` is `Copy`, `Send` and `Sync`; it is meant to be passed around by
/// value and compared with [`has()`](Caps::has).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Caps(pub(crate) u32);

/// Build a capability with a single bit set.
#[inline]
#[must_use]
pub const fn bit(n: u8) -> Caps {
  Caps(1u32 << n)
}

impl Caps {
  /// Empty capability set.
  pub const NONE: Self = Self(0);

  /// Scalar / general-purpose register arithmetic. Always available.
  pub const BASELINE: Self = bit(0);
  /// x86 SSE2 (128-bit integer SIMD).
  pub const SSE2: Self = bit(1);
  /// x86 SSSE3 (`pshufb`).
  pub const SSSE3: Self = bit(2);
  /// x86 SSE4.1.
  pub const SSE41: Self = bit(3);
  /// x86 SSE4.2.
  pub const SSE42: Self = bit(4);
  /// x86 AVX (OS saves YMM state).
  pub const AVX: Self = bit(5);
  /// x86 AVX2 (256-bit integer SIMD).
  pub const AVX2: Self = bit(6);
  /// x86 AVX-512 Foundation (OS saves ZMM and opmask state).
  pub const AVX512F: Self = bit(7);
  /// x86 AVX-512 Byte/Word (512-bit byte shuffles).
  pub const AVX512BW: Self = bit(8);
  /// x86 Galois Field New Instructions.
  pub const GFNI: Self = bit(9);
  /// ARM Advanced SIMD.
  pub const NEON: Self = bit(10);
  /// POWER Vector-Scalar extension.
  pub const VSX: Self = bit(11);

  /// Every flag this crate knows about, with its canonical lowercase name.
  pub const FLAGS: [(Self, &'static str); 12] = [
    (Self::BASELINE, "baseline"),
    (Self::SSE2, "sse2"),
    (Self::SSSE3, "ssse3"),
    (Self::SSE41, "sse4.1"),
    (Self::SSE42, "sse4.2"),
    (Self::AVX, "avx"),
    (Self::AVX2, "avx2"),
    (Self::AVX512F, "avx512f"),
    (Self::AVX512BW, "avx512bw"),
    (Self::GFNI, "gfni"),
    (Self::NEON, "neon"),
    (Self::VSX, "vsx"),
  ];

  const KNOWN: u32 = (1u32 << Self::FLAGS.len()) - 1;

  /// Build a capability set from raw bits, dropping unknown bits.
  #[inline]
  #[must_use]
  pub const fn from_bits_truncate(bits: u32) -> Self {
    Self(bits & Self::KNOWN)
  }

  /// Raw bit representation.
  #[inline]
  #[must_use]
  pub const fn bits(self) -> u32 {
    self.0
  }

  /// Check if all features in `required` are present.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    (self.0 & required.0) == required.0
  }

  /// Union of two capability sets.
  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self(self.0 | other.0)
  }

  /// Intersection of two capability sets.
  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self(self.0 & other.0)
  }

  /// Features in `self` that are not in `other`.
  #[inline]
  #[must_use]
  pub const fn difference(self, other: Self) -> Self {
    Self(self.0 & !other.0)
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }

  /// Number of set features.
  #[inline]
  #[must_use]
  pub const fn count(self) -> u32 {
    self.0.count_ones()
  }

  /// Iterate over the names of the set features, lowest bit first.
  pub fn names(self) -> impl Iterator<Item = &'static str> {
    Self::FLAGS
      .into_iter()
      .filter(move |(flag, _)| self.has(*flag))
      .map(|(_, name)| name)
  }

  /// Look up a single flag by its canonical name (case-insensitive).
  #[must_use]
  pub fn from_name(name: &str) -> Option<Self> {
    let name = name.trim();
    Self::FLAGS
      .into_iter()
      .find(|(_, n)| n.eq_ignore_ascii_case(name))
      .map(|(flag, _)| flag)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Operators
// ─────────────────────────────────────────────────────────────────────────────

impl core::ops::BitOr for Caps {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self {
    self.union(rhs)
  }
}

impl core::ops::BitOrAssign for Caps {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

impl core::ops::BitAnd for Caps {
  type Output = Self;

  #[inline]
  fn bitand(self, rhs: Self) -> Self {
    self.intersection(rhs)
  }
}

impl fmt::Display for Caps {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_empty() {
      return f.write_str("none");
    }
    let mut first = true;
    for name in self.names() {
      if !first {
        f.write_str("|")?;
      }
      f.write_str(name)?;
      first = false;
    }
    Ok(())
  }
}

impl fmt::Debug for Caps {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Caps({self})")
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::{format, vec::Vec};

  use super::*;

  #[test]
  fn test_none_is_empty() {
    assert!(Caps::NONE.is_empty());
    assert_eq!(Caps::NONE.count(), 0);
    assert_eq!(format!("{}", Caps::NONE), "none");
  }

  #[test]
  fn test_has_requires_every_bit() {
    let caps = Caps::BASELINE | Caps::SSE2 | Caps::SSSE3;
    assert!(caps.has(Caps::SSE2));
    assert!(caps.has(Caps::SSE2 | Caps::SSSE3));
    assert!(!caps.has(Caps::SSE2 | Caps::AVX2));
    assert!(caps.has(Caps::NONE));
  }

  #[test]
  fn test_set_algebra() {
    let a = Caps::SSE2 | Caps::AVX2;
    let b = Caps::AVX2 | Caps::GFNI;
    assert_eq!(a & b, Caps::AVX2);
    assert_eq!(a.difference(b), Caps::SSE2);
    assert_eq!((a | b).count(), 3);
  }

  #[test]
  fn test_flags_are_distinct_bits() {
    let mut all = Caps::NONE;
    for (flag, _) in Caps::FLAGS {
      assert_eq!(flag.count(), 1);
      assert!(!all.has(flag));
      all |= flag;
    }
    assert_eq!(all.count() as usize, Caps::FLAGS.len());
  }

  #[test]
  fn test_from_bits_truncate_drops_unknown() {
    let caps = Caps::from_bits_truncate(u32::MAX);
    assert_eq!(caps.count() as usize, Caps::FLAGS.len());
  }

  #[test]
  fn test_display_and_names() {
    let caps = Caps::BASELINE | Caps::SSE41 | Caps::GFNI;
    assert_eq!(format!("{caps}"), "baseline|sse4.1|gfni");
    let names: Vec<_> = caps.names().collect();
    assert_eq!(names, ["baseline", "sse4.1", "gfni"]);
  }

  #[test]
  fn test_from_name() {
    assert_eq!(Caps::from_name("AVX2"), Some(Caps::AVX2));
    assert_eq!(Caps::from_name(" neon "), Some(Caps::NEON));
    assert_eq!(Caps::from_name("mmx"), None);
  }
}
