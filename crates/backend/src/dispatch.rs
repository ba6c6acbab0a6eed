//! Kernel dispatch: selection by capability.
//!
//! - [`Candidate`]: a kernel with its tier and capability requirements
//! - [`Selected`]: the result of kernel selection
//! - [`select`]: choose the best kernel from a preference-ordered list
//! - [`select_tier`]: choose the best kernel bound to one exact tier
//!
//! # Usage
//!
//! Algorithm crates register kernels as an ordered list of `Candidate`s,
//! best first:
//!
//! ```
//! use backend::{
//!   KernelTier,
//!   dispatch::{Candidate, select},
//! };
//! use platform::Caps;
//!
//! fn fast(x: u8) -> u8 { x }
//! fn slow(x: u8) -> u8 { x }
//!
//! let candidates: &[Candidate<fn(u8) -> u8>] = &[
//!   Candidate::new("fast", KernelTier::Avx2, KernelTier::Avx2.requires(), fast),
//!   Candidate::new("slow", KernelTier::Baseline, Caps::BASELINE, slow),
//! ];
//! let selected = select(Caps::BASELINE, candidates).unwrap();
//! assert_eq!(selected.name, "slow");
//! ```

use core::fmt;

use platform::Caps;

use crate::tier::KernelTier;

// ─────────────────────────────────────────────────────────────────────────────
// Core Types
// ─────────────────────────────────────────────────────────────────────────────

/// A candidate kernel with capability requirements.
///
/// Candidates are ordered from best to worst. The dispatcher selects the
/// first candidate whose requirements are satisfied by the capabilities.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<F> {
  /// Human-readable name for diagnostics (e.g., "shuffle_avx2").
  pub name: &'static str,
  /// Tier the candidate is bound to.
  pub tier: KernelTier,
  /// Required CPU capabilities. Must be a subset of detected caps.
  pub requires: Caps,
  /// The kernel (a function pointer or a reference to a kernel table).
  pub func: F,
}

impl<F> Candidate<F> {
  /// Create a new candidate.
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, tier: KernelTier, requires: Caps, func: F) -> Self {
    Self {
      name,
      tier,
      requires,
      func,
    }
  }
}

/// The result of kernel selection.
#[derive(Clone, Copy, Debug)]
pub struct Selected<F> {
  /// Human-readable name of the selected kernel.
  pub name: &'static str,
  /// Tier of the selected kernel.
  pub tier: KernelTier,
  /// Capabilities the selected kernel relies on.
  pub requires: Caps,
  /// The selected kernel.
  pub func: F,
}

impl<F: Copy> From<&Candidate<F>> for Selected<F> {
  #[inline]
  fn from(candidate: &Candidate<F>) -> Self {
    Self {
      name: candidate.name,
      tier: candidate.tier,
      requires: candidate.requires,
      func: candidate.func,
    }
  }
}

/// Why an exact tier request could not be satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TierUnavailable {
  /// No candidate is bound to the tier.
  NotImplemented,
  /// A candidate exists but these required capabilities are missing.
  MissingCaps(Caps),
}

impl fmt::Display for TierUnavailable {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NotImplemented => f.write_str("no kernel is bound to this tier"),
      Self::MissingCaps(missing) => write!(f, "missing cpu features: {missing}"),
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection
// ─────────────────────────────────────────────────────────────────────────────

/// Select the best kernel from a candidate list.
///
/// Returns the first candidate whose `requires` is satisfied by `caps`, or
/// `None` when the list has no baseline fallback and nothing matched.
#[inline]
#[must_use]
pub fn select<F: Copy>(caps: Caps, candidates: &[Candidate<F>]) -> Option<Selected<F>> {
  candidates.iter().find(|c| caps.has(c.requires)).map(Selected::from)
}

/// Select the best kernel bound to exactly `tier`.
///
/// A tier may carry several candidates (one per vector width, widest first);
/// the first one `caps` satisfies wins. Never falls back to another tier:
/// callers asking for a specific tier do so for reproducibility.
///
/// # Errors
///
/// Returns [`TierUnavailable`] if no candidate is bound to `tier`, or if
/// every bound candidate needs capabilities `caps` lacks. The reported
/// missing set is that of the least demanding (last) candidate.
pub fn select_tier<F: Copy>(
  caps: Caps,
  candidates: &[Candidate<F>],
  tier: KernelTier,
) -> Result<Selected<F>, TierUnavailable> {
  let mut missing = None;
  for candidate in candidates.iter().filter(|c| c.tier == tier) {
    if caps.has(candidate.requires) {
      return Ok(Selected::from(candidate));
    }
    missing = Some(candidate.requires.difference(caps));
  }

  Err(missing.map_or(TierUnavailable::NotImplemented, TierUnavailable::MissingCaps))
}

/// Order `candidates` by a tier preference list and select the best one.
///
/// Candidates whose tier does not appear in `order` are never chosen.
#[must_use]
pub fn select_by_preference<F: Copy>(
  caps: Caps,
  candidates: &[Candidate<F>],
  order: &[KernelTier],
) -> Option<Selected<F>> {
  order.iter().find_map(|&tier| select_tier(caps, candidates, tier).ok())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn kernel_a(x: u8) -> u8 {
    x
  }

  fn kernel_b(x: u8) -> u8 {
    x.wrapping_add(1)
  }

  type K = fn(u8) -> u8;

  fn candidates() -> [Candidate<K>; 2] {
    [
      Candidate::new("wide", KernelTier::Avx2, KernelTier::Avx2.requires(), kernel_b as K),
      Candidate::new("portable", KernelTier::Baseline, Caps::BASELINE, kernel_a as K),
    ]
  }

  #[test]
  fn test_select_portable_fallback() {
    let selected = select(Caps::BASELINE, &candidates()).unwrap();
    assert_eq!(selected.name, "portable");
    assert_eq!(selected.tier, KernelTier::Baseline);
    assert_eq!((selected.func)(5), 5);
  }

  #[test]
  fn test_select_prefers_first_available() {
    let caps = Caps::BASELINE | KernelTier::Avx2.requires();
    let selected = select(caps, &candidates()).unwrap();
    assert_eq!(selected.name, "wide");
    assert_eq!((selected.func)(5), 6);
  }

  #[test]
  fn test_select_empty_is_none() {
    let empty: [Candidate<K>; 0] = [];
    assert!(select(Caps::BASELINE, &empty).is_none());
  }

  #[test]
  fn test_select_tier_never_falls_back() {
    let err = select_tier(Caps::BASELINE, &candidates(), KernelTier::Avx2).unwrap_err();
    assert_eq!(err, TierUnavailable::MissingCaps(Caps::AVX | Caps::AVX2));

    let err = select_tier(Caps::BASELINE, &candidates(), KernelTier::Neon).unwrap_err();
    assert_eq!(err, TierUnavailable::NotImplemented);
  }

  #[test]
  fn test_select_tier_picks_widest_satisfied_candidate() {
    let gfni: [Candidate<K>; 3] = [
      Candidate::new("g512", KernelTier::Gfni, Caps::GFNI | Caps::AVX512F | Caps::AVX512BW, kernel_b as K),
      Candidate::new("g256", KernelTier::Gfni, Caps::GFNI | Caps::AVX | Caps::AVX2, kernel_b as K),
      Candidate::new("g128", KernelTier::Gfni, Caps::GFNI | Caps::SSE2, kernel_a as K),
    ];

    let all = Caps::GFNI | Caps::SSE2 | Caps::AVX | Caps::AVX2 | Caps::AVX512F | Caps::AVX512BW;
    let selected = select_tier(all, &gfni, KernelTier::Gfni).unwrap();
    assert_eq!(selected.name, "g512");
    assert_eq!(selected.requires, Caps::GFNI | Caps::AVX512F | Caps::AVX512BW);

    let selected = select_tier(Caps::GFNI | Caps::SSE2 | Caps::AVX | Caps::AVX2, &gfni, KernelTier::Gfni).unwrap();
    assert_eq!(selected.name, "g256");

    let selected = select_tier(Caps::GFNI | Caps::SSE2, &gfni, KernelTier::Gfni).unwrap();
    assert_eq!(selected.name, "g128");

    let err = select_tier(Caps::SSE2, &gfni, KernelTier::Gfni).unwrap_err();
    assert_eq!(err, TierUnavailable::MissingCaps(Caps::GFNI));
  }

  #[test]
  fn test_select_by_preference_skips_unlisted() {
    let caps = Caps::BASELINE | KernelTier::Avx2.requires();
    let selected = select_by_preference(caps, &candidates(), &[KernelTier::Baseline]).unwrap();
    assert_eq!(selected.name, "portable");
    let selected = select_by_preference(caps, &candidates(), &[KernelTier::Gfni, KernelTier::Avx2]).unwrap();
    assert_eq!(selected.name, "wide");
  }
}
