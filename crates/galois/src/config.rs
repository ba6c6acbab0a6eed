//! Runtime configuration (tier override).
//!
//! `GFKIT_FORCE_TIER` pins automatic selection to one tier:
//!
//! | Value | Effect |
//! |-------|--------|
//! | unset, empty, `auto` | best available tier |
//! | `baseline`, `portable`, `scalar` | general-purpose register kernels |
//! | `sse2`, `ssse3`, `sse41`, `avx2`, `avx512`, `gfni`, `neon`, `vsx` | that tier |
//!
//! The variable is read once per process. Forced tiers are always clamped to
//! what the hardware provides: a tier this machine lacks degrades to the
//! next tier below it in the preference order. Explicit tier requests passed
//! to [`build_field`](crate::build_field) ignore the variable.

use backend::KernelTier;
use platform::Caps;

/// Effective tier-selection configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GaloisConfig {
  /// Tier named by the environment, `None` for automatic selection.
  pub requested_tier: Option<KernelTier>,
  /// Requested tier clamped to the current capabilities.
  pub effective_tier: Option<KernelTier>,
}

/// Parse a `GFKIT_FORCE_TIER` value.
///
/// Returns `None` for automatic selection, including unrecognized values.
#[must_use]
pub fn parse_force_tier(value: &str) -> Option<KernelTier> {
  let value = value.trim();
  if value.is_empty() || value.eq_ignore_ascii_case("auto") {
    return None;
  }
  KernelTier::from_name(value)
}

#[cfg(feature = "std")]
fn requested_tier() -> Option<KernelTier> {
  use std::sync::OnceLock;
  static FORCE: OnceLock<Option<KernelTier>> = OnceLock::new();
  *FORCE.get_or_init(|| {
    let value = std::env::var("GFKIT_FORCE_TIER").ok()?;
    let tier = parse_force_tier(&value);
    if tier.is_none() && !value.trim().is_empty() && !value.trim().eq_ignore_ascii_case("auto") {
      tracing::warn!(value = %value, "GFKIT_FORCE_TIER not recognized, using automatic selection");
    }
    tier
  })
}

#[cfg(not(feature = "std"))]
fn requested_tier() -> Option<KernelTier> {
  None
}

/// Clamp `requested` to the first tier at or below it, in preference
/// order, that `caps` can run.
///
/// A tier outside this architecture's preference order clamps to `None`.
#[must_use]
pub(crate) fn clamp_tier(requested: KernelTier, caps: Caps) -> Option<KernelTier> {
  let order = KernelTier::preference_order();
  let start = order.iter().position(|&t| t == requested)?;
  order.get(start..)?.iter().copied().find(|t| t.is_available(caps))
}

/// Current configuration, judged against [`platform::caps`].
#[must_use]
pub fn config() -> GaloisConfig {
  let requested_tier = requested_tier();
  GaloisConfig {
    requested_tier,
    effective_tier: requested_tier.and_then(|t| clamp_tier(t, platform::caps())),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_values() {
    assert_eq!(parse_force_tier(""), None);
    assert_eq!(parse_force_tier(" AUTO "), None);
    assert_eq!(parse_force_tier("portable"), Some(KernelTier::Baseline));
    assert_eq!(parse_force_tier("Sse41"), Some(KernelTier::Sse41));
    assert_eq!(parse_force_tier("avx512"), Some(KernelTier::Avx512));
    assert_eq!(parse_force_tier("vsx"), Some(KernelTier::Vsx));
    assert_eq!(parse_force_tier("quantum"), None);
  }

  #[test]
  fn baseline_never_clamps() {
    assert_eq!(clamp_tier(KernelTier::Baseline, Caps::BASELINE), Some(KernelTier::Baseline));
  }

  #[cfg(target_arch = "x86_64")]
  #[test]
  fn clamp_walks_down_preference_order() {
    let sse = Caps::BASELINE | KernelTier::Sse41.requires();
    assert_eq!(clamp_tier(KernelTier::Gfni, sse), Some(KernelTier::Sse41));
    assert_eq!(clamp_tier(KernelTier::Ssse3, sse), Some(KernelTier::Ssse3));
    assert_eq!(clamp_tier(KernelTier::Avx2, Caps::BASELINE), Some(KernelTier::Baseline));
    assert_eq!(clamp_tier(KernelTier::Neon, sse), None);
  }

  #[cfg(target_arch = "aarch64")]
  #[test]
  fn clamp_walks_down_preference_order() {
    assert_eq!(clamp_tier(KernelTier::Neon, Caps::BASELINE), Some(KernelTier::Baseline));
    assert_eq!(clamp_tier(KernelTier::Avx2, Caps::BASELINE | Caps::NEON), None);
  }
}
