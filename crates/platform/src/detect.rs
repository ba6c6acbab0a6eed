//! Capability detection with a race-free process-wide cache.
//!
//! Detection runs at most once per process (per [`reset_for_testing`]).
//! Concurrent first callers race on a compare-exchange; the loser spins
//! until the winner has published the result.

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

use crate::caps::Caps;

mod arch {
  #[cfg(target_arch = "aarch64")]
  pub mod aarch64;
  #[cfg(target_arch = "arm")]
  pub mod arm;
  #[cfg(any(target_arch = "powerpc", target_arch = "powerpc64"))]
  pub mod power;
  #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
  pub mod x86;
}

// ─────────────────────────────────────────────────────────────────────────────
// Cache
// ─────────────────────────────────────────────────────────────────────────────

const UNINIT: u8 = 0;
const INITIALIZING: u8 = 1;
const READY: u8 = 2;

static STATE: AtomicU8 = AtomicU8::new(UNINIT);
static DETECTED: AtomicU32 = AtomicU32::new(0);

static OVERRIDE_SET: AtomicBool = AtomicBool::new(false);
static OVERRIDE_MASK: AtomicU32 = AtomicU32::new(u32::MAX);

#[cfg_attr(miri, allow(dead_code))]
fn get_or_init() -> Caps {
  if STATE.load(Ordering::Acquire) == READY {
    return Caps(DETECTED.load(Ordering::Acquire));
  }

  match STATE.compare_exchange(UNINIT, INITIALIZING, Ordering::AcqRel, Ordering::Acquire) {
    Ok(_) => {
      let caps = detect_uncached();
      DETECTED.store(caps.0, Ordering::Release);
      STATE.store(READY, Ordering::Release);
      caps
    }
    Err(INITIALIZING) => {
      while STATE.load(Ordering::Acquire) == INITIALIZING {
        core::hint::spin_loop();
      }
      Caps(DETECTED.load(Ordering::Acquire))
    }
    Err(_) => Caps(DETECTED.load(Ordering::Acquire)),
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Override Support
// ─────────────────────────────────────────────────────────────────────────────

/// Restrict the capabilities reported by [`caps()`].
///
/// With `Some(mask)`, [`caps()`] returns `detected & mask` (plus
/// [`Caps::BASELINE`], which can never be removed). The override can only
/// hide features the hardware has, never invent ones it lacks, so kernels
/// selected under an override are always legal to execute.
///
/// Pass `None` to clear the override.
///
/// # Example
///
/// ```
/// use platform::Caps;
///
/// // Simulate a machine without any SIMD.
/// platform::set_caps_override(Some(Caps::BASELINE));
/// assert_eq!(platform::caps(), Caps::BASELINE);
/// platform::set_caps_override(None);
/// ```
pub fn set_caps_override(value: Option<Caps>) {
  match value {
    Some(mask) => {
      OVERRIDE_MASK.store(mask.0, Ordering::Release);
      OVERRIDE_SET.store(true, Ordering::Release);
    }
    None => {
      OVERRIDE_SET.store(false, Ordering::Release);
      OVERRIDE_MASK.store(u32::MAX, Ordering::Release);
    }
  }
}

/// Check if an override is currently set.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  OVERRIDE_SET.load(Ordering::Acquire)
}

/// Clear any override and forget the cached detection result.
///
/// The next call to [`caps()`] probes the hardware again. Meant for tests
/// that simulate different machines in one process.
#[cold]
pub fn reset_for_testing() {
  set_caps_override(None);
  let _ = STATE.compare_exchange(READY, UNINIT, Ordering::AcqRel, Ordering::Acquire);
}

// ─────────────────────────────────────────────────────────────────────────────
// Main API
// ─────────────────────────────────────────────────────────────────────────────

/// Capabilities the hardware and OS actually provide, ignoring any override.
///
/// Under Miri only [`Caps::BASELINE`] is reported, since Miri cannot
/// interpret SIMD intrinsics.
#[inline]
#[must_use]
pub fn detected() -> Caps {
  #[cfg(miri)]
  {
    Caps::BASELINE
  }

  #[cfg(not(miri))]
  {
    get_or_init()
  }
}

/// Capabilities kernels may use: [`detected()`] narrowed by the override.
///
/// This is the main entry point for capability-based dispatch.
#[inline]
#[must_use]
pub fn caps() -> Caps {
  let detected = detected();
  if !OVERRIDE_SET.load(Ordering::Acquire) {
    return detected;
  }
  let mask = Caps(OVERRIDE_MASK.load(Ordering::Acquire));
  detected.intersection(mask) | Caps::BASELINE
}

/// Capabilities known at compile time from `-C target-feature` flags.
#[inline(always)]
#[must_use]
pub const fn caps_static() -> Caps {
  let mut caps = Caps::BASELINE;
  if cfg!(target_feature = "sse2") {
    caps = caps.union(Caps::SSE2);
  }
  if cfg!(target_feature = "ssse3") {
    caps = caps.union(Caps::SSSE3);
  }
  if cfg!(target_feature = "sse4.1") {
    caps = caps.union(Caps::SSE41);
  }
  if cfg!(target_feature = "sse4.2") {
    caps = caps.union(Caps::SSE42);
  }
  if cfg!(target_feature = "avx") {
    caps = caps.union(Caps::AVX);
  }
  if cfg!(target_feature = "avx2") {
    caps = caps.union(Caps::AVX2);
  }
  if cfg!(target_feature = "avx512f") {
    caps = caps.union(Caps::AVX512F);
  }
  if cfg!(target_feature = "avx512bw") {
    caps = caps.union(Caps::AVX512BW);
  }
  if cfg!(target_feature = "gfni") {
    caps = caps.union(Caps::GFNI);
  }
  if cfg!(all(any(target_arch = "aarch64", target_arch = "arm"), target_feature = "neon")) {
    caps = caps.union(Caps::NEON);
  }
  if cfg!(target_feature = "vsx") {
    caps = caps.union(Caps::VSX);
  }
  caps
}

/// Probe the hardware without touching the cache.
///
/// Idempotent and side-effect free.
#[must_use]
pub fn detect_uncached() -> Caps {
  #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
  {
    caps_static() | arch::x86::detect()
  }

  #[cfg(target_arch = "aarch64")]
  {
    caps_static() | arch::aarch64::detect()
  }

  #[cfg(target_arch = "arm")]
  {
    caps_static() | arch::arm::detect()
  }

  #[cfg(any(target_arch = "powerpc", target_arch = "powerpc64"))]
  {
    caps_static() | arch::power::detect()
  }

  #[cfg(not(any(
    target_arch = "x86",
    target_arch = "x86_64",
    target_arch = "aarch64",
    target_arch = "arm",
    target_arch = "powerpc",
    target_arch = "powerpc64"
  )))]
  {
    caps_static()
  }
}
