// ─────────────────────────────────────────────────────────────────────────────
// aarch64 Detection
// ─────────────────────────────────────────────────────────────────────────────
//
// Advanced SIMD is architecturally mandatory for AArch64 application
// profiles, but some kernels and hypervisors can mask it. With `std` the
// runtime query is authoritative; otherwise the compile-time target features
// decide.

use crate::caps::Caps;

pub(crate) fn detect() -> Caps {
  #[cfg(feature = "std")]
  {
    if std::arch::is_aarch64_feature_detected!("neon") {
      Caps::BASELINE | Caps::NEON
    } else {
      Caps::BASELINE
    }
  }

  #[cfg(not(feature = "std"))]
  {
    Caps::BASELINE
  }
}
