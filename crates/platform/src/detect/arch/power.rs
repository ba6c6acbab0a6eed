// ─────────────────────────────────────────────────────────────────────────────
// POWER Detection
// ─────────────────────────────────────────────────────────────────────────────
//
// Runtime VSX detection is not exposed on stable Rust; the build target
// decides.

use crate::caps::Caps;

pub(crate) const fn detect() -> Caps {
  if cfg!(target_feature = "vsx") {
    Caps::BASELINE.union(Caps::VSX)
  } else {
    Caps::BASELINE
  }
}
