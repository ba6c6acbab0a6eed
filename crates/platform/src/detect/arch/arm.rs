// ─────────────────────────────────────────────────────────────────────────────
// 32-bit ARM Detection
// ─────────────────────────────────────────────────────────────────────────────
//
// User space has no portable NEON query on 32-bit ARM. Instead of probing by
// executing a NEON instruction under a SIGILL handler, the capability is
// taken from the build target (`-C target-feature=+neon` or a `*-neon`
// target triple), which is known ahead of deployment.

use crate::caps::Caps;

pub(crate) const fn detect() -> Caps {
  if cfg!(target_feature = "neon") {
    Caps::BASELINE.union(Caps::NEON)
  } else {
    Caps::BASELINE
  }
}
