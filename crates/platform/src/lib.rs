//! Hardware capability detection for gfkit.
//!
//! This crate is the **single source of truth** for which instruction-set
//! extensions the Galois field kernels may use on the running machine.
//!
//! # Main Entry Point
//!
//! ```
//! use platform::Caps;
//!
//! let caps = platform::caps();
//! assert!(caps.has(Caps::BASELINE));
//!
//! if caps.has(Caps::GFNI | Caps::AVX2) {
//!   // 256-bit affine-transform kernels are legal here.
//! }
//! ```
//!
//! # Detection Strategy
//!
//! | Architecture | Method |
//! |--------------|--------|
//! | x86_64 | CPUID leaves 1 and 7, gated by OSXSAVE + XGETBV |
//! | x86 | `is_x86_feature_detected!` (std) or target features |
//! | aarch64 | `is_aarch64_feature_detected!` (std) or target features |
//! | arm, powerpc | target features only |
//!
//! # Design Philosophy
//!
//! 1. **One API**: kernels query [`caps()`] instead of doing ad-hoc detection.
//! 2. **Baseline is never absent**: [`Caps::BASELINE`] is in every result.
//! 3. **Cached**: detection runs once; the cache is a race-free atomic once-guard that works without
//!    `std`.
//! 4. **Testable**: [`set_caps_override`] narrows the reported set and [`reset_for_testing`] forces
//!    re-detection.
//! 5. **Miri-safe**: under Miri only the baseline is reported.

// Fallibility discipline: deny unwrap/expect in production, allow in tests.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(any(feature = "std", test))]
extern crate std;

// ─────────────────────────────────────────────────────────────────────────────
// Core modules
// ─────────────────────────────────────────────────────────────────────────────

pub mod caps;
mod detect;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports
// ─────────────────────────────────────────────────────────────────────────────

pub use caps::Caps;
pub use detect::{caps, caps_static, detect_uncached, detected, has_override, reset_for_testing, set_caps_override};
