//! x86_64 vector kernels.
//!
//! # Safety
//!
//! Uses `unsafe` for x86 SIMD intrinsics. Callers must ensure the required
//! CPU features are available before executing these kernels (the field
//! descriptor does this when it binds an algorithm).

pub(crate) mod gfni;
pub(crate) mod imul;
pub(crate) mod shuffle;
pub(crate) mod xor;
