//! Region kernels.
//!
//! Every kernel has one of two shapes:
//!
//! - [`MulFn`]: `region[i] = region[i] ⊗ c`
//! - [`MaddFn`]: `dst[i] ^= src[i] ⊗ c`
//!
//! and every kernel treats the two degenerate constants the same way:
//!
//! | Constant | multiply | multiply-add |
//! |----------|----------|--------------|
//! | 0 | zero the region | no-op |
//! | 1 | no-op | XOR at the kernel's own width |
//!
//! Vector kernels process whole vectors first and hand the remainder to the
//! 64-bit register kernel of the same field, so any length is accepted.
//! Multiply-add kernels operate on the common prefix of `dst` and `src`.
//!
//! Kernels use unaligned loads and stores; the alignment contract published
//! by [`crate::GaloisField::alignment`] is a performance contract here.

/// Safe entries for a pair of `#[target_feature]` bodies.
///
/// The bodies see only constants `>= 2` (already masked). Entries are
/// reachable only through algorithms whose `requires` the descriptor
/// checked against detected capabilities.
macro_rules! simd_entries {
  ($mul:ident => $mul_impl:ident, $madd:ident => $madd_impl:ident, xor = $xor:path) => {
    pub(crate) fn $mul<F: crate::field::Field>(region: &mut [u8], constant: u8) {
      match constant & F::MASK {
        0 => region.fill(0),
        1 => {}
        // SAFETY: Dispatcher verifies the kernel's features before selecting it.
        c => unsafe { $mul_impl::<F>(region, c) },
      }
    }

    pub(crate) fn $madd<F: crate::field::Field>(dst: &mut [u8], src: &[u8], constant: u8) {
      match constant & F::MASK {
        0 => {}
        1 => $xor(dst, src),
        // SAFETY: Dispatcher verifies the kernel's features before selecting it.
        c => unsafe { $madd_impl::<F>(dst, src, c) },
      }
    }
  };
}

pub(crate) mod imul;
pub(crate) mod reference;
pub(crate) mod table;
pub(crate) mod xor;

#[cfg(target_arch = "x86_64")]
pub(crate) mod x86_64;

#[cfg(target_arch = "aarch64")]
pub(crate) mod aarch64;

#[cfg(all(target_arch = "powerpc64", target_feature = "vsx"))]
pub(crate) mod powerpc64;

/// In-place region multiply: `region[i] = region[i] ⊗ constant`.
pub type MulFn = fn(region: &mut [u8], constant: u8);

/// Fused multiply-accumulate: `dst[i] ^= src[i] ⊗ constant`.
pub type MaddFn = fn(dst: &mut [u8], src: &[u8], constant: u8);

/// Trim `dst` and `src` to their common length.
#[inline(always)]
pub(crate) fn common<'d, 's>(dst: &'d mut [u8], src: &'s [u8]) -> (&'d mut [u8], &'s [u8]) {
  let len = dst.len().min(src.len());
  (&mut dst[..len], &src[..len])
}

/// Multiply for GF(2), where the only constants are 0 and 1.
pub(crate) fn mul_gf2(region: &mut [u8], constant: u8) {
  if constant & 1 == 0 {
    region.fill(0);
  }
}
