//! POWER VSX kernels.
//!
//! Compiled only when the target enables VSX; the 16-byte `u128` lanes
//! lower to `xxlxor`.

use super::{common, xor::xor_gpr64};

/// Sixteen bytes per step through a VSX register.
pub(crate) fn xor_vsx(dst: &mut [u8], src: &[u8]) {
  let (dst, src) = common(dst, src);
  let (dst_vecs, dst_tail) = dst.as_chunks_mut::<16>();
  let (src_vecs, src_tail) = src.as_chunks::<16>();
  for (d, s) in dst_vecs.iter_mut().zip(src_vecs) {
    *d = (u128::from_ne_bytes(*d) ^ u128::from_ne_bytes(*s)).to_ne_bytes();
  }
  xor_gpr64(dst_tail, src_tail);
}

pub(crate) fn madd_xor_vsx(dst: &mut [u8], src: &[u8], constant: u8) {
  if constant & 1 != 0 {
    xor_vsx(dst, src);
  }
}
