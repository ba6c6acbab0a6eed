//! Portable XOR kernels.
//!
//! XOR is all of GF(2) arithmetic and the `constant == 1` multiply-add of
//! every other field. The raw `xor_*` functions accumulate `src` into `dst`;
//! the `madd_*` wrappers add GF(2) constant handling on top.

use super::common;

/// One byte per step.
pub(crate) fn xor_scalar(dst: &mut [u8], src: &[u8]) {
  for (d, &s) in dst.iter_mut().zip(src) {
    *d ^= s;
  }
}

/// Four bytes per step through a 32-bit register.
pub(crate) fn xor_gpr32(dst: &mut [u8], src: &[u8]) {
  let (dst, src) = common(dst, src);
  let (dst_words, dst_tail) = dst.as_chunks_mut::<4>();
  let (src_words, src_tail) = src.as_chunks::<4>();
  for (d, s) in dst_words.iter_mut().zip(src_words) {
    *d = (u32::from_ne_bytes(*d) ^ u32::from_ne_bytes(*s)).to_ne_bytes();
  }
  xor_scalar(dst_tail, src_tail);
}

/// Eight bytes per step through a 64-bit register.
pub(crate) fn xor_gpr64(dst: &mut [u8], src: &[u8]) {
  let (dst, src) = common(dst, src);
  let (dst_words, dst_tail) = dst.as_chunks_mut::<8>();
  let (src_words, src_tail) = src.as_chunks::<8>();
  for (d, s) in dst_words.iter_mut().zip(src_words) {
    *d = (u64::from_ne_bytes(*d) ^ u64::from_ne_bytes(*s)).to_ne_bytes();
  }
  xor_scalar(dst_tail, src_tail);
}

macro_rules! gf2_madd {
  ($name:ident, $xor:path) => {
    pub(crate) fn $name(dst: &mut [u8], src: &[u8], constant: u8) {
      if constant & 1 != 0 {
        $xor(dst, src);
      }
    }
  };
}

gf2_madd!(madd_scalar, xor_scalar);
gf2_madd!(madd_gpr32, xor_gpr32);
gf2_madd!(madd_gpr64, xor_gpr64);

#[cfg(test)]
mod tests {
  use alloc::vec::Vec;

  use super::*;

  fn pattern(len: usize, salt: u8) -> Vec<u8> {
    (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(salt)).collect()
  }

  #[test]
  fn widths_agree_on_ragged_lengths() {
    for len in [0, 1, 3, 4, 7, 8, 9, 31, 83] {
      let src = pattern(len, 5);
      let mut expected = pattern(len, 11);
      xor_scalar(&mut expected, &src);

      let mut got = pattern(len, 11);
      xor_gpr32(&mut got, &src);
      assert_eq!(got, expected, "gpr32 len={len}");

      let mut got = pattern(len, 11);
      xor_gpr64(&mut got, &src);
      assert_eq!(got, expected, "gpr64 len={len}");
    }
  }

  #[test]
  fn gf2_zero_constant_is_noop() {
    let src = pattern(19, 1);
    let mut dst = pattern(19, 2);
    madd_gpr64(&mut dst, &src, 0);
    assert_eq!(dst, pattern(19, 2));
    madd_gpr64(&mut dst, &src, 1);
    madd_gpr32(&mut dst, &src, 1);
    assert_eq!(dst, pattern(19, 2));
  }

  #[test]
  fn unequal_lengths_use_common_prefix() {
    let mut dst = [0xFFu8; 12];
    xor_gpr64(&mut dst, &[0xFF; 9]);
    assert_eq!(&dst[..9], &[0; 9]);
    assert_eq!(&dst[9..], &[0xFF; 3]);
  }
}
