//! aarch64 NEON kernels.
//!
//! The `_64` variants run the same algorithms on 64-bit D registers.
//!
//! # Safety
//!
//! Uses `unsafe` for ARM SIMD intrinsics. Callers must ensure NEON is
//! available before executing these kernels (the field descriptor does this
//! when it binds an algorithm).
#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::aarch64::*;

use crate::{
  field::Field,
  kernels::{common, imul, xor::xor_gpr64},
};

// ─────────────────────────────────────────────────────────────────────────────
// XOR
// ─────────────────────────────────────────────────────────────────────────────

#[target_feature(enable = "neon")]
unsafe fn xor_neon_impl(dst: &mut [u8], src: &[u8]) {
  let (dst, src) = common(dst, src);
  let (dst_vecs, dst_tail) = dst.as_chunks_mut::<16>();
  let (src_vecs, src_tail) = src.as_chunks::<16>();
  for (d, s) in dst_vecs.iter_mut().zip(src_vecs) {
    let r = veorq_u8(vld1q_u8(d.as_ptr()), vld1q_u8(s.as_ptr()));
    vst1q_u8(d.as_mut_ptr(), r);
  }
  xor_gpr64(dst_tail, src_tail);
}

pub(crate) fn xor_neon(dst: &mut [u8], src: &[u8]) {
  // SAFETY: Dispatcher verifies NEON before selecting this kernel.
  unsafe { xor_neon_impl(dst, src) }
}

pub(crate) fn madd_xor_neon(dst: &mut [u8], src: &[u8], constant: u8) {
  if constant & 1 != 0 {
    xor_neon(dst, src);
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bit-sliced multiply (byte lanes)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
struct Planes {
  mask: uint8x16_t,
  pdiv: [uint8x16_t; 8],
  len: usize,
}

impl Planes {
  #[inline]
  #[target_feature(enable = "neon")]
  unsafe fn new<F: Field>(constant: u8) -> Self {
    let mut pdiv = [vdupq_n_u8(0); 8];
    let rows = F::pdiv(constant);
    for (v, &p) in pdiv.iter_mut().zip(rows) {
      *v = vdupq_n_u8(p);
    }
    Self {
      mask: vdupq_n_u8(F::PLANE),
      pdiv,
      len: rows.len(),
    }
  }

  /// A byte lane holds whole slots, so `vmulq_u8` never carries out of one.
  #[inline]
  #[target_feature(enable = "neon")]
  unsafe fn product(&self, x: uint8x16_t) -> uint8x16_t {
    let mut r = vdupq_n_u8(0);
    for (k, &p) in self.pdiv.iter().take(self.len).enumerate() {
      let bits = vandq_u8(vshlq_u8(x, vdupq_n_s8(-(k as i8))), self.mask);
      r = veorq_u8(r, vmulq_u8(bits, p));
    }
    r
  }

  /// [`product`](Self::product) on a 64-bit D register.
  #[inline]
  #[target_feature(enable = "neon")]
  unsafe fn product_64(&self, x: uint8x8_t) -> uint8x8_t {
    let mask = vget_low_u8(self.mask);
    let mut r = vdup_n_u8(0);
    for (k, &p) in self.pdiv.iter().take(self.len).enumerate() {
      let bits = vand_u8(vshl_u8(x, vdup_n_s8(-(k as i8))), mask);
      r = veor_u8(r, vmul_u8(bits, vget_low_u8(p)));
    }
    r
  }
}

#[target_feature(enable = "neon")]
unsafe fn imul_mul_impl<F: Field>(region: &mut [u8], constant: u8) {
  let planes = Planes::new::<F>(constant);
  let (vecs, tail) = region.as_chunks_mut::<16>();
  for v in vecs {
    vst1q_u8(v.as_mut_ptr(), planes.product(vld1q_u8(v.as_ptr())));
  }
  imul::mul_gpr64_raw::<F>(tail, constant);
}

#[target_feature(enable = "neon")]
unsafe fn imul_madd_impl<F: Field>(dst: &mut [u8], src: &[u8], constant: u8) {
  let (dst, src) = common(dst, src);
  let planes = Planes::new::<F>(constant);
  let (dst_vecs, dst_tail) = dst.as_chunks_mut::<16>();
  let (src_vecs, src_tail) = src.as_chunks::<16>();
  for (d, s) in dst_vecs.iter_mut().zip(src_vecs) {
    let r = veorq_u8(vld1q_u8(d.as_ptr()), planes.product(vld1q_u8(s.as_ptr())));
    vst1q_u8(d.as_mut_ptr(), r);
  }
  imul::madd_gpr64_raw::<F>(dst_tail, src_tail, constant);
}

#[target_feature(enable = "neon")]
unsafe fn imul_mul_64_impl<F: Field>(region: &mut [u8], constant: u8) {
  let planes = Planes::new::<F>(constant);
  let (vecs, tail) = region.as_chunks_mut::<8>();
  for v in vecs {
    vst1_u8(v.as_mut_ptr(), planes.product_64(vld1_u8(v.as_ptr())));
  }
  imul::mul_gpr64_raw::<F>(tail, constant);
}

#[target_feature(enable = "neon")]
unsafe fn imul_madd_64_impl<F: Field>(dst: &mut [u8], src: &[u8], constant: u8) {
  let (dst, src) = common(dst, src);
  let planes = Planes::new::<F>(constant);
  let (dst_vecs, dst_tail) = dst.as_chunks_mut::<8>();
  let (src_vecs, src_tail) = src.as_chunks::<8>();
  for (d, s) in dst_vecs.iter_mut().zip(src_vecs) {
    let r = veor_u8(vld1_u8(d.as_ptr()), planes.product_64(vld1_u8(s.as_ptr())));
    vst1_u8(d.as_mut_ptr(), r);
  }
  imul::madd_gpr64_raw::<F>(dst_tail, src_tail, constant);
}

// ─────────────────────────────────────────────────────────────────────────────
// Nibble shuffle (`tbl`)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
struct Nibbles {
  lo: uint8x16_t,
  hi: uint8x16_t,
  low_nibble: uint8x16_t,
}

impl Nibbles {
  #[inline]
  #[target_feature(enable = "neon")]
  unsafe fn new<F: Field>(constant: u8) -> Self {
    let (lo, hi) = F::nibbles(constant);
    Self {
      lo: vld1q_u8(lo.as_ptr()),
      hi: vld1q_u8(hi.as_ptr()),
      low_nibble: vdupq_n_u8(0x0F),
    }
  }

  #[inline]
  #[target_feature(enable = "neon")]
  unsafe fn product(self, x: uint8x16_t) -> uint8x16_t {
    let l = vqtbl1q_u8(self.lo, vandq_u8(x, self.low_nibble));
    let h = vqtbl1q_u8(self.hi, vshrq_n_u8::<4>(x));
    veorq_u8(l, h)
  }

  /// Eight lookups from the same 16-byte tables.
  #[inline]
  #[target_feature(enable = "neon")]
  unsafe fn product_64(self, x: uint8x8_t) -> uint8x8_t {
    let l = vqtbl1_u8(self.lo, vand_u8(x, vget_low_u8(self.low_nibble)));
    let h = vqtbl1_u8(self.hi, vshr_n_u8::<4>(x));
    veor_u8(l, h)
  }
}

#[target_feature(enable = "neon")]
unsafe fn shuffle_mul_impl<F: Field>(region: &mut [u8], constant: u8) {
  let t = Nibbles::new::<F>(constant);
  let (vecs, tail) = region.as_chunks_mut::<16>();
  for v in vecs {
    vst1q_u8(v.as_mut_ptr(), t.product(vld1q_u8(v.as_ptr())));
  }
  imul::mul_gpr64_raw::<F>(tail, constant);
}

#[target_feature(enable = "neon")]
unsafe fn shuffle_madd_impl<F: Field>(dst: &mut [u8], src: &[u8], constant: u8) {
  let (dst, src) = common(dst, src);
  let t = Nibbles::new::<F>(constant);
  let (dst_vecs, dst_tail) = dst.as_chunks_mut::<16>();
  let (src_vecs, src_tail) = src.as_chunks::<16>();
  for (d, s) in dst_vecs.iter_mut().zip(src_vecs) {
    let r = veorq_u8(vld1q_u8(d.as_ptr()), t.product(vld1q_u8(s.as_ptr())));
    vst1q_u8(d.as_mut_ptr(), r);
  }
  imul::madd_gpr64_raw::<F>(dst_tail, src_tail, constant);
}

#[target_feature(enable = "neon")]
unsafe fn shuffle_mul_64_impl<F: Field>(region: &mut [u8], constant: u8) {
  let t = Nibbles::new::<F>(constant);
  let (vecs, tail) = region.as_chunks_mut::<8>();
  for v in vecs {
    vst1_u8(v.as_mut_ptr(), t.product_64(vld1_u8(v.as_ptr())));
  }
  imul::mul_gpr64_raw::<F>(tail, constant);
}

#[target_feature(enable = "neon")]
unsafe fn shuffle_madd_64_impl<F: Field>(dst: &mut [u8], src: &[u8], constant: u8) {
  let (dst, src) = common(dst, src);
  let t = Nibbles::new::<F>(constant);
  let (dst_vecs, dst_tail) = dst.as_chunks_mut::<8>();
  let (src_vecs, src_tail) = src.as_chunks::<8>();
  for (d, s) in dst_vecs.iter_mut().zip(src_vecs) {
    let r = veor_u8(vld1_u8(d.as_ptr()), t.product_64(vld1_u8(s.as_ptr())));
    vst1_u8(d.as_mut_ptr(), r);
  }
  imul::madd_gpr64_raw::<F>(dst_tail, src_tail, constant);
}

simd_entries!(mul_imul_neon => imul_mul_impl, madd_imul_neon => imul_madd_impl, xor = xor_neon);
simd_entries!(mul_imul_neon_64 => imul_mul_64_impl, madd_imul_neon_64 => imul_madd_64_impl, xor = xor_neon);
simd_entries!(mul_shuffle_neon => shuffle_mul_impl, madd_shuffle_neon => shuffle_madd_impl, xor = xor_neon);
simd_entries!(
  mul_shuffle_neon_64 => shuffle_mul_64_impl,
  madd_shuffle_neon_64 => shuffle_madd_64_impl,
  xor = xor_neon
);
