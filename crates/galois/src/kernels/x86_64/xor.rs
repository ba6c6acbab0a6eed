//! SSE2, AVX2 and AVX-512 XOR.
#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::x86_64::*;

use crate::kernels::{common, xor::xor_gpr64};

#[target_feature(enable = "sse2")]
unsafe fn xor_sse2_impl(dst: &mut [u8], src: &[u8]) {
  let (dst, src) = common(dst, src);
  let (dst_vecs, dst_tail) = dst.as_chunks_mut::<16>();
  let (src_vecs, src_tail) = src.as_chunks::<16>();
  for (d, s) in dst_vecs.iter_mut().zip(src_vecs) {
    let a = _mm_loadu_si128(d.as_ptr().cast());
    let b = _mm_loadu_si128(s.as_ptr().cast());
    _mm_storeu_si128(d.as_mut_ptr().cast(), _mm_xor_si128(a, b));
  }
  xor_gpr64(dst_tail, src_tail);
}

#[target_feature(enable = "avx2")]
unsafe fn xor_avx2_impl(dst: &mut [u8], src: &[u8]) {
  let (dst, src) = common(dst, src);
  let (dst_vecs, dst_tail) = dst.as_chunks_mut::<32>();
  let (src_vecs, src_tail) = src.as_chunks::<32>();
  for (d, s) in dst_vecs.iter_mut().zip(src_vecs) {
    let a = _mm256_loadu_si256(d.as_ptr().cast());
    let b = _mm256_loadu_si256(s.as_ptr().cast());
    _mm256_storeu_si256(d.as_mut_ptr().cast(), _mm256_xor_si256(a, b));
  }
  xor_gpr64(dst_tail, src_tail);
}

#[target_feature(enable = "avx512f")]
unsafe fn xor_avx512_impl(dst: &mut [u8], src: &[u8]) {
  let (dst, src) = common(dst, src);
  let (dst_vecs, dst_tail) = dst.as_chunks_mut::<64>();
  let (src_vecs, src_tail) = src.as_chunks::<64>();
  for (d, s) in dst_vecs.iter_mut().zip(src_vecs) {
    let a = _mm512_loadu_si512(d.as_ptr().cast());
    let b = _mm512_loadu_si512(s.as_ptr().cast());
    _mm512_storeu_si512(d.as_mut_ptr().cast(), _mm512_xor_si512(a, b));
  }
  xor_gpr64(dst_tail, src_tail);
}

/// SSE2 is part of the x86_64 baseline.
pub(crate) fn xor_sse2(dst: &mut [u8], src: &[u8]) {
  // SAFETY: SSE2 is always available on x86_64.
  unsafe { xor_sse2_impl(dst, src) }
}

pub(crate) fn xor_avx2(dst: &mut [u8], src: &[u8]) {
  // SAFETY: Dispatcher verifies AVX2 before selecting this kernel.
  unsafe { xor_avx2_impl(dst, src) }
}

pub(crate) fn xor_avx512(dst: &mut [u8], src: &[u8]) {
  // SAFETY: Dispatcher verifies AVX-512F before selecting this kernel.
  unsafe { xor_avx512_impl(dst, src) }
}

pub(crate) fn madd_sse2(dst: &mut [u8], src: &[u8], constant: u8) {
  if constant & 1 != 0 {
    xor_sse2(dst, src);
  }
}

pub(crate) fn madd_avx2(dst: &mut [u8], src: &[u8], constant: u8) {
  if constant & 1 != 0 {
    xor_avx2(dst, src);
  }
}

pub(crate) fn madd_avx512(dst: &mut [u8], src: &[u8], constant: u8) {
  if constant & 1 != 0 {
    xor_avx512(dst, src);
  }
}
