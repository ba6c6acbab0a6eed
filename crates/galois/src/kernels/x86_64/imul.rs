//! Bit-sliced multiply with 16-bit lane multiplies (`pmullw`).
//!
//! Same decomposition as the register kernel. A 16-bit lane holds two
//! bytes; the plane mask keeps both bytes' slot bottoms and no slot product
//! reaches the next slot, so `mullo_epi16` is carry-free.
#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::x86_64::*;

use super::xor::{xor_avx2, xor_sse2};
use crate::{
  field::Field,
  kernels::{common, imul},
};

#[target_feature(enable = "sse2")]
unsafe fn product_sse2<F: Field>(x: __m128i, planes: __m128i, pdiv: &[__m128i; 8]) -> __m128i {
  let mut r = _mm_setzero_si128();
  for k in 0..F::EXPONENT as usize {
    let bits = _mm_and_si128(_mm_srl_epi16(x, _mm_cvtsi32_si128(k as i32)), planes);
    r = _mm_xor_si128(r, _mm_mullo_epi16(bits, pdiv[k]));
  }
  r
}

#[target_feature(enable = "sse2")]
unsafe fn splat_sse2<F: Field>(constant: u8) -> (__m128i, [__m128i; 8]) {
  let mut pdiv = [_mm_setzero_si128(); 8];
  for (v, &p) in pdiv.iter_mut().zip(F::pdiv(constant)) {
    *v = _mm_set1_epi16(i16::from(p));
  }
  (_mm_set1_epi8(F::PLANE as i8), pdiv)
}

#[target_feature(enable = "sse2")]
unsafe fn mul_sse2_impl<F: Field>(region: &mut [u8], constant: u8) {
  let (planes, pdiv) = splat_sse2::<F>(constant);
  let (vecs, tail) = region.as_chunks_mut::<16>();
  for v in vecs {
    let x = _mm_loadu_si128(v.as_ptr().cast());
    _mm_storeu_si128(v.as_mut_ptr().cast(), product_sse2::<F>(x, planes, &pdiv));
  }
  imul::mul_gpr64_raw::<F>(tail, constant);
}

#[target_feature(enable = "sse2")]
unsafe fn madd_sse2_impl<F: Field>(dst: &mut [u8], src: &[u8], constant: u8) {
  let (dst, src) = common(dst, src);
  let (planes, pdiv) = splat_sse2::<F>(constant);
  let (dst_vecs, dst_tail) = dst.as_chunks_mut::<16>();
  let (src_vecs, src_tail) = src.as_chunks::<16>();
  for (d, s) in dst_vecs.iter_mut().zip(src_vecs) {
    let x = _mm_loadu_si128(s.as_ptr().cast());
    let acc = _mm_loadu_si128(d.as_ptr().cast());
    let r = _mm_xor_si128(acc, product_sse2::<F>(x, planes, &pdiv));
    _mm_storeu_si128(d.as_mut_ptr().cast(), r);
  }
  imul::madd_gpr64_raw::<F>(dst_tail, src_tail, constant);
}

#[target_feature(enable = "avx2")]
unsafe fn product_avx2<F: Field>(x: __m256i, planes: __m256i, pdiv: &[__m256i; 8]) -> __m256i {
  let mut r = _mm256_setzero_si256();
  for k in 0..F::EXPONENT as usize {
    let bits = _mm256_and_si256(_mm256_srl_epi16(x, _mm_cvtsi32_si128(k as i32)), planes);
    r = _mm256_xor_si256(r, _mm256_mullo_epi16(bits, pdiv[k]));
  }
  r
}

#[target_feature(enable = "avx2")]
unsafe fn splat_avx2<F: Field>(constant: u8) -> (__m256i, [__m256i; 8]) {
  let mut pdiv = [_mm256_setzero_si256(); 8];
  for (v, &p) in pdiv.iter_mut().zip(F::pdiv(constant)) {
    *v = _mm256_set1_epi16(i16::from(p));
  }
  (_mm256_set1_epi8(F::PLANE as i8), pdiv)
}

#[target_feature(enable = "avx2")]
unsafe fn mul_avx2_impl<F: Field>(region: &mut [u8], constant: u8) {
  let (planes, pdiv) = splat_avx2::<F>(constant);
  let (vecs, tail) = region.as_chunks_mut::<32>();
  for v in vecs {
    let x = _mm256_loadu_si256(v.as_ptr().cast());
    _mm256_storeu_si256(v.as_mut_ptr().cast(), product_avx2::<F>(x, planes, &pdiv));
  }
  imul::mul_gpr64_raw::<F>(tail, constant);
}

#[target_feature(enable = "avx2")]
unsafe fn madd_avx2_impl<F: Field>(dst: &mut [u8], src: &[u8], constant: u8) {
  let (dst, src) = common(dst, src);
  let (planes, pdiv) = splat_avx2::<F>(constant);
  let (dst_vecs, dst_tail) = dst.as_chunks_mut::<32>();
  let (src_vecs, src_tail) = src.as_chunks::<32>();
  for (d, s) in dst_vecs.iter_mut().zip(src_vecs) {
    let x = _mm256_loadu_si256(s.as_ptr().cast());
    let acc = _mm256_loadu_si256(d.as_ptr().cast());
    let r = _mm256_xor_si256(acc, product_avx2::<F>(x, planes, &pdiv));
    _mm256_storeu_si256(d.as_mut_ptr().cast(), r);
  }
  imul::madd_gpr64_raw::<F>(dst_tail, src_tail, constant);
}

simd_entries!(mul_sse2 => mul_sse2_impl, madd_sse2 => madd_sse2_impl, xor = xor_sse2);
simd_entries!(mul_avx2 => mul_avx2_impl, madd_avx2 => madd_avx2_impl, xor = xor_avx2);
