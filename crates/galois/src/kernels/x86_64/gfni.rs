//! GFNI affine-transform kernels.
//!
//! The native `gf2p8mul` reduces by 0x11B, not this crate's polynomials, so
//! multiplication goes through `gf2p8affineqb` instead: "multiply by `c`" is
//! GF(2)-linear on a byte, and the per-constant 8×8 bit matrix handles every
//! packed symbol of the byte at once. One instruction per vector.
#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::x86_64::*;

use super::xor::{xor_avx2, xor_avx512, xor_sse2};
use crate::{
  field::Field,
  kernels::{common, imul},
};

#[target_feature(enable = "gfni,sse2")]
unsafe fn mul_128_impl<F: Field>(region: &mut [u8], constant: u8) {
  let matrix = _mm_set1_epi64x(F::affine(constant) as i64);
  let (vecs, tail) = region.as_chunks_mut::<16>();
  for v in vecs {
    let x = _mm_loadu_si128(v.as_ptr().cast());
    _mm_storeu_si128(v.as_mut_ptr().cast(), _mm_gf2p8affine_epi64_epi8::<0>(x, matrix));
  }
  imul::mul_gpr64_raw::<F>(tail, constant);
}

#[target_feature(enable = "gfni,sse2")]
unsafe fn madd_128_impl<F: Field>(dst: &mut [u8], src: &[u8], constant: u8) {
  let (dst, src) = common(dst, src);
  let matrix = _mm_set1_epi64x(F::affine(constant) as i64);
  let (dst_vecs, dst_tail) = dst.as_chunks_mut::<16>();
  let (src_vecs, src_tail) = src.as_chunks::<16>();
  for (d, s) in dst_vecs.iter_mut().zip(src_vecs) {
    let x = _mm_loadu_si128(s.as_ptr().cast());
    let acc = _mm_loadu_si128(d.as_ptr().cast());
    let r = _mm_xor_si128(acc, _mm_gf2p8affine_epi64_epi8::<0>(x, matrix));
    _mm_storeu_si128(d.as_mut_ptr().cast(), r);
  }
  imul::madd_gpr64_raw::<F>(dst_tail, src_tail, constant);
}

#[target_feature(enable = "gfni,avx,avx2")]
unsafe fn mul_256_impl<F: Field>(region: &mut [u8], constant: u8) {
  let matrix = _mm256_set1_epi64x(F::affine(constant) as i64);
  let (vecs, tail) = region.as_chunks_mut::<32>();
  for v in vecs {
    let x = _mm256_loadu_si256(v.as_ptr().cast());
    _mm256_storeu_si256(v.as_mut_ptr().cast(), _mm256_gf2p8affine_epi64_epi8::<0>(x, matrix));
  }
  imul::mul_gpr64_raw::<F>(tail, constant);
}

#[target_feature(enable = "gfni,avx,avx2")]
unsafe fn madd_256_impl<F: Field>(dst: &mut [u8], src: &[u8], constant: u8) {
  let (dst, src) = common(dst, src);
  let matrix = _mm256_set1_epi64x(F::affine(constant) as i64);
  let (dst_vecs, dst_tail) = dst.as_chunks_mut::<32>();
  let (src_vecs, src_tail) = src.as_chunks::<32>();
  for (d, s) in dst_vecs.iter_mut().zip(src_vecs) {
    let x = _mm256_loadu_si256(s.as_ptr().cast());
    let acc = _mm256_loadu_si256(d.as_ptr().cast());
    let r = _mm256_xor_si256(acc, _mm256_gf2p8affine_epi64_epi8::<0>(x, matrix));
    _mm256_storeu_si256(d.as_mut_ptr().cast(), r);
  }
  imul::madd_gpr64_raw::<F>(dst_tail, src_tail, constant);
}

#[target_feature(enable = "gfni,avx512f,avx512bw")]
unsafe fn mul_512_impl<F: Field>(region: &mut [u8], constant: u8) {
  let matrix = _mm512_set1_epi64(F::affine(constant) as i64);
  let (vecs, tail) = region.as_chunks_mut::<64>();
  for v in vecs {
    let x = _mm512_loadu_si512(v.as_ptr().cast());
    _mm512_storeu_si512(v.as_mut_ptr().cast(), _mm512_gf2p8affine_epi64_epi8::<0>(x, matrix));
  }
  imul::mul_gpr64_raw::<F>(tail, constant);
}

#[target_feature(enable = "gfni,avx512f,avx512bw")]
unsafe fn madd_512_impl<F: Field>(dst: &mut [u8], src: &[u8], constant: u8) {
  let (dst, src) = common(dst, src);
  let matrix = _mm512_set1_epi64(F::affine(constant) as i64);
  let (dst_vecs, dst_tail) = dst.as_chunks_mut::<64>();
  let (src_vecs, src_tail) = src.as_chunks::<64>();
  for (d, s) in dst_vecs.iter_mut().zip(src_vecs) {
    let x = _mm512_loadu_si512(s.as_ptr().cast());
    let acc = _mm512_loadu_si512(d.as_ptr().cast());
    let r = _mm512_xor_si512(acc, _mm512_gf2p8affine_epi64_epi8::<0>(x, matrix));
    _mm512_storeu_si512(d.as_mut_ptr().cast(), r);
  }
  imul::madd_gpr64_raw::<F>(dst_tail, src_tail, constant);
}

simd_entries!(mul_128 => mul_128_impl, madd_128 => madd_128_impl, xor = xor_sse2);
simd_entries!(mul_256 => mul_256_impl, madd_256 => madd_256_impl, xor = xor_avx2);
simd_entries!(mul_512 => mul_512_impl, madd_512 => madd_512_impl, xor = xor_avx512);
