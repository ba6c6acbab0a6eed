//! Nibble-shuffle kernels (`pshufb`).
//!
//! `x ⊗ c = LO[c][x & 15] ^ HI[c][x >> 4]`, sixteen lookups per instruction.
//! The 256- and 512-bit forms broadcast the same 16-byte tables to every
//! 128-bit lane, since `shuffle_epi8` never crosses lanes.
#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::x86_64::*;

use super::xor::{xor_avx2, xor_avx512, xor_sse2};
use crate::{
  field::Field,
  kernels::{common, imul},
};

// ─────────────────────────────────────────────────────────────────────────────
// SSSE3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
struct Tables128 {
  lo: __m128i,
  hi: __m128i,
  low_nibble: __m128i,
}

impl Tables128 {
  #[inline]
  #[target_feature(enable = "ssse3")]
  unsafe fn new<F: Field>(constant: u8) -> Self {
    let (lo, hi) = F::nibbles(constant);
    Self {
      lo: _mm_loadu_si128(lo.as_ptr().cast()),
      hi: _mm_loadu_si128(hi.as_ptr().cast()),
      low_nibble: _mm_set1_epi8(0x0F),
    }
  }

  #[inline]
  #[target_feature(enable = "ssse3")]
  unsafe fn product(self, x: __m128i) -> __m128i {
    let l = _mm_and_si128(x, self.low_nibble);
    let h = _mm_and_si128(_mm_srli_epi64::<4>(x), self.low_nibble);
    _mm_xor_si128(_mm_shuffle_epi8(self.lo, l), _mm_shuffle_epi8(self.hi, h))
  }
}

#[target_feature(enable = "ssse3")]
unsafe fn mul_ssse3_impl<F: Field>(region: &mut [u8], constant: u8) {
  let t = Tables128::new::<F>(constant);
  let (vecs, tail) = region.as_chunks_mut::<16>();
  for v in vecs {
    let x = _mm_loadu_si128(v.as_ptr().cast());
    _mm_storeu_si128(v.as_mut_ptr().cast(), t.product(x));
  }
  imul::mul_gpr64_raw::<F>(tail, constant);
}

#[target_feature(enable = "ssse3")]
unsafe fn madd_ssse3_impl<F: Field>(dst: &mut [u8], src: &[u8], constant: u8) {
  let (dst, src) = common(dst, src);
  let t = Tables128::new::<F>(constant);
  let (dst_vecs, dst_tail) = dst.as_chunks_mut::<16>();
  let (src_vecs, src_tail) = src.as_chunks::<16>();
  for (d, s) in dst_vecs.iter_mut().zip(src_vecs) {
    let x = _mm_loadu_si128(s.as_ptr().cast());
    let acc = _mm_loadu_si128(d.as_ptr().cast());
    _mm_storeu_si128(d.as_mut_ptr().cast(), _mm_xor_si128(acc, t.product(x)));
  }
  imul::madd_gpr64_raw::<F>(dst_tail, src_tail, constant);
}

// ─────────────────────────────────────────────────────────────────────────────
// SSE4.1
// ─────────────────────────────────────────────────────────────────────────────

// Same tables as SSSE3; `ptest` skips all-zero blocks.

#[target_feature(enable = "ssse3,sse4.1")]
unsafe fn mul_sse41_impl<F: Field>(region: &mut [u8], constant: u8) {
  let t = Tables128::new::<F>(constant);
  let (vecs, tail) = region.as_chunks_mut::<16>();
  for v in vecs {
    let x = _mm_loadu_si128(v.as_ptr().cast());
    if _mm_testz_si128(x, x) == 0 {
      _mm_storeu_si128(v.as_mut_ptr().cast(), t.product(x));
    }
  }
  imul::mul_gpr64_raw::<F>(tail, constant);
}

#[target_feature(enable = "ssse3,sse4.1")]
unsafe fn madd_sse41_impl<F: Field>(dst: &mut [u8], src: &[u8], constant: u8) {
  let (dst, src) = common(dst, src);
  let t = Tables128::new::<F>(constant);
  let (dst_vecs, dst_tail) = dst.as_chunks_mut::<16>();
  let (src_vecs, src_tail) = src.as_chunks::<16>();
  for (d, s) in dst_vecs.iter_mut().zip(src_vecs) {
    let x = _mm_loadu_si128(s.as_ptr().cast());
    if _mm_testz_si128(x, x) != 0 {
      continue;
    }
    let acc = _mm_loadu_si128(d.as_ptr().cast());
    _mm_storeu_si128(d.as_mut_ptr().cast(), _mm_xor_si128(acc, t.product(x)));
  }
  imul::madd_gpr64_raw::<F>(dst_tail, src_tail, constant);
}

// ─────────────────────────────────────────────────────────────────────────────
// AVX2
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
struct Tables256 {
  lo: __m256i,
  hi: __m256i,
  low_nibble: __m256i,
}

impl Tables256 {
  #[inline]
  #[target_feature(enable = "avx2")]
  unsafe fn new<F: Field>(constant: u8) -> Self {
    let (lo, hi) = F::nibbles(constant);
    Self {
      lo: _mm256_broadcastsi128_si256(_mm_loadu_si128(lo.as_ptr().cast())),
      hi: _mm256_broadcastsi128_si256(_mm_loadu_si128(hi.as_ptr().cast())),
      low_nibble: _mm256_set1_epi8(0x0F),
    }
  }

  #[inline]
  #[target_feature(enable = "avx2")]
  unsafe fn product(self, x: __m256i) -> __m256i {
    let l = _mm256_and_si256(x, self.low_nibble);
    let h = _mm256_and_si256(_mm256_srli_epi64::<4>(x), self.low_nibble);
    _mm256_xor_si256(_mm256_shuffle_epi8(self.lo, l), _mm256_shuffle_epi8(self.hi, h))
  }
}

#[target_feature(enable = "avx2")]
unsafe fn mul_avx2_impl<F: Field>(region: &mut [u8], constant: u8) {
  let t = Tables256::new::<F>(constant);
  let (vecs, tail) = region.as_chunks_mut::<32>();
  for v in vecs {
    let x = _mm256_loadu_si256(v.as_ptr().cast());
    _mm256_storeu_si256(v.as_mut_ptr().cast(), t.product(x));
  }
  imul::mul_gpr64_raw::<F>(tail, constant);
}

#[target_feature(enable = "avx2")]
unsafe fn madd_avx2_impl<F: Field>(dst: &mut [u8], src: &[u8], constant: u8) {
  let (dst, src) = common(dst, src);
  let t = Tables256::new::<F>(constant);
  let (dst_vecs, dst_tail) = dst.as_chunks_mut::<32>();
  let (src_vecs, src_tail) = src.as_chunks::<32>();
  for (d, s) in dst_vecs.iter_mut().zip(src_vecs) {
    let x = _mm256_loadu_si256(s.as_ptr().cast());
    let acc = _mm256_loadu_si256(d.as_ptr().cast());
    _mm256_storeu_si256(d.as_mut_ptr().cast(), _mm256_xor_si256(acc, t.product(x)));
  }
  imul::madd_gpr64_raw::<F>(dst_tail, src_tail, constant);
}

// ─────────────────────────────────────────────────────────────────────────────
// AVX-512BW
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
struct Tables512 {
  lo: __m512i,
  hi: __m512i,
  low_nibble: __m512i,
}

impl Tables512 {
  #[inline]
  #[target_feature(enable = "avx512f,avx512bw")]
  unsafe fn new<F: Field>(constant: u8) -> Self {
    let (lo, hi) = F::nibbles(constant);
    Self {
      lo: _mm512_broadcast_i32x4(_mm_loadu_si128(lo.as_ptr().cast())),
      hi: _mm512_broadcast_i32x4(_mm_loadu_si128(hi.as_ptr().cast())),
      low_nibble: _mm512_set1_epi8(0x0F),
    }
  }

  #[inline]
  #[target_feature(enable = "avx512f,avx512bw")]
  unsafe fn product(self, x: __m512i) -> __m512i {
    let l = _mm512_and_si512(x, self.low_nibble);
    let h = _mm512_and_si512(_mm512_srli_epi64::<4>(x), self.low_nibble);
    _mm512_xor_si512(_mm512_shuffle_epi8(self.lo, l), _mm512_shuffle_epi8(self.hi, h))
  }
}

#[target_feature(enable = "avx512f,avx512bw")]
unsafe fn mul_avx512_impl<F: Field>(region: &mut [u8], constant: u8) {
  let t = Tables512::new::<F>(constant);
  let (vecs, tail) = region.as_chunks_mut::<64>();
  for v in vecs {
    let x = _mm512_loadu_si512(v.as_ptr().cast());
    _mm512_storeu_si512(v.as_mut_ptr().cast(), t.product(x));
  }
  imul::mul_gpr64_raw::<F>(tail, constant);
}

#[target_feature(enable = "avx512f,avx512bw")]
unsafe fn madd_avx512_impl<F: Field>(dst: &mut [u8], src: &[u8], constant: u8) {
  let (dst, src) = common(dst, src);
  let t = Tables512::new::<F>(constant);
  let (dst_vecs, dst_tail) = dst.as_chunks_mut::<64>();
  let (src_vecs, src_tail) = src.as_chunks::<64>();
  for (d, s) in dst_vecs.iter_mut().zip(src_vecs) {
    let x = _mm512_loadu_si512(s.as_ptr().cast());
    let acc = _mm512_loadu_si512(d.as_ptr().cast());
    _mm512_storeu_si512(d.as_mut_ptr().cast(), _mm512_xor_si512(acc, t.product(x)));
  }
  imul::madd_gpr64_raw::<F>(dst_tail, src_tail, constant);
}

simd_entries!(mul_ssse3 => mul_ssse3_impl, madd_ssse3 => madd_ssse3_impl, xor = xor_sse2);
simd_entries!(mul_sse41 => mul_sse41_impl, madd_sse41 => madd_sse41_impl, xor = xor_sse2);
simd_entries!(mul_avx2 => mul_avx2_impl, madd_avx2 => madd_avx2_impl, xor = xor_avx2);
simd_entries!(mul_avx512 => mul_avx512_impl, madd_avx512 => madd_avx512_impl, xor = xor_avx512);
