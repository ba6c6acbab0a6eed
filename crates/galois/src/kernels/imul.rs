//! Bit-sliced register multiply.
//!
//! Packed symbols are split into `EXPONENT` bit-planes. Plane `k` holds bit
//! `k` of every symbol, moved down to the lowest bit of its slot; an integer
//! multiply by `c · x^k` then scales every slot at once. A slot is exactly
//! `EXPONENT` bits wide and `c · x^k < 2^EXPONENT`, so no product spills into
//! the next slot and the integer multiply is carry-free:
//!
//! ```text
//! r = Σₖ ((w >> k) & PLANE…PLANE) · pdiv[c][k]
//! ```

use super::{common, xor};
use crate::field::Field;

macro_rules! imul_word {
  ($name:ident, $word:ty) => {
    #[inline(always)]
    fn $name<F: Field>(w: $word, pdiv: &[u8]) -> $word {
      let planes = <$word>::from_ne_bytes([F::PLANE; size_of::<$word>()]);
      let mut r: $word = 0;
      for (k, &p) in pdiv.iter().enumerate() {
        r ^= ((w >> k) & planes).wrapping_mul(p as $word);
      }
      r
    }
  };
}

imul_word!(imul_u8, u8);
imul_word!(imul_u32, u32);
imul_word!(imul_u64, u64);

// ─────────────────────────────────────────────────────────────────────────────
// Raw bodies (no degenerate-constant handling; used for vector tails)
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) fn mul_scalar_raw<F: Field>(region: &mut [u8], constant: u8) {
  let pdiv = F::pdiv(constant);
  for b in region.iter_mut() {
    *b = imul_u8::<F>(*b, pdiv);
  }
}

pub(crate) fn madd_scalar_raw<F: Field>(dst: &mut [u8], src: &[u8], constant: u8) {
  let pdiv = F::pdiv(constant);
  for (d, &s) in dst.iter_mut().zip(src) {
    *d ^= imul_u8::<F>(s, pdiv);
  }
}

macro_rules! imul_region {
  ($mul:ident, $madd:ident, $word:ty, $n:literal, $imul:ident) => {
    pub(crate) fn $mul<F: Field>(region: &mut [u8], constant: u8) {
      let pdiv = F::pdiv(constant);
      let (words, tail) = region.as_chunks_mut::<$n>();
      for w in words {
        *w = $imul::<F>(<$word>::from_ne_bytes(*w), pdiv).to_ne_bytes();
      }
      mul_scalar_raw::<F>(tail, constant);
    }

    pub(crate) fn $madd<F: Field>(dst: &mut [u8], src: &[u8], constant: u8) {
      let (dst, src) = common(dst, src);
      let pdiv = F::pdiv(constant);
      let (dst_words, dst_tail) = dst.as_chunks_mut::<$n>();
      let (src_words, src_tail) = src.as_chunks::<$n>();
      for (d, s) in dst_words.iter_mut().zip(src_words) {
        let product = $imul::<F>(<$word>::from_ne_bytes(*s), pdiv);
        *d = (<$word>::from_ne_bytes(*d) ^ product).to_ne_bytes();
      }
      madd_scalar_raw::<F>(dst_tail, src_tail, constant);
    }
  };
}

imul_region!(mul_gpr32_raw, madd_gpr32_raw, u32, 4, imul_u32);
imul_region!(mul_gpr64_raw, madd_gpr64_raw, u64, 8, imul_u64);

// ─────────────────────────────────────────────────────────────────────────────
// Kernel entries
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! imul_entry {
  ($mul:ident, $madd:ident, $mul_raw:ident, $madd_raw:ident, $xor:path) => {
    pub(crate) fn $mul<F: Field>(region: &mut [u8], constant: u8) {
      match constant & F::MASK {
        0 => region.fill(0),
        1 => {}
        c => $mul_raw::<F>(region, c),
      }
    }

    pub(crate) fn $madd<F: Field>(dst: &mut [u8], src: &[u8], constant: u8) {
      match constant & F::MASK {
        0 => {}
        1 => $xor(dst, src),
        c => $madd_raw::<F>(dst, src, c),
      }
    }
  };
}

imul_entry!(mul_scalar, madd_scalar, mul_scalar_raw, madd_scalar_raw, xor::xor_scalar);
imul_entry!(mul_gpr32, madd_gpr32, mul_gpr32_raw, madd_gpr32_raw, xor::xor_gpr32);
imul_entry!(mul_gpr64, madd_gpr64, mul_gpr64_raw, madd_gpr64_raw, xor::xor_gpr64);
