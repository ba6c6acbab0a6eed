//! Symbol-at-a-time kernels.
//!
//! No tables, no shortcuts for degenerate constants, no vectors: every
//! packed symbol is extracted, multiplied by shift-and-reduce and put back.
//! Slow and obviously correct, which is all the self-test asks of it.

use crate::{field::Field, tables::mul_bitwise};

/// Multiply every packed symbol of `byte` by `constant`.
#[inline]
pub(crate) fn mul_byte<F: Field>(byte: u8, constant: u8) -> u8 {
  let c = constant & F::MASK;
  let mut out = 0u8;
  let mut shift = 0;
  while shift < 8 {
    let symbol = (byte >> shift) & F::MASK;
    out |= mul_bitwise(symbol, c, F::EXPONENT, F::TYPE.polynomial()) << shift;
    shift += F::EXPONENT;
  }
  out
}

pub(crate) fn mul<F: Field>(region: &mut [u8], constant: u8) {
  for byte in region.iter_mut() {
    *byte = mul_byte::<F>(*byte, constant);
  }
}

pub(crate) fn madd<F: Field>(dst: &mut [u8], src: &[u8], constant: u8) {
  for (d, &s) in dst.iter_mut().zip(src) {
    *d ^= mul_byte::<F>(s, constant);
  }
}
