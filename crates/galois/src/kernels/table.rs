//! Table-lookup kernels: one 256-entry row per constant, or log/antilog.

use super::xor;
use crate::field::{Field, LogField};

// ─────────────────────────────────────────────────────────────────────────────
// Flat table
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) fn flat_mul<F: Field>(region: &mut [u8], constant: u8) {
  match constant & F::MASK {
    0 => region.fill(0),
    1 => {}
    c => {
      let row = F::flat(c);
      for b in region.iter_mut() {
        *b = row[*b as usize];
      }
    }
  }
}

pub(crate) fn flat_madd<F: Field>(dst: &mut [u8], src: &[u8], constant: u8) {
  match constant & F::MASK {
    0 => {}
    1 => xor::xor_gpr64(dst, src),
    c => {
      let row = F::flat(c);
      for (d, &s) in dst.iter_mut().zip(src) {
        *d ^= row[s as usize];
      }
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Log / antilog
// ─────────────────────────────────────────────────────────────────────────────

/// `byte ⊗ c` with `log_c = log(c)`, slot by slot.
#[inline(always)]
fn log_mul_byte<F: LogField>(byte: u8, log_c: usize) -> u8 {
  let mut out = 0u8;
  let mut shift = 0;
  while shift < 8 {
    let symbol = (byte >> shift) & F::MASK;
    if symbol != 0 {
      out |= F::exp(F::log(symbol) + log_c) << shift;
    }
    shift += F::EXPONENT;
  }
  out
}

pub(crate) fn log_mul<F: LogField>(region: &mut [u8], constant: u8) {
  match constant & F::MASK {
    0 => region.fill(0),
    1 => {}
    c => {
      let log_c = F::log(c);
      for b in region.iter_mut() {
        *b = log_mul_byte::<F>(*b, log_c);
      }
    }
  }
}

pub(crate) fn log_madd<F: LogField>(dst: &mut [u8], src: &[u8], constant: u8) {
  match constant & F::MASK {
    0 => {}
    1 => xor::xor_gpr64(dst, src),
    c => {
      let log_c = F::log(c);
      for (d, &s) in dst.iter_mut().zip(src) {
        *d ^= log_mul_byte::<F>(s, log_c);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    field::{Gf2, Gf4, Gf16, Gf256},
    kernels::reference,
  };

  fn check_flat<F: Field>() {
    let all: [u8; 256] = core::array::from_fn(|i| i as u8);
    for c in 0..=F::MASK {
      let mut expected = all;
      reference::mul::<F>(&mut expected, c);
      let mut got = all;
      flat_mul::<F>(&mut got, c);
      assert_eq!(got, expected, "{} c={c}", F::TYPE);

      let mut expected = [0x5Au8; 256];
      reference::madd::<F>(&mut expected, &all, c);
      let mut got = [0x5Au8; 256];
      flat_madd::<F>(&mut got, &all, c);
      assert_eq!(got, expected, "{} c={c}", F::TYPE);
    }
  }

  fn check_log<F: LogField>() {
    let all: [u8; 256] = core::array::from_fn(|i| i as u8);
    for c in 0..=F::MASK {
      let mut expected = all;
      reference::mul::<F>(&mut expected, c);
      let mut got = all;
      log_mul::<F>(&mut got, c);
      assert_eq!(got, expected, "{} c={c}", F::TYPE);

      let mut expected = [0xA5u8; 256];
      reference::madd::<F>(&mut expected, &all, c);
      let mut got = [0xA5u8; 256];
      log_madd::<F>(&mut got, &all, c);
      assert_eq!(got, expected, "{} c={c}", F::TYPE);
    }
  }

  #[test]
  fn flat_matches_reference() {
    check_flat::<Gf2>();
    check_flat::<Gf4>();
    check_flat::<Gf16>();
    check_flat::<Gf256>();
  }

  #[test]
  fn log_matches_reference() {
    check_log::<Gf16>();
    check_log::<Gf256>();
  }
}
