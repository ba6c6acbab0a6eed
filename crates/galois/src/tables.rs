//! Constant tables, generated at compile time from each field's polynomial.
//!
//! Nothing here runs at runtime: every table is a `static` initialized by
//! `const fn` evaluation. Kernels only ever read them.
//!
//! | Table | Shape | Meaning |
//! |-------|-------|---------|
//! | `PDIV` | `size × exponent` | `c · x^k mod p` |
//! | `FLAT` | `size × 256` | every packed symbol of a byte multiplied by `c` |
//! | `NIBBLE_LO` / `NIBBLE_HI` | `size × 16` | `FLAT[c][j]` and `FLAT[c][j << 4]` |
//! | `AFFINE` | `size` | bit matrix of "multiply by `c`" for `gf2p8affineqb` |
//! | `INVERSE` | `size` | multiplicative inverse, `0 → 0` |
//! | `LOG` / `EXP` | `size` / `2·size` | discrete log and antilog (GF(16), GF(256)) |

// ─────────────────────────────────────────────────────────────────────────────
// Generators
// ─────────────────────────────────────────────────────────────────────────────

/// Shift-and-reduce multiplication of two field elements.
///
/// `polynomial` includes the leading `x^exponent` term.
#[must_use]
pub(crate) const fn mul_bitwise(a: u8, b: u8, exponent: u32, polynomial: u16) -> u8 {
  let top = 1u16 << exponent;
  let mut a = a as u16;
  let mut b = b;
  let mut product = 0u16;
  while b != 0 {
    if b & 1 != 0 {
      product ^= a;
    }
    b >>= 1;
    a <<= 1;
    if a & top != 0 {
      a ^= polynomial;
    }
  }
  product as u8
}

const fn pdiv_table<const SIZE: usize, const EXP: usize>(polynomial: u16) -> [[u8; EXP]; SIZE] {
  let mut table = [[0u8; EXP]; SIZE];
  let mut c = 0;
  while c < SIZE {
    let mut k = 0;
    while k < EXP {
      table[c][k] = mul_bitwise(c as u8, 1 << k, EXP as u32, polynomial);
      k += 1;
    }
    c += 1;
  }
  table
}

/// Each byte is the sum of its set bits, and bit `j` is the element `x^(j % e)`
/// in slot `j / e`, so one new row entry costs one XOR.
const fn flat_table<const SIZE: usize, const EXP: usize>(pdiv: &[[u8; EXP]; SIZE]) -> [[u8; 256]; SIZE] {
  let mut table = [[0u8; 256]; SIZE];
  let mut c = 0;
  while c < SIZE {
    let mut b = 1usize;
    while b < 256 {
      let j = b.trailing_zeros() as usize;
      let k = j % EXP;
      table[c][b] = table[c][b & (b - 1)] ^ (pdiv[c][k] << (j - k));
      b += 1;
    }
    c += 1;
  }
  table
}

const fn nibble_lo_table<const SIZE: usize>(flat: &[[u8; 256]; SIZE]) -> [[u8; 16]; SIZE] {
  let mut table = [[0u8; 16]; SIZE];
  let mut c = 0;
  while c < SIZE {
    let mut j = 0;
    while j < 16 {
      table[c][j] = flat[c][j];
      j += 1;
    }
    c += 1;
  }
  table
}

const fn nibble_hi_table<const SIZE: usize>(flat: &[[u8; 256]; SIZE]) -> [[u8; 16]; SIZE] {
  let mut table = [[0u8; 16]; SIZE];
  let mut c = 0;
  while c < SIZE {
    let mut j = 0;
    while j < 16 {
      table[c][j] = flat[c][j << 4];
      j += 1;
    }
    c += 1;
  }
  table
}

/// `gf2p8affineqb` computes output bit `i` as the parity of the input byte
/// masked with matrix byte `7 - i`. Row `i` therefore collects the input
/// bits `j` whose image `FLAT[c][1 << j]` has bit `i` set.
const fn affine_table<const SIZE: usize>(flat: &[[u8; 256]; SIZE]) -> [u64; SIZE] {
  let mut table = [0u64; SIZE];
  let mut c = 0;
  while c < SIZE {
    let mut matrix = 0u64;
    let mut i = 0;
    while i < 8 {
      let mut row = 0u8;
      let mut j = 0;
      while j < 8 {
        if (flat[c][1 << j] >> i) & 1 != 0 {
          row |= 1 << j;
        }
        j += 1;
      }
      matrix |= (row as u64) << (8 * (7 - i));
      i += 1;
    }
    table[c] = matrix;
    c += 1;
  }
  table
}

const fn inverse_table<const SIZE: usize>(flat: &[[u8; 256]; SIZE]) -> [u8; SIZE] {
  let mut table = [0u8; SIZE];
  let mut x = 1;
  while x < SIZE {
    let mut y = 1;
    while y < SIZE {
      if flat[x][y] == 1 {
        table[x] = y as u8;
        break;
      }
      y += 1;
    }
    x += 1;
  }
  table
}

/// Powers of the generator `x`, repeated once so `EXP[log a + log b]` never
/// needs a reduction modulo `size - 1`.
const fn exp_table<const SIZE: usize, const DOUBLE: usize, const EXP: usize>(
  pdiv: &[[u8; EXP]; SIZE],
) -> [u8; DOUBLE] {
  let mut table = [0u8; DOUBLE];
  let mut value = 1u8;
  let mut i = 0;
  while i < DOUBLE {
    table[i] = value;
    value = pdiv[value as usize][1];
    i += 1;
  }
  table
}

const fn log_table<const SIZE: usize, const DOUBLE: usize>(exp: &[u8; DOUBLE]) -> [u8; SIZE] {
  let mut table = [0u8; SIZE];
  let mut i = 0;
  while i < SIZE - 1 {
    table[exp[i] as usize] = i as u8;
    i += 1;
  }
  table
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-field tables
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! field_tables {
  ($name:ident, size = $size:literal, exponent = $exp:literal, polynomial = $poly:literal) => {
    pub(crate) mod $name {
      #[allow(unused_imports)]
      use super::*;

      pub(crate) const POLYNOMIAL: u16 = $poly;

      const PDIV_ROWS: [[u8; $exp]; $size] = pdiv_table::<$size, $exp>($poly);
      const FLAT_ROWS: [[u8; 256]; $size] = flat_table::<$size, $exp>(&PDIV_ROWS);

      pub(crate) static PDIV: [[u8; $exp]; $size] = PDIV_ROWS;
      pub(crate) static FLAT: [[u8; 256]; $size] = FLAT_ROWS;
      pub(crate) static NIBBLE_LO: [[u8; 16]; $size] = nibble_lo_table(&FLAT_ROWS);
      pub(crate) static NIBBLE_HI: [[u8; 16]; $size] = nibble_hi_table(&FLAT_ROWS);
      pub(crate) static AFFINE: [u64; $size] = affine_table(&FLAT_ROWS);
      pub(crate) static INVERSE: [u8; $size] = inverse_table(&FLAT_ROWS);
    }
  };
}

field_tables!(gf2, size = 2, exponent = 1, polynomial = 0x3);
field_tables!(gf4, size = 4, exponent = 2, polynomial = 0x7);

pub(crate) mod gf16 {
  use super::*;

  pub(crate) const POLYNOMIAL: u16 = 0x13;

  const PDIV_ROWS: [[u8; 4]; 16] = pdiv_table::<16, 4>(POLYNOMIAL);
  const FLAT_ROWS: [[u8; 256]; 16] = flat_table::<16, 4>(&PDIV_ROWS);
  const EXP_ROWS: [u8; 32] = exp_table::<16, 32, 4>(&PDIV_ROWS);

  pub(crate) static PDIV: [[u8; 4]; 16] = PDIV_ROWS;
  pub(crate) static FLAT: [[u8; 256]; 16] = FLAT_ROWS;
  pub(crate) static NIBBLE_LO: [[u8; 16]; 16] = nibble_lo_table(&FLAT_ROWS);
  pub(crate) static NIBBLE_HI: [[u8; 16]; 16] = nibble_hi_table(&FLAT_ROWS);
  pub(crate) static AFFINE: [u64; 16] = affine_table(&FLAT_ROWS);
  pub(crate) static INVERSE: [u8; 16] = inverse_table(&FLAT_ROWS);
  pub(crate) static EXP: [u8; 32] = EXP_ROWS;
  pub(crate) static LOG: [u8; 16] = log_table::<16, 32>(&EXP_ROWS);
}

pub(crate) mod gf256 {
  use super::*;

  pub(crate) const POLYNOMIAL: u16 = 0x11D;

  const PDIV_ROWS: [[u8; 8]; 256] = pdiv_table::<256, 8>(POLYNOMIAL);
  const FLAT_ROWS: [[u8; 256]; 256] = flat_table::<256, 8>(&PDIV_ROWS);
  const EXP_ROWS: [u8; 512] = exp_table::<256, 512, 8>(&PDIV_ROWS);

  pub(crate) static PDIV: [[u8; 8]; 256] = PDIV_ROWS;
  pub(crate) static FLAT: [[u8; 256]; 256] = FLAT_ROWS;
  pub(crate) static NIBBLE_LO: [[u8; 16]; 256] = nibble_lo_table(&FLAT_ROWS);
  pub(crate) static NIBBLE_HI: [[u8; 16]; 256] = nibble_hi_table(&FLAT_ROWS);
  pub(crate) static AFFINE: [u64; 256] = affine_table(&FLAT_ROWS);
  pub(crate) static INVERSE: [u8; 256] = inverse_table(&FLAT_ROWS);
  pub(crate) static EXP: [u8; 512] = EXP_ROWS;
  pub(crate) static LOG: [u8; 256] = log_table::<256, 512>(&EXP_ROWS);
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Software model of one byte lane of `gf2p8affineqb` with `b = 0`.
  fn affine_apply(matrix: u64, x: u8) -> u8 {
    let mut out = 0u8;
    for i in 0..8 {
      let row = (matrix >> (8 * (7 - i))) as u8;
      if (row & x).count_ones() % 2 == 1 {
        out |= 1 << i;
      }
    }
    out
  }

  #[test]
  fn test_gf16_three_squared_is_five() {
    // (x + 1)² = x² + 1
    assert_eq!(mul_bitwise(3, 3, 4, gf16::POLYNOMIAL), 5);
    assert_eq!(gf16::FLAT[3][3], 5);
  }

  #[test]
  fn test_gf256_double_reduces_by_low_byte() {
    assert_eq!(mul_bitwise(0x87, 2, 8, gf256::POLYNOMIAL), 0x13);
    assert_eq!(gf256::FLAT[2][0x87], 0x13);
    assert_eq!(gf256::PDIV[0x87][1], 0x13);
  }

  #[test]
  fn test_gf4_matches_hand_multiplication_table() {
    // Elements 0, 1, a, a+1 with a² = a + 1.
    let expected = [[0, 0, 0, 0], [0, 1, 2, 3], [0, 2, 3, 1], [0, 3, 1, 2]];
    for (a, row) in expected.iter().enumerate() {
      for (b, &product) in row.iter().enumerate() {
        assert_eq!(gf4::FLAT[a][b], product, "{a} * {b}");
      }
    }
  }

  #[test]
  fn test_pdiv_first_column_is_identity() {
    for c in 0..256 {
      assert_eq!(gf256::PDIV[c][0] as usize, c);
    }
    for c in 0..16 {
      assert_eq!(gf16::PDIV[c][0] as usize, c);
    }
  }

  #[test]
  fn test_flat_rows_are_linear() {
    for c in 0..16 {
      for a in 0..256 {
        for b in [0x01, 0x10, 0x5A, 0xFF] {
          assert_eq!(gf16::FLAT[c][a ^ b], gf16::FLAT[c][a] ^ gf16::FLAT[c][b]);
        }
      }
    }
  }

  #[test]
  fn test_flat_packed_symbols_are_independent() {
    // GF(4): four symbols per byte, each multiplied on its own.
    for c in 0..4u8 {
      for b in 0..=255u8 {
        let mut expected = 0u8;
        for slot in 0..4 {
          let symbol = (b >> (2 * slot)) & 3;
          expected |= mul_bitwise(symbol, c, 2, gf4::POLYNOMIAL) << (2 * slot);
        }
        assert_eq!(gf4::FLAT[c as usize][b as usize], expected);
      }
    }
  }

  #[test]
  fn test_flat_matches_bitwise_gf256() {
    for c in 0..=255u8 {
      for b in 0..=255u8 {
        assert_eq!(gf256::FLAT[c as usize][b as usize], mul_bitwise(b, c, 8, gf256::POLYNOMIAL));
      }
    }
  }

  #[test]
  fn test_nibble_tables_recompose_flat() {
    for c in 0..256 {
      for b in 0..256 {
        let split = gf256::NIBBLE_LO[c][b & 0xF] ^ gf256::NIBBLE_HI[c][b >> 4];
        assert_eq!(split, gf256::FLAT[c][b]);
      }
    }
  }

  #[test]
  fn test_affine_matrices_reproduce_flat() {
    for c in 0..256 {
      for b in 0..=255u8 {
        assert_eq!(affine_apply(gf256::AFFINE[c], b), gf256::FLAT[c][b as usize]);
      }
    }
    for c in 0..16 {
      for b in 0..=255u8 {
        assert_eq!(affine_apply(gf16::AFFINE[c], b), gf16::FLAT[c][b as usize]);
      }
    }
    for c in 0..4 {
      for b in 0..=255u8 {
        assert_eq!(affine_apply(gf4::AFFINE[c], b), gf4::FLAT[c][b as usize]);
      }
    }
  }

  #[test]
  fn test_inverse_tables() {
    assert_eq!(gf2::INVERSE, [0, 1]);
    assert_eq!(gf4::INVERSE, [0, 1, 3, 2]);
    for x in 1..16 {
      assert_eq!(gf16::FLAT[x][gf16::INVERSE[x] as usize], 1);
    }
    for x in 1..256 {
      assert_eq!(gf256::FLAT[x][gf256::INVERSE[x] as usize], 1);
    }
    assert_eq!(gf256::INVERSE[0], 0);
  }

  #[test]
  fn test_log_exp_consistent() {
    for x in 1..256usize {
      assert_eq!(gf256::EXP[gf256::LOG[x] as usize] as usize, x);
    }
    for x in 1..16usize {
      assert_eq!(gf16::EXP[gf16::LOG[x] as usize] as usize, x);
    }
    // The generator is primitive: powers 0..size-1 are all distinct.
    let mut seen = [false; 256];
    for &v in &gf256::EXP[..255] {
      assert!(!seen[v as usize]);
      seen[v as usize] = true;
    }
    assert_eq!(gf256::EXP[255], 1);
    assert_eq!(gf16::EXP[15], 1);
  }
}
