//! Field types and their fixed parameters.

use alloc::string::{String, ToString};
use core::{fmt, str::FromStr};

use crate::{error::Error, tables};

// ─────────────────────────────────────────────────────────────────────────────
// Public field type
// ─────────────────────────────────────────────────────────────────────────────

/// One of the four supported binary extension fields.
///
/// | Field | Polynomial | Symbols per byte |
/// |-------|------------|------------------|
/// | GF(2) | `x + 1` (3) | 8 |
/// | GF(4) | `x² + x + 1` (7) | 4 |
/// | GF(16) | `x⁴ + x + 1` (19) | 2 |
/// | GF(256) | `x⁸ + x⁴ + x³ + x² + 1` (285) | 1 |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum FieldType {
  Gf2 = 1,
  Gf4 = 2,
  Gf16 = 4,
  Gf256 = 8,
}

impl FieldType {
  /// All field types, smallest first.
  pub const ALL: [Self; 4] = [Self::Gf2, Self::Gf4, Self::Gf16, Self::Gf256];

  /// Bits per field element.
  #[inline]
  #[must_use]
  pub const fn exponent(self) -> u32 {
    self as u32
  }

  /// Number of field elements, `2^exponent`.
  #[inline]
  #[must_use]
  pub const fn size(self) -> usize {
    1 << self.exponent()
  }

  /// `size - 1`; valid constants satisfy `c & mask == c`.
  #[inline]
  #[must_use]
  pub const fn mask(self) -> u8 {
    (self.size() - 1) as u8
  }

  /// Reduction polynomial including its leading term.
  #[inline]
  #[must_use]
  pub const fn polynomial(self) -> u16 {
    match self {
      Self::Gf2 => tables::gf2::POLYNOMIAL,
      Self::Gf4 => tables::gf4::POLYNOMIAL,
      Self::Gf16 => tables::gf16::POLYNOMIAL,
      Self::Gf256 => tables::gf256::POLYNOMIAL,
    }
  }

  /// Field symbols packed into each region byte.
  #[inline]
  #[must_use]
  pub const fn symbols_per_byte(self) -> u32 {
    8 / self.exponent()
  }

  /// Display name, e.g. `"GF(256)"`.
  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Gf2 => "GF(2)",
      Self::Gf4 => "GF(4)",
      Self::Gf16 => "GF(16)",
      Self::Gf256 => "GF(256)",
    }
  }

  /// Field with `exponent` bits per element.
  ///
  /// # Errors
  ///
  /// [`Error::InvalidFieldType`] unless `exponent` is 1, 2, 4 or 8.
  pub fn from_exponent(exponent: u32) -> Result<Self, Error> {
    match exponent {
      1 => Ok(Self::Gf2),
      2 => Ok(Self::Gf4),
      4 => Ok(Self::Gf16),
      8 => Ok(Self::Gf256),
      other => Err(Error::InvalidFieldType(alloc::format!("exponent {other}"))),
    }
  }

  /// Field with `size` elements.
  ///
  /// # Errors
  ///
  /// [`Error::InvalidFieldType`] unless `size` is 2, 4, 16 or 256.
  pub fn from_size(size: u32) -> Result<Self, Error> {
    match size {
      2 => Ok(Self::Gf2),
      4 => Ok(Self::Gf4),
      16 => Ok(Self::Gf16),
      256 => Ok(Self::Gf256),
      other => Err(Error::InvalidFieldType(other.to_string())),
    }
  }
}

impl fmt::Display for FieldType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl TryFrom<u32> for FieldType {
  type Error = Error;

  /// Interprets the value as the field size.
  fn try_from(size: u32) -> Result<Self, Error> {
    Self::from_size(size)
  }
}

impl FromStr for FieldType {
  type Err = Error;

  /// Accepts `"gf256"`, `"GF(256)"`, `"gf(2^8)"` and a bare `"256"`,
  /// case-insensitively.
  fn from_str(s: &str) -> Result<Self, Error> {
    let invalid = || Error::InvalidFieldType(String::from(s));

    let lower = s.trim().to_ascii_lowercase();
    let body = lower.strip_prefix("gf").unwrap_or(lower.as_str());
    let body = body.strip_prefix('(').and_then(|b| b.strip_suffix(')')).unwrap_or(body);

    if let Some(exp) = body.strip_prefix("2^") {
      let exp: u32 = exp.parse().map_err(|_| invalid())?;
      return Self::from_exponent(exp).map_err(|_| invalid());
    }
    let size: u32 = body.parse().map_err(|_| invalid())?;
    Self::from_size(size).map_err(|_| invalid())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Kernel-facing field trait
// ─────────────────────────────────────────────────────────────────────────────

/// Compile-time view of one field, used to monomorphize kernels.
///
/// Every table accessor masks the constant, so kernels may pass any byte.
pub(crate) trait Field: Copy + 'static {
  const TYPE: FieldType;
  const EXPONENT: u32 = Self::TYPE.exponent();
  const MASK: u8 = Self::TYPE.mask();
  /// Lowest bit of every symbol slot in a byte.
  const PLANE: u8;

  /// `c · x^k` for `k` in `0..EXPONENT`.
  fn pdiv(c: u8) -> &'static [u8];
  /// Byte-to-byte multiplication by `c`, all packed symbols at once.
  fn flat(c: u8) -> &'static [u8; 256];
  /// Products of `c` with the low and the high nibble of a byte.
  fn nibbles(c: u8) -> (&'static [u8; 16], &'static [u8; 16]);
  /// GF(2) 8×8 matrix for `gf2p8affineqb`.
  fn affine(c: u8) -> u64;
  fn inverse(x: u8) -> u8;
}

/// Fields small enough for log/antilog tables to beat flat tables.
pub(crate) trait LogField: Field {
  /// Discrete log base the generator. `log(0)` is unspecified.
  fn log(x: u8) -> usize;
  /// Generator raised to `i`, for `i < 2 * (size - 1)`.
  fn exp(i: usize) -> u8;
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Gf2;
#[derive(Clone, Copy, Debug)]
pub(crate) struct Gf4;
#[derive(Clone, Copy, Debug)]
pub(crate) struct Gf16;
#[derive(Clone, Copy, Debug)]
pub(crate) struct Gf256;

macro_rules! impl_field {
  ($marker:ident, $kind:expr, $tables:ident, $plane:literal) => {
    impl Field for $marker {
      const TYPE: FieldType = $kind;
      const PLANE: u8 = $plane;

      #[inline(always)]
      fn pdiv(c: u8) -> &'static [u8] {
        &tables::$tables::PDIV[(c & Self::MASK) as usize]
      }

      #[inline(always)]
      fn flat(c: u8) -> &'static [u8; 256] {
        &tables::$tables::FLAT[(c & Self::MASK) as usize]
      }

      #[inline(always)]
      fn nibbles(c: u8) -> (&'static [u8; 16], &'static [u8; 16]) {
        let c = (c & Self::MASK) as usize;
        (&tables::$tables::NIBBLE_LO[c], &tables::$tables::NIBBLE_HI[c])
      }

      #[inline(always)]
      fn affine(c: u8) -> u64 {
        tables::$tables::AFFINE[(c & Self::MASK) as usize]
      }

      #[inline(always)]
      fn inverse(x: u8) -> u8 {
        tables::$tables::INVERSE[(x & Self::MASK) as usize]
      }
    }
  };
}

impl_field!(Gf2, FieldType::Gf2, gf2, 0xFF);
impl_field!(Gf4, FieldType::Gf4, gf4, 0x55);
impl_field!(Gf16, FieldType::Gf16, gf16, 0x11);
impl_field!(Gf256, FieldType::Gf256, gf256, 0x01);

impl LogField for Gf16 {
  #[inline(always)]
  fn log(x: u8) -> usize {
    tables::gf16::LOG[(x & Self::MASK) as usize] as usize
  }

  #[inline(always)]
  fn exp(i: usize) -> u8 {
    tables::gf16::EXP[i]
  }
}

impl LogField for Gf256 {
  #[inline(always)]
  fn log(x: u8) -> usize {
    tables::gf256::LOG[x as usize] as usize
  }

  #[inline(always)]
  fn exp(i: usize) -> u8 {
    tables::gf256::EXP[i]
  }
}
