//! Kernel family identification.
//!
//! A family names the arithmetic technique a kernel uses, independent of the
//! vector width it runs at. `imul` at baseline and `imul` at AVX2 are the
//! same family on different [`KernelTier`](crate::KernelTier)s.

use core::fmt;

/// Technique used by a region kernel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KernelFamily {
  /// Symbol-at-a-time shift-and-reduce multiply. Obviously correct; the
  /// yardstick every other family is verified against.
  #[default]
  Reference = 0,

  /// Plain XOR. The whole of GF(2) and the `constant == 1` case of every
  /// other field.
  Xor = 1,

  /// Bit-sliced register multiply: each bit-plane of the packed symbols is
  /// scaled by one row of the polynomial-division table.
  Imul = 2,

  /// One 256-entry byte table per constant.
  FlatTable = 3,

  /// Discrete log / antilog tables.
  LogTable = 4,

  /// Two 16-entry nibble tables applied with a byte-permute instruction.
  Shuffle = 5,

  /// GF(2) affine transform (`gf2p8affineqb`) with a per-constant matrix.
  Gfni = 6,
}

impl KernelFamily {
  /// All families in declaration order.
  pub const ALL: [Self; 7] = [
    Self::Reference,
    Self::Xor,
    Self::Imul,
    Self::FlatTable,
    Self::LogTable,
    Self::Shuffle,
    Self::Gfni,
  ];

  /// Short name, used as the prefix of algorithm names.
  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Reference => "reference",
      Self::Xor => "xor",
      Self::Imul => "imul",
      Self::FlatTable => "flat_table",
      Self::LogTable => "log_table",
      Self::Shuffle => "shuffle",
      Self::Gfni => "gfni",
    }
  }

  /// Whether kernels of this family index per-constant tables.
  #[inline]
  #[must_use]
  pub const fn uses_tables(self) -> bool {
    matches!(self, Self::FlatTable | Self::LogTable | Self::Shuffle | Self::Gfni)
  }
}

impl fmt::Display for KernelFamily {
  #[inline]
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}
