//! Field descriptors: one kernel bound per field, chosen once.

use core::fmt;

use backend::{
  KernelTier,
  dispatch::{Selected, TierUnavailable, select_tier},
};
use platform::Caps;

use crate::{
  algorithm::{Algorithm, AlgorithmDescriptor, AlgorithmId, bindings, reference_for},
  config,
  error::Error,
  field::{Field, FieldType, Gf2, Gf4, Gf16, Gf256},
};

/// Immutable, shareable description of one field with its bound kernels.
///
/// Built by [`build_field`]. Region operations are a single indirect call
/// through the kernel chosen at construction; the descriptor holds no
/// mutable state and is `Send + Sync`.
///
/// # Alignment
///
/// For best throughput, buffers passed to a descriptor bound to a vector
/// tier should start on an [`alignment()`](Self::alignment)-byte boundary
/// ([`AlignedBuffer`](crate::AlignedBuffer) does this). Misaligned buffers
/// are processed correctly, only slower.
#[derive(Clone, Copy)]
pub struct GaloisField {
  field: FieldType,
  tier: KernelTier,
  caps: Caps,
  algorithm: &'static Algorithm,
}

impl fmt::Debug for GaloisField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("GaloisField")
      .field("field", &self.field)
      .field("tier", &self.tier)
      .field("algorithm", &self.algorithm.id)
      .field("caps", &self.caps)
      .finish()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Construction
// ─────────────────────────────────────────────────────────────────────────────

/// Build a descriptor for `field`.
///
/// With `tier = Some(t)` the descriptor uses exactly the algorithm bound to
/// `t`. With `None` the best tier available on this machine is chosen, unless
/// `GFKIT_FORCE_TIER` pins it (see [`config`](crate::config())).
///
/// `field` may be a [`FieldType`] or anything convertible to one, such as
/// the field size as a `u32`.
///
/// # Errors
///
/// - [`Error::InvalidFieldType`] if `field` names no supported field.
/// - [`Error::UnsupportedCapability`] if `t` has no kernel for this field on
///   this target, or the machine lacks the features it needs.
///
/// # Examples
///
/// ```
/// use galois::{FieldType, build_field};
///
/// let gf = build_field(FieldType::Gf256, None)?;
/// let mut region = [0x87u8; 40];
/// gf.multiply_region(&mut region, 2, 40);
/// assert!(region.iter().all(|&b| b == 0x13));
/// # Ok::<(), galois::Error>(())
/// ```
pub fn build_field<T>(field: T, tier: Option<KernelTier>) -> Result<GaloisField, Error>
where
  T: TryInto<FieldType>,
  Error: From<<T as TryInto<FieldType>>::Error>,
{
  let field = field.try_into()?;
  let caps = platform::caps();
  let gf = match tier {
    Some(tier) => GaloisField::exact(field, tier, caps)?,
    None => match config::config().requested_tier {
      Some(forced) => GaloisField::forced(field, forced, caps),
      None => GaloisField::auto(field, caps),
    },
  };
  tracing::debug!(
    field = %gf.field,
    tier = %gf.tier,
    algorithm = %gf.algorithm.id,
    requested = ?tier,
    "bound field descriptor"
  );
  Ok(gf)
}

impl GaloisField {
  fn bind(field: FieldType, selected: Selected<AlgorithmId>) -> Result<Self, TierUnavailable> {
    let algorithm = Algorithm::lookup(field, selected.func).map_err(|_| TierUnavailable::NotImplemented)?;
    Ok(Self {
      field,
      tier: selected.tier,
      caps: selected.requires,
      algorithm,
    })
  }

  fn try_tier(field: FieldType, tier: KernelTier, caps: Caps) -> Result<Self, TierUnavailable> {
    Self::bind(field, select_tier(caps, bindings(field), tier)?)
  }

  fn exact(field: FieldType, tier: KernelTier, caps: Caps) -> Result<Self, Error> {
    Self::try_tier(field, tier, caps).map_err(|reason| {
      tracing::warn!(field = %field, tier = %tier, reason = %reason, "requested tier rejected");
      Error::UnsupportedCapability { field, tier, reason }
    })
  }

  /// Best tier in preference order. Never fails: every field binds a
  /// baseline kernel, and the reference kernel backs even that.
  fn auto(field: FieldType, caps: Caps) -> Self {
    Self::walk(field, KernelTier::preference_order(), caps).unwrap_or_else(|| Self::reference(field))
  }

  /// `forced`, or the first tier below it this machine and field support.
  fn forced(field: FieldType, forced: KernelTier, caps: Caps) -> Self {
    let order = KernelTier::preference_order();
    let below = order
      .iter()
      .position(|&t| t == forced)
      .and_then(|start| order.get(start..))
      .unwrap_or(&[]);
    match Self::walk(field, below, caps) {
      Some(gf) => {
        if gf.tier != forced {
          tracing::warn!(
            field = %field,
            forced = %forced,
            effective = %gf.tier,
            "GFKIT_FORCE_TIER unavailable, clamped to a lower tier"
          );
        }
        gf
      }
      None => Self::auto(field, caps),
    }
  }

  fn walk(field: FieldType, order: &[KernelTier], caps: Caps) -> Option<Self> {
    order.iter().find_map(|&tier| Self::try_tier(field, tier, caps).ok())
  }

  fn reference(field: FieldType) -> Self {
    Self {
      field,
      tier: KernelTier::Baseline,
      caps: Caps::BASELINE,
      algorithm: reference_for(field),
    }
  }

  /// Descriptor bound to one specific registered algorithm, bypassing tier
  /// bindings. Used to exercise kernels that no tier selects.
  ///
  /// # Errors
  ///
  /// [`Error::UnknownAlgorithm`] if `field` does not register `id`, and
  /// [`Error::UnsupportedCapability`] if the machine cannot run it.
  pub fn with_algorithm(field: FieldType, id: AlgorithmId) -> Result<Self, Error> {
    let algorithm = Algorithm::lookup(field, id)?;
    let caps = platform::caps();
    if !algorithm.is_available(caps) {
      return Err(Error::UnsupportedCapability {
        field,
        tier: id.tier(),
        reason: TierUnavailable::MissingCaps(id.requires().difference(caps)),
      });
    }
    Ok(Self {
      field,
      tier: id.tier(),
      caps: id.requires(),
      algorithm,
    })
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Region operations
// ─────────────────────────────────────────────────────────────────────────────

impl GaloisField {
  /// `region[i] ⊗= constant` for the first `length` bytes.
  ///
  /// Bits of `constant` above [`mask()`](Self::mask) are ignored.
  ///
  /// # Panics
  ///
  /// If `length > region.len()`.
  #[inline]
  pub fn multiply_region(&self, region: &mut [u8], constant: u8, length: usize) {
    (self.algorithm.mul)(&mut region[..length], constant);
  }

  /// `dst[i] ^= src[i] ⊗ constant` for the first `length` bytes.
  ///
  /// # Panics
  ///
  /// If `length` exceeds either buffer.
  #[inline]
  pub fn multiply_add_region(&self, dst: &mut [u8], src: &[u8], constant: u8, length: usize) {
    (self.algorithm.madd)(&mut dst[..length], &src[..length], constant);
  }

  /// `dst[i] ^= src[i]`: field addition, at the bound kernel's width.
  ///
  /// # Panics
  ///
  /// If `length` exceeds either buffer.
  #[inline]
  pub fn add_region(&self, dst: &mut [u8], src: &[u8], length: usize) {
    self.multiply_add_region(dst, src, 1, length);
  }

  /// `region[i] ⊗= constant⁻¹`. Dividing by zero zeroes the region.
  ///
  /// # Panics
  ///
  /// If `length > region.len()`.
  #[inline]
  pub fn divide_region(&self, region: &mut [u8], constant: u8, length: usize) {
    self.multiply_region(region, self.invert(constant), length);
  }

  /// `dst ^= Σ coefficients[j] ⊗ sources[j]` over the first `length` bytes.
  ///
  /// `dst` is untouched when the counts disagree.
  ///
  /// # Errors
  ///
  /// [`Error::CoefficientCountMismatch`] unless there is exactly one
  /// coefficient per source.
  ///
  /// # Panics
  ///
  /// If `length` exceeds any buffer.
  pub fn linear_combination(
    &self,
    dst: &mut [u8],
    sources: &[&[u8]],
    coefficients: &[u8],
    length: usize,
  ) -> Result<(), Error> {
    if sources.len() != coefficients.len() {
      return Err(Error::CoefficientCountMismatch {
        sources: sources.len(),
        coefficients: coefficients.len(),
      });
    }
    let dst = &mut dst[..length];
    for (src, &c) in sources.iter().zip(coefficients) {
      (self.algorithm.madd)(dst, &src[..length], c);
    }
    Ok(())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scalar arithmetic
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
fn scalar_mul<F: Field>(a: u8, b: u8) -> u8 {
  F::flat(a)[(b & F::MASK) as usize]
}

impl GaloisField {
  /// Multiplicative inverse; `invert(0) == 0`.
  #[inline]
  #[must_use]
  pub fn invert(&self, element: u8) -> u8 {
    match self.field {
      FieldType::Gf2 => Gf2::inverse(element),
      FieldType::Gf4 => Gf4::inverse(element),
      FieldType::Gf16 => Gf16::inverse(element),
      FieldType::Gf256 => Gf256::inverse(element),
    }
  }

  /// `a ⊗ b` for single elements.
  #[inline]
  #[must_use]
  pub fn multiply(&self, a: u8, b: u8) -> u8 {
    match self.field {
      FieldType::Gf2 => scalar_mul::<Gf2>(a, b),
      FieldType::Gf4 => scalar_mul::<Gf4>(a, b),
      FieldType::Gf16 => scalar_mul::<Gf16>(a, b),
      FieldType::Gf256 => scalar_mul::<Gf256>(a, b),
    }
  }

  /// `a ⊗ b⁻¹`. Division by zero yields zero.
  #[inline]
  #[must_use]
  pub fn divide(&self, a: u8, b: u8) -> u8 {
    self.multiply(a, self.invert(b))
  }

  /// `a ⊕ b`.
  #[inline]
  #[must_use]
  pub fn add(&self, a: u8, b: u8) -> u8 {
    (a ^ b) & self.mask()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Introspection
// ─────────────────────────────────────────────────────────────────────────────

impl GaloisField {
  #[inline]
  #[must_use]
  pub const fn field_type(&self) -> FieldType {
    self.field
  }

  /// Id of the bound kernel.
  #[inline]
  #[must_use]
  pub const fn algorithm(&self) -> AlgorithmId {
    self.algorithm.id
  }

  /// Full description of the bound kernel.
  #[must_use]
  pub fn descriptor(&self) -> AlgorithmDescriptor {
    self.algorithm.describe(platform::caps())
  }

  /// Tier the descriptor was bound at.
  #[inline]
  #[must_use]
  pub const fn tier(&self) -> KernelTier {
    self.tier
  }

  /// CPU features the bound kernel relies on.
  #[inline]
  #[must_use]
  pub const fn capabilities(&self) -> Caps {
    self.caps
  }

  /// Preferred buffer alignment in bytes.
  #[inline]
  #[must_use]
  pub const fn alignment(&self) -> usize {
    self.algorithm.id.vector_width()
  }

  #[inline]
  #[must_use]
  pub const fn polynomial(&self) -> u16 {
    self.field.polynomial()
  }

  #[inline]
  #[must_use]
  pub const fn exponent(&self) -> u32 {
    self.field.exponent()
  }

  #[inline]
  #[must_use]
  pub const fn size(&self) -> usize {
    self.field.size()
  }

  #[inline]
  #[must_use]
  pub const fn mask(&self) -> u8 {
    self.field.mask()
  }
}
