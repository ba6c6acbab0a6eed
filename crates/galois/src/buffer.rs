//! Heap buffers that satisfy the alignment contract.
//!
//! Descriptors bound to vector tiers run fastest on buffers aligned to
//! [`GaloisField::alignment`](crate::GaloisField::alignment). `Vec<u8>`
//! guarantees only 1-byte alignment, so coding loops allocate through
//! [`AlignedBuffer`] (one region) or [`CodingBuffer`] (many equal slots).
#![allow(unsafe_code)]

use alloc::alloc::{Layout, alloc_zeroed, dealloc, handle_alloc_error};
use core::{
  fmt,
  ops::{Deref, DerefMut},
  ptr::NonNull,
};

/// Alignment that covers every vector tier (AVX-512 included).
pub const DEFAULT_ALIGNMENT: usize = 64;

/// Zero-initialized, fixed-size byte buffer whose start is aligned.
pub struct AlignedBuffer {
  ptr: NonNull<u8>,
  len: usize,
  layout: Layout,
}

// SAFETY: The buffer uniquely owns its allocation, like `Vec<u8>`.
unsafe impl Send for AlignedBuffer {}
// SAFETY: Shared access only hands out `&[u8]`.
unsafe impl Sync for AlignedBuffer {}

impl AlignedBuffer {
  /// `len` zero bytes aligned to [`DEFAULT_ALIGNMENT`].
  #[must_use]
  pub fn new(len: usize) -> Self {
    match Self::with_alignment(len, DEFAULT_ALIGNMENT) {
      Some(buf) => buf,
      None => handle_alloc_error(Layout::new::<u8>()),
    }
  }

  /// `len` zero bytes aligned to `align`.
  ///
  /// Returns `None` if `align` is not a power of two or the rounded size
  /// overflows `isize`.
  #[must_use]
  pub fn with_alignment(len: usize, align: usize) -> Option<Self> {
    // Never allocate zero bytes; the allocator contract forbids it.
    let layout = Layout::from_size_align(len.max(1), align).ok()?.pad_to_align();
    // SAFETY: `layout` has non-zero size.
    let raw = unsafe { alloc_zeroed(layout) };
    let Some(ptr) = NonNull::new(raw) else {
      handle_alloc_error(layout)
    };
    Some(Self { ptr, len, layout })
  }

  /// A buffer holding a copy of `data`.
  #[must_use]
  pub fn from_slice(data: &[u8]) -> Self {
    let mut buf = Self::new(data.len());
    buf.copy_from_slice(data);
    buf
  }

  #[inline]
  #[must_use]
  pub const fn alignment(&self) -> usize {
    self.layout.align()
  }

  #[inline]
  #[must_use]
  pub fn as_slice(&self) -> &[u8] {
    // SAFETY: `ptr` points to at least `len` initialized bytes owned by `self`.
    unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
  }

  #[inline]
  #[must_use]
  pub fn as_mut_slice(&mut self) -> &mut [u8] {
    // SAFETY: As in `as_slice`, and `&mut self` guarantees exclusivity.
    unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
  }
}

impl Drop for AlignedBuffer {
  fn drop(&mut self) {
    // SAFETY: `ptr` was allocated with exactly `layout`.
    unsafe { dealloc(self.ptr.as_ptr(), self.layout) }
  }
}

impl Clone for AlignedBuffer {
  fn clone(&self) -> Self {
    let mut copy = match Self::with_alignment(self.len, self.alignment()) {
      Some(buf) => buf,
      None => handle_alloc_error(self.layout),
    };
    copy.copy_from_slice(self);
    copy
  }
}

impl Deref for AlignedBuffer {
  type Target = [u8];

  #[inline]
  fn deref(&self) -> &[u8] {
    self.as_slice()
  }
}

impl DerefMut for AlignedBuffer {
  #[inline]
  fn deref_mut(&mut self) -> &mut [u8] {
    self.as_mut_slice()
  }
}

impl fmt::Debug for AlignedBuffer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AlignedBuffer")
      .field("len", &self.len)
      .field("align", &self.alignment())
      .finish_non_exhaustive()
  }
}

impl PartialEq for AlignedBuffer {
  fn eq(&self, other: &Self) -> bool {
    self.as_slice() == other.as_slice()
  }
}

impl Eq for AlignedBuffer {}

// ─────────────────────────────────────────────────────────────────────────────
// Coding buffer
// ─────────────────────────────────────────────────────────────────────────────

/// `count` equally sized slots, each starting on an aligned boundary.
///
/// The usual layout for a generation of coded packets: one slot per packet,
/// combined slot-against-slot with
/// [`GaloisField::linear_combination`](crate::GaloisField::linear_combination).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodingBuffer {
  data: AlignedBuffer,
  count: usize,
  slot_len: usize,
  stride: usize,
}

impl CodingBuffer {
  /// `count` zeroed slots of `slot_len` bytes at [`DEFAULT_ALIGNMENT`].
  #[must_use]
  pub fn new(count: usize, slot_len: usize) -> Self {
    match Self::with_alignment(count, slot_len, DEFAULT_ALIGNMENT) {
      Some(buf) => buf,
      None => handle_alloc_error(Layout::new::<u8>()),
    }
  }

  /// Returns `None` if `align` is not a power of two or the total size overflows.
  #[must_use]
  pub fn with_alignment(count: usize, slot_len: usize, align: usize) -> Option<Self> {
    if !align.is_power_of_two() {
      return None;
    }
    let stride = slot_len.checked_next_multiple_of(align)?.max(align);
    let data = AlignedBuffer::with_alignment(stride.checked_mul(count)?, align)?;
    Some(Self {
      data,
      count,
      slot_len,
      stride,
    })
  }

  #[inline]
  #[must_use]
  pub const fn slot_count(&self) -> usize {
    self.count
  }

  #[inline]
  #[must_use]
  pub const fn slot_len(&self) -> usize {
    self.slot_len
  }

  /// Slot `index`, or `None` past the end.
  #[must_use]
  pub fn slot(&self, index: usize) -> Option<&[u8]> {
    let start = self.offset(index)?;
    self.data.get(start..start + self.slot_len)
  }

  /// Mutable slot `index`, or `None` past the end.
  #[must_use]
  pub fn slot_mut(&mut self, index: usize) -> Option<&mut [u8]> {
    let start = self.offset(index)?;
    self.data.get_mut(start..start + self.slot_len)
  }

  /// Slot `index` mutably, with every other slot shared, for combining the
  /// others into it.
  #[must_use]
  pub fn split_slot_mut(&mut self, index: usize) -> Option<(&mut [u8], alloc::vec::Vec<&[u8]>)> {
    let start = self.offset(index)?;
    let slot_len = self.slot_len;
    let stride = self.stride;
    let (before, rest) = self.data.split_at_mut(start);
    let (target, after) = rest.split_at_mut(stride.min(rest.len()));
    let (before, after): (&[u8], &[u8]) = (before, after);
    let others = before
      .chunks_exact(stride)
      .chain(after.chunks_exact(stride))
      .map(|slot| &slot[..slot_len])
      .collect();
    Some((&mut target[..slot_len], others))
  }

  pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
    let slot_len = self.slot_len;
    self.data.chunks_exact(self.stride).map(move |slot| &slot[..slot_len])
  }

  pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
    let slot_len = self.slot_len;
    self
      .data
      .chunks_exact_mut(self.stride)
      .map(move |slot| &mut slot[..slot_len])
  }

  fn offset(&self, index: usize) -> Option<usize> {
    (index < self.count).then(|| index * self.stride)
  }
}
