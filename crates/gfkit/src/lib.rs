//! Hardware-adaptive Galois field arithmetic for network and erasure coding.
//!
//! `gfkit` multiplies and accumulates whole buffers over GF(2), GF(4),
//! GF(16) and GF(256). A [`GaloisField`] descriptor binds the fastest kernel
//! the running CPU supports once, at construction; every region call after
//! that is a single indirect call.
//!
//! # Quick Start
//!
//! ```
//! use gfkit::{FieldType, build_field};
//!
//! let gf = build_field(FieldType::Gf256, None)?;
//!
//! // Encode: parity = 2·a + 3·b
//! let a = [0x87u8; 64];
//! let b = [0x01u8; 64];
//! let mut parity = [0u8; 64];
//! gf.linear_combination(&mut parity, &[&a[..], &b[..]], &[2, 3], 64)?;
//! assert_eq!(parity[0], 0x13 ^ 0x03);
//! # Ok::<(), gfkit::Error>(())
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std` | Yes | Runtime CPU detection and the `GFKIT_FORCE_TIER` override |
//!
//! ## `no_std` Usage
//!
//! ```toml
//! [dependencies]
//! gfkit = { version = "0.1", default-features = false }
//! ```
//!
//! Without `std`, kernel selection uses compile-time target features only.
//! An allocator is still required.
#![cfg_attr(not(feature = "std"), no_std)]

// =============================================================================
// Capabilities
// =============================================================================

pub use backend::{KernelFamily, KernelTier};

/// CPU feature set, as detected and narrowed by any override.
pub type HardwareCapabilities = platform::Caps;

/// Capabilities the kernels may use on this machine.
///
/// Detection runs once per process; later calls read the cached result.
#[inline]
#[must_use]
pub fn detect_capabilities() -> HardwareCapabilities {
  platform::caps()
}

// =============================================================================
// Fields
// =============================================================================

pub use galois::{
  // Buffers
  AlignedBuffer,
  // Registry
  AlgorithmDescriptor,
  AlgorithmId,
  CodingBuffer,
  DEFAULT_ALIGNMENT,
  // Errors
  Error,
  // Descriptors
  FieldType,
  GaloisConfig,
  GaloisField,
  MismatchReport,
  Operation,
  build_field,
  config,
  list_algorithms,
};

// =============================================================================
// Self-test
// =============================================================================

pub use galois::{self_test, self_test_all, self_test_everything};
