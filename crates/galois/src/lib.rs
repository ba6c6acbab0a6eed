//! Region arithmetic over GF(2), GF(4), GF(16) and GF(256).
//!
//! The crate binds, once per field, the fastest kernel the running machine
//! supports, and verifies any kernel against a slow reference on demand.
//!
//! - **Descriptors**: [`build_field`] returns a [`GaloisField`] with
//!   `multiply_region` (`r ⊗= c`) and `multiply_add_region` (`d ^= s ⊗ c`)
//!   bound to one kernel.
//! - **Registry**: [`list_algorithms`] enumerates every kernel variant a
//!   field has on this target.
//! - **Self-test**: [`self_test`] cross-checks one variant against the
//!   reference kernel for every constant.
//!
//! Fields smaller than a byte pack several symbols per byte (GF(4): four,
//! GF(16): two, GF(2): eight) and region operations apply to all of them.
//!
//! # Quick Start
//!
//! ```
//! use galois::{FieldType, build_field};
//!
//! let gf = build_field(FieldType::Gf16, None)?;
//!
//! // Encode: parity ^= 3·a ^ 7·b
//! let a = [0x12u8; 64];
//! let b = [0x34u8; 64];
//! let mut parity = [0u8; 64];
//! gf.multiply_add_region(&mut parity, &a, 3, 64);
//! gf.multiply_add_region(&mut parity, &b, 7, 64);
//!
//! // Decode a: a = (parity ^ 7·b) / 3
//! gf.multiply_add_region(&mut parity, &b, 7, 64);
//! gf.divide_region(&mut parity, 3, 64);
//! assert_eq!(parity, a);
//! # Ok::<(), galois::Error>(())
//! ```
//!
//! # Selecting a Tier
//!
//! ```
//! use galois::{FieldType, KernelTier, build_field};
//!
//! // Baseline is always available and bound to the 64-bit register kernel.
//! let gf = build_field(FieldType::Gf256, Some(KernelTier::Baseline))?;
//! assert_eq!(gf.algorithm().name(), "imul_gpr64");
//! # Ok::<(), galois::Error>(())
//! ```

// Fallibility discipline: deny unwrap/expect in production, allow in tests.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod algorithm;
mod buffer;
mod config;
mod dispatch;
mod error;
mod field;
mod kernels;
mod selftest;
mod tables;

// Proptest uses file I/O for failure persistence that Miri cannot interpret.
#[cfg(all(test, not(miri)))]
mod proptests;

pub use algorithm::{Algorithm, AlgorithmDescriptor, AlgorithmId, list_algorithms};
pub use backend::{KernelFamily, KernelTier};
pub use buffer::{AlignedBuffer, CodingBuffer, DEFAULT_ALIGNMENT};
pub use config::{GaloisConfig, config, parse_force_tier};
pub use dispatch::{GaloisField, build_field};
pub use error::{Error, MismatchReport, Operation};
pub use field::FieldType;
pub use platform::Caps;
pub use selftest::{LENGTHS as SELF_TEST_LENGTHS, seed_for, self_test, self_test_all, self_test_everything};
