//! Backend crate: kernel selection primitives for gfkit.
//!
//! - **Tiers**: [`KernelTier`] names instruction-set levels and their per-architecture preference
//!   order.
//! - **Families**: [`KernelFamily`] names the arithmetic technique behind a kernel.
//! - **Dispatch**: [`dispatch::select`] and [`dispatch::select_tier`] choose a kernel from an
//!   ordered candidate list given a capability set.
//!
//! Selection happens once, when a field descriptor is built; the hot path is
//! a single indirect call through the bound function pointer.

// Fallibility discipline: deny unwrap/expect in production, allow in tests.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod dispatch;
pub mod family;
pub mod tier;

pub use family::KernelFamily;
// Re-export platform types for convenience.
pub use platform::{self, Caps};
pub use tier::KernelTier;
