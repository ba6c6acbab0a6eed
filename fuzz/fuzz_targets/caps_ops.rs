//! Capability-set algebra and tier legality.
//!
//! Selection relies on `has` being a subset test: a tier must be legal for
//! any superset of its requirements, and for no set missing one of them.

#![no_main]

use arbitrary::Arbitrary;
use galois::{Caps, KernelTier};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  a: u32,
  b: u32,
  tier: u8,
}

fuzz_target!(|input: Input| {
  let a = Caps::from_bits_truncate(input.a);
  let b = Caps::from_bits_truncate(input.b);

  // ─── Set algebra ───
  assert_eq!(a | b, b | a, "union must be commutative");
  assert_eq!(a & b, b & a, "intersection must be commutative");
  assert!((a | b).has(a) && (a | b).has(b), "union must contain both operands");
  assert!(a.has(a & b) && b.has(a & b), "operands must contain intersection");
  assert_eq!(a.difference(b) & b, Caps::NONE, "difference must exclude subtrahend");
  assert_eq!(a.difference(b) | (a & b), a, "difference and intersection partition a");

  // ─── Tier legality ───
  let tier = KernelTier::ALL[usize::from(input.tier) % KernelTier::ALL.len()];
  let required = tier.requires();
  assert!(tier.is_available(a | required), "{tier} must be legal with its requirements");
  if !a.has(required) {
    assert!(!tier.is_available(a), "{tier} must be illegal when {} is missing", required.difference(a));
  }
});
