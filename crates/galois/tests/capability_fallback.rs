//! Descriptor selection when CPU features are masked off.
//!
//! The capability override is process-global, so every test here holds
//! `OVERRIDE_LOCK` while it is set.

use std::{
  fmt,
  sync::{Arc, Mutex},
};

use galois::{AlgorithmId, Caps, Error, FieldType, KernelTier, build_field, self_test, self_test_all};
use tracing::{Event, Level, Subscriber, field::Field};
use tracing_subscriber::{
  layer::{Context, Layer},
  prelude::*,
};

static OVERRIDE_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with capabilities narrowed to `caps`, restoring detection after.
fn with_caps<R>(caps: Caps, f: impl FnOnce() -> R) -> R {
  let _guard = OVERRIDE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
  platform::set_caps_override(Some(caps));
  let out = f();
  platform::reset_for_testing();
  out
}

// ─────────────────────────────────────────────────────────────────────────────
// Automatic selection
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn baseline_binds_general_purpose_kernels() {
  with_caps(Caps::BASELINE, || {
    for field in FieldType::ALL {
      let gf = build_field(field, None).unwrap();
      assert_eq!(gf.tier(), KernelTier::Baseline, "{field}");
      let expected = if field == FieldType::Gf2 {
        AlgorithmId::XorGpr64
      } else {
        AlgorithmId::ImulGpr64
      };
      assert_eq!(gf.algorithm(), expected, "{field}");
      assert_eq!(gf.capabilities(), Caps::BASELINE, "{field}");
    }
  });
}

#[test]
fn baseline_results_match_full_capabilities() {
  let full: Vec<_> = FieldType::ALL.iter().map(|&f| build_field(f, None).unwrap()).collect();
  let narrowed: Vec<_> = with_caps(Caps::BASELINE, || {
    FieldType::ALL.iter().map(|&f| build_field(f, None).unwrap()).collect()
  });

  for (fast, slow) in full.iter().zip(&narrowed) {
    let src: Vec<u8> = (0..300u32).map(|i| (i * 89 + 1) as u8).collect();
    for c in [0u8, 1, 2, 0x0B, 0xFE] {
      let mut a = vec![0x5Au8; 300];
      let mut b = a.clone();
      fast.multiply_add_region(&mut a, &src, c, 300);
      slow.multiply_add_region(&mut b, &src, c, 300);
      assert_eq!(a, b, "{} c={c}", fast.field_type());
    }
  }
}

#[test]
fn self_test_skips_unavailable_kernels() {
  let verified = with_caps(Caps::BASELINE, || self_test_all(FieldType::Gf256).unwrap());
  assert!(verified.contains(&AlgorithmId::ImulGpr64));
  assert!(verified.contains(&AlgorithmId::LogTable));
  assert!(verified.iter().all(|id| id.requires() == Caps::BASELINE), "{verified:?}");
}

// ─────────────────────────────────────────────────────────────────────────────
// Explicit tiers
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn explicit_tier_never_falls_back() {
  with_caps(Caps::BASELINE, || {
    for tier in [KernelTier::Avx2, KernelTier::Gfni, KernelTier::Neon] {
      let err = build_field(FieldType::Gf256, Some(tier)).unwrap_err();
      assert!(
        matches!(err, Error::UnsupportedCapability { field: FieldType::Gf256, tier: t, .. } if t == tier),
        "{tier}: {err}"
      );
    }
  });
}

#[test]
fn explicit_baseline_always_succeeds() {
  with_caps(Caps::BASELINE, || {
    for field in FieldType::ALL {
      let gf = build_field(field, Some(KernelTier::Baseline)).unwrap();
      assert_eq!(gf.tier(), KernelTier::Baseline);
    }
  });
}

/// Collects the message of every event at exactly `level` emitted while installed.
struct LevelRecorder {
  level: Level,
  messages: Arc<Mutex<Vec<String>>>,
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
  fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
    if field.name() == "message" {
      self.0 = format!("{value:?}");
    }
  }
}

impl<S: Subscriber> Layer<S> for LevelRecorder {
  fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
    if *event.metadata().level() == self.level {
      let mut visitor = MessageVisitor(String::new());
      event.record(&mut visitor);
      self.messages.lock().unwrap().push(visitor.0);
    }
  }
}

#[test]
fn rejected_tier_is_logged() {
  let messages = Arc::new(Mutex::new(Vec::new()));
  let subscriber = tracing_subscriber::registry().with(LevelRecorder {
    level: Level::WARN,
    messages: Arc::clone(&messages),
  });

  with_caps(Caps::BASELINE, || {
    tracing::subscriber::with_default(subscriber, || {
      assert!(build_field(FieldType::Gf16, Some(KernelTier::Avx512)).is_err());
      assert!(build_field(FieldType::Gf16, Some(KernelTier::Baseline)).is_ok());
    });
  });

  let messages = messages.lock().unwrap();
  assert_eq!(messages.as_slice(), ["requested tier rejected"], "{messages:?}");
}

#[test]
fn self_test_pass_is_logged_at_debug() {
  let messages = Arc::new(Mutex::new(Vec::new()));
  let subscriber = tracing_subscriber::registry().with(LevelRecorder {
    level: Level::DEBUG,
    messages: Arc::clone(&messages),
  });

  tracing::subscriber::with_default(subscriber, || {
    self_test(FieldType::Gf4, AlgorithmId::ImulGpr64).unwrap();
  });

  let messages = messages.lock().unwrap();
  assert!(messages.iter().any(|m| m == "self-test passed"), "{messages:?}");
}

#[cfg(target_arch = "x86_64")]
#[test]
fn x86_tiers_track_masked_features() {
  let detected = platform::detected();
  if !detected.has(KernelTier::Avx2.requires()) {
    return;
  }
  let caps = Caps::BASELINE | KernelTier::Avx2.requires() | KernelTier::Ssse3.requires();
  with_caps(caps, || {
    let gf = build_field(FieldType::Gf16, None).unwrap();
    assert_eq!(gf.tier(), KernelTier::Avx2);
    assert_eq!(gf.algorithm(), AlgorithmId::ShuffleAvx2);

    let gf = build_field(FieldType::Gf2, None).unwrap();
    assert_eq!(gf.algorithm(), AlgorithmId::XorAvx2);

    assert!(build_field(FieldType::Gf16, Some(KernelTier::Avx512)).is_err());
  });
}

#[cfg(target_arch = "x86_64")]
#[test]
fn gfni_binds_widest_encoding_the_host_has() {
  let detected = platform::detected();
  let gfni512 = AlgorithmId::Gfni512.requires();
  if !detected.has(gfni512) {
    return;
  }
  with_caps(Caps::BASELINE | KernelTier::Sse2.requires() | gfni512, || {
    let gf = build_field(FieldType::Gf256, Some(KernelTier::Gfni)).unwrap();
    assert_eq!(gf.algorithm(), AlgorithmId::Gfni512);
    assert_eq!(gf.alignment(), 64);
  });
  with_caps(Caps::BASELINE | KernelTier::Sse2.requires() | Caps::GFNI, || {
    let gf = build_field(FieldType::Gf256, Some(KernelTier::Gfni)).unwrap();
    assert_eq!(gf.algorithm(), AlgorithmId::Gfni128);
  });
}

// ─────────────────────────────────────────────────────────────────────────────
// Invalid fields
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn invalid_field_sizes_are_rejected() {
  for size in [0u32, 1, 3, 8, 32, 65536] {
    assert!(
      matches!(build_field(size, None), Err(Error::InvalidFieldType(_))),
      "size {size}"
    );
  }
  assert_eq!(build_field(16u32, None).unwrap().field_type(), FieldType::Gf16);
}
