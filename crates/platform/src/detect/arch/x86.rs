// ─────────────────────────────────────────────────────────────────────────────
// x86 / x86_64 Detection
// ─────────────────────────────────────────────────────────────────────────────

use crate::caps::Caps;

// CPUID leaf 1, EDX
const LEAF1_EDX_SSE2: u32 = 1 << 26;
// CPUID leaf 1, ECX
const LEAF1_ECX_SSSE3: u32 = 1 << 9;
const LEAF1_ECX_SSE41: u32 = 1 << 19;
const LEAF1_ECX_SSE42: u32 = 1 << 20;
const LEAF1_ECX_OSXSAVE: u32 = 1 << 27;
const LEAF1_ECX_AVX: u32 = 1 << 28;
// CPUID leaf 7 subleaf 0, EBX
const LEAF7_EBX_AVX2: u32 = 1 << 5;
const LEAF7_EBX_AVX512F: u32 = 1 << 16;
const LEAF7_EBX_AVX512BW: u32 = 1 << 30;
// CPUID leaf 7 subleaf 0, ECX
const LEAF7_ECX_GFNI: u32 = 1 << 8;

// XCR0 bits 1-2: XMM + YMM state.
const XCR0_AVX_MASK: u64 = 0x6;
// XCR0 bits 5-7: opmask + ZMM_Hi256 + Hi16_ZMM state.
const XCR0_AVX512_MASK: u64 = 0xE0;

/// Raw register words from the two feature leaves plus XCR0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct FeatureWords {
  pub leaf1_ecx: u32,
  pub leaf1_edx: u32,
  pub leaf7_ebx: u32,
  pub leaf7_ecx: u32,
  pub xcr0: u64,
}

/// Decode feature words into capabilities.
///
/// CPUID reports what the CPU implements; XCR0 reports which register state
/// the OS saves on context switch. AVX-class and AVX-512-class flags need
/// both, otherwise executing them faults.
#[must_use]
pub(crate) fn decode(words: FeatureWords) -> Caps {
  let mut caps = Caps::BASELINE;

  let os_avx = words.leaf1_ecx & LEAF1_ECX_OSXSAVE != 0 && (words.xcr0 & XCR0_AVX_MASK) == XCR0_AVX_MASK;
  let os_avx512 = os_avx && (words.xcr0 & XCR0_AVX512_MASK) == XCR0_AVX512_MASK;

  if words.leaf1_edx & LEAF1_EDX_SSE2 != 0 {
    caps |= Caps::SSE2;
  }
  if words.leaf1_ecx & LEAF1_ECX_SSSE3 != 0 {
    caps |= Caps::SSSE3;
  }
  if words.leaf1_ecx & LEAF1_ECX_SSE41 != 0 {
    caps |= Caps::SSE41;
  }
  if words.leaf1_ecx & LEAF1_ECX_SSE42 != 0 {
    caps |= Caps::SSE42;
  }

  if os_avx {
    if words.leaf1_ecx & LEAF1_ECX_AVX != 0 {
      caps |= Caps::AVX;
    }
    if words.leaf7_ebx & LEAF7_EBX_AVX2 != 0 {
      caps |= Caps::AVX2;
    }
  }

  if os_avx512 {
    if words.leaf7_ebx & LEAF7_EBX_AVX512F != 0 {
      caps |= Caps::AVX512F;
    }
    if words.leaf7_ebx & LEAF7_EBX_AVX512BW != 0 {
      caps |= Caps::AVX512BW;
    }
  }

  // GFNI's legacy-SSE encoding needs no extra OS state; the VEX/EVEX forms
  // are only selected together with AVX2/AVX512 flags above.
  if words.leaf7_ecx & LEAF7_ECX_GFNI != 0 {
    caps |= Caps::GFNI;
  }

  caps
}

#[cfg(target_arch = "x86_64")]
#[allow(unsafe_code, unused_unsafe)]
fn read_feature_words() -> FeatureWords {
  use core::arch::x86_64::{__cpuid, __cpuid_count, _xgetbv};

  // SAFETY: CPUID is available on every x86_64 CPU.
  let max_leaf = unsafe { __cpuid(0) }.eax;
  // SAFETY: as above.
  let leaf1 = unsafe { __cpuid(1) };
  let (leaf7_ebx, leaf7_ecx) = if max_leaf >= 7 {
    // SAFETY: leaf 7 is within the reported maximum.
    let leaf7 = unsafe { __cpuid_count(7, 0) };
    (leaf7.ebx, leaf7.ecx)
  } else {
    (0, 0)
  };

  let xcr0 = if leaf1.ecx & LEAF1_ECX_OSXSAVE != 0 {
    // SAFETY: XGETBV is enabled whenever OSXSAVE is set (checked above).
    unsafe { _xgetbv(0) }
  } else {
    0
  };

  FeatureWords {
    leaf1_ecx: leaf1.ecx,
    leaf1_edx: leaf1.edx,
    leaf7_ebx,
    leaf7_ecx,
    xcr0,
  }
}

/// Runtime detection for x86_64 via CPUID leaves 1 and 7 and XGETBV.
#[cfg(target_arch = "x86_64")]
pub(crate) fn detect() -> Caps {
  decode(read_feature_words())
}

/// Runtime detection for 32-bit x86.
///
/// Ancient i386/i486 parts may lack CPUID entirely, so this relies on the
/// standard library's guarded probe when available and on compile-time
/// features otherwise.
#[cfg(target_arch = "x86")]
pub(crate) fn detect() -> Caps {
  #[allow(unused_mut)]
  let mut caps = Caps::BASELINE;

  #[cfg(feature = "std")]
  {
    if std::arch::is_x86_feature_detected!("sse2") {
      caps |= Caps::SSE2;
    }
    if std::arch::is_x86_feature_detected!("ssse3") {
      caps |= Caps::SSSE3;
    }
    if std::arch::is_x86_feature_detected!("sse4.1") {
      caps |= Caps::SSE41;
    }
    if std::arch::is_x86_feature_detected!("sse4.2") {
      caps |= Caps::SSE42;
    }
    if std::arch::is_x86_feature_detected!("avx") {
      caps |= Caps::AVX;
    }
    if std::arch::is_x86_feature_detected!("avx2") {
      caps |= Caps::AVX2;
    }
  }

  caps
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_decode_empty_is_baseline() {
    assert_eq!(decode(FeatureWords::default()), Caps::BASELINE);
  }

  #[test]
  fn test_decode_sse_family() {
    let caps = decode(FeatureWords {
      leaf1_edx: LEAF1_EDX_SSE2,
      leaf1_ecx: LEAF1_ECX_SSSE3 | LEAF1_ECX_SSE41 | LEAF1_ECX_SSE42,
      ..FeatureWords::default()
    });
    assert!(caps.has(Caps::SSE2 | Caps::SSSE3 | Caps::SSE41 | Caps::SSE42));
    assert!(!caps.has(Caps::AVX));
  }

  #[test]
  fn test_decode_avx2_requires_os_support() {
    let cpu_only = FeatureWords {
      leaf1_ecx: LEAF1_ECX_AVX,
      leaf7_ebx: LEAF7_EBX_AVX2,
      ..FeatureWords::default()
    };
    assert!(!decode(cpu_only).has(Caps::AVX2));

    let with_os = FeatureWords {
      leaf1_ecx: LEAF1_ECX_AVX | LEAF1_ECX_OSXSAVE,
      xcr0: XCR0_AVX_MASK,
      ..cpu_only
    };
    assert!(decode(with_os).has(Caps::AVX | Caps::AVX2));
  }

  #[test]
  fn test_decode_avx512_requires_zmm_state() {
    let words = FeatureWords {
      leaf1_ecx: LEAF1_ECX_AVX | LEAF1_ECX_OSXSAVE,
      leaf7_ebx: LEAF7_EBX_AVX2 | LEAF7_EBX_AVX512F | LEAF7_EBX_AVX512BW,
      xcr0: XCR0_AVX_MASK,
      ..FeatureWords::default()
    };
    let caps = decode(words);
    assert!(caps.has(Caps::AVX2));
    assert!(!caps.has(Caps::AVX512F));

    let caps = decode(FeatureWords {
      xcr0: XCR0_AVX_MASK | XCR0_AVX512_MASK,
      ..words
    });
    assert!(caps.has(Caps::AVX512F | Caps::AVX512BW));
  }

  #[test]
  fn test_decode_gfni() {
    let caps = decode(FeatureWords {
      leaf7_ecx: LEAF7_ECX_GFNI,
      ..FeatureWords::default()
    });
    assert!(caps.has(Caps::GFNI));
  }

  #[test]
  #[cfg(all(target_arch = "x86_64", not(miri)))]
  fn test_detect_reports_sse2_on_x86_64() {
    assert!(detect().has(Caps::SSE2));
  }
}
