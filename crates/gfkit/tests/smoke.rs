//! Facade smoke test: the public surface end to end.

use gfkit::{
  AlignedBuffer, AlgorithmId, CodingBuffer, Error, FieldType, HardwareCapabilities, KernelTier, build_field,
  detect_capabilities, list_algorithms, self_test,
};

#[test]
fn capabilities_include_baseline() {
  let caps = detect_capabilities();
  assert!(caps.has(HardwareCapabilities::BASELINE), "{caps}");
  assert_eq!(detect_capabilities(), caps, "detection must be stable");
}

#[test]
fn auto_descriptor_is_available_here() {
  let caps = detect_capabilities();
  for field in FieldType::ALL {
    let gf = build_field(field, None).unwrap();
    assert!(caps.has(gf.capabilities()), "{field}: {gf:?}");
    assert!(gf.descriptor().available);
    assert_eq!(self_test(field, gf.algorithm()), Ok(()));
  }
}

#[test]
fn encode_and_recover_one_packet() {
  let gf = build_field(FieldType::Gf16, Some(KernelTier::Baseline)).unwrap();
  let mut packets = CodingBuffer::new(3, 100);
  for (i, slot) in packets.iter_mut().enumerate() {
    slot.iter_mut().enumerate().for_each(|(j, b)| *b = (i * 64 + j) as u8);
  }
  let originals: Vec<Vec<u8>> = packets.iter().map(<[u8]>::to_vec).collect();

  // Parity = 3·p0 + 7·p1 + 10·p2 over packed GF(16) symbols.
  let coefficients = [0x3, 0x7, 0xA];
  let sources: Vec<&[u8]> = packets.iter().collect();
  let mut parity = AlignedBuffer::new(100);
  gf.linear_combination(&mut parity, &sources, &coefficients, 100).unwrap();

  // Lose p1, recover it from the parity and the survivors.
  let survivors = [originals[0].as_slice(), originals[2].as_slice()];
  gf.linear_combination(&mut parity, &survivors, &[0x3, 0xA], 100).unwrap();

  // One coefficient short is reported, not a panic.
  assert!(matches!(
    gf.linear_combination(&mut parity, &survivors, &[0x3], 100),
    Err(Error::CoefficientCountMismatch { sources: 2, coefficients: 1 })
  ));
  gf.divide_region(&mut parity, 0x7, 100);
  assert_eq!(parity.as_slice(), originals[1].as_slice());
}

#[test]
fn registry_and_errors() {
  let names: Vec<&str> = list_algorithms(FieldType::Gf256).iter().map(|d| d.name).collect();
  assert!(names.contains(&"reference"), "{names:?}");
  assert!(names.contains(&"imul_gpr64"), "{names:?}");

  assert!(matches!(build_field(12u32, None), Err(Error::InvalidFieldType(_))));
  assert!(matches!(
    "imul_gpr128".parse::<AlgorithmId>(),
    Err(Error::UnknownAlgorithmName(_))
  ));
}
