//! Wire encoding of the animation messages
//!
//! These tests verify that:
//! - Spring and fluid spring parameters survive encoding
//! - Fields equal to their defaults are left off the wire
//! - Unknown fields are skipped, whatever their wire type
//! - Single-precision payloads are widened on decode
//! - Malformed input is rejected with a descriptive error

use tension_animation::{FluidSpringAnimation, SpringAnimation};
use tension_core::{Field, WireEncoder, WireError, WireMessage, WireType};

/// All-default messages encode to nothing
#[test]
fn test_default_messages_are_empty() {
    assert!(SpringAnimation::default().to_bytes().is_empty());
    assert!(FluidSpringAnimation::default().to_bytes().is_empty());

    assert_eq!(SpringAnimation::from_bytes(&[]), Ok(SpringAnimation::default()));
    assert_eq!(
        FluidSpringAnimation::from_bytes(&[]),
        Ok(FluidSpringAnimation::default())
    );
}

/// Only fields that differ from the defaults are written
#[test]
fn test_spring_animation_writes_changed_fields() {
    let animation = SpringAnimation::new(1.0, 250.0, 20.0, 0.5);
    let bytes = animation.to_bytes();

    // stiffness (field 2) and initial velocity (field 4), 9 bytes each
    assert_eq!(bytes.len(), 18);
    assert_eq!(bytes[0], 0x11);
    assert_eq!(bytes[9], 0x21);
    assert_eq!(SpringAnimation::from_bytes(&bytes), Ok(animation));
}

/// A fluid spring survives a trip through the wire format
#[test]
fn test_fluid_spring_survives_encoding() {
    let animation = FluidSpringAnimation::new(0.55, 0.825, 0.1);
    let decoded = FluidSpringAnimation::from_bytes(&animation.to_bytes()).unwrap();
    assert_eq!(decoded, animation);
}

/// Fields this version does not know about are skipped
#[test]
fn test_unknown_fields_are_skipped() {
    let mut encoder = WireEncoder::new();
    encoder.varint_field(9, 42, 0);
    encoder.double_field(1, 2.0, 0.0);
    encoder.double_field(12, 7.0, 0.0);

    // length-delimited field 15 carrying three opaque bytes
    encoder.encode_varint(Field::new(15, WireType::LengthDelimited).key());
    encoder.encode_varint(3);
    for byte in [0x01, 0x02, 0x03] {
        encoder.encode_varint(byte);
    }
    encoder_fixed32_field(&mut encoder, 4, 1.25);

    let decoded = SpringAnimation::from_bytes(encoder.as_bytes()).unwrap();
    assert_eq!(decoded.mass, 2.0);
    assert_eq!(decoded.initial_velocity, 1.25);
    assert_eq!(decoded.stiffness, 100.0);
}

/// Single-precision doubles are widened
#[test]
fn test_fixed32_payload_is_widened() {
    let mut encoder = WireEncoder::new();
    encoder_fixed32_field(&mut encoder, 1, 0.3);

    let decoded = FluidSpringAnimation::from_bytes(encoder.as_bytes()).unwrap();
    assert_eq!(decoded.response, 0.3f32 as f64);
}

/// A field cut off mid-payload is an error, not a default
#[test]
fn test_truncated_payload_is_rejected() {
    let bytes = SpringAnimation::new(2.0, 100.0, 20.0, 0.0).to_bytes();
    let err = SpringAnimation::from_bytes(&bytes[..5]).unwrap_err();
    assert!(matches!(err, WireError::Truncated { .. }));
}

/// A known field with an incompatible wire type is an error
#[test]
fn test_wrong_wire_type_is_rejected() {
    let mut encoder = WireEncoder::new();
    encoder.varint_field(2, 300, 0);

    let err = FluidSpringAnimation::from_bytes(encoder.as_bytes()).unwrap_err();
    assert_eq!(
        err,
        WireError::UnexpectedWireType {
            tag: 2,
            wire_type: 0
        }
    );
    assert_eq!(err.to_string(), "Field 2 cannot be read from wire type 0");
}

fn encoder_fixed32_field(encoder: &mut WireEncoder, tag: u32, value: f32) {
    encoder.encode_varint(Field::new(tag, WireType::Fixed32).key());
    encoder.encode_fixed32(value.to_bits());
}
