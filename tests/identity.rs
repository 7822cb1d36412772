use wgpu_attention_viewer::{FACE_CAPACITY, IdentityColor, MARK_CAPACITY, Rgb8};

#[test]
fn test_identity_encode_decode_should_round_trip_across_capacity() {
    let face_indices = [0u16, 1, 2, 255, 256, 257, 32767, 65534, 65535];

    for id in 1..=255u8 {
        for face in face_indices {
            let encoded = IdentityColor::encode(id, face);
            assert_eq!(encoded.decode(), (id, face));
            assert_eq!(encoded.mark_id(), id);
            assert_eq!(encoded.face_index(), face);
        }
    }
}

#[test]
fn test_identity_encode_should_never_collide_within_capacity() {
    // Any two distinct (id, face) pairs must map to distinct packed values.
    let a = IdentityColor::encode(1, 0);
    let b = IdentityColor::encode(1, 1);
    let c = IdentityColor::encode(2, 0);
    let d = IdentityColor::encode(2, 65535);

    assert_ne!(a, b);
    assert_ne!(a, c);
    assert_ne!(b, c);
    assert_ne!(c, d);
}

#[test]
fn test_identity_background_should_be_zero_and_never_produced_by_encode() {
    assert!(IdentityColor::BACKGROUND.is_background());
    assert_eq!(IdentityColor::BACKGROUND.0, 0);

    // The smallest valid identity, id 1 face 0, is distinct from background.
    assert!(!IdentityColor::encode(1, 0).is_background());
}

#[test]
fn test_identity_rgb8_round_trip_should_preserve_identity() {
    for id in [1u8, 7, 128, 255] {
        for face in [0u16, 300, 65535] {
            let encoded = IdentityColor::encode(id, face);
            let rgb = encoded.to_rgb8();
            assert_eq!(IdentityColor::from_rgb8(rgb), encoded);
        }
    }
}

#[test]
fn test_identity_rgb8_channels_should_match_bit_layout() {
    let rgb = IdentityColor::encode(0xAB, 0xCDEF).to_rgb8();
    assert_eq!(rgb, Rgb8::new(0xAB, 0xCD, 0xEF));
}

#[test]
fn test_identity_capacity_constants_should_match_bit_layout() {
    assert_eq!(FACE_CAPACITY, 65536);
    assert_eq!(MARK_CAPACITY, 255);
}

#[test]
fn test_rgb8_from_hex_should_parse_valid_colors() {
    assert_eq!(Rgb8::from_hex("#FFFF00").unwrap(), Rgb8::new(255, 255, 0));
    assert_eq!(Rgb8::from_hex("#FF0000").unwrap(), Rgb8::new(255, 0, 0));
    assert_eq!(Rgb8::from_hex("#123456").unwrap(), Rgb8::new(0x12, 0x34, 0x56));
}

#[test]
fn test_rgb8_from_hex_should_reject_malformed_colors() {
    assert!(Rgb8::from_hex("FFFF00").is_err());
    assert!(Rgb8::from_hex("#FFFF0").is_err());
    assert!(Rgb8::from_hex("#GGGGGG").is_err());
    assert!(Rgb8::from_hex("#FFFF000").is_err());
}

#[test]
fn test_rgb8_to_hex_should_round_trip() {
    for hex in ["#FF8000", "#000000", "#FFFFFF", "#0A0B0C"] {
        assert_eq!(Rgb8::from_hex(hex).unwrap().to_hex(), hex);
    }
}

#[test]
fn test_rgb8_linear_round_trip_should_be_lossless_over_u8() {
    for value in [0u8, 1, 63, 127, 128, 254, 255] {
        let color = Rgb8::new(value, value, value);
        assert_eq!(Rgb8::from_linear(color.to_linear()), color);
    }
}
