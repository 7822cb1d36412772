use glam::Vec3;
use wgpu_attention_viewer::{AttentionState, ColorRamp, Rgb8, TintPalette};

#[test]
fn test_color_for_at_the_midpoint_should_blend_the_endpoints() {
    let ramp = ColorRamp::default();

    // Halfway between #FFFF00 and #FF0000.
    assert_eq!(ramp.color_for(0.0, 30.0, 15.0), Rgb8::new(0xFF, 0x80, 0x00));
}

#[test]
fn test_color_for_above_max_should_return_the_alert_color_exactly() {
    let ramp = ColorRamp {
        min_color: Rgb8::new(0x00, 0x00, 0xFF),
        max_color: Rgb8::new(0x00, 0xFF, 0x00),
        alert_color: Rgb8::new(0xFF, 0x00, 0xFF),
    };

    // A hard clamp, not extrapolation past the high end.
    assert_eq!(ramp.color_for(0.0, 30.0, 30.5), ramp.alert_color);
    assert_eq!(ramp.color_for(0.0, 30.0, 1e6), ramp.alert_color);
}

#[test]
fn test_color_for_at_or_below_min_should_return_the_low_end_color() {
    let ramp = ColorRamp::default();

    assert_eq!(ramp.color_for(10.0, 30.0, 10.0), ramp.min_color);
    assert_eq!(ramp.color_for(10.0, 30.0, -5.0), ramp.min_color);
}

#[test]
fn test_color_for_at_the_endpoints_should_hit_the_endpoint_colors() {
    let ramp = ColorRamp::default();

    assert_eq!(ramp.color_for(0.0, 30.0, 0.0), ramp.min_color);
    assert_eq!(ramp.color_for(0.0, 30.0, 30.0), ramp.max_color);
}

#[test]
fn test_color_for_with_a_degenerate_range_should_return_the_low_end_color() {
    let ramp = ColorRamp::default();

    assert_eq!(ramp.color_for(5.0, 5.0, 5.0), ramp.min_color);
    assert_eq!(ramp.color_for(10.0, 5.0, 7.0), ramp.min_color);
}

#[test]
fn test_palette_target_should_map_each_state() {
    let palette = TintPalette::default();

    assert_eq!(palette.target(AttentionState::Baseline), Vec3::ONE);
    assert_eq!(
        palette.target(AttentionState::Emphasized),
        palette.emphasized
    );
    assert_eq!(
        palette.target(AttentionState::Deemphasized),
        palette.deemphasized
    );
}

#[test]
fn test_rgb8_lerp_should_round_to_the_nearest_channel_value() {
    let a = Rgb8::new(0, 0, 0);
    let b = Rgb8::new(255, 255, 255);

    // 127.5 rounds up.
    assert_eq!(a.lerp(b, 0.5), Rgb8::new(128, 128, 128));
    assert_eq!(a.lerp(b, -1.0), a);
    assert_eq!(a.lerp(b, 2.0), b);
}
