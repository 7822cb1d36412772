use std::collections::HashSet;
use std::f32::consts::FRAC_PI_4;

use glam::Vec3;
use wgpu_attention_viewer::{
    Camera, IdentityColor, Mark, MarkSet, PickingMap, Rgb8, classify, in_frustum_set, occluded_set,
};

fn two_cuboids() -> MarkSet {
    MarkSet::from_marks([
        Mark::cuboid(1, Rgb8::WHITE, Vec3::new(0.0, 0.0, 5.0), Vec3::ONE),
        Mark::cuboid(2, Rgb8::WHITE, Vec3::new(0.0, 0.0, -5.0), Vec3::ONE),
    ])
    .unwrap()
}

fn map_showing(width: u32, height: u32, ids: &[IdentityColor]) -> PickingMap {
    let mut pixels = vec![IdentityColor::BACKGROUND; (width * height) as usize];
    pixels[..ids.len()].copy_from_slice(ids);
    PickingMap::from_ids(width, height, pixels)
}

#[test]
fn test_occluded_set_should_report_marks_absent_from_the_map() {
    let set = two_cuboids();
    let map = map_showing(4, 4, &[IdentityColor::encode(1, 0)]);

    let occluded = occluded_set(&map, &set);
    assert_eq!(occluded, HashSet::from([2]));
}

#[test]
fn test_occluded_set_with_all_marks_visible_should_be_empty() {
    let set = two_cuboids();
    let map = map_showing(
        4,
        4,
        &[IdentityColor::encode(1, 0), IdentityColor::encode(2, 3)],
    );

    assert!(occluded_set(&map, &set).is_empty());
}

#[test]
fn test_occluded_set_with_a_background_only_map_should_report_every_mark() {
    let set = two_cuboids();
    let map = map_showing(4, 4, &[]);

    assert_eq!(occluded_set(&map, &set), HashSet::from([1, 2]));
}

#[test]
fn test_in_frustum_set_should_split_marks_ahead_and_behind() {
    let set = two_cuboids();
    // Default camera at the origin looking toward +z.
    let camera = Camera::new(0.1..100.0, FRAC_PI_4);

    let in_frustum = in_frustum_set(&camera.frustum(1.0), &set);
    assert_eq!(in_frustum, HashSet::from([1]));
}

#[test]
fn test_classify_should_combine_both_reports() {
    let set = two_cuboids();
    let camera = Camera::new(0.1..100.0, FRAC_PI_4);
    let map = map_showing(4, 4, &[IdentityColor::encode(1, 0)]);

    let report = classify(&map, &camera.frustum(1.0), &set);
    assert_eq!(report.occluded, HashSet::from([2]));
    assert_eq!(report.in_frustum, HashSet::from([1]));
}
