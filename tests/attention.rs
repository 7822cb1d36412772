use glam::Vec3;
use wgpu_attention_viewer::{
    AttentionState, AttentionStore, FeedbackFlags, IdentityColor, Mark, MarkSet, RegionSample,
    Rgb8,
};

fn set_with_faces(faces: &[(u8, usize)]) -> MarkSet {
    MarkSet::from_marks(faces.iter().map(|&(id, face_count)| {
        Mark::new(id, Rgb8::WHITE, vec![Vec3::ZERO; face_count * 3])
    }))
    .expect("mark set")
}

fn sample_of(identities: &[IdentityColor]) -> RegionSample {
    RegionSample(identities.to_vec())
}

#[test]
fn test_record_hover_with_background_only_sample_should_be_a_no_op() {
    let set = set_with_faces(&[(1, 4)]);
    let mut store = AttentionStore::new(&set);

    let record = store.record_hover(&sample_of(&[IdentityColor::BACKGROUND; 16]));

    assert!(record.is_empty());
    let mark = store.by_id(1).unwrap();
    assert_eq!(mark.cumulative, 0);
    assert_eq!(mark.level, 0);
    assert!(mark.faces.iter().all(|&f| f == 0));
}

#[test]
fn test_record_hover_with_empty_sample_should_be_a_no_op() {
    let set = set_with_faces(&[(1, 4)]);
    let mut store = AttentionStore::new(&set);

    let record = store.record_hover(&RegionSample::default());

    assert!(record.is_empty());
    assert_eq!(store.by_id(1).unwrap().cumulative, 0);
}

#[test]
fn test_record_hover_should_dedupe_to_distinct_marks_and_faces() {
    let set = set_with_faces(&[(1, 4), (2, 4)]);
    let mut store = AttentionStore::new(&set);

    // Many pixels, but only marks {1, 2} and faces {(1,0), (1,1), (2,3)}.
    let record = store.record_hover(&sample_of(&[
        IdentityColor::encode(1, 0),
        IdentityColor::encode(1, 0),
        IdentityColor::encode(1, 1),
        IdentityColor::encode(2, 3),
        IdentityColor::encode(2, 3),
        IdentityColor::BACKGROUND,
    ]));

    let mut hovered = record.hovered.clone();
    hovered.sort();
    assert_eq!(hovered, vec![1, 2]);

    let one = store.by_id(1).unwrap();
    assert_eq!(one.cumulative, 1);
    assert_eq!(one.level, 1);
    assert_eq!(one.faces, vec![1, 1, 0, 0]);

    let two = store.by_id(2).unwrap();
    assert_eq!(two.cumulative, 1);
    assert_eq!(two.faces, vec![0, 0, 0, 1]);

    assert_eq!(store.face_max(), 1);
}

#[test]
fn test_record_hover_repeated_should_saturate_level_at_max() {
    let set = set_with_faces(&[(1, 1)]);
    let mut store = AttentionStore::new(&set);
    let sample = sample_of(&[IdentityColor::encode(1, 0)]);

    for _ in 0..250 {
        store.record_hover(&sample);
    }

    let mark = store.by_id(1).unwrap();
    assert_eq!(mark.level, AttentionStore::LEVEL_MAX);
    // The cumulative counter keeps running past the saturation point.
    assert_eq!(mark.cumulative, 250);
    assert_eq!(mark.faces[0], 250);
    assert_eq!(store.face_max(), 250);
}

#[test]
fn test_decay_repeated_should_floor_levels_at_zero() {
    let set = set_with_faces(&[(1, 1), (2, 1)]);
    let mut store = AttentionStore::new(&set);

    let sample = sample_of(&[IdentityColor::encode(1, 0)]);
    for _ in 0..5 {
        store.record_hover(&sample);
    }

    for _ in 0..200 {
        store.decay();
    }

    assert_eq!(store.by_id(1).unwrap().level, 0);
    assert_eq!(store.by_id(2).unwrap().level, 0);
    // Decay never touches the cumulative counters.
    assert_eq!(store.by_id(1).unwrap().cumulative, 5);
}

#[test]
fn test_update_states_should_deemphasize_above_threshold_and_snap_on_exit() {
    let set = set_with_faces(&[(1, 1)]);
    let mut store = AttentionStore::new(&set);
    let sample = sample_of(&[IdentityColor::encode(1, 0)]);

    // Drive the saturating level to 95.
    for _ in 0..95 {
        store.record_hover(&sample);
    }
    assert_eq!(store.by_id(1).unwrap().level, 95);

    let transitions = store.update_states(5, 90, FeedbackFlags::ALLOW_DEEMPHASIS);
    assert_eq!(transitions, vec![(1, AttentionState::Deemphasized)]);
    assert_eq!(store.by_id(1).unwrap().state, AttentionState::Deemphasized);

    // Decay back under the threshold, the exit snaps the level to baseline.
    for _ in 0..6 {
        store.decay();
    }
    let transitions = store.update_states(5, 90, FeedbackFlags::ALLOW_DEEMPHASIS);
    assert_eq!(transitions, vec![(1, AttentionState::Baseline)]);

    let mark = store.by_id(1).unwrap();
    assert_eq!(mark.state, AttentionState::Baseline);
    assert_eq!(mark.level, AttentionStore::LEVEL_BASELINE);
}

#[test]
fn test_update_states_should_emphasize_below_threshold_and_snap_on_exit() {
    let set = set_with_faces(&[(1, 1)]);
    let mut store = AttentionStore::new(&set);

    // Fresh marks sit at level 0, under the emphasize threshold.
    let transitions = store.update_states(5, 90, FeedbackFlags::ALLOW_EMPHASIS);
    assert_eq!(transitions, vec![(1, AttentionState::Emphasized)]);

    // Hovering the mark up to the threshold exits emphasis, snapping to
    // baseline symmetrically with the deemphasize path.
    let sample = sample_of(&[IdentityColor::encode(1, 0)]);
    for _ in 0..5 {
        store.record_hover(&sample);
    }
    let transitions = store.update_states(5, 90, FeedbackFlags::ALLOW_EMPHASIS);
    assert_eq!(transitions, vec![(1, AttentionState::Baseline)]);
    assert_eq!(store.by_id(1).unwrap().level, AttentionStore::LEVEL_BASELINE);
}

#[test]
fn test_update_states_with_no_flags_should_keep_everything_baseline() {
    let set = set_with_faces(&[(1, 1)]);
    let mut store = AttentionStore::new(&set);
    let sample = sample_of(&[IdentityColor::encode(1, 0)]);

    for _ in 0..100 {
        store.record_hover(&sample);
    }

    let transitions = store.update_states(5, 90, FeedbackFlags::empty());
    assert!(transitions.is_empty());
    assert_eq!(store.by_id(1).unwrap().state, AttentionState::Baseline);
}

#[test]
fn test_record_hover_with_out_of_range_face_should_be_guarded() {
    let set = set_with_faces(&[(1, 2)]);
    let mut store = AttentionStore::new(&set);

    // Face 100 of a 2-face mark, the identity decodes fine but fails the
    // bounds check against the table sized at registration.
    let record = store.record_hover(&sample_of(&[IdentityColor::encode(1, 100)]));

    assert!(record.is_empty());
    let mark = store.by_id(1).unwrap();
    assert_eq!(mark.cumulative, 0);
    assert_eq!(mark.faces, vec![0, 0]);
}

#[test]
fn test_record_hover_with_unregistered_mark_should_be_ignored() {
    let set = set_with_faces(&[(1, 1)]);
    let mut store = AttentionStore::new(&set);

    let record = store.record_hover(&sample_of(&[IdentityColor::encode(77, 0)]));

    assert!(record.is_empty());
    assert_eq!(store.by_id(1).unwrap().cumulative, 0);
}

#[test]
fn test_reset_should_zero_all_counters_and_states() {
    let set = set_with_faces(&[(1, 2), (2, 2)]);
    let mut store = AttentionStore::new(&set);
    let sample = sample_of(&[IdentityColor::encode(1, 0), IdentityColor::encode(2, 1)]);

    for _ in 0..95 {
        store.record_hover(&sample);
    }
    store.update_states(5, 90, FeedbackFlags::ALLOW_DEEMPHASIS);
    store.reset();

    for mark in store.iter() {
        assert_eq!(mark.cumulative, 0);
        assert_eq!(mark.level, 0);
        assert_eq!(mark.state, AttentionState::Baseline);
        assert!(mark.faces.iter().all(|&f| f == 0));
    }
    assert_eq!(store.face_max(), 0);
}
