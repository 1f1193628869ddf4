//! Timeline editing under locked-time constraints

use glam::{Quat, Vec3};
use posekit::{BoneDef, Keyframe, MAX_KEYFRAMES, Skeleton, ThumbnailId, Timeline};

fn single_bone() -> Skeleton {
    Skeleton::from_bones(&[BoneDef {
        position: Vec3::ZERO,
        endpoint: Vec3::Y,
        parent: None,
    }])
    .expect("valid bone")
}

fn assert_monotone(timeline: &Timeline) {
    let times = timeline.times();
    for pair in times.windows(2) {
        assert!(pair[0] < pair[1], "times out of order: {times:?}");
    }
    if times.len() >= 2 {
        assert!(times[0].abs() < 1e-5 && (times[times.len() - 1] - 1.0).abs() < 1e-5);
    }
}

#[test]
fn scenario_insert_then_drag_middle_keyframe() {
    // Keyframes at 0, 0.5 (unlocked), 1 (locked); drag the middle to 0.8
    let skeleton = single_bone();
    let mut timeline = Timeline::new();
    for _ in 0..3 {
        timeline.push(Keyframe::capture(&skeleton));
    }
    assert_eq!(timeline.times(), vec![0.0, 0.5, 1.0]);
    assert_eq!(timeline.is_locked(1), Some(false));

    assert!(timeline.set_time(1, 0.8));
    let times = timeline.times();
    assert!((times[1] - 0.8).abs() < 1e-5);
    assert_eq!(times[0], 0.0);
    assert_eq!(times[2], 1.0);
    assert_monotone(&timeline);
}

#[test]
fn edit_sequences_keep_times_monotone_and_spanning() {
    super::init_logging();
    let skeleton = single_bone();
    let mut timeline = Timeline::new();

    for _ in 0..6 {
        timeline.push(Keyframe::capture(&skeleton));
        assert_monotone(&timeline);
    }
    timeline.toggle_lock(2);
    timeline.set_time(3, 0.7);
    assert_monotone(&timeline);
    timeline.remove(4);
    assert_monotone(&timeline);
    timeline.insert_at(Keyframe::capture(&skeleton), 0.33);
    assert_monotone(&timeline);
    timeline.push(Keyframe::capture(&skeleton));
    assert_monotone(&timeline);
    timeline.remove(0);
    assert_monotone(&timeline);
}

#[test]
fn locked_times_never_move_under_neighbor_edits() {
    let skeleton = single_bone();
    let mut timeline = Timeline::new();
    for _ in 0..5 {
        timeline.push(Keyframe::capture(&skeleton));
    }
    // Lock the keyframe at 0.5
    timeline.toggle_lock(2);
    let pinned = timeline.times()[2];

    timeline.set_time(1, 0.4);
    assert_eq!(timeline.times()[2], pinned);
    timeline.set_time(3, 0.6);
    assert_eq!(timeline.times()[2], pinned);
    timeline.push(Keyframe::capture(&skeleton));
    assert_eq!(timeline.times()[2], pinned);
    assert_monotone(&timeline);
}

#[test]
fn dragging_cannot_cross_locked_anchor() {
    let skeleton = single_bone();
    let mut timeline = Timeline::new();
    for _ in 0..5 {
        timeline.push(Keyframe::capture(&skeleton));
    }
    timeline.toggle_lock(2);
    let before = timeline.times();

    // 0.75 lies beyond the locked anchor at 0.5
    assert!(!timeline.set_time(1, 0.75));
    assert_eq!(timeline.times(), before);
}

#[test]
fn reordering_keeps_the_time_ladder() {
    let mut skeleton = single_bone();
    let mut timeline = Timeline::new();
    for step in 0..4 {
        skeleton.rotate_bone(0, Quat::from_rotation_z(0.3 * (step as f32 + 1.0)));
        timeline.push(
            Keyframe::capture(&skeleton).with_thumbnail(ThumbnailId(step as u64)),
        );
    }
    let times_before = timeline.times();
    let dragged = timeline.keyframe(3).unwrap().clone();

    assert!(timeline.move_keyframe(3, 1));
    assert_eq!(timeline.times(), times_before);
    assert_eq!(timeline.keyframe(1).unwrap(), &dragged);
    assert_monotone(&timeline);
}

#[test]
fn cap_refuses_further_keyframes() {
    super::init_logging();
    let skeleton = single_bone();
    let mut timeline = Timeline::new();
    for _ in 0..MAX_KEYFRAMES {
        assert!(timeline.push(Keyframe::capture(&skeleton)).is_some());
    }
    assert!(timeline.push(Keyframe::capture(&skeleton)).is_none());
    assert!(timeline.insert_at(Keyframe::capture(&skeleton), 0.123).is_none());
    assert_eq!(timeline.len(), MAX_KEYFRAMES);
}

#[test]
fn deleting_most_of_the_timeline_stays_consistent() {
    let skeleton = single_bone();
    let mut timeline = Timeline::new();
    for _ in 0..6 {
        timeline.push(Keyframe::capture(&skeleton));
    }
    while timeline.len() > 2 {
        timeline.remove(1);
        assert_monotone(&timeline);
    }
    assert_eq!(timeline.times(), vec![0.0, 1.0]);
}
