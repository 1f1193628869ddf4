//! Pose sampling across the keyframe timeline
//!
//! Playback time runs over `[0, len - 1]` with one unit per keyframe;
//! dividing by `max_time` gives the normalized fraction that the
//! timeline's `[0, 1]` times are compared against.

use glam::{Quat, Vec3};
use log::debug;

use super::interpolate::Interpolate;
use crate::skeleton::Skeleton;
use crate::timeline::{CameraPose, Timeline};

/// Locate the bracketing keyframe for a normalized time
///
/// Returns the index `i` of the bracket (largest `i` with
/// `times[i] <= fraction`, clamped to the final pair) and the local
/// interpolation factor inside it. `None` when fewer than two times
/// exist. Fractions at or past the end clamp to the last keyframe.
pub fn find_bracket(times: &[f32], fraction: f32) -> Option<(usize, f32)> {
    if times.len() < 2 {
        return None;
    }
    let index = times
        .partition_point(|&t| t <= fraction)
        .saturating_sub(1)
        .min(times.len() - 2);
    let span = times[index + 1] - times[index];
    if span <= 0.0 {
        return None;
    }
    let factor = ((fraction - times[index]) / span).clamp(0.0, 1.0);
    Some((index, factor))
}

/// Pose the skeleton at playback time `time`
///
/// Per-bone orientations slerp between the bracketing keyframes and root
/// positions lerp; every other position re-derives from its parent's
/// interpolated tip, exactly as interactive rotation does. Returns false
/// (skeleton untouched) with fewer than two keyframes or snapshots that
/// do not match the skeleton.
pub fn sample_pose(timeline: &Timeline, skeleton: &mut Skeleton, time: f32) -> bool {
    if timeline.len() < 2 {
        return false;
    }
    let fraction = (time / timeline.max_time()).clamp(0.0, 1.0);
    let times = timeline.times();
    let Some((bracket, factor)) = find_bracket(&times, fraction) else {
        return false;
    };

    let Some(lower) = timeline.keyframe(bracket) else {
        return false;
    };
    let Some(upper) = timeline.keyframe(bracket + 1) else {
        return false;
    };
    let bone_count = skeleton.bone_count();
    if lower.bone_count() != bone_count || upper.bone_count() != bone_count {
        debug!(
            "sample_pose: snapshot bone count {} / {} does not match skeleton {}",
            lower.bone_count(),
            upper.bone_count(),
            bone_count
        );
        return false;
    }

    let rotations: Vec<Quat> = lower
        .rotations
        .iter()
        .zip(&upper.rotations)
        .map(|(a, b)| a.interpolate(b, factor))
        .collect();
    let positions: Vec<Vec3> = lower
        .positions
        .iter()
        .zip(&upper.positions)
        .map(|(a, b)| a.interpolate(b, factor))
        .collect();

    skeleton.set_pose(&rotations, &positions)
}

/// Interpolated camera pose at playback time `time`
///
/// `None` unless both bracketing keyframes carry a camera.
pub fn sample_camera(timeline: &Timeline, time: f32) -> Option<CameraPose> {
    if timeline.len() < 2 {
        return None;
    }
    let fraction = (time / timeline.max_time()).clamp(0.0, 1.0);
    let times = timeline.times();
    let (bracket, factor) = find_bracket(&times, fraction)?;
    let lower = timeline.keyframe(bracket)?.camera?;
    let upper = timeline.keyframe(bracket + 1)?.camera?;
    Some(lower.interpolate(&upper, factor))
}

/// Pose the skeleton exactly from one stored keyframe
pub fn apply_keyframe(timeline: &Timeline, skeleton: &mut Skeleton, index: usize) -> bool {
    let Some(keyframe) = timeline.keyframe(index) else {
        return false;
    };
    if keyframe.bone_count() != skeleton.bone_count() {
        debug!(
            "apply_keyframe: snapshot has {} bones, skeleton has {}",
            keyframe.bone_count(),
            skeleton.bone_count()
        );
        return false;
    }
    skeleton.set_pose(&keyframe.rotations, &keyframe.positions)
}
