//! Timeline sampling and playback
//!
//! This module turns the stored keyframe sequence back into skeleton
//! poses: locating the bracketing keyframes for a playback time,
//! interpolating per-bone orientations (shortest-arc slerp) and root
//! positions, and propagating the result through the bone tree. It also
//! carries the small edit/playback state machine that drives scrubbing.

mod interpolate;
mod playback;
mod sampler;

pub use interpolate::Interpolate;
pub use playback::{Mode, PlaybackState};
pub use sampler::{apply_keyframe, find_bracket, sample_camera, sample_pose};
