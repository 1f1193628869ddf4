//! posekit — the pose and animation core of a skeletal-animation
//! authoring tool
//!
//! The crate models a skinned mesh's bone hierarchy and everything the
//! authoring UI does to it:
//!
//! - **Skeleton** — flat-arena bone tree with rest pose and current pose,
//!   rigid forward-kinematics rotation/translation propagation
//! - **Picking** — analytic ray vs. finite-cylinder bone selection
//! - **Timeline** — ordered keyframe records with locked/unlocked,
//!   user-adjustable times
//! - **Animation** — slerp-based pose sampling and the edit/playback
//!   state machine
//!
//! Scene loading, WebGL plumbing, camera controls, and widget hit-testing
//! stay in the host application; the crate consumes loader-built rest
//! poses and world-space rays, and produces bone transforms the renderer
//! uploads as uniforms.
//!
//! # Example
//!
//! ```
//! use glam::{Quat, Vec3};
//! use posekit::{BoneDef, Keyframe, Skeleton, Timeline};
//! use posekit::animation::sample_pose;
//!
//! # fn main() -> posekit::Result<()> {
//! let mut skeleton = Skeleton::from_bones(&[
//!     BoneDef { position: Vec3::ZERO, endpoint: Vec3::Y, parent: None },
//!     BoneDef { position: Vec3::Y, endpoint: Vec3::new(0.0, 2.0, 0.0), parent: Some(0) },
//! ])?;
//!
//! let mut timeline = Timeline::new();
//! timeline.push(Keyframe::capture(&skeleton));
//! skeleton.rotate_bone(0, Quat::from_rotation_z(1.0));
//! timeline.push(Keyframe::capture(&skeleton));
//!
//! // Halfway through playback the root is bent half a radian
//! sample_pose(&timeline, &mut skeleton, 0.5);
//! # Ok(())
//! # }
//! ```

pub mod animation;
pub mod error;
pub mod picking;
pub mod skeleton;
pub mod timeline;

pub use animation::{Interpolate, Mode, PlaybackState};
pub use error::{PoseError, Result};
pub use picking::{BONE_RADIUS, BoneDisplay, BonePick, Ray, pick_bone};
pub use skeleton::{Bone, BoneDef, BoneIndex, Skeleton};
pub use timeline::{CameraPose, Keyframe, MAX_KEYFRAMES, ThumbnailId, Timeline, TimelineEntry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
