//! Interpolation trait for sampled pose values
//!
//! Named `interpolate` rather than `lerp` so the trait never shadows the
//! inherent `lerp` methods on the glam types.

use glam::{Quat, Vec3};

use crate::timeline::CameraPose;

/// Types that can be interpolated between two keyframes
pub trait Interpolate: Clone {
    /// Interpolate from `self` toward `other` at factor `t` in `[0, 1]`
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Vec3 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self.lerp(*other, t)
    }
}

impl Interpolate for Quat {
    /// Shortest-arc spherical interpolation
    ///
    /// The second quaternion is sign-corrected so the pair's dot product
    /// is non-negative before interpolating, keeping the arc on the same
    /// side of the double cover.
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        let other = if self.dot(*other) < 0.0 {
            -*other
        } else {
            *other
        };
        self.slerp(other, t).normalize()
    }
}

impl Interpolate for CameraPose {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.interpolate(&other.position, t),
            target: self.target.interpolate(&other.target, t),
            up: self.up.interpolate(&other.up, t),
        }
    }
}
