//! Ray picking against bone cylinders
//!
//! Each bone is picked as a finite cylinder of fixed radius around its
//! current segment. The world-space ray is moved into the bone's local
//! frame (segment axis canonicalized onto `+Y`), reduced to a 2D
//! ray–circle test in the XZ plane, and the crossings are classified
//! against the finite segment: side-surface hits inside `[0, length]`,
//! or end-cap hits when the two axial crossings enclose the segment.
//! Degenerate geometry never errors; it reads as "no intersection".

use glam::{Quat, Vec2, Vec3};
use log::trace;

use crate::skeleton::{Bone, BoneIndex, Skeleton};

/// Pick radius of a bone cylinder, world units
pub const BONE_RADIUS: f32 = 0.07;

/// In-plane direction components below this are treated as axis-parallel
const PARALLEL_EPSILON: f32 = 1e-6;

/// World-space picking ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin (typically the camera position)
    pub origin: Vec3,
    /// Unit direction
    pub dir: Vec3,
}

impl Ray {
    /// Create a ray, normalizing the direction
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    /// Point at parametric distance `t` along the ray
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Result of a successful skeleton pick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonePick {
    /// Index of the intersected bone
    pub bone: BoneIndex,
    /// Parametric distance along the ray to the intersection
    pub t: f32,
}

/// Scale / orientation / translation triple for the highlight cylinder
///
/// The renderer turns this into its model-matrix uniforms: a unit cylinder
/// along `+Y` scaled to `(radius, length, radius)`, rotated onto the bone
/// axis, translated to the bone root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneDisplay {
    pub scale: Vec3,
    pub rotation: Quat,
    pub translation: Vec3,
}

/// Display transform for a bone's highlight cylinder
///
/// Returns `None` for a zero-length bone, which is never highlighted.
pub fn highlight_transform(bone: &Bone, radius: f32) -> Option<BoneDisplay> {
    let axis = bone.axis()?;
    Some(BoneDisplay {
        scale: Vec3::new(radius, bone.segment().length(), radius),
        rotation: Quat::from_rotation_arc(Vec3::Y, axis),
        translation: bone.position,
    })
}

/// 2D ray–circle crossings in the plane perpendicular to the bone axis
///
/// `dir` must be normalized. Returns the crossings `(t0, t1)` with
/// `t0 <= t1`, or `None` when the ray misses the circle or points away
/// from it.
fn circle_intersect(origin: Vec2, dir: Vec2, radius: f32) -> Option<(f32, f32)> {
    let b = origin.dot(dir);
    if b > 0.0 {
        return None;
    }
    let c = origin.length_squared() - radius * radius;
    if c > b * b {
        return None;
    }
    let s = (b * b - c).sqrt();
    Some((-b - s, -b + s))
}

/// Smallest non-negative ray parameter at which the ray enters the bone's
/// finite cylinder, or `None`
///
/// Side hits use inclusive axial bounds `[0, length]`; cap hits require
/// the two axial crossings to enclose the segment. Hits behind the ray
/// origin are rejected.
pub fn bone_intersect(bone: &Bone, ray: &Ray, radius: f32) -> Option<f32> {
    let axis = bone.axis()?;
    let length = bone.segment().length();

    let to_canonical = Quat::from_rotation_arc(axis, Vec3::Y);
    let p = to_canonical * (ray.origin - bone.position);
    let d = (to_canonical * ray.dir).normalize_or_zero();

    let planar = Vec2::new(d.x, d.z);
    let planar_len = planar.length();

    if planar_len < PARALLEL_EPSILON {
        // Axis-parallel ray: the side surface is unreachable, caps only
        if Vec2::new(p.x, p.z).length_squared() > radius * radius {
            return None;
        }
        if d.y.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t_bottom = (0.0 - p.y) / d.y;
        let t_top = (length - p.y) / d.y;
        let t_near = t_bottom.min(t_top);
        return (t_near >= 0.0).then_some(t_near);
    }

    let (c0, c1) = circle_intersect(Vec2::new(p.x, p.z), planar / planar_len, radius)?;
    // 2D crossings are measured along the normalized planar direction;
    // dividing by the planar component length recovers the ray parameter
    let t0 = c0 / planar_len;
    let t1 = c1 / planar_len;
    let y0 = p.y + t0 * d.y;
    let y1 = p.y + t1 * d.y;

    // Side-surface hits, nearest crossing first
    for (t, y) in [(t0, y0), (t1, y1)] {
        if t >= 0.0 && (0.0..=length).contains(&y) {
            return Some(t);
        }
    }

    // Cap hits: both crossings outside the segment, on opposite ends
    let (y_min, y_max) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
    if y_min <= 0.0 && y_max >= length && d.y.abs() >= PARALLEL_EPSILON {
        let t_bottom = (0.0 - p.y) / d.y;
        let t_top = (length - p.y) / d.y;
        let t_near = t_bottom.min(t_top);
        if t_near >= 0.0 {
            return Some(t_near);
        }
    }

    None
}

/// Nearest intersected bone across the whole skeleton
///
/// Ties break toward the globally smallest ray parameter. Zero-length
/// bones are skipped. `None` means nothing under the ray; the caller
/// clears any previous highlight.
pub fn pick_bone(skeleton: &Skeleton, ray: &Ray, radius: f32) -> Option<BonePick> {
    let mut best: Option<BonePick> = None;
    for (index, bone) in skeleton.bones().iter().enumerate() {
        if bone.axis().is_none() {
            trace!("pick_bone: skipping zero-length bone {index}");
            continue;
        }
        let Some(t) = bone_intersect(bone, ray, radius) else {
            continue;
        };
        if best.is_none_or(|pick| t < pick.t) {
            best = Some(BonePick { bone: index, t });
        }
    }
    best
}
