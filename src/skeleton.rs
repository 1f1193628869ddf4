//! Bone hierarchy model and forward-kinematics propagation
//!
//! The skeleton is a flat arena of bones indexed by [`BoneIndex`], with
//! parent links and derived children lists. Each bone carries its rest pose
//! (recorded at construction, immutable afterwards) and its current pose.
//! Pose mutations propagate rigidly through the subtree: rotating a bone
//! re-anchors every descendant at its parent's moving tip while preserving
//! the rest-pose segment lengths and offsets exactly.

use glam::{Quat, Vec3};
use log::debug;

use crate::error::{PoseError, Result};

/// Index of a bone within its skeleton's arena
pub type BoneIndex = usize;

/// Squared-length threshold below which a segment counts as degenerate
const DEGENERATE_EPSILON: f32 = 1e-12;

/// Rest-pose bone description supplied by the scene loader
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoneDef {
    /// World-space root of the segment in the rest pose
    pub position: Vec3,
    /// World-space tip of the segment in the rest pose
    pub endpoint: Vec3,
    /// Parent bone index, `None` for roots
    pub parent: Option<BoneIndex>,
}

/// A rigid segment in the skeleton tree
///
/// `endpoint` is derived state: it always equals
/// `position + rotation * (initial_endpoint - initial_position)`.
/// Mutate bones through [`Skeleton`] methods so that invariant and the
/// child anchoring below it hold after every call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bone {
    /// Current world-space root of the segment
    pub position: Vec3,
    /// Current world-space tip of the segment (derived)
    pub endpoint: Vec3,
    /// Rest-pose root, immutable after construction
    pub initial_position: Vec3,
    /// Rest-pose tip, immutable after construction
    pub initial_endpoint: Vec3,
    /// Cumulative orientation relative to the rest pose, `w >= 0`
    pub rotation: Quat,
    /// Parent bone, `None` for roots
    pub parent: Option<BoneIndex>,
    /// Child bones, in index order
    pub children: Vec<BoneIndex>,
}

impl Bone {
    fn from_def(def: &BoneDef) -> Self {
        Self {
            position: def.position,
            endpoint: def.endpoint,
            initial_position: def.position,
            initial_endpoint: def.endpoint,
            rotation: Quat::IDENTITY,
            parent: def.parent,
            children: Vec::new(),
        }
    }

    /// Current segment vector, tip minus root
    pub fn segment(&self) -> Vec3 {
        self.endpoint - self.position
    }

    /// Rest-pose segment length; invariant under any pose mutation
    pub fn rest_length(&self) -> f32 {
        (self.initial_endpoint - self.initial_position).length()
    }

    /// Normalized current axis, or `None` for a zero-length segment
    pub fn axis(&self) -> Option<Vec3> {
        let segment = self.segment();
        if segment.length_squared() < DEGENERATE_EPSILON {
            None
        } else {
            Some(segment.normalize())
        }
    }

    /// Whether this bone has no parent
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Flat-arena bone tree with cached root indices
///
/// Owned exclusively by the loaded scene; rebuilt wholesale on scene
/// reload. All mutators are synchronous and leave the tree fully
/// consistent before returning.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skeleton {
    bones: Vec<Bone>,
    roots: Vec<BoneIndex>,
}

impl Skeleton {
    /// Build a skeleton from loader-supplied rest-pose bones
    ///
    /// Children lists are derived from the parent links. Fails on a parent
    /// index outside the array or a parent cycle.
    pub fn from_bones(defs: &[BoneDef]) -> Result<Self> {
        let mut bones: Vec<Bone> = defs.iter().map(Bone::from_def).collect();

        for (index, def) in defs.iter().enumerate() {
            if let Some(parent) = def.parent {
                if parent >= defs.len() {
                    return Err(PoseError::InvalidParent {
                        bone: index,
                        parent,
                    });
                }
                bones[parent].children.push(index);
            }
        }

        // Walking more parent links than there are bones means a cycle
        for start in 0..bones.len() {
            let mut cursor = bones[start].parent;
            let mut steps = 0;
            while let Some(parent) = cursor {
                steps += 1;
                if steps > bones.len() {
                    return Err(PoseError::ParentCycle { bone: start });
                }
                cursor = bones[parent].parent;
            }
        }

        let roots: Vec<BoneIndex> = bones
            .iter()
            .enumerate()
            .filter(|(_, bone)| bone.is_root())
            .map(|(index, _)| index)
            .collect();

        debug!(
            "skeleton built: {} bones, {} roots",
            bones.len(),
            roots.len()
        );

        Ok(Self { bones, roots })
    }

    /// Number of bones
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Whether the skeleton has no bones
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// All bones, in arena order
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// A single bone by index
    pub fn bone(&self, index: BoneIndex) -> Option<&Bone> {
        self.bones.get(index)
    }

    /// Indices of all root bones
    pub fn roots(&self) -> &[BoneIndex] {
        &self.roots
    }

    /// Restore every bone to its rest pose in place
    pub fn reset_pose(&mut self) {
        for bone in &mut self.bones {
            bone.position = bone.initial_position;
            bone.endpoint = bone.initial_endpoint;
            bone.rotation = Quat::IDENTITY;
        }
    }

    /// Apply an incremental world-space rotation to a bone and its subtree
    ///
    /// The rotation composes onto the bone's accumulated orientation and
    /// propagates rigidly: every descendant inherits the same delta while
    /// its position is re-anchored to the moving parent tip. Out-of-range
    /// indices are ignored. Callers should pass a normalized delta.
    pub fn rotate_bone(&mut self, index: BoneIndex, delta: Quat) {
        if index >= self.bones.len() {
            debug!("rotate_bone: index {index} out of range");
            return;
        }
        self.rotate_recursive(index, delta);
    }

    /// Rotate a bone so its axis points toward a world-space target
    ///
    /// Takes the shortest arc from the current axis to
    /// `target - position`, then propagates like [`Self::rotate_bone`].
    /// Degenerate inputs (zero-length bone, target at the bone root) are
    /// ignored.
    pub fn rotate_bone_toward(&mut self, index: BoneIndex, target: Vec3) {
        let Some(bone) = self.bones.get(index) else {
            return;
        };
        let Some(axis) = bone.axis() else {
            return;
        };
        let to_target = target - bone.position;
        if to_target.length_squared() < DEGENERATE_EPSILON {
            return;
        }
        let delta = Quat::from_rotation_arc(axis, to_target.normalize());
        self.rotate_recursive(index, delta);
    }

    fn rotate_recursive(&mut self, index: BoneIndex, delta: Quat) {
        let (tip, rotation, initial_endpoint) = {
            let bone = &mut self.bones[index];
            let mut rotation = (delta * bone.rotation).normalize();
            // Keep the scalar part non-negative so interpolation never
            // crosses the quaternion double cover
            if rotation.w < 0.0 {
                rotation = -rotation;
            }
            bone.rotation = rotation;
            bone.endpoint =
                bone.position + rotation * (bone.initial_endpoint - bone.initial_position);
            (bone.endpoint, rotation, bone.initial_endpoint)
        };

        for child_slot in 0..self.bones[index].children.len() {
            let child = self.bones[index].children[child_slot];
            let rest_offset = self.bones[child].initial_position - initial_endpoint;
            self.bones[child].position = tip + rotation * rest_offset;
            self.rotate_recursive(child, delta);
        }
    }

    /// Move a bone to a new root position, shifting its whole subtree
    ///
    /// Pure translation: no orientation changes, every descendant shifts
    /// by the same delta. Out-of-range indices are ignored.
    pub fn translate_bone(&mut self, index: BoneIndex, new_position: Vec3) {
        let Some(bone) = self.bones.get(index) else {
            debug!("translate_bone: index {index} out of range");
            return;
        };
        let delta = new_position - bone.position;
        self.shift_recursive(index, delta);
    }

    fn shift_recursive(&mut self, index: BoneIndex, delta: Vec3) {
        let bone = &mut self.bones[index];
        bone.position += delta;
        bone.endpoint += delta;
        for child_slot in 0..self.bones[index].children.len() {
            let child = self.bones[index].children[child_slot];
            self.shift_recursive(child, delta);
        }
    }

    /// Set the whole pose from per-bone rotations and root positions
    ///
    /// `rotations` and `positions` are indexed by bone; non-root entries of
    /// `positions` are ignored because those positions are re-derived from
    /// the parent's tip. Returns false (untouched skeleton) on a length
    /// mismatch.
    pub fn set_pose(&mut self, rotations: &[Quat], positions: &[Vec3]) -> bool {
        if rotations.len() != self.bones.len() || positions.len() != self.bones.len() {
            debug!(
                "set_pose: expected {} bones, got {} rotations / {} positions",
                self.bones.len(),
                rotations.len(),
                positions.len()
            );
            return false;
        }
        for root_slot in 0..self.roots.len() {
            let root = self.roots[root_slot];
            self.bones[root].position = positions[root];
            self.pose_recursive(root, rotations);
        }
        true
    }

    fn pose_recursive(&mut self, index: BoneIndex, rotations: &[Quat]) {
        let (tip, rotation, initial_endpoint) = {
            let bone = &mut self.bones[index];
            let mut rotation = rotations[index].normalize();
            if rotation.w < 0.0 {
                rotation = -rotation;
            }
            bone.rotation = rotation;
            bone.endpoint =
                bone.position + rotation * (bone.initial_endpoint - bone.initial_position);
            (bone.endpoint, rotation, bone.initial_endpoint)
        };

        for child_slot in 0..self.bones[index].children.len() {
            let child = self.bones[index].children[child_slot];
            let rest_offset = self.bones[child].initial_position - initial_endpoint;
            self.bones[child].position = tip + rotation * rest_offset;
            self.pose_recursive(child, rotations);
        }
    }

    /// Flat `[x, y, z, ...]` array of current bone positions for GPU upload
    pub fn bone_translations(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.bones.len() * 3);
        for bone in &self.bones {
            data.extend_from_slice(&bone.position.to_array());
        }
        data
    }

    /// Flat `[x, y, z, w, ...]` array of current bone rotations for GPU upload
    pub fn bone_rotations(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.bones.len() * 4);
        for bone in &self.bones {
            data.extend_from_slice(&bone.rotation.to_array());
        }
        data
    }
}
