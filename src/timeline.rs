//! Keyframe snapshots and the editable timeline
//!
//! A timeline is one ordered list of `{ keyframe, time, locked }` records
//! with times strictly increasing across `[0, 1]`. Keeping the three
//! pieces in a single record (instead of parallel arrays) lets every
//! mutator enforce the monotonicity and locked-time invariants in one
//! place. All mutators are total: anything out of range, colliding, or
//! blocked by a locked anchor leaves the timeline untouched and reports
//! the refusal through the return value.

use glam::{Quat, Vec3};
use log::debug;

use crate::skeleton::Skeleton;

/// Hard cap on stored keyframes; further insertions are refused
pub const MAX_KEYFRAMES: usize = 64;

/// Two times closer than this count as colliding
const TIME_EPSILON: f32 = 1e-6;

/// Opaque handle to a rendered keyframe thumbnail
///
/// Produced by the external render-to-texture collaborator; the core
/// stores it verbatim and never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThumbnailId(pub u64);

/// Camera pose recorded with a keyframe
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

/// Full pose snapshot of a skeleton at one timeline position
///
/// Rotations and positions are indexed by bone. Positions are consumed
/// only for root bones when sampling; the rest are re-derived from the
/// parent chain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keyframe {
    /// Per-bone cumulative orientation
    pub rotations: Vec<Quat>,
    /// Per-bone world-space segment root
    pub positions: Vec<Vec3>,
    /// Camera pose at capture time, if the host records one
    pub camera: Option<CameraPose>,
    /// Thumbnail handle from the host's render-to-texture pass
    pub thumbnail: Option<ThumbnailId>,
}

impl Keyframe {
    /// Snapshot the skeleton's current pose
    pub fn capture(skeleton: &Skeleton) -> Self {
        Self {
            rotations: skeleton.bones().iter().map(|b| b.rotation).collect(),
            positions: skeleton.bones().iter().map(|b| b.position).collect(),
            camera: None,
            thumbnail: None,
        }
    }

    /// Attach a camera pose to the snapshot
    pub fn with_camera(mut self, camera: CameraPose) -> Self {
        self.camera = Some(camera);
        self
    }

    /// Attach a thumbnail handle to the snapshot
    pub fn with_thumbnail(mut self, thumbnail: ThumbnailId) -> Self {
        self.thumbnail = Some(thumbnail);
        self
    }

    /// Number of bones in the snapshot
    pub fn bone_count(&self) -> usize {
        self.rotations.len()
    }
}

/// One timeline record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimelineEntry {
    pub keyframe: Keyframe,
    /// Normalized timeline position in `[0, 1]`
    pub time: f32,
    /// Locked times never move when neighbors are redistributed
    pub locked: bool,
}

/// Ordered keyframe sequence with locked/unlocked time constraints
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    /// Empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keyframes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the timeline holds no keyframes
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All records, in time order
    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    /// A single record by index
    pub fn entry(&self, index: usize) -> Option<&TimelineEntry> {
        self.entries.get(index)
    }

    /// A keyframe by index
    pub fn keyframe(&self, index: usize) -> Option<&Keyframe> {
        self.entries.get(index).map(|e| &e.keyframe)
    }

    /// Snapshot of the normalized times, in order
    pub fn times(&self) -> Vec<f32> {
        self.entries.iter().map(|e| e.time).collect()
    }

    /// End of the playback-time range: keyframes sit at unit intervals,
    /// so the last one plays at `len - 1`
    pub fn max_time(&self) -> f32 {
        self.entries.len().saturating_sub(1) as f32
    }

    /// Append a keyframe at the end of the timeline
    ///
    /// The new record lands at time 1.0 and becomes the locked end anchor;
    /// the previously-final anchor is unlocked. Times after the last
    /// locked interior anchor are compressed toward it so relative spacing
    /// among them is preserved and locked times never move. Returns the
    /// new index, or `None` at the keyframe cap.
    pub fn push(&mut self, keyframe: Keyframe) -> Option<usize> {
        if self.entries.len() >= MAX_KEYFRAMES {
            debug!("push: keyframe cap {MAX_KEYFRAMES} reached");
            return None;
        }

        if self.entries.is_empty() {
            self.entries.push(TimelineEntry {
                keyframe,
                time: 0.0,
                locked: true,
            });
            return Some(0);
        }

        if self.entries.len() >= 2 {
            // Last locked anchor, excluding the final entry; the first
            // entry anchors unconditionally
            let anchor = (0..self.entries.len() - 1)
                .rev()
                .find(|&i| self.entries[i].locked)
                .unwrap_or(0);
            let p = self.entries[anchor].time;
            let count = (self.entries.len() - anchor) as f32;
            let scale = (1.0 - (1.0 - p) / count - p) / (1.0 - p);
            for entry in &mut self.entries[anchor + 1..] {
                entry.time = p + (entry.time - p) * scale;
            }
        }

        if self.entries.len() > 1 {
            if let Some(last) = self.entries.last_mut() {
                last.locked = false;
            }
        }

        self.entries.push(TimelineEntry {
            keyframe,
            time: 1.0,
            locked: true,
        });
        Some(self.entries.len() - 1)
    }

    /// Splice a keyframe at a scrubber time strictly inside the timeline
    ///
    /// The new record is unlocked and no other time moves. Refused when
    /// fewer than two keyframes exist to bracket it, when the time falls
    /// outside `(0, 1)`, when it collides with an existing time, or at
    /// the keyframe cap.
    pub fn insert_at(&mut self, keyframe: Keyframe, time: f32) -> Option<usize> {
        if self.entries.len() >= MAX_KEYFRAMES {
            debug!("insert_at: keyframe cap {MAX_KEYFRAMES} reached");
            return None;
        }
        if self.entries.len() < 2 || time <= 0.0 || time >= 1.0 {
            return None;
        }
        if self
            .entries
            .iter()
            .any(|e| (e.time - time).abs() < TIME_EPSILON)
        {
            debug!("insert_at: time {time} collides with an existing keyframe");
            return None;
        }
        let index = self.entries.partition_point(|e| e.time < time);
        self.entries.insert(
            index,
            TimelineEntry {
                keyframe,
                time,
                locked: false,
            },
        );
        Some(index)
    }

    /// Remove the keyframe at `index` and renormalize times to `[0, 1]`
    ///
    /// The renormalization is affine (shift to zero, divide by the span),
    /// so relative ordering and spacing are preserved. Returns the removed
    /// keyframe, or `None` for an out-of-range index.
    pub fn remove(&mut self, index: usize) -> Option<Keyframe> {
        if index >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(index);
        match self.entries.len() {
            0 => {}
            1 => self.entries[0].time = 0.0,
            _ => {
                let first = self.entries[0].time;
                let span = self.entries[self.entries.len() - 1].time - first;
                for entry in &mut self.entries {
                    entry.time = (entry.time - first) / span;
                }
            }
        }
        Some(removed.keyframe)
    }

    /// Move a keyframe to a new position in the sequence
    ///
    /// Only the pose order changes: the sorted time/locked ladder stays
    /// on its slots and re-pairs with the poses in their new order, so
    /// times remain strictly increasing by construction.
    pub fn move_keyframe(&mut self, from: usize, to: usize) -> bool {
        let len = self.entries.len();
        if from >= len || to >= len {
            return false;
        }
        if from == to {
            return true;
        }
        let slots: Vec<(f32, bool)> = self.entries.iter().map(|e| (e.time, e.locked)).collect();
        if from < to {
            self.entries[from..=to].rotate_left(1);
        } else {
            self.entries[to..=from].rotate_right(1);
        }
        for (entry, (time, locked)) in self.entries.iter_mut().zip(slots) {
            entry.time = time;
            entry.locked = locked;
        }
        true
    }

    /// Drag one unlocked time to a new value
    ///
    /// The target is bounded strictly by the nearest locked anchors on
    /// each side (the first and last entries anchor regardless of their
    /// flags). Unlocked times between those anchors rescale
    /// proportionally on their side of `index`, so ordering is preserved
    /// and no time crosses an anchor. Refused for the first/last entry,
    /// a locked entry, or a target outside the open anchor interval.
    pub fn set_time(&mut self, index: usize, time: f32) -> bool {
        let len = self.entries.len();
        if len < 3 || index == 0 || index >= len - 1 {
            return false;
        }
        if self.entries[index].locked {
            debug!("set_time: keyframe {index} is locked");
            return false;
        }

        let lower = (1..index)
            .rev()
            .find(|&i| self.entries[i].locked)
            .unwrap_or(0);
        let upper = (index + 1..len - 1)
            .find(|&i| self.entries[i].locked)
            .unwrap_or(len - 1);
        let low = self.entries[lower].time;
        let high = self.entries[upper].time;
        let current = self.entries[index].time;
        if time <= low || time >= high {
            debug!("set_time: {time} outside locked bounds ({low}, {high})");
            return false;
        }

        let lower_scale = (time - low) / (current - low);
        let upper_scale = (high - time) / (high - current);
        for i in lower + 1..upper {
            let t = self.entries[i].time;
            self.entries[i].time = if i <= index {
                low + (t - low) * lower_scale
            } else {
                high - (high - t) * upper_scale
            };
        }
        true
    }

    /// Flip the locked flag of one keyframe's time
    pub fn toggle_lock(&mut self, index: usize) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.locked = !entry.locked;
                true
            }
            None => false,
        }
    }

    /// Whether a keyframe's time is locked
    pub fn is_locked(&self, index: usize) -> Option<bool> {
        self.entries.get(index).map(|e| e.locked)
    }

    /// Replace the stored snapshot of an existing keyframe
    ///
    /// Time and lock state stay as they are; only the pose (and whatever
    /// camera/thumbnail the new snapshot carries) changes.
    pub fn update_keyframe(&mut self, index: usize, keyframe: Keyframe) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.keyframe = keyframe;
                true
            }
            None => false,
        }
    }
}
