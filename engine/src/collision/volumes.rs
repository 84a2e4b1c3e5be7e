//! Blocking volume registry
//!
//! Static volumes are plain AABBs registered once at world build. Dynamic
//! volumes are described by a pair of closures: a box generator that reads
//! live state (a sliding gate's position) and an enabled predicate that
//! decides whether the volume blocks at all (an open gate stops blocking).
//! Both are evaluated when the active list is gathered, never cached
//! across frames.

use glam::Vec3;

/// Axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box from a center point and half extents.
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Whether a vertical span [bottom, top] overlaps this box's Y range.
    pub fn overlaps_vertical(&self, bottom: f32, top: f32) -> bool {
        bottom < self.max.y && top > self.min.y
    }
}

type BoundsFn = Box<dyn Fn() -> Aabb>;
type EnabledFn = Box<dyn Fn() -> bool>;

struct DynamicVolume {
    bounds: BoundsFn,
    enabled: EnabledFn,
}

/// Registry of solid volumes horizontal movement may not penetrate.
///
/// Statics are immutable after registration. Dynamic volumes read live
/// gate/door state through their closures; that state is only mutated in
/// a separate phase before movement resolution runs, so the active list
/// is stable for the duration of a movement pass.
#[derive(Default)]
pub struct BlockingVolumeSet {
    statics: Vec<Aabb>,
    dynamics: Vec<DynamicVolume>,
}

impl BlockingVolumeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an immutable solid box.
    pub fn register_static(&mut self, volume: Aabb) {
        self.statics.push(volume);
    }

    /// Register a conditional volume.
    ///
    /// `bounds` produces the box on demand (it may track moving geometry);
    /// `enabled` gates whether the volume blocks at all.
    pub fn register_dynamic(
        &mut self,
        bounds: impl Fn() -> Aabb + 'static,
        enabled: impl Fn() -> bool + 'static,
    ) {
        self.dynamics.push(DynamicVolume {
            bounds: Box::new(bounds),
            enabled: Box::new(enabled),
        });
    }

    /// Number of registered volumes (static + dynamic, regardless of
    /// enabled state).
    pub fn len(&self) -> usize {
        self.statics.len() + self.dynamics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statics.is_empty() && self.dynamics.is_empty()
    }

    /// Snapshot of every volume that currently blocks: all statics plus
    /// dynamics whose predicate returns true.
    pub fn active_volumes(&self) -> Vec<Aabb> {
        let mut active = Vec::with_capacity(self.statics.len() + self.dynamics.len());
        active.extend_from_slice(&self.statics);
        for dynamic in &self.dynamics {
            if (dynamic.enabled)() {
                active.push((dynamic.bounds)());
            }
        }
        active
    }
}
