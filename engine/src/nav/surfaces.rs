//! Walkable surface registry
//!
//! Elevated structures are registered as axis-aligned rectangles of
//! standable elevation: flat decks (floors, bridges, roads) and ramps
//! (linear ascents along one axis). `SurfaceIndex` layers them above the
//! ground heightfield and resolves "what elevation should this mover
//! stand on" with step tolerances so stacked geometry (a bridge over a
//! road, two building floors) never teleports a mover onto the wrong
//! level.
//!
//! # Resolution rules
//!
//! 1. The ground heightfield is always a candidate.
//! 2. A surface is a candidate only if it contains (x, z) and its
//!    elevation is within step-up / drop tolerance of the mover's
//!    current height.
//! 3. The highest accepted ramp wins outright. A ramp is one continuous
//!    ascent path; taking the maximum keeps a mover riding it on the
//!    ramp instead of falling through to whatever lies beneath.
//! 4. With no ramp in play, the accepted flat (or ground) closest to the
//!    mover's current height wins, which keeps transitions between
//!    nearby levels continuous.

use static_assertions::const_assert;

use crate::numeric::finite_or;

use super::heightfield::Heightfield;

/// Maximum rise a mover may snap up onto in one resolution (meters).
pub const STEP_UP_TOLERANCE: f32 = 3.8;

/// Maximum drop a surface may sit below the mover and still capture it
/// (meters). Larger than the step-up tolerance so a mover cresting a
/// ledge still lands on the deck below instead of the distant ground.
pub const DROP_TOLERANCE: f32 = 4.5;

/// Traction on bare terrain, used when the ground fallback wins.
pub const OFFROAD_GRIP: f32 = 0.82;

const_assert!(STEP_UP_TOLERANCE < DROP_TOLERANCE);

/// Horizontal rectangle on the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl SurfaceRect {
    pub fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    /// Whether the rectangle contains the point (bounds inclusive).
    pub fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }
}

/// Axis a ramp ascends along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampAxis {
    X,
    Z,
}

/// Elevation shape of a walkable surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceKind {
    /// One constant elevation across the whole rectangle.
    Flat { y: f32 },
    /// Linear interpolation from `y_start` at `from` to `y_end` at `to`
    /// along the given axis, clamped at the interval ends.
    Ramp {
        axis: RampAxis,
        from: f32,
        to: f32,
        y_start: f32,
        y_end: f32,
    },
}

/// A registered rectangle of standable elevation.
///
/// Surfaces are immutable once registered; the world builds them once at
/// construction time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkableSurface {
    pub bounds: SurfaceRect,
    pub kind: SurfaceKind,
    /// Traction scalar in (0, 1]. Road decks are 1.0, interior floors
    /// slightly below, bare terrain uses [`OFFROAD_GRIP`].
    pub grip: f32,
}

impl WalkableSurface {
    /// A flat deck at one elevation with road traction.
    pub fn flat(min_x: f32, max_x: f32, min_z: f32, max_z: f32, y: f32) -> Self {
        Self {
            bounds: SurfaceRect::new(min_x, max_x, min_z, max_z),
            kind: SurfaceKind::Flat { y },
            grip: 1.0,
        }
    }

    /// A ramp ascending along `axis` from `y_start` (at `from`) to
    /// `y_end` (at `to`) with road traction.
    pub fn ramp(
        min_x: f32,
        max_x: f32,
        min_z: f32,
        max_z: f32,
        axis: RampAxis,
        from: f32,
        to: f32,
        y_start: f32,
        y_end: f32,
    ) -> Self {
        Self {
            bounds: SurfaceRect::new(min_x, max_x, min_z, max_z),
            kind: SurfaceKind::Ramp {
                axis,
                from,
                to,
                y_start,
                y_end,
            },
            grip: 1.0,
        }
    }

    /// Override the traction scalar (builder style).
    pub fn with_grip(mut self, grip: f32) -> Self {
        self.grip = grip.clamp(0.05, 1.0);
        self
    }

    /// Elevation of this surface at a horizontal position.
    ///
    /// For ramps the fractional position along the axis interval is
    /// clamped to [0, 1], so the result is defined and finite even for
    /// points outside the interval (callers gate on `bounds` first).
    pub fn elevation_at(&self, x: f32, z: f32) -> f32 {
        match self.kind {
            SurfaceKind::Flat { y } => y,
            SurfaceKind::Ramp {
                axis,
                from,
                to,
                y_start,
                y_end,
            } => {
                let coord = match axis {
                    RampAxis::X => x,
                    RampAxis::Z => z,
                };
                let span = to - from;
                let t = if span.abs() > f32::EPSILON {
                    ((coord - from) / span).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                y_start + (y_end - y_start) * t
            }
        }
    }

    fn is_ramp(&self) -> bool {
        matches!(self.kind, SurfaceKind::Ramp { .. })
    }
}

/// Elevation query result: standing height plus the traction of the
/// surface the mover resolved onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Support {
    pub y: f32,
    pub grip: f32,
}

/// Registry of walkable surfaces layered above the ground heightfield.
///
/// Queries scan every registered surface. That is fine at authored-world
/// scale (a few dozen surfaces); a larger world would want a spatial
/// index here.
#[derive(Debug, Clone)]
pub struct SurfaceIndex {
    heightfield: Heightfield,
    surfaces: Vec<WalkableSurface>,
}

impl SurfaceIndex {
    pub fn new(heightfield: Heightfield) -> Self {
        Self {
            heightfield,
            surfaces: Vec::new(),
        }
    }

    /// Register a surface. Called once per structure at world build time.
    pub fn register(&mut self, surface: WalkableSurface) {
        self.surfaces.push(surface);
    }

    /// Number of registered surfaces.
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Whether no surfaces are registered.
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Access the ground heightfield.
    pub fn heightfield(&self) -> &Heightfield {
        &self.heightfield
    }

    /// Resolve the elevation a mover should stand on at (x, z), using the
    /// mover's current height to disambiguate stacked surfaces.
    pub fn resolve_elevation(&self, x: f32, z: f32, reference_y: f32) -> f32 {
        self.resolve_support(x, z, reference_y).y
    }

    /// Like [`resolve_elevation`](Self::resolve_elevation) but also
    /// reports the winning surface's traction.
    ///
    /// Known limit: if two ramps ever overlap, the higher one always
    /// wins regardless of which ramp the mover entered. The authored
    /// world never stacks ramps.
    pub fn resolve_support(&self, x: f32, z: f32, reference_y: f32) -> Support {
        let x = finite_or(x, 0.0);
        let z = finite_or(z, 0.0);
        let ground = self.heightfield.sample(x, z);
        let reference_y = finite_or(reference_y, ground);

        // Ground fallback is always a candidate, never tolerance-gated.
        let mut best_flat = Support {
            y: ground,
            grip: OFFROAD_GRIP,
        };
        let mut best_flat_delta = (ground - reference_y).abs();
        let mut best_ramp: Option<Support> = None;

        for surface in &self.surfaces {
            if !surface.bounds.contains(x, z) {
                continue;
            }
            let y = surface.elevation_at(x, z);
            if y - reference_y > STEP_UP_TOLERANCE {
                continue;
            }
            if reference_y - y > DROP_TOLERANCE {
                continue;
            }

            if surface.is_ramp() {
                if best_ramp.map_or(true, |r| y > r.y) {
                    best_ramp = Some(Support {
                        y,
                        grip: surface.grip,
                    });
                }
            } else {
                let delta = (y - reference_y).abs();
                if delta < best_flat_delta {
                    best_flat_delta = delta;
                    best_flat = Support {
                        y,
                        grip: surface.grip,
                    };
                }
            }
        }

        best_ramp.unwrap_or(best_flat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_world() -> SurfaceIndex {
        SurfaceIndex::new(Heightfield::flat(0.0))
    }

    #[test]
    fn test_empty_index_returns_ground() {
        let index = flat_world();
        assert_eq!(index.resolve_elevation(5.0, 5.0, 0.0), 0.0);
        assert_eq!(index.resolve_support(5.0, 5.0, 0.0).grip, OFFROAD_GRIP);
    }

    #[test]
    fn test_flat_surface_wins_inside_bounds() {
        let mut index = flat_world();
        index.register(WalkableSurface::flat(-2.0, 2.0, -2.0, 2.0, 1.5));

        assert_eq!(index.resolve_elevation(0.0, 0.0, 1.4), 1.5);
        // Outside the rectangle the ground wins.
        assert_eq!(index.resolve_elevation(3.0, 0.0, 1.4), 0.0);
    }

    #[test]
    fn test_step_tolerance_rejects_far_surfaces() {
        let mut index = flat_world();
        index.register(WalkableSurface::flat(-2.0, 2.0, -2.0, 2.0, 10.0));

        // A deck 10m up is unreachable from the ground.
        assert_eq!(index.resolve_elevation(0.0, 0.0, 0.0), 0.0);
        // From just below it, the step-up tolerance accepts it.
        assert_eq!(index.resolve_elevation(0.0, 0.0, 7.0), 10.0);
    }

    #[test]
    fn test_drop_tolerance_releases_jumping_mover() {
        let mut index = flat_world();
        index.register(WalkableSurface::flat(-2.0, 2.0, -2.0, 2.0, 1.0));

        // A mover 6m above the deck has separated from it; tolerance
        // rejects the deck and the ground fallback wins.
        assert_eq!(index.resolve_elevation(0.0, 0.0, 7.0), 0.0);
    }

    #[test]
    fn test_ramp_interpolates_and_clamps() {
        let mut index = flat_world();
        index.register(WalkableSurface::ramp(
            0.0,
            10.0,
            -1.0,
            1.0,
            RampAxis::X,
            0.0,
            10.0,
            0.0,
            5.0,
        ));

        assert!((index.resolve_elevation(0.0, 0.0, 0.0) - 0.0).abs() < 1e-5);
        assert!((index.resolve_elevation(5.0, 0.0, 2.0) - 2.5).abs() < 1e-5);
        assert!((index.resolve_elevation(10.0, 0.0, 5.0) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_ramp_beats_ground_beneath_it() {
        let mut index = flat_world();
        index.register(WalkableSurface::ramp(
            0.0,
            10.0,
            -1.0,
            1.0,
            RampAxis::X,
            0.0,
            10.0,
            0.0,
            3.0,
        ));

        // Midway up the ramp the ground (y=0) is closer to nothing; the
        // ramp must capture the mover even though the flat tie-break
        // would prefer the ground at low reference heights.
        let y = index.resolve_elevation(5.0, 0.0, 1.4);
        assert!((y - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_stacked_flats_prefer_nearest_to_reference() {
        let mut index = flat_world();
        // Road deck and a bridge directly above it.
        index.register(WalkableSurface::flat(-5.0, 5.0, -5.0, 5.0, 0.5));
        index.register(WalkableSurface::flat(-5.0, 5.0, -5.0, 5.0, 3.4));

        // Mover at road level stays on the road.
        assert_eq!(index.resolve_elevation(0.0, 0.0, 0.6), 0.5);
        // Mover on the bridge stays on the bridge.
        assert_eq!(index.resolve_elevation(0.0, 0.0, 3.3), 3.4);
    }

    #[test]
    fn test_non_finite_reference_falls_back_to_ground() {
        let mut index = flat_world();
        index.register(WalkableSurface::flat(-2.0, 2.0, -2.0, 2.0, 1.0));

        let y = index.resolve_elevation(0.0, 0.0, f32::NAN);
        assert!(y.is_finite());
    }

    #[test]
    fn test_surface_grip_reported() {
        let mut index = flat_world();
        index.register(WalkableSurface::flat(-2.0, 2.0, -2.0, 2.0, 0.5).with_grip(0.95));

        let support = index.resolve_support(0.0, 0.0, 0.5);
        assert_eq!(support.grip, 0.95);
    }
}
