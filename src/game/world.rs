//! World Construction
//!
//! Centralized configuration and assembly for the authored district:
//! the plaza and roadway decks, the depot tower floors, the overpass
//! ramp and bridge, the perimeter walls, and the sliding depot gate.
//! Mesh construction consumes the same layout elsewhere; this module
//! only registers the simulation side (walkable surfaces and blocking
//! volumes).

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec3;
use log::debug;

use crate::collision::{resolve_horizontal, Aabb, BlockingVolumeSet};
use crate::nav::{Heightfield, RampAxis, Support, SurfaceIndex, WalkableSurface};

/// Open fraction at which a gate stops blocking. Slightly before fully
/// open so a mover can slip through while the leaf finishes its travel.
pub const GATE_PASSABLE_OPEN: f32 = 0.92;

/// Traction of interior building floors.
const INTERIOR_GRIP: f32 = 0.95;

/// A gate leaf that slides aside as it opens.
///
/// The open amount lives behind a shared cell: the gate logic writes it
/// during the pre-movement phase, and the dynamic blocking volume reads
/// it during movement resolution. Nothing mutates it between those
/// phases.
#[derive(Debug, Clone)]
pub struct SlidingGate {
    open: Rc<Cell<f32>>,
    closed_bounds: Aabb,
    /// Translation of the leaf at full open.
    slide: Vec3,
}

impl SlidingGate {
    pub fn new(closed_bounds: Aabb, slide: Vec3) -> Self {
        Self {
            open: Rc::new(Cell::new(0.0)),
            closed_bounds,
            slide,
        }
    }

    /// Set the open fraction in [0, 1]. Called by door logic before
    /// movement resolution runs.
    pub fn set_open(&self, amount: f32) {
        self.open.set(amount.clamp(0.0, 1.0));
    }

    pub fn open_amount(&self) -> f32 {
        self.open.get()
    }

    /// The leaf's box at its current slide position.
    pub fn current_bounds(&self) -> Aabb {
        let offset = self.slide * self.open.get();
        Aabb::new(self.closed_bounds.min + offset, self.closed_bounds.max + offset)
    }

    /// Whether the leaf still blocks movement.
    pub fn is_blocking(&self) -> bool {
        self.open.get() < GATE_PASSABLE_OPEN
    }
}

/// Central configuration for the authored district layout.
///
/// `Default` matches the shipped district; the editor writes variants of
/// this when authoring new blocks.
#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// Base terrain parameters.
    pub heightfield: Heightfield,
    /// Elevation of the central plaza deck.
    pub plaza_y: f32,
    /// Half extent of the square plaza.
    pub plaza_half: f32,
    /// Elevation of the roadway strip running north-south.
    pub road_y: f32,
    /// Roadway half width.
    pub road_half_width: f32,
    /// Roadway half length.
    pub road_half_length: f32,
    /// Deck elevation of the overpass bridge above the roadway.
    pub bridge_y: f32,
    /// Depot floor spacing (ground floor sits at `plaza_y`).
    pub depot_floor_height: f32,
    /// Number of elevated depot floors.
    pub depot_floors: u32,
    /// The depot gate's full slide travel along +X (meters).
    pub gate_slide: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            heightfield: Heightfield::default(),
            plaza_y: 0.4,
            plaza_half: 30.0,
            road_y: 0.3,
            road_half_width: 5.0,
            road_half_length: 120.0,
            bridge_y: 3.7,
            depot_floor_height: 3.2,
            depot_floors: 2,
            gate_slide: 6.5,
        }
    }
}

/// The assembled district: navigation surfaces, blocking volumes, and
/// the live gate. Built once; surfaces and static volumes are read-only
/// for the process lifetime.
pub struct World {
    surfaces: SurfaceIndex,
    volumes: BlockingVolumeSet,
    depot_gate: SlidingGate,
}

impl World {
    /// Register the authored layout.
    pub fn build(config: &WorldConfig) -> Self {
        let mut surfaces = SurfaceIndex::new(config.heightfield);
        let mut volumes = BlockingVolumeSet::new();

        // Central plaza deck.
        surfaces.register(WalkableSurface::flat(
            -config.plaza_half,
            config.plaza_half,
            -config.plaza_half,
            config.plaza_half,
            config.plaza_y,
        ));

        // North-south roadway through the district.
        surfaces.register(WalkableSurface::flat(
            -config.road_half_width,
            config.road_half_width,
            -config.road_half_length,
            config.road_half_length,
            config.road_y,
        ));

        // Overpass: ramp up from the plaza, bridge deck over the road,
        // ramp back down on the far side.
        let bridge_half_span = config.road_half_width + 6.0;
        let ramp_length = 14.0;
        surfaces.register(WalkableSurface::ramp(
            -bridge_half_span - ramp_length,
            -bridge_half_span,
            38.0,
            44.0,
            RampAxis::X,
            -bridge_half_span - ramp_length,
            -bridge_half_span,
            config.plaza_y,
            config.bridge_y,
        ));
        surfaces.register(WalkableSurface::flat(
            -bridge_half_span,
            bridge_half_span,
            38.0,
            44.0,
            config.bridge_y,
        ));
        surfaces.register(WalkableSurface::ramp(
            bridge_half_span,
            bridge_half_span + ramp_length,
            38.0,
            44.0,
            RampAxis::X,
            bridge_half_span + ramp_length,
            bridge_half_span,
            config.plaza_y,
            config.bridge_y,
        ));

        // Depot floors stacked above the plaza's east corner.
        for floor in 1..=config.depot_floors {
            let y = config.plaza_y + floor as f32 * config.depot_floor_height;
            surfaces.register(
                WalkableSurface::flat(14.0, 26.0, -26.0, -14.0, y).with_grip(INTERIOR_GRIP),
            );
        }

        // Perimeter walls around the plaza, with the south side left
        // open for the road and the depot gate.
        let wall_height = 3.0;
        let half = config.plaza_half;
        volumes.register_static(Aabb::new(
            Vec3::new(-half, config.plaza_y, -half - 0.6),
            Vec3::new(half, config.plaza_y + wall_height, -half),
        ));
        volumes.register_static(Aabb::new(
            Vec3::new(-half - 0.6, config.plaza_y, -half),
            Vec3::new(-half, config.plaza_y + wall_height, half),
        ));
        volumes.register_static(Aabb::new(
            Vec3::new(half, config.plaza_y, -half),
            Vec3::new(half + 0.6, config.plaza_y + wall_height, half),
        ));

        // Depot support columns under the elevated floors.
        for corner_x in [15.0, 25.0] {
            for corner_z in [-25.0, -15.0] {
                volumes.register_static(Aabb::from_center(
                    Vec3::new(corner_x, config.plaza_y + 3.0, corner_z),
                    Vec3::new(0.45, 3.0, 0.45),
                ));
            }
        }

        // Sliding depot gate across the south road opening. The leaf
        // slides east as it opens; past GATE_PASSABLE_OPEN it no longer
        // blocks at all.
        let depot_gate = SlidingGate::new(
            Aabb::new(
                Vec3::new(-config.road_half_width, config.road_y, 29.4),
                Vec3::new(config.road_half_width, config.road_y + wall_height, 30.0),
            ),
            Vec3::new(config.gate_slide, 0.0, 0.0),
        );
        let leaf = depot_gate.clone();
        let blocking = depot_gate.clone();
        volumes.register_dynamic(move || leaf.current_bounds(), move || blocking.is_blocking());

        debug!(
            "world built: {} surfaces, {} volumes",
            surfaces.len(),
            volumes.len()
        );

        Self {
            surfaces,
            volumes,
            depot_gate,
        }
    }

    /// Standing elevation for any mover (player, enemy, vehicle, camera).
    pub fn resolve_elevation(&self, x: f32, z: f32, reference_y: f32) -> f32 {
        self.surfaces.resolve_elevation(x, z, reference_y)
    }

    /// Standing elevation plus traction for vehicle placement.
    pub fn resolve_support(&self, x: f32, z: f32, reference_y: f32) -> Support {
        self.surfaces.resolve_support(x, z, reference_y)
    }

    /// Push a mover's cylinder out of all enabled blocking volumes.
    /// Returns the summed correction magnitude.
    pub fn resolve_horizontal_collision(
        &self,
        position: &mut Vec3,
        radius: f32,
        bottom_y: f32,
        top_y: f32,
    ) -> f32 {
        resolve_horizontal(position, radius, bottom_y, top_y, &self.volumes)
    }

    /// Registration pass-throughs for structure-building code.
    pub fn register_surface(&mut self, surface: WalkableSurface) {
        self.surfaces.register(surface);
    }

    pub fn register_static_volume(&mut self, volume: Aabb) {
        self.volumes.register_static(volume);
    }

    pub fn register_dynamic_volume(
        &mut self,
        bounds: impl Fn() -> Aabb + 'static,
        enabled: impl Fn() -> bool + 'static,
    ) {
        self.volumes.register_dynamic(bounds, enabled);
    }

    pub fn surfaces(&self) -> &SurfaceIndex {
        &self.surfaces
    }

    pub fn volumes(&self) -> &BlockingVolumeSet {
        &self.volumes
    }

    pub fn depot_gate(&self) -> &SlidingGate {
        &self.depot_gate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_registers_layout() {
        let world = World::build(&WorldConfig::default());
        assert!(world.surfaces().len() >= 6);
        assert!(world.volumes().len() >= 8);
    }

    #[test]
    fn test_plaza_elevation() {
        let world = World::build(&WorldConfig::default());
        let y = world.resolve_elevation(0.0, 10.0, 0.4);
        assert_eq!(y, 0.4);
    }

    #[test]
    fn test_bridge_over_road_disambiguates() {
        let config = WorldConfig::default();
        let world = World::build(&config);

        // On the road under the bridge.
        let road = world.resolve_elevation(0.0, 41.0, config.road_y);
        assert_eq!(road, config.road_y);

        // On the bridge deck above the same spot.
        let bridge = world.resolve_elevation(0.0, 41.0, config.bridge_y - 0.1);
        assert_eq!(bridge, config.bridge_y);
    }

    #[test]
    fn test_overpass_ramp_ascends() {
        let config = WorldConfig::default();
        let world = World::build(&config);
        let bridge_half_span = config.road_half_width + 6.0;

        let low = world.resolve_elevation(-bridge_half_span - 13.0, 41.0, config.plaza_y);
        let high = world.resolve_elevation(-bridge_half_span - 1.0, 41.0, config.bridge_y - 1.0);
        assert!(low < high);
        assert!(low >= config.plaza_y - 0.01);
        assert!(high <= config.bridge_y + 0.01);
    }

    #[test]
    fn test_gate_blocks_until_nearly_open() {
        let world = World::build(&WorldConfig::default());
        let gate = world.depot_gate();

        // Closed gate: a mover in the opening gets pushed.
        gate.set_open(0.5);
        let mut position = Vec3::new(0.0, 0.5, 29.7);
        let correction = world.resolve_horizontal_collision(&mut position, 0.5, 0.5, 2.0);
        assert!(correction > 0.0);

        // Nearly open: the volume drops out of the active list.
        gate.set_open(0.95);
        let mut position = Vec3::new(0.0, 0.5, 29.7);
        let correction = world.resolve_horizontal_collision(&mut position, 0.5, 0.5, 2.0);
        assert_eq!(correction, 0.0);
    }

    #[test]
    fn test_gate_leaf_tracks_slide() {
        let world = World::build(&WorldConfig::default());
        let gate = world.depot_gate();

        gate.set_open(0.0);
        let closed = gate.current_bounds();
        gate.set_open(0.5);
        let half_open = gate.current_bounds();

        assert!(half_open.min.x > closed.min.x);
        assert_eq!(half_open.min.z, closed.min.z);
    }
}
