//! Sunset City Engine Library
//!
//! Core simulation substrate for the open-world client: terrain and
//! structure navigation, static-world collision, and the vehicle
//! dynamics and destruction lifecycle. Rendering, audio, UI, and AI live
//! outside this crate and consume the interfaces exposed here.
//!
//! # Modules
//!
//! - [`nav`] - Ground heightfield and the walkable-surface elevation index
//! - [`collision`] - Blocking volumes and iterative positional correction
//! - [`vehicle`] - Arcade dynamics, damage lifecycle, explosion events
//! - [`numeric`] - Non-finite input coercion helpers
//!
//! # Example
//!
//! ```ignore
//! use sunset_city_engine::game::world::{World, WorldConfig};
//! use sunset_city_engine::vehicle::{DriveControls, VehicleConfig, VehicleFleet};
//! use glam::Vec3;
//!
//! let world = World::build(&WorldConfig::default());
//! let mut fleet = VehicleFleet::new(0xC17E);
//! let car = fleet.spawn(VehicleConfig::runabout(), Vec3::ZERO, 0.0);
//!
//! // Each frame:
//! let controls = [DriveControls { throttle: 1.0, ..DriveControls::neutral() }];
//! fleet.update(delta_time, &controls, world.surfaces(), world.volumes());
//! for explosion in fleet.consume_explosion_events() {
//!     // area-damage resolution
//! }
//! ```

pub mod collision;
pub mod nav;
pub mod numeric;
pub mod vehicle;

// Game-specific modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

// Re-export the navigation types used by every mover
pub use nav::{Heightfield, SurfaceIndex, Support, WalkableSurface};
// Re-export collision types for player/enemy movement code
pub use collision::{resolve_horizontal, Aabb, BlockingVolumeSet};
// Re-export the vehicle surface consumed by weapons/input layers
pub use vehicle::{
    DamageKind, DamageOutcome, DamageStage, DriveControls, ExplosionEvent, RepairRejection,
    Vehicle, VehicleConfig, VehicleFleet, VehicleId,
};
