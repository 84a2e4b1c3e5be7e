//! Vehicle simulation
//!
//! Arcade vehicle dynamics plus the destruction lifecycle. Each vehicle
//! is integrated once per tick from its driver's control inputs,
//! positioned against the navigation and collision layers, and carries a
//! damage state machine that turns accumulated damage into the
//! critical / burning / exploded / wreck sequence.
//!
//! # Per-tick order
//!
//! Speed and yaw integrate first, then the collision resolver corrects
//! the horizontal position (possibly dealing impact damage), then the
//! surface index places the vehicle vertically (possibly dealing fall
//! damage), and only then does the damage state machine advance. Every
//! explosion a tick produces is therefore visible to the caller's
//! area-damage pass in the same tick.

pub mod config;
pub mod damage;
pub mod dynamics;
pub mod explosion;
pub mod fleet;

use glam::Vec3;

use crate::numeric::finite_or;

pub use config::{ExplosionConfig, VehicleConfig};
pub use damage::{DamageKind, DamageOutcome, DamageStage, RepairRejection};
pub use explosion::{ExplosionEvent, ExplosionQueue};
pub use fleet::VehicleFleet;

/// Stable handle for a spawned vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VehicleId(pub u32);

/// One frame of driver input. Supplied by the input-mapping layer for
/// the player and by AI drivers for everything else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveControls {
    /// Forward/reverse demand in [-1, 1].
    pub throttle: f32,
    /// Steering demand in [-1, 1], positive steers left.
    pub steer: f32,
    /// Brake pedal held.
    pub brake: bool,
    /// Boost held.
    pub boost: bool,
}

impl DriveControls {
    /// No input at all.
    pub fn neutral() -> Self {
        Self {
            throttle: 0.0,
            steer: 0.0,
            brake: false,
            boost: false,
        }
    }

    /// Coerce non-finite axes to zero and clamp into range. Bad input
    /// never reaches the integrator.
    pub fn sanitized(self) -> Self {
        Self {
            throttle: finite_or(self.throttle, 0.0).clamp(-1.0, 1.0),
            steer: finite_or(self.steer, 0.0).clamp(-1.0, 1.0),
            brake: self.brake,
            boost: self.boost,
        }
    }
}

impl Default for DriveControls {
    fn default() -> Self {
        Self::neutral()
    }
}

/// A simulated vehicle: archetype config, live pose and motion state,
/// durability, and the destruction lifecycle stage.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    pub config: VehicleConfig,

    /// Authoritative simulation position. Presentation transforms derive
    /// from this; nothing else writes it.
    pub position: Vec3,
    /// Heading in radians. Yaw 0 faces -Z, matching the camera forward
    /// convention.
    pub yaw: f32,
    /// Signed scalar speed along the heading (m/s, negative in reverse).
    pub speed: f32,
    /// World-space horizontal velocity (m/s). Lags the heading when grip
    /// is low; that lag is the drift.
    pub velocity: Vec3,
    /// Eased front-wheel angle for presentation (radians).
    pub steering_angle: f32,
    /// Feedback metric in [0, 1]: how hard the vehicle is sliding.
    pub drift_intensity: f32,

    /// Current durability in [0, max_health].
    pub health: f32,
    /// Destruction lifecycle stage.
    pub stage: DamageStage,
    /// Headlights state; forced off when the vehicle explodes.
    pub headlights_on: bool,

    /// Traction of the surface resolved during the previous placement.
    surface_grip: f32,
    /// Set while an over-threshold drop is in progress so one fall deals
    /// damage once, not once per descent tick.
    falling: bool,
    /// Previous frame's brake state, for handbrake edge detection.
    brake_was_held: bool,
}

impl Vehicle {
    /// Create a vehicle at rest, intact and at full health.
    pub fn new(id: VehicleId, config: VehicleConfig, position: Vec3, yaw: f32) -> Self {
        Self {
            id,
            config,
            position,
            yaw: finite_or(yaw, 0.0),
            speed: 0.0,
            velocity: Vec3::ZERO,
            steering_angle: 0.0,
            drift_intensity: 0.0,
            health: config.max_health,
            stage: DamageStage::Intact,
            headlights_on: true,
            surface_grip: 1.0,
            falling: false,
            brake_was_held: false,
        }
    }

    /// Unit forward vector of the current heading on the XZ plane.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Durability as a fraction of the archetype maximum.
    pub fn health_ratio(&self) -> f32 {
        if self.config.max_health > 0.0 {
            self.health / self.config.max_health
        } else {
            0.0
        }
    }

    /// Traction under the vehicle as of its last placement.
    pub fn surface_grip(&self) -> f32 {
        self.surface_grip
    }

    /// Rising-edge detector for the brake pedal. True exactly once per
    /// press.
    fn take_brake_edge(&mut self, brake: bool) -> bool {
        let edge = brake && !self.brake_was_held;
        self.brake_was_held = brake;
        edge
    }
}
