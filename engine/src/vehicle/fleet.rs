//! Vehicle fleet management
//!
//! Owns the full vehicle roster plus everything their simulation shares:
//! the world clock, the explosion event buffer, and the seeded RNG that
//! feeds every damage-delay draw. Vehicles are never removed; a
//! destroyed vehicle is a wreck awaiting its optional respawn.

use glam::Vec3;
use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::collision::BlockingVolumeSet;
use crate::nav::SurfaceIndex;
use crate::numeric::finite_or;

use super::config::MAX_TICK_DT;
use super::damage::{DamageKind, DamageOutcome, RepairRejection};
use super::explosion::{ExplosionEvent, ExplosionQueue};
use super::{DriveControls, Vehicle, VehicleConfig, VehicleId};

/// The vehicle roster and its shared simulation state.
pub struct VehicleFleet {
    vehicles: Vec<Vehicle>,
    events: ExplosionQueue,
    clock: f64,
    rng: ChaCha8Rng,
    next_id: u32,
}

impl VehicleFleet {
    /// Create an empty fleet. The seed fixes every damage-delay draw, so
    /// a given session replays identically.
    pub fn new(seed: u64) -> Self {
        Self {
            vehicles: Vec::new(),
            events: ExplosionQueue::new(),
            clock: 0.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_id: 0,
        }
    }

    /// Add a vehicle at rest. Returns its stable handle.
    pub fn spawn(&mut self, config: VehicleConfig, position: Vec3, yaw: f32) -> VehicleId {
        let id = VehicleId(self.next_id);
        self.next_id += 1;
        self.vehicles.push(Vehicle::new(id, config, position, yaw));
        debug!(
            "spawned vehicle {:?} at ({:.1}, {:.1}, {:.1})",
            id, position.x, position.y, position.z
        );
        id
    }

    /// Simulation time in seconds since the fleet was created.
    pub fn now(&self) -> f64 {
        self.clock
    }

    /// Tick every vehicle in spawn order.
    ///
    /// `controls` is indexed by spawn order; missing entries get neutral
    /// input (a vehicle with no driver just coasts). Within the tick,
    /// each vehicle's damage is applied before its own stage machine
    /// advances, so every explosion this tick causes is buffered before
    /// the caller's drain.
    pub fn update(
        &mut self,
        dt: f32,
        controls: &[DriveControls],
        surfaces: &SurfaceIndex,
        volumes: &BlockingVolumeSet,
    ) {
        let dt = finite_or(dt, 0.0).clamp(0.0, MAX_TICK_DT);
        self.clock += dt as f64;

        for (index, vehicle) in self.vehicles.iter_mut().enumerate() {
            let vehicle_controls = controls
                .get(index)
                .copied()
                .unwrap_or_else(DriveControls::neutral);
            vehicle.update(
                dt,
                &vehicle_controls,
                surfaces,
                volumes,
                self.clock,
                &mut self.events,
                &mut self.rng,
            );
        }
    }

    /// Apply damage to one vehicle at the current simulation time.
    /// Returns `None` for an unknown id.
    pub fn apply_damage(
        &mut self,
        id: VehicleId,
        amount: f32,
        kind: DamageKind,
    ) -> Option<DamageOutcome> {
        let now = self.clock;
        let rng = &mut self.rng;
        self.vehicles
            .iter_mut()
            .find(|vehicle| vehicle.id == id)
            .map(|vehicle| vehicle.apply_damage(amount, now, kind, rng))
    }

    /// Repair one vehicle. Returns `None` for an unknown id.
    pub fn repair(
        &mut self,
        id: VehicleId,
        amount: f32,
    ) -> Option<Result<f32, RepairRejection>> {
        self.vehicles
            .iter_mut()
            .find(|vehicle| vehicle.id == id)
            .map(|vehicle| vehicle.repair(amount))
    }

    /// Drain every buffered explosion event. Called once per tick by the
    /// area-damage pass, after all vehicles have updated.
    pub fn consume_explosion_events(&mut self) -> Vec<ExplosionEvent> {
        self.events.consume()
    }

    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|vehicle| vehicle.id == id)
    }

    pub fn get_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.iter_mut().find(|vehicle| vehicle.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Vehicle> {
        self.vehicles.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}
