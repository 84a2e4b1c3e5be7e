//! Explosion event buffer
//!
//! Bridges the damage state machine to whatever applies area damage.
//! Single writer (the per-tick damage advance), single drain (the
//! external loop, once per tick after every vehicle has updated).

use glam::Vec3;

use super::VehicleId;

/// Emitted exactly once per vehicle destruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionEvent {
    /// The vehicle that exploded.
    pub vehicle: VehicleId,
    /// Blast origin in world space.
    pub origin: Vec3,
    /// Blast radius (meters).
    pub radius: f32,
    /// Damage at the origin, falling off linearly to the radius.
    pub max_damage: f32,
    /// Multiplier for chained vehicle damage.
    pub vehicle_falloff: f32,
    /// Multiplier for player damage.
    pub player_falloff: f32,
    /// Knockback impulse magnitude at the origin.
    pub impulse: f32,
}

/// Buffered explosion events awaiting the caller's area-damage pass.
///
/// Events left unconsumed survive to the next drain; the queue never
/// duplicates and never drops.
#[derive(Debug, Default)]
pub struct ExplosionQueue {
    events: Vec<ExplosionEvent>,
}

impl ExplosionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer an event.
    pub fn push(&mut self, event: ExplosionEvent) {
        self.events.push(event);
    }

    /// Take every buffered event, leaving the queue empty.
    pub fn consume(&mut self) -> Vec<ExplosionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_event(id: u32) -> ExplosionEvent {
        ExplosionEvent {
            vehicle: VehicleId(id),
            origin: Vec3::ZERO,
            radius: 9.0,
            max_damage: 95.0,
            vehicle_falloff: 0.85,
            player_falloff: 0.6,
            impulse: 14.0,
        }
    }

    #[test]
    fn test_consume_drains_and_clears() {
        let mut queue = ExplosionQueue::new();
        queue.push(test_event(0));
        queue.push(test_event(1));

        let drained = queue.consume();
        assert_eq!(drained.len(), 2);
        assert!(queue.is_empty());

        // No re-delivery.
        assert!(queue.consume().is_empty());
    }

    #[test]
    fn test_unconsumed_events_are_delayed_not_dropped() {
        let mut queue = ExplosionQueue::new();
        queue.push(test_event(0));
        // A tick passes without a drain; the event is still there.
        queue.push(test_event(1));

        let drained = queue.consume();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].vehicle, VehicleId(0));
        assert_eq!(drained[1].vehicle, VehicleId(1));
    }
}
